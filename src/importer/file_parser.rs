// ==========================================
// 物流 NT 看板 - 文件解析器实现
// ==========================================
// 依据: SAP 导出文件格式 - 分号分隔 / Latin-1 编码 / 全部按文本读取
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use csv::{ByteRecord, ReaderBuilder};
use std::fs::File;
use std::path::Path;

/// SAP 导出文件的分隔符
pub const SAP_DELIMITER: u8 = b';';

// ==========================================
// RawTable - 解析后的原始表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: SAP_DELIMITER,
        }
    }
}

impl CsvParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl FileParser for CsvParser {
    fn parse(&self, file_path: &Path) -> ImportResult<RawTable> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头
        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| decode_latin1(h).trim().to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::MissingHeader(file_path.display().to_string()));
        }

        // 读取所有行
        let mut records = Vec::new();
        let mut record = ByteRecord::new();
        while reader.read_byte_record(&mut record)? {
            let values: Vec<String> = record
                .iter()
                .map(|v| decode_latin1(v).trim().to_string())
                .collect();

            // 跳过完全空白的行
            if values.iter().all(|v| v.is_empty()) {
                continue;
            }

            records.push(values);
        }

        Ok(RawTable { headers, records })
    }
}

/// Latin-1 (ISO-8859-1) 解码: 每个字节对应同值的 Unicode 码位
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
