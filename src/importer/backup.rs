// ==========================================
// 物流 NT 看板 - 原始数据备份
// ==========================================
// 职责: 每次成功读取后, 把清洗前的原始表写入备份目录
// 文件名: dados_brutos_YYYYMMDD_HHMMSS.csv (逗号分隔, UTF-8)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawTable;
use chrono::NaiveDateTime;
use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 备份文件名前缀
pub const BACKUP_PREFIX: &str = "dados_brutos_";

#[derive(Debug, Clone)]
pub struct BackupWriter {
    dir: PathBuf,
}

impl BackupWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 备份文件路径（秒级时间戳）
    pub fn backup_path(&self, now: NaiveDateTime) -> PathBuf {
        self.dir
            .join(format!("{}{}.csv", BACKUP_PREFIX, now.format("%Y%m%d_%H%M%S")))
    }

    /// 写入备份, 目录不存在时自动创建
    pub fn write(&self, raw: &RawTable, now: NaiveDateTime) -> ImportResult<PathBuf> {
        let path = self.backup_path(now);
        let to_error = |message: String| ImportError::BackupWriteError {
            path: path.display().to_string(),
            message,
        };

        fs::create_dir_all(&self.dir).map_err(|e| to_error(e.to_string()))?;

        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(|e| to_error(e.to_string()))?;
        writer
            .write_record(&raw.headers)
            .map_err(|e| to_error(e.to_string()))?;
        for record in &raw.records {
            writer
                .write_record(record)
                .map_err(|e| to_error(e.to_string()))?;
        }
        writer.flush().map_err(|e| to_error(e.to_string()))?;

        debug!(path = %path.display(), rows = raw.len(), "原始数据已备份");
        Ok(path)
    }
}
