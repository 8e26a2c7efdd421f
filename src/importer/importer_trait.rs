// ==========================================
// 物流 NT 看板 - 导入管道 Trait
// ==========================================
// 职责: 定义导入各阶段接口（不包含实现）
// 流程: 解析 → 备份 → 映射 → 清洗
// ==========================================

use crate::domain::nt_row::NtTable;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::RawTable;
use crate::importer::nt_importer::LoadReport;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// NtImporter Trait
// ==========================================
// 用途: 导入主接口
// 实现者: NtImporterImpl
#[async_trait]
pub trait NtImporter: Send + Sync {
    /// 读取 SAP 导出文件
    ///
    /// # 返回
    /// - Ok(LoadReport): 数据表 + 统计 + 提示（文件不存在时为空表 + 提示）
    /// - Err: 文件读取 / CSV 解析错误
    async fn load(&self) -> ImportResult<LoadReport>;

    /// 数据源路径
    fn source_path(&self) -> &Path;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 1）
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表（表头 + 文本行）
    fn parse(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 3）
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 原始表 → 强类型 NtTable（记录列存在性）
    fn map_table(&self, raw: &RawTable) -> NtTable;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 数据清洗接口（阶段 4）
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 清洗数据表, 返回 (清洗后的表, 删除的行数)
    fn clean(&self, table: NtTable) -> (NtTable, usize);
}
