// ==========================================
// 物流 NT 看板 - 导入层
// ==========================================
// 职责: 读取 SAP 导出文件, 生成内存数据表
// 支持: CSV (分号分隔, Latin-1)
// ==========================================

// 模块声明
pub mod backup;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod nt_importer;

// 重导出核心类型
pub use backup::BackupWriter;
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, RawTable};
pub use nt_importer::{LoadNotice, LoadReport, NtImporterImpl};

// 重导出 Trait 接口
pub use importer_trait::{DataCleaner, FieldMapper, FileParser, NtImporter};
