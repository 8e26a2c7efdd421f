// ==========================================
// 物流 NT 看板 - NT 数据导入器实现
// ==========================================
// 职责: 整合导入流程, 从 SAP 导出文件到内存数据表
// 流程: 解析 → 备份 → 映射 → 清洗
// 红线: 文件不存在不是错误（空表 + 提示）; 备份失败不阻断导入
// ==========================================

use crate::domain::nt_row::NtTable;
use crate::engine::progress::Clock;
use crate::importer::backup::BackupWriter;
use crate::importer::error::ImportResult;
use crate::importer::importer_trait::{DataCleaner, FieldMapper, FileParser, NtImporter};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// LoadReport - 导入结果
// ==========================================

/// 导入过程中的提示（非错误）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadNotice {
    /// 导出文件不存在
    FileMissing { path: String },
    /// 备份写入失败
    BackupFailed { message: String },
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub table: NtTable,
    /// 解析出的原始行数（清洗前）
    pub rows_read: usize,
    pub ghost_rows_removed: usize,
    pub backup_path: Option<PathBuf>,
    pub notices: Vec<LoadNotice>,
}

impl LoadReport {
    fn file_missing(path: &Path) -> Self {
        Self {
            table: NtTable::empty(),
            rows_read: 0,
            ghost_rows_removed: 0,
            backup_path: None,
            notices: vec![LoadNotice::FileMissing {
                path: path.display().to_string(),
            }],
        }
    }
}

// ==========================================
// NtImporterImpl - 导入器实现
// ==========================================
pub struct NtImporterImpl {
    source_path: PathBuf,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    data_cleaner: Box<dyn DataCleaner>,

    // 备份（None 时不备份）
    backup: Option<BackupWriter>,

    clock: Arc<dyn Clock>,
}

impl NtImporterImpl {
    /// 创建导入器
    ///
    /// # 参数
    /// - source_path: SAP 导出文件路径
    /// - file_parser: 文件解析器
    /// - field_mapper: 字段映射器
    /// - data_cleaner: 数据清洗器
    /// - backup: 备份写入器
    /// - clock: 时间来源（备份文件名）
    pub fn new(
        source_path: impl Into<PathBuf>,
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
        data_cleaner: Box<dyn DataCleaner>,
        backup: Option<BackupWriter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            file_parser,
            field_mapper,
            data_cleaner,
            backup,
            clock,
        }
    }
}

#[async_trait]
impl NtImporter for NtImporterImpl {
    #[instrument(skip(self), fields(path = %self.source_path.display()))]
    async fn load(&self) -> ImportResult<LoadReport> {
        let start_time = Instant::now();

        if !self.source_path.exists() {
            warn!("导出文件不存在");
            return Ok(LoadReport::file_missing(&self.source_path));
        }

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let raw = self.file_parser.parse(&self.source_path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        let rows_read = raw.len();
        info!(rows_read, columns = ?raw.headers, "文件解析完成");

        // === 步骤 2: 备份原始数据 ===
        let mut notices = Vec::new();
        let mut backup_path = None;
        if let Some(writer) = &self.backup {
            debug!("步骤 2: 备份原始数据");
            match writer.write(&raw, self.clock.now()) {
                Ok(path) => {
                    info!(backup = %path.display(), "原始数据备份完成");
                    backup_path = Some(path);
                }
                Err(e) => {
                    error!(error = %e, "原始数据备份失败");
                    notices.push(LoadNotice::BackupFailed {
                        message: e.to_string(),
                    });
                }
            }
        }

        // === 步骤 3: 字段映射 ===
        debug!("步骤 3: 字段映射");
        let table = self.field_mapper.map_table(&raw);

        // === 步骤 4: 数据清洗 ===
        debug!("步骤 4: 数据清洗");
        let (table, ghost_rows_removed) = self.data_cleaner.clean(table);

        info!(
            rows = table.len(),
            ghost_rows_removed,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "数据导入完成"
        );

        Ok(LoadReport {
            table,
            rows_read,
            ghost_rows_removed,
            backup_path,
            notices,
        })
    }

    fn source_path(&self) -> &Path {
        &self.source_path
    }
}
