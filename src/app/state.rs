// ==========================================
// 物流 NT 看板 - 应用状态
// ==========================================
// 职责: 按配置装配导入器 / 引擎 / 进度历史 / API 实例
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::DashboardApi;
use crate::config::{ConfigManager, ConfigResult, DashboardSettings};
use crate::engine::{
    Clock, DateWindowFilter, MetricsAggregator, ProgressTracker, RowClassifier, SystemClock,
};
use crate::importer::{BackupWriter, CsvParser, DataCleanerImpl, FieldMapperImpl, NtImporterImpl};
use crate::sap::{CommandSapRefresher, DisabledSapRefresher, SapRefresher};

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "LOGISTICA_CONFIG";

/// 应用状态
///
/// 一个进程一个实例; 进度历史随进程存在, 不落盘
pub struct AppState {
    /// 生效的设置
    pub settings: DashboardSettings,

    /// 看板API
    pub dashboard_api: Arc<DashboardApi>,

    /// 进度历史（看板页登记, 计算页读取）
    pub tracker: Arc<ProgressTracker>,

    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// 使用系统时间创建应用状态
    pub fn new(settings: DashboardSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// 从配置管理器创建
    pub fn from_config(config: &ConfigManager) -> ConfigResult<Self> {
        Ok(Self::new(config.settings()?))
    }

    /// 指定时间来源; SAP 刷新方式由配置决定
    pub fn with_clock(settings: DashboardSettings, clock: Arc<dyn Clock>) -> Self {
        let refresher: Arc<dyn SapRefresher> = match &settings.sap_refresh_command {
            Some(command) => Arc::new(CommandSapRefresher::new(
                command.clone(),
                settings.sap_settle_delay,
            )),
            None => Arc::new(DisabledSapRefresher),
        };
        Self::with_components(settings, clock, refresher)
    }

    /// 指定时间来源与 SAP 刷新协作方
    pub fn with_components(
        settings: DashboardSettings,
        clock: Arc<dyn Clock>,
        refresher: Arc<dyn SapRefresher>,
    ) -> Self {
        tracing::info!(
            source = %settings.sap_export_path.display(),
            backup_dir = %settings.backup_dir.display(),
            depots = settings.depots.len(),
            "初始化AppState"
        );

        // ==========================================
        // 导入器
        // ==========================================
        let importer = NtImporterImpl::new(
            settings.sap_export_path.clone(),
            Box::new(CsvParser::default()),
            Box::new(FieldMapperImpl),
            Box::new(DataCleanerImpl::new(settings.strip_ghost_rows)),
            Some(BackupWriter::new(settings.backup_dir.clone())),
            clock.clone(),
        );

        // ==========================================
        // 引擎
        // ==========================================
        let date_filter = DateWindowFilter::new(
            clock.clone(),
            settings.date_filter_mode,
            settings.dashboard_window_policy,
        );
        let aggregator = MetricsAggregator::new(
            RowClassifier::new(settings.normal_users.iter().cloned()),
            settings.depot_scope,
            settings.depot_codes(),
        );
        let tracker = Arc::new(ProgressTracker::new(settings.history_capacity));

        // ==========================================
        // API
        // ==========================================
        let dashboard_api = Arc::new(DashboardApi::new(
            settings.depots.clone(),
            Arc::new(importer),
            refresher,
            date_filter,
            aggregator,
            tracker.clone(),
            clock.clone(),
        ));

        Self {
            settings,
            dashboard_api,
            tracker,
            clock,
        }
    }
}

/// 获取默认配置文件路径
///
/// 优先级: LOGISTICA_CONFIG > 用户配置目录 > 当前目录
pub fn get_default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::config_dir() {
        Some(dir) => dir.join("logistica-dashboard").join("config.json"),
        None => PathBuf::from("./logistica_config.json"),
    }
}
