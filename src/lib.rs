// ==========================================
// 物流 NT 看板 - 核心库
// ==========================================
// 依据: 看板业务规则 - 分类 / 日期窗口 / 指标 / 切单 / 排名 / 预测
// 技术栈: Rust + CSV (SAP 导出) + 内存数据表
// 系统定位: 只读看板 (数据来源为 SAP 导出文件)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 导出行与派生结果
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - SAP 导出文件
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// SAP 刷新协作方
pub mod sap;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 页面接口
pub mod api;

// 应用层 - 组件装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    DashboardWindowPolicy, DateFilterMode, Depot, DepotScope, NtStatus, OperatorType, Window,
};

// 领域实体
pub use domain::{
    CutBundle, Forecast, ForecastEstimate, HistoryEntry, MetricsBundle, NtRow, NtTable,
    ProgressSnapshot, RankingEntry,
};

// 引擎
pub use engine::{
    CutDetector, DateWindowFilter, MetricsAggregator, OperatorRanking, ProgressTracker,
    RowClassifier, StageOutcome,
};

// API
pub use api::{ApiError, ApiResult, DashboardApi, ScreenOutcome};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Dashboard de Produção - Logística";
