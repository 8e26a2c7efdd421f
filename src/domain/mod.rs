// ==========================================
// 物流 NT 看板 - 领域层
// ==========================================
// 职责: 导出行、派生状态、指标包、切单、进度快照
// 红线: 领域对象只承载数据, 规则在 engine 层
// ==========================================

pub mod cut;
pub mod metrics;
pub mod nt_row;
pub mod progress;
pub mod types;

// 重导出核心类型
pub use cut::{CutBundle, CutRecord, MaterialCutSummary, OperatorCutSummary};
pub use metrics::{MetricsBundle, NtStatusRow, StatusMatrix, StatusMatrixRow};
pub use nt_row::{Column, NtRow, NtTable};
pub use progress::{Forecast, ForecastEstimate, HistoryEntry, ProgressSnapshot, RankingEntry};
pub use types::{
    DashboardWindowPolicy, DateFilterMode, Depot, DepotScope, NtStatus, OperatorType, Screen,
    Window,
};
