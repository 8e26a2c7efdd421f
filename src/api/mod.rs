// ==========================================
// 物流 NT 看板 - API 层
// ==========================================
// 职责: 提供页面查询接口, 供展示层（main.rs 或其他前端）调用
// ==========================================

pub mod dashboard_api;
pub mod dto;
pub mod error;

// 重导出核心类型
pub use dashboard_api::DashboardApi;
pub use dto::{
    CalculationsView, CutsView, DashboardView, DiagnosticsView, ForecastView, LoadSummary,
    RawDataView, RefreshSummary, ScreenOutcome,
};
pub use error::{ApiError, ApiResult};
