// ==========================================
// 物流 NT 看板 - 应用层
// ==========================================
// 职责: 装配各层组件, 供入口程序使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_config_path, AppState, CONFIG_PATH_ENV};
