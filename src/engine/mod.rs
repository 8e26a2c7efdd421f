// ==========================================
// 物流 NT 看板 - 引擎层
// ==========================================
// 依据: 看板业务规则 - 分类 / 日期窗口 / 指标 / 切单 / 排名 / 预测
// ==========================================
// 职责: 实现数据处理规则, 不做 IO
// 红线: 引擎不修改输入表, 预期内的空结果用 StageOutcome::Empty 表达
// ==========================================

pub mod classifier;
pub mod cut_detector;
pub mod date_window;
pub mod metrics;
pub mod outcome;
pub mod progress;
pub mod quantity;
pub mod ranking;

// 重导出核心引擎
pub use classifier::RowClassifier;
pub use cut_detector::CutDetector;
pub use date_window::{DateWindowFilter, FilterNotice, FilteredTable};
pub use metrics::MetricsAggregator;
pub use outcome::{EmptyReason, StageOutcome};
pub use progress::{Clock, FixedClock, ProgressTracker, SystemClock};
pub use quantity::parse_quantity;
pub use ranking::OperatorRanking;
