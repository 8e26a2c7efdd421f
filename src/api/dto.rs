// ==========================================
// 物流 NT 看板 - API 数据传输对象
// ==========================================
// 职责: 页面结果的可序列化结构, 提示文字在此处本地化
// 红线: 必需阶段无数据时只返回提示, 不返回部分指标
// ==========================================

use crate::domain::cut::CutBundle;
use crate::domain::metrics::{MetricsBundle, NtStatusRow, StatusMatrix};
use crate::domain::nt_row::NtRow;
use crate::domain::progress::{Forecast, HistoryEntry, ProgressSnapshot, RankingEntry};
use crate::domain::types::{DashboardWindowPolicy, DateFilterMode, Depot};
use crate::engine::date_window::FilterNotice;
use crate::engine::outcome::{EmptyReason, StageOutcome};
use crate::i18n::{t, t_with_args};
use crate::importer::nt_importer::{LoadNotice, LoadReport};
use chrono::NaiveDateTime;
use serde::Serialize;

// ==========================================
// ScreenOutcome - 页面结果
// ==========================================

/// 页面结果
///
/// 序列化为 `{"status": "ready" | "no_data" | "failed", ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScreenOutcome<T> {
    Ready { data: T, notices: Vec<String> },
    NoData { notice: String },
    Failed { notice: String },
}

impl<T> ScreenOutcome<T> {
    pub fn ready(data: T, notices: Vec<String>) -> Self {
        ScreenOutcome::Ready { data, notices }
    }

    pub fn no_data(reason: &EmptyReason) -> Self {
        ScreenOutcome::NoData {
            notice: empty_notice(reason),
        }
    }

    /// 内部失败（细节只进日志）
    pub fn failed() -> Self {
        ScreenOutcome::Failed {
            notice: t("notice.internal_failure"),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ScreenOutcome::Ready { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ScreenOutcome::Ready { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        match self {
            ScreenOutcome::NoData { notice } | ScreenOutcome::Failed { notice } => Some(notice),
            ScreenOutcome::Ready { .. } => None,
        }
    }
}

/// 阶段结果拆分: Ready 继续, 其余直接转成页面结果
pub(crate) fn split_stage<T, U>(outcome: StageOutcome<T>) -> Result<T, ScreenOutcome<U>> {
    match outcome {
        StageOutcome::Ready(value) => Ok(value),
        StageOutcome::Empty(reason) => Err(ScreenOutcome::no_data(&reason)),
        StageOutcome::Failure(_) => Err(ScreenOutcome::failed()),
    }
}

// ==========================================
// 提示文字
// ==========================================

pub fn empty_notice(reason: &EmptyReason) -> String {
    match reason {
        EmptyReason::EmptyInput => t("notice.empty_input"),
        EmptyReason::MissingColumn { column } => {
            t_with_args("notice.missing_column", &[("column", column.header())])
        }
        EmptyReason::NoRowsForDepot { depot } => {
            t_with_args("notice.no_rows_for_depot", &[("depot", depot)])
        }
        EmptyReason::NothingMatched => t("notice.nothing_matched"),
    }
}

pub fn filter_notice(notice: &FilterNotice) -> String {
    match notice {
        FilterNotice::MissingColumn { column } => {
            t_with_args("notice.date_column_missing", &[("column", column.header())])
        }
        FilterNotice::Disabled => t("notice.filter_disabled"),
    }
}

pub fn load_notice(notice: &LoadNotice) -> String {
    match notice {
        LoadNotice::FileMissing { path } => t_with_args("notice.file_missing", &[("path", path)]),
        LoadNotice::BackupFailed { message } => {
            t_with_args("notice.backup_failed", &[("message", message)])
        }
    }
}

// ==========================================
// 导入 / 刷新
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub rows_loaded: usize,
    pub ghost_rows_removed: usize,
    pub backup_path: Option<String>,
    pub notices: Vec<String>,
    pub loaded_at: NaiveDateTime,
}

impl LoadSummary {
    pub fn from_report(report: &LoadReport, loaded_at: NaiveDateTime) -> Self {
        Self {
            rows_read: report.rows_read,
            rows_loaded: report.table.len(),
            ghost_rows_removed: report.ghost_rows_removed,
            backup_path: report.backup_path.as_ref().map(|p| p.display().to_string()),
            notices: report.notices.iter().map(load_notice).collect(),
            loaded_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshSummary {
    pub message: String,
    pub load: LoadSummary,
}

// ==========================================
// 看板页
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub depot: Depot,
    pub total_linhas: usize,
    pub finalizadas: usize,
    pub percent_finalized: u32,
    pub total_um: f64,
    pub normal_linhas: usize,
    pub normal_um: f64,
    pub reforco_linhas: usize,
    pub reforco_um: f64,
    pub status_counts: StatusMatrix,
    pub status_nts: Vec<NtStatusRow>,
    /// 本次登记的进度快照
    pub progress: ProgressSnapshot,
}

impl DashboardView {
    pub fn new(depot: Depot, bundle: MetricsBundle, progress: ProgressSnapshot) -> Self {
        let percent_finalized = bundle.percent_finalized();
        Self {
            depot,
            total_linhas: bundle.total_linhas,
            finalizadas: bundle.finalizadas,
            percent_finalized,
            total_um: bundle.total_um,
            normal_linhas: bundle.normal_linhas,
            normal_um: bundle.normal_um,
            reforco_linhas: bundle.reforco_linhas,
            reforco_um: bundle.reforco_um,
            status_counts: bundle.status_counts,
            status_nts: bundle.status_nts,
            progress,
        }
    }
}

// ==========================================
// 计算页
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub forecast: Forecast,
    pub remaining_hours: Option<u64>,
    pub remaining_minutes: Option<u64>,
    pub notice: Option<String>,
}

impl ForecastView {
    pub fn new(forecast: Forecast, depot: &str) -> Self {
        let (remaining, notice) = match &forecast {
            Forecast::Ok(estimate) => (Some(estimate.remaining_hours_minutes()), None),
            Forecast::Insufficient { .. } => (
                None,
                Some(t_with_args("notice.forecast_insufficient", &[("depot", depot)])),
            ),
            Forecast::NoProgress { .. } => (None, Some(t("notice.forecast_no_progress"))),
        };
        Self {
            forecast,
            remaining_hours: remaining.map(|(h, _)| h),
            remaining_minutes: remaining.map(|(_, m)| m),
            notice,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationsView {
    pub depot: Depot,
    pub ranking: Vec<RankingEntry>,
    pub ranking_notice: Option<String>,
    pub forecast: ForecastView,
    /// 最新在前
    pub history: Vec<HistoryEntry>,
    pub history_notice: Option<String>,
}

// ==========================================
// 切单页 / 原始数据页
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutsView {
    /// None 表示全部仓库
    pub depot: Option<Depot>,
    pub cuts: CutBundle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawDataView {
    pub depot: Depot,
    pub total: usize,
    pub rows: Vec<NtRow>,
}

// ==========================================
// 诊断
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticsView {
    pub source_path: String,
    pub file_exists: bool,
    pub file_size_kb: Option<f64>,
    pub loaded_rows: usize,
    pub rows_in_other_window: usize,
    pub columns: Vec<String>,
    pub distinct_depots: Vec<String>,
    pub date_filter_mode: DateFilterMode,
    pub dashboard_window_policy: DashboardWindowPolicy,
    pub history_timestamps: usize,
    pub last_load: Option<LoadSummary>,
}
