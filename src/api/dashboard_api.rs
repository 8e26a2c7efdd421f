// ==========================================
// 物流 NT 看板 - 看板 API
// ==========================================
// 职责: 持有当前数据表, 按页面串联 日期窗口 → 引擎 → DTO
// 红线: 每次调用都基于当前内存表重新计算; 重新加载时整体替换
// 架构: API 层 → Engine 层 / Importer 层 / SAP 协作方
// ==========================================

use std::sync::{Arc, RwLock};

use tracing::{debug, info, instrument, warn};

use crate::api::dto::{
    filter_notice, split_stage, CalculationsView, CutsView, DashboardView, DiagnosticsView,
    ForecastView, LoadSummary, RawDataView, RefreshSummary, ScreenOutcome,
};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::nt_row::{Column, NtTable};
use crate::domain::types::{Depot, Screen};
use crate::engine::cut_detector::CutDetector;
use crate::engine::date_window::{DateWindowFilter, FilteredTable};
use crate::engine::metrics::MetricsAggregator;
use crate::engine::outcome::{EmptyReason, StageOutcome};
use crate::engine::progress::{Clock, ProgressTracker};
use crate::engine::ranking::OperatorRanking;
use crate::i18n::{t, t_with_args};
use crate::importer::importer_trait::NtImporter;
use crate::sap::SapRefresher;

// ==========================================
// DashboardApi - 看板 API
// ==========================================

/// 看板API
///
/// 职责：
/// 1. 导入/刷新数据并替换内存表
/// 2. 各页面（看板 / 计算 / 切单 / 原始数据 / 诊断）的查询
/// 3. 看板页计算成功时登记进度快照
pub struct DashboardApi {
    depots: Vec<Depot>,
    table: RwLock<Arc<NtTable>>,
    last_load: RwLock<Option<LoadSummary>>,

    // 外部协作方
    importer: Arc<dyn NtImporter>,
    refresher: Arc<dyn SapRefresher>,

    // 引擎
    date_filter: DateWindowFilter,
    aggregator: MetricsAggregator,
    cut_detector: CutDetector,
    ranking: OperatorRanking,
    tracker: Arc<ProgressTracker>,

    clock: Arc<dyn Clock>,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例（初始为空表, 需调用 reload）
    ///
    /// # 参数
    /// - depots: 可选仓库列表
    /// - importer: SAP 导出文件导入器
    /// - refresher: SAP 刷新协作方
    /// - date_filter: 日期窗口过滤器
    /// - aggregator: 指标聚合器
    /// - tracker: 进度历史
    /// - clock: 时间来源
    pub fn new(
        depots: Vec<Depot>,
        importer: Arc<dyn NtImporter>,
        refresher: Arc<dyn SapRefresher>,
        date_filter: DateWindowFilter,
        aggregator: MetricsAggregator,
        tracker: Arc<ProgressTracker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            depots,
            table: RwLock::new(Arc::new(NtTable::empty())),
            last_load: RwLock::new(None),
            importer,
            refresher,
            date_filter,
            aggregator,
            cut_detector: CutDetector::new(),
            ranking: OperatorRanking::new(),
            tracker,
            clock,
        }
    }

    // ==========================================
    // 数据加载
    // ==========================================

    /// 重新读取导出文件并替换内存表
    ///
    /// 文件不存在时得到空表 + 提示, 不返回错误
    #[instrument(skip(self))]
    pub async fn reload(&self) -> ApiResult<LoadSummary> {
        let report = self.importer.load().await?;
        let summary = LoadSummary::from_report(&report, self.clock.now());

        *self.table.write().unwrap_or_else(|p| p.into_inner()) = Arc::new(report.table);
        *self.last_load.write().unwrap_or_else(|p| p.into_inner()) = Some(summary.clone());

        info!(rows = summary.rows_loaded, "数据表已替换");
        Ok(summary)
    }

    /// 触发 SAP 提取（今天）, 成功后重新加载
    #[instrument(skip(self))]
    pub async fn refresh_from_sap(&self) -> ApiResult<RefreshSummary> {
        let today = self.clock.today();
        if !self.refresher.extract(today).await {
            warn!(date = %today, "SAP 提取失败, 保留当前数据");
            return Err(ApiError::SapRefreshFailed(t("sap.failure")));
        }

        let load = self.reload().await?;
        Ok(RefreshSummary {
            message: t("sap.success"),
            load,
        })
    }

    // ==========================================
    // 页面查询
    // ==========================================

    /// 看板页: 指标包 + 登记进度
    #[instrument(skip(self))]
    pub fn dashboard(&self, depot: &str) -> ApiResult<ScreenOutcome<DashboardView>> {
        let depot = self.resolve_depot(depot)?.clone();
        let table = self.current_table();

        let window = Screen::Dashboard.window();
        let filtered = match split_stage(self.date_filter.apply(&table, window)) {
            Ok(filtered) => filtered,
            Err(screen) => return Ok(screen),
        };
        let notices = notices_of(&filtered);

        let bundle = match split_stage(self.aggregator.process(&filtered.table, &depot.code)) {
            Ok(bundle) => bundle,
            Err(screen) => return Ok(screen),
        };

        let progress = self.tracker.register(
            &depot.code,
            bundle.total_linhas,
            bundle.finalizadas,
            self.clock.now(),
        );
        debug!(
            total = progress.total,
            finalizadas = progress.finalizadas,
            "已登记进度"
        );

        Ok(ScreenOutcome::ready(
            DashboardView::new(depot, bundle, progress),
            notices,
        ))
    }

    /// 计算页: 排名 + 完工预测 + 更新历史
    ///
    /// 排名为空时仍返回预测与历史
    #[instrument(skip(self))]
    pub fn calculations(&self, depot: &str) -> ApiResult<ScreenOutcome<CalculationsView>> {
        let depot = self.resolve_depot(depot)?.clone();
        let table = self.current_table();

        let window = Screen::Calculations.window();
        let filtered = match split_stage(self.date_filter.apply(&table, window)) {
            Ok(filtered) => filtered,
            Err(screen) => return Ok(screen),
        };
        let notices = notices_of(&filtered);

        let (ranking, ranking_notice) =
            match self.ranking.process(&filtered.table, Some(&depot.code)) {
                StageOutcome::Ready(ranking) => (ranking, None),
                StageOutcome::Empty(reason) => {
                    debug!(reason = %reason, "排名无数据");
                    (Vec::new(), Some(t("notice.no_ranking")))
                }
                StageOutcome::Failure(_) => return Ok(ScreenOutcome::failed()),
            };

        let forecast = match split_stage(self.tracker.forecast(&depot.code)) {
            Ok(forecast) => forecast,
            Err(screen) => return Ok(screen),
        };

        let history = self.tracker.history_for(&depot.code);
        let history_notice = if history.is_empty() {
            Some(t_with_args("notice.no_history", &[("depot", &depot.code)]))
        } else {
            None
        };

        let forecast = ForecastView::new(forecast, &depot.code);
        Ok(ScreenOutcome::ready(
            CalculationsView {
                depot,
                ranking,
                ranking_notice,
                forecast,
                history,
                history_notice,
            },
            notices,
        ))
    }

    /// 切单页（depot 为 None 时统计全部仓库）
    #[instrument(skip(self))]
    pub fn cuts(&self, depot: Option<&str>) -> ApiResult<ScreenOutcome<CutsView>> {
        let depot = match depot {
            Some(code) => Some(self.resolve_depot(code)?.clone()),
            None => None,
        };
        let table = self.current_table();

        let window = Screen::Cuts.window();
        let filtered = match split_stage(self.date_filter.apply(&table, window)) {
            Ok(filtered) => filtered,
            Err(screen) => return Ok(screen),
        };
        let notices = notices_of(&filtered);

        let code = depot.as_ref().map(|d| d.code.as_str());
        match self.cut_detector.process(&filtered.table, code) {
            StageOutcome::Ready(cuts) => Ok(ScreenOutcome::ready(CutsView { depot, cuts }, notices)),
            StageOutcome::Empty(EmptyReason::NothingMatched) => Ok(ScreenOutcome::NoData {
                notice: t("notice.no_cuts"),
            }),
            StageOutcome::Empty(reason) => Ok(ScreenOutcome::no_data(&reason)),
            StageOutcome::Failure(_) => Ok(ScreenOutcome::failed()),
        }
    }

    /// 原始数据页: 其他页窗口内该仓库的行
    #[instrument(skip(self))]
    pub fn raw_data(&self, depot: &str) -> ApiResult<ScreenOutcome<RawDataView>> {
        let depot = self.resolve_depot(depot)?.clone();
        let table = self.current_table();

        let window = Screen::RawData.window();
        let filtered = match split_stage(self.date_filter.apply(&table, window)) {
            Ok(filtered) => filtered,
            Err(screen) => return Ok(screen),
        };
        let notices = notices_of(&filtered);

        if filtered.table.is_empty() {
            return Ok(ScreenOutcome::no_data(&EmptyReason::EmptyInput));
        }
        if !filtered.table.has_column(Column::Deposito) {
            return Ok(ScreenOutcome::no_data(&EmptyReason::MissingColumn {
                column: Column::Deposito,
            }));
        }

        let rows: Vec<_> = filtered
            .table
            .rows
            .into_iter()
            .filter(|r| r.deposito == depot.code)
            .collect();
        if rows.is_empty() {
            return Ok(ScreenOutcome::no_data(&EmptyReason::NoRowsForDepot {
                depot: depot.code,
            }));
        }

        Ok(ScreenOutcome::ready(
            RawDataView {
                depot,
                total: rows.len(),
                rows,
            },
            notices,
        ))
    }

    /// 诊断信息
    #[instrument(skip(self))]
    pub fn diagnostics(&self) -> ApiResult<DiagnosticsView> {
        let source_path = self.importer.source_path();
        let metadata = std::fs::metadata(source_path).ok();
        let table = self.current_table();

        let window = Screen::Diagnostics.window();
        let rows_in_other_window = match self.date_filter.apply(&table, window) {
            StageOutcome::Ready(filtered) => filtered.table.len(),
            _ => 0,
        };

        Ok(DiagnosticsView {
            source_path: source_path.display().to_string(),
            file_exists: metadata.is_some(),
            file_size_kb: metadata.map(|m| m.len() as f64 / 1024.0),
            loaded_rows: table.len(),
            rows_in_other_window,
            columns: table.columns.iter().map(|c| c.header().to_string()).collect(),
            distinct_depots: if table.has_column(Column::Deposito) {
                table.distinct_depots()
            } else {
                Vec::new()
            },
            date_filter_mode: self.date_filter.mode(),
            dashboard_window_policy: self.date_filter.policy(),
            history_timestamps: self.tracker.timestamps().len(),
            last_load: self
                .last_load
                .read()
                .unwrap_or_else(|p| p.into_inner())
                .clone(),
        })
    }

    /// 可选仓库列表
    pub fn depots(&self) -> Vec<Depot> {
        self.depots.clone()
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn current_table(&self) -> Arc<NtTable> {
        self.table.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn resolve_depot(&self, code: &str) -> ApiResult<&Depot> {
        self.depots.iter().find(|d| d.code == code).ok_or_else(|| {
            warn!(depot = code, "未知仓库代码");
            ApiError::InvalidInput(t_with_args("error.unknown_depot", &[("depot", code)]))
        })
    }
}

fn notices_of(filtered: &FilteredTable) -> Vec<String> {
    filtered.notice.iter().map(filter_notice).collect()
}
