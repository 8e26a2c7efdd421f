// ==========================================
// 物流 NT 看板 - 日期窗口过滤
// ==========================================
// 依据: 看板业务规则 - 看板页 / 其他页 日期口径
// 红线: 不修改输入表, 缺列时原样放行并给出提示, 不报错
// ==========================================
// 职责: 按页面窗口过滤 DT_PLANEJADA / DT_PRODUCAO
// 输入: NtTable + Window
// 输出: FilteredTable (新表 + 可选提示)
// ==========================================

use crate::domain::nt_row::{Column, NtTable};
use crate::domain::types::{DashboardWindowPolicy, DateFilterMode, Window};
use crate::engine::outcome::StageOutcome;
use crate::engine::progress::Clock;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// 日期在导出文件中出现的三种写法
pub const DATE_FORMATS: [&str; 3] = ["%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// 过滤提示（不是错误）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterNotice {
    /// 缺少日期列, 未过滤
    MissingColumn { column: Column },
    /// 日期过滤已关闭
    Disabled,
}

/// 过滤结果
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredTable {
    pub table: NtTable,
    pub notice: Option<FilterNotice>,
}

impl FilteredTable {
    fn unfiltered(table: &NtTable, notice: FilterNotice) -> Self {
        Self {
            table: table.clone(),
            notice: Some(notice),
        }
    }
}

// ==========================================
// DateWindowFilter - 日期窗口过滤器
// ==========================================
#[derive(Clone)]
pub struct DateWindowFilter {
    clock: Arc<dyn Clock>,
    mode: DateFilterMode,
    policy: DashboardWindowPolicy,
}

impl DateWindowFilter {
    pub fn new(clock: Arc<dyn Clock>, mode: DateFilterMode, policy: DashboardWindowPolicy) -> Self {
        Self {
            clock,
            mode,
            policy,
        }
    }

    pub fn mode(&self) -> DateFilterMode {
        self.mode
    }

    pub fn policy(&self) -> DashboardWindowPolicy {
        self.policy
    }

    /// 按窗口过滤
    ///
    /// - Other: DT_PLANEJADA = 今天
    /// - Dashboard: 由 DashboardWindowPolicy 决定
    ///
    /// 计算 "昨天" 溢出时返回 Failure
    #[instrument(skip(self, table), fields(rows = table.len(), window = %window))]
    pub fn apply(&self, table: &NtTable, window: Window) -> StageOutcome<FilteredTable> {
        if self.mode == DateFilterMode::Disabled {
            debug!("日期过滤已关闭, 全部放行");
            return StageOutcome::Ready(FilteredTable::unfiltered(table, FilterNotice::Disabled));
        }

        let required: &[Column] = match (window, self.policy) {
            (Window::Dashboard, DashboardWindowPolicy::PlannedRecentProducedToday) => {
                &[Column::DtPlanejada, Column::DtProducao]
            }
            _ => &[Column::DtPlanejada],
        };
        if let Some(column) = table.first_missing(required) {
            warn!(column = %column, "缺少日期列, 跳过日期过滤");
            return StageOutcome::Ready(FilteredTable::unfiltered(
                table,
                FilterNotice::MissingColumn { column },
            ));
        }

        let today = self.clock.today();
        let today_forms = renderings(today);

        let filtered = match window {
            Window::Other => table.filtered(|row| matches_any(&row.dt_planejada, &today_forms)),
            Window::Dashboard => {
                let yesterday = match today.pred_opt() {
                    Some(d) => d,
                    None => {
                        error!(today = %today, "无法计算昨天日期");
                        return StageOutcome::Failure(format!("无法计算 {} 的前一天", today));
                    }
                };
                let mut planned_forms = today_forms.to_vec();
                planned_forms.extend(renderings(yesterday));

                match self.policy {
                    DashboardWindowPolicy::PlannedTodayOrYesterday => {
                        table.filtered(|row| matches_any(&row.dt_planejada, &planned_forms))
                    }
                    DashboardWindowPolicy::PlannedRecentProducedToday => table.filtered(|row| {
                        matches_any(&row.dt_planejada, &planned_forms)
                            && matches_any(&row.dt_producao, &today_forms)
                    }),
                }
            }
        };

        debug!(kept = filtered.len(), "日期窗口过滤完成");
        StageOutcome::Ready(FilteredTable {
            table: filtered,
            notice: None,
        })
    }
}

impl std::fmt::Debug for DateWindowFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateWindowFilter")
            .field("mode", &self.mode)
            .field("policy", &self.policy)
            .finish()
    }
}

/// 一个日期的三种写法
pub fn renderings(date: NaiveDate) -> [String; 3] {
    DATE_FORMATS.map(|fmt| date.format(fmt).to_string())
}

fn matches_any(value: &str, forms: &[String]) -> bool {
    let value = value.trim();
    forms.iter().any(|f| f == value)
}
