// ==========================================
// 物流 NT 看板 - 进度历史与完工预测
// ==========================================
// 依据: 看板业务规则 - 更新历史 / 完工时间预测
// 红线: 历史只存在于进程内存, 最多保留 capacity 个时间点
// 红线: 预测是两点线性外推, 只看最近两次快照
// ==========================================
// 职责: 登记进度快照 + 裁剪历史 + 计算完工预测
// 输入: 看板渲染时的 (仓库, 总行数, 完成行数, 当前时间)
// 输出: Forecast / 更新历史表
// ==========================================

use crate::domain::progress::{Forecast, ForecastEstimate, HistoryEntry, ProgressSnapshot};
use crate::engine::outcome::StageOutcome;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, instrument};

/// 默认保留的时间点数量
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// 完工时间显示格式
pub const COMPLETION_LABEL_FORMAT: &str = "%H:%M - %d/%m/%Y";

// ==========================================
// Clock - 时间来源
// ==========================================
// 日期窗口与进度登记都通过 Clock 取 "现在"
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// 本地系统时间
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// 可拨动的固定时钟（测试使用）
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *lock(&self.now) = now;
    }

    pub fn advance(&self, delta: Duration) {
        let mut guard = lock(&self.now);
        *guard += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *lock(&self.now)
    }
}

// 单进程内锁中毒时继续使用内部数据
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ==========================================
// ProgressTracker - 进度历史
// ==========================================
type History = BTreeMap<NaiveDateTime, HashMap<String, ProgressSnapshot>>;

#[derive(Debug)]
pub struct ProgressTracker {
    capacity: usize,
    history: Mutex<History>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl ProgressTracker {
    /// 创建进度历史
    ///
    /// # 参数
    /// - capacity: 最多保留的时间点数量（至少为 1）
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            history: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // ==========================================
    // 登记 + 裁剪
    // ==========================================

    /// 登记一次进度快照
    ///
    /// 时间戳截断到秒; 同一秒同一仓库重复登记时覆盖。
    /// 插入后立即裁剪, 整个过程在同一把锁内完成。
    #[instrument(skip(self), fields(depot = %depot))]
    pub fn register(
        &self,
        depot: &str,
        total: usize,
        finalizadas: usize,
        now: NaiveDateTime,
    ) -> ProgressSnapshot {
        let timestamp = now.with_nanosecond(0).unwrap_or(now);
        let snapshot = ProgressSnapshot {
            total,
            finalizadas,
            timestamp,
        };

        let mut history = lock(&self.history);
        history
            .entry(timestamp)
            .or_default()
            .insert(depot.to_string(), snapshot);
        let removed = Self::prune_locked(&mut history, self.capacity);

        debug!(
            total,
            finalizadas,
            timestamps = history.len(),
            removed,
            "进度快照已登记"
        );
        snapshot
    }

    /// 裁剪到 capacity 个时间点, 返回删除的时间点数量
    pub fn prune(&self) -> usize {
        let mut history = lock(&self.history);
        Self::prune_locked(&mut history, self.capacity)
    }

    // 删除全局最早的时间点（连同其下所有仓库）
    fn prune_locked(history: &mut History, capacity: usize) -> usize {
        let mut removed = 0;
        while history.len() > capacity {
            if history.pop_first().is_none() {
                break;
            }
            removed += 1;
        }
        removed
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 当前保留的时间点（升序）
    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        lock(&self.history).keys().copied().collect()
    }

    /// 某仓库的快照（按时间升序）
    pub fn snapshots_for(&self, depot: &str) -> Vec<ProgressSnapshot> {
        lock(&self.history)
            .values()
            .filter_map(|depots| depots.get(depot).copied())
            .collect()
    }

    /// 某仓库的更新历史（最新在前）
    pub fn history_for(&self, depot: &str) -> Vec<HistoryEntry> {
        self.snapshots_for(depot)
            .into_iter()
            .rev()
            .map(|s| HistoryEntry {
                timestamp: s.timestamp,
                total: s.total,
                finalizadas: s.finalizadas,
                percent_complete: s.percent_complete(),
            })
            .collect()
    }

    // ==========================================
    // 完工预测
    // ==========================================

    /// 计算某仓库的完工预测
    ///
    /// 规则:
    /// 1) 快照少于 2 条 → Insufficient
    /// 2) Δ完成 ≤ 0 或 Δ分钟 ≤ 0 → NoProgress
    /// 3) 速率 = Δ完成 / Δ分钟, 剩余 = 总数 - 完成, ETA = 剩余 / 速率
    ///
    /// 完工时间超出日期范围时返回 Failure
    #[instrument(skip(self), fields(depot = %depot))]
    pub fn forecast(&self, depot: &str) -> StageOutcome<Forecast> {
        let snapshots = self.snapshots_for(depot);
        let n = snapshots.len();
        if n < 2 {
            return StageOutcome::Ready(Forecast::Insufficient {
                latest: snapshots.last().copied(),
            });
        }

        let previous = snapshots[n - 2];
        let latest = snapshots[n - 1];

        let delta_finalized = latest.finalizadas as i64 - previous.finalizadas as i64;
        let delta_minutes =
            (latest.timestamp - previous.timestamp).num_milliseconds() as f64 / 60_000.0;

        if delta_finalized <= 0 || delta_minutes <= 0.0 {
            debug!(delta_finalized, delta_minutes, "两次快照之间没有进展");
            return StageOutcome::Ready(Forecast::NoProgress { latest });
        }

        let rate = delta_finalized as f64 / delta_minutes;
        let remaining = latest.total as i64 - latest.finalizadas as i64;
        let eta_minutes = remaining as f64 / rate;

        let completion_time = match add_minutes(latest.timestamp, eta_minutes) {
            Some(t) => t,
            None => {
                error!(eta_minutes, "完工时间超出日期范围");
                return StageOutcome::Failure(format!(
                    "完工时间超出日期范围: eta_minutes={}",
                    eta_minutes
                ));
            }
        };

        StageOutcome::Ready(Forecast::Ok(ForecastEstimate {
            delta_finalized,
            delta_minutes,
            rate,
            remaining,
            eta_minutes,
            completion_time,
            completion_label: completion_time.format(COMPLETION_LABEL_FORMAT).to_string(),
            latest,
        }))
    }
}

// 时间 + 分钟数（毫秒精度）; 溢出返回 None
fn add_minutes(base: NaiveDateTime, minutes: f64) -> Option<NaiveDateTime> {
    let millis = minutes * 60_000.0;
    if !millis.is_finite() || millis.abs() >= (i64::MAX / 4) as f64 {
        return None;
    }
    base.checked_add_signed(Duration::milliseconds(millis.round() as i64))
}
