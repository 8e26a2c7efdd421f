// ==========================================
// 物流 NT 看板 - 进度快照 / 完工预测 / 排名
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 某时刻某仓库的进度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub total: usize,
    pub finalizadas: usize,
    pub timestamp: NaiveDateTime,
}

impl ProgressSnapshot {
    pub fn percent_complete(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.finalizadas as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// 完工预测
///
/// 两点线性外推: 仅使用最近两次快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Forecast {
    /// 历史不足两条
    Insufficient { latest: Option<ProgressSnapshot> },
    /// 两次快照之间没有进展
    NoProgress { latest: ProgressSnapshot },
    Ok(ForecastEstimate),
}

impl Forecast {
    pub fn latest(&self) -> Option<&ProgressSnapshot> {
        match self {
            Forecast::Insufficient { latest } => latest.as_ref(),
            Forecast::NoProgress { latest } => Some(latest),
            Forecast::Ok(estimate) => Some(&estimate.latest),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEstimate {
    pub delta_finalized: i64,
    pub delta_minutes: f64,
    /// 行/分钟
    pub rate: f64,
    pub remaining: i64,
    pub eta_minutes: f64,
    pub completion_time: NaiveDateTime,
    /// HH:MM - DD/MM/YYYY
    pub completion_label: String,
    pub latest: ProgressSnapshot,
}

impl ForecastEstimate {
    /// 剩余时间拆分为 (小时, 分钟)
    pub fn remaining_hours_minutes(&self) -> (u64, u64) {
        let total = self.eta_minutes.max(0.0);
        let hours = (total / 60.0).floor() as u64;
        let minutes = (total % 60.0).floor() as u64;
        (hours, minutes)
    }
}

/// 更新历史表中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: NaiveDateTime,
    pub total: usize,
    pub finalizadas: usize,
    pub percent_complete: u32,
}

/// 作业员排名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub posicao: usize,
    /// 例如 "1º"
    pub posicao_texto: String,
    pub nome_usuario: String,
    pub total_finalizadas: usize,
}
