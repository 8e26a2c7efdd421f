// ==========================================
// 物流 NT 看板 - 阶段结果类型
// ==========================================
// 红线: "无数据" 与 "内部失败" 必须可区分
// Ready / Empty(原因) / Failure(原因)
// ==========================================

use crate::domain::nt_row::Column;
use serde::Serialize;
use std::fmt;

/// 预期内的空结果原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmptyReason {
    /// 输入表为空
    EmptyInput,
    /// 缺少必需列
    MissingColumn { column: Column },
    /// 仓库过滤后没有行
    NoRowsForDepot { depot: String },
    /// 过滤后没有符合条件的行
    NothingMatched,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::EmptyInput => write!(f, "输入数据为空"),
            EmptyReason::MissingColumn { column } => write!(f, "缺少列 {}", column),
            EmptyReason::NoRowsForDepot { depot } => write!(f, "仓库 {} 没有记录", depot),
            EmptyReason::NothingMatched => write!(f, "没有符合条件的记录"),
        }
    }
}

/// 处理阶段的结果
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Ready(T),
    Empty(EmptyReason),
    Failure(String),
}

impl<T> StageOutcome<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, StageOutcome::Ready(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, StageOutcome::Empty(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StageOutcome::Failure(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            StageOutcome::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ready(&self) -> Option<&T> {
        match self {
            StageOutcome::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> StageOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            StageOutcome::Ready(value) => StageOutcome::Ready(f(value)),
            StageOutcome::Empty(reason) => StageOutcome::Empty(reason),
            StageOutcome::Failure(reason) => StageOutcome::Failure(reason),
        }
    }
}
