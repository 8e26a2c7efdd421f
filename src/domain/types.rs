// ==========================================
// 物流 NT 看板 - 领域类型定义
// ==========================================
// 依据: 看板业务规则 - NT 状态 / 作业员类型 / 页面窗口
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// NT 状态 (NT Status)
// ==========================================
// 红线: 三态互斥,由 NT 全部行推导,不落库
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NtStatus {
    #[serde(rename = "Finalizadas")]
    Finalizadas, // 全部完成
    #[serde(rename = "Em Separação")]
    EmSeparacao, // 拣货中
    #[serde(rename = "Pendentes")]
    Pendentes, // 未开始
}

impl NtStatus {
    /// 看板矩阵的固定列顺序
    pub const ALL: [NtStatus; 3] = [
        NtStatus::Finalizadas,
        NtStatus::EmSeparacao,
        NtStatus::Pendentes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NtStatus::Finalizadas => "Finalizadas",
            NtStatus::EmSeparacao => "Em Separação",
            NtStatus::Pendentes => "Pendentes",
        }
    }
}

impl fmt::Display for NtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 作业员类型 (Operator Type)
// ==========================================
// Normal: USUARIO 属于固定名单; 其余为 Reforço
// Indefinido: 导出文件缺少 USUARIO 列
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperatorType {
    #[serde(rename = "Normal")]
    Normal,
    #[serde(rename = "Reforço")]
    Reforco,
    #[serde(rename = "Indefinido")]
    Indefinido,
}

impl OperatorType {
    pub fn label(&self) -> &'static str {
        match self {
            OperatorType::Normal => "Normal",
            OperatorType::Reforco => "Reforço",
            OperatorType::Indefinido => "Indefinido",
        }
    }
}

impl fmt::Display for OperatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 页面 (Screen)
// ==========================================
// 看板页使用 Dashboard 窗口,其余页面共用 Other 窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Dashboard,
    Calculations,
    Cuts,
    RawData,
    Diagnostics,
}

impl Screen {
    /// 解析页面名称（命令行参数）
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "dashboard" => Some(Screen::Dashboard),
            "calculations" | "calculos" => Some(Screen::Calculations),
            "cuts" | "cortes" => Some(Screen::Cuts),
            "raw" | "raw_data" => Some(Screen::RawData),
            "diagnostics" | "logs" => Some(Screen::Diagnostics),
            _ => None,
        }
    }

    pub fn window(&self) -> Window {
        match self {
            Screen::Dashboard => Window::Dashboard,
            _ => Window::Other,
        }
    }
}

// ==========================================
// 日期窗口 (Window)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    Dashboard,
    Other,
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Dashboard => write!(f, "dashboard"),
            Window::Other => write!(f, "other"),
        }
    }
}

// ==========================================
// 看板日期窗口策略 (Dashboard Window Policy)
// ==========================================
// 两个历史版本口径不一致,以命名策略显式选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardWindowPolicy {
    /// DT_PLANEJADA ∈ {今天, 昨天}（当前版本）
    #[default]
    PlannedTodayOrYesterday,
    /// DT_PLANEJADA ∈ {今天, 昨天} 且 DT_PRODUCAO = 今天（早期版本）
    PlannedRecentProducedToday,
}

impl DashboardWindowPolicy {
    /// 从配置字符串解析，未知值回落到默认策略
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "PLANNED_RECENT_PRODUCED_TODAY" => DashboardWindowPolicy::PlannedRecentProducedToday,
            _ => DashboardWindowPolicy::PlannedTodayOrYesterday,
        }
    }
}

impl fmt::Display for DashboardWindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardWindowPolicy::PlannedTodayOrYesterday => write!(f, "PLANNED_TODAY_OR_YESTERDAY"),
            DashboardWindowPolicy::PlannedRecentProducedToday => {
                write!(f, "PLANNED_RECENT_PRODUCED_TODAY")
            }
        }
    }
}

// ==========================================
// 日期过滤开关 (Date Filter Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateFilterMode {
    Enabled,  // 按窗口过滤
    Disabled, // 全部放行
}

impl DateFilterMode {
    pub fn from_flag(enabled: bool) -> Self {
        if enabled {
            DateFilterMode::Enabled
        } else {
            DateFilterMode::Disabled
        }
    }
}

// ==========================================
// 仓库筛选口径 (Depot Scope)
// ==========================================
// Requested: 只保留所选仓库（标准口径）
// AllKnown: 保留所有已知仓库代码（历史版本行为，已废弃）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepotScope {
    #[default]
    Requested,
    AllKnown,
}

impl DepotScope {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ALL_KNOWN" => DepotScope::AllKnown,
            _ => DepotScope::Requested,
        }
    }
}

// ==========================================
// 仓库 (Depot)
// ==========================================
/// 仓库/区域: 页面显示名称 + DEPOSITO 列中的代码
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Depot {
    pub sector: String,
    pub code: String,
}

impl Depot {
    pub fn new(sector: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            sector: sector.into(),
            code: code.into(),
        }
    }
}

impl fmt::Display for Depot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.sector, self.code)
    }
}
