// ==========================================
// 物流 NT 看板 - 指标包
// ==========================================
// 职责: 看板页所需的全部指标（每次调用新建，构建后不再修改）
// ==========================================

use crate::domain::nt_row::NtRow;
use crate::domain::types::{NtStatus, OperatorType};
use serde::{Deserialize, Serialize};

/// 单个 NT 的状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NtStatusRow {
    pub numero_nt: String,
    pub status: NtStatus,
    /// NT 首行的作业员类型
    pub tipo: OperatorType,
}

/// 状态矩阵的一行（一个作业员类型）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMatrixRow {
    pub tipo: OperatorType,
    pub finalizadas: usize,
    pub em_separacao: usize,
    pub pendentes: usize,
}

impl StatusMatrixRow {
    pub fn zero(tipo: OperatorType) -> Self {
        Self {
            tipo,
            finalizadas: 0,
            em_separacao: 0,
            pendentes: 0,
        }
    }

    pub fn get(&self, status: NtStatus) -> usize {
        match status {
            NtStatus::Finalizadas => self.finalizadas,
            NtStatus::EmSeparacao => self.em_separacao,
            NtStatus::Pendentes => self.pendentes,
        }
    }

    fn increment(&mut self, status: NtStatus) {
        match status {
            NtStatus::Finalizadas => self.finalizadas += 1,
            NtStatus::EmSeparacao => self.em_separacao += 1,
            NtStatus::Pendentes => self.pendentes += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.finalizadas + self.em_separacao + self.pendentes
    }
}

/// 状态 × 类型 计数矩阵
///
/// Normal / Reforço 两行与三个状态列始终存在（零填充）;
/// 出现 Indefinido 时追加一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMatrix {
    pub rows: Vec<StatusMatrixRow>,
}

impl Default for StatusMatrix {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl StatusMatrix {
    pub fn zeroed() -> Self {
        Self {
            rows: vec![
                StatusMatrixRow::zero(OperatorType::Normal),
                StatusMatrixRow::zero(OperatorType::Reforco),
            ],
        }
    }

    /// 从 NT 状态表计数
    pub fn from_status_rows(status_rows: &[NtStatusRow]) -> Self {
        let mut matrix = Self::zeroed();
        for item in status_rows {
            matrix.row_mut(item.tipo).increment(item.status);
        }
        matrix
    }

    fn row_mut(&mut self, tipo: OperatorType) -> &mut StatusMatrixRow {
        if let Some(idx) = self.rows.iter().position(|r| r.tipo == tipo) {
            return &mut self.rows[idx];
        }
        self.rows.push(StatusMatrixRow::zero(tipo));
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    pub fn row(&self, tipo: OperatorType) -> Option<&StatusMatrixRow> {
        self.rows.iter().find(|r| r.tipo == tipo)
    }

    pub fn get(&self, tipo: OperatorType, status: NtStatus) -> usize {
        self.row(tipo).map(|r| r.get(status)).unwrap_or(0)
    }

    /// 某状态的合计（跨类型）
    pub fn status_total(&self, status: NtStatus) -> usize {
        self.rows.iter().map(|r| r.get(status)).sum()
    }
}

/// 看板指标包
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsBundle {
    /// 仓库过滤后的行（原始数据页使用）
    pub rows: Vec<NtRow>,
    pub total_linhas: usize,
    pub finalizadas: usize,
    pub total_um: f64,
    pub normal_linhas: usize,
    pub normal_um: f64,
    pub reforco_linhas: usize,
    pub reforco_um: f64,
    pub status_counts: StatusMatrix,
    pub status_nts: Vec<NtStatusRow>,
}

impl MetricsBundle {
    /// 完成百分比（四舍五入到整数）
    pub fn percent_finalized(&self) -> u32 {
        if self.total_linhas == 0 {
            return 0;
        }
        ((self.finalizadas as f64 / self.total_linhas as f64) * 100.0).round() as u32
    }
}
