// ==========================================
// 物流 NT 看板 - 切单 (Corte) 记录
// ==========================================
// 切单: 已标记完成 (ITEM_FINALIZADO = X) 但没有实际生产日期的行
// ==========================================

use crate::domain::nt_row::NtRow;
use serde::{Deserialize, Serialize};

/// 无法归属作业员时的标记
pub const OPERADOR_NAO_IDENTIFICADO: &str = "Não identificado";

/// 切单行（附带归属作业员与解析后的数量）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutRecord {
    pub row: NtRow,
    pub operador_corte: String,
    pub quantidade: f64,
}

/// 按作业员汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorCutSummary {
    pub operador_corte: String,
    pub total_cortes: usize,
    pub total_unidades: f64,
}

/// 按物料汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCutSummary {
    pub material: String,
    pub desc_material: String,
    pub total_cortes: usize,
    pub total_unidades: f64,
}

/// 切单分析结果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CutBundle {
    pub cortes: Vec<CutRecord>,
    pub total_cortes: usize,
    pub total_unidades_cortadas: f64,
    pub cortes_por_operador: Vec<OperatorCutSummary>,
    pub cortes_por_material: Vec<MaterialCutSummary>,
}
