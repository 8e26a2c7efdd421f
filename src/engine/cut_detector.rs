// ==========================================
// 物流 NT 看板 - 切单 (Corte) 检测引擎
// ==========================================
// 依据: 看板业务规则 - 切单页
// 红线: 切单 = ITEM_FINALIZADO 为 X (不区分大小写) 且 DT_PRODUCAO 为空或零日期
// ==========================================
// 职责: 识别切单行 + 归属作业员 + 按作业员/物料汇总
// 输入: 日期窗口过滤后的 NtTable + 可选仓库
// 输出: StageOutcome<CutBundle>
// ==========================================

use crate::domain::cut::{
    CutBundle, CutRecord, MaterialCutSummary, OperatorCutSummary, OPERADOR_NAO_IDENTIFICADO,
};
use crate::domain::nt_row::{Column, NtRow, NtTable};
use crate::engine::outcome::{EmptyReason, StageOutcome};
use crate::engine::quantity::parse_quantity;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument, warn};

/// 视为 "没有生产日期" 的值
pub const ZERO_DATES: [&str; 4] = ["", "0000-00-00", "00/00/0000", "00.00.0000"];

/// 切单分析必需的列
pub const REQUIRED_COLUMNS: [Column; 6] = [
    Column::ItemFinalizado,
    Column::DtProducao,
    Column::NumeroNt,
    Column::Material,
    Column::DescMaterial,
    Column::QuantNt,
];

/// 切单判定
pub fn is_cut(row: &NtRow) -> bool {
    row.item_finalizado.trim().eq_ignore_ascii_case("X")
        && ZERO_DATES.contains(&row.dt_producao.trim())
}

// ==========================================
// CutDetector - 切单检测引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CutDetector;

impl CutDetector {
    pub fn new() -> Self {
        Self
    }

    /// 切单分析
    ///
    /// 步骤:
    /// 1) 校验必需列
    /// 2) 可选仓库过滤（缺 DEPOSITO 列时不过滤）
    /// 3) 每个 NT 的作业员 = 第一个非空 NOME_USUARIO
    /// 4) 识别切单行并汇总
    #[instrument(skip(self, table), fields(rows = table.len(), depot = ?depot))]
    pub fn process(&self, table: &NtTable, depot: Option<&str>) -> StageOutcome<CutBundle> {
        if table.is_empty() {
            return StageOutcome::Empty(EmptyReason::EmptyInput);
        }
        if let Some(column) = table.first_missing(&REQUIRED_COLUMNS) {
            warn!(column = %column, "切单分析缺少必需列");
            return StageOutcome::Empty(EmptyReason::MissingColumn { column });
        }

        // 1. 仓库过滤
        let scoped = match depot {
            Some(code) if table.has_column(Column::Deposito) => {
                let scoped = table.filtered(|r| r.deposito == code);
                if scoped.is_empty() {
                    return StageOutcome::Empty(EmptyReason::NoRowsForDepot {
                        depot: code.to_string(),
                    });
                }
                scoped
            }
            Some(_) => {
                warn!("缺少 DEPOSITO 列, 切单分析不按仓库过滤");
                table.clone()
            }
            None => table.clone(),
        };

        // 2. 作业员归属
        let operators = self.operators_by_nt(&scoped);

        // 3. 切单行
        let cortes: Vec<CutRecord> = scoped
            .rows
            .iter()
            .filter(|r| is_cut(r))
            .map(|r| CutRecord {
                row: r.clone(),
                operador_corte: operators
                    .get(r.numero_nt.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| OPERADOR_NAO_IDENTIFICADO.to_string()),
                quantidade: parse_quantity(&r.quant_nt),
            })
            .collect();

        if cortes.is_empty() {
            debug!("没有切单");
            return StageOutcome::Empty(EmptyReason::NothingMatched);
        }

        // 4. 汇总
        let bundle = CutBundle {
            total_cortes: cortes.len(),
            total_unidades_cortadas: cortes.iter().map(|c| c.quantidade).sum(),
            cortes_por_operador: summarize_by_operator(&cortes),
            cortes_por_material: summarize_by_material(&cortes),
            cortes,
        };

        debug!(
            total_cortes = bundle.total_cortes,
            total_unidades = bundle.total_unidades_cortadas,
            "切单分析完成"
        );
        StageOutcome::Ready(bundle)
    }

    /// 每个 NT 第一个非空 NOME_USUARIO
    fn operators_by_nt<'a>(&self, table: &'a NtTable) -> HashMap<&'a str, &'a str> {
        let mut operators = HashMap::new();
        if !table.has_column(Column::NomeUsuario) {
            warn!("缺少 NOME_USUARIO 列, 切单作业员记为未识别");
            return operators;
        }
        for row in table.rows.iter().filter(|r| r.has_operator()) {
            operators
                .entry(row.numero_nt.as_str())
                .or_insert(row.nome_usuario.trim());
        }
        operators
    }
}

// 按作业员汇总, 切单数降序（同数按作业员名）
fn summarize_by_operator(cortes: &[CutRecord]) -> Vec<OperatorCutSummary> {
    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for corte in cortes {
        let entry = groups.entry(corte.operador_corte.as_str()).or_default();
        entry.0 += 1;
        entry.1 += corte.quantidade;
    }

    let mut summaries: Vec<OperatorCutSummary> = groups
        .into_iter()
        .map(|(operador, (count, units))| OperatorCutSummary {
            operador_corte: operador.to_string(),
            total_cortes: count,
            total_unidades: units,
        })
        .collect();
    summaries.sort_by(|a, b| b.total_cortes.cmp(&a.total_cortes));
    summaries
}

// 按 (物料, 描述) 汇总, 切单数降序（同数按物料）
fn summarize_by_material(cortes: &[CutRecord]) -> Vec<MaterialCutSummary> {
    let mut groups: BTreeMap<(&str, &str), (usize, f64)> = BTreeMap::new();
    for corte in cortes {
        let key = (corte.row.material.as_str(), corte.row.desc_material.as_str());
        let entry = groups.entry(key).or_default();
        entry.0 += 1;
        entry.1 += corte.quantidade;
    }

    let mut summaries: Vec<MaterialCutSummary> = groups
        .into_iter()
        .map(|((material, desc), (count, units))| MaterialCutSummary {
            material: material.to_string(),
            desc_material: desc.to_string(),
            total_cortes: count,
            total_unidades: units,
        })
        .collect();
    summaries.sort_by(|a, b| b.total_cortes.cmp(&a.total_cortes));
    summaries
}
