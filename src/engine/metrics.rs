// ==========================================
// 物流 NT 看板 - 指标汇总引擎
// ==========================================
// 依据: 看板业务规则 - 看板页指标 / 状态矩阵
// 红线: Normal + Reforço (+ Indefinido) 行数 = 总行数
// 红线: 状态矩阵始终包含 Normal/Reforço 两行与三个状态列
// ==========================================
// 职责: 仓库过滤 → 行类型 → 数量汇总 → NT 状态表 → 状态矩阵
// 输入: 日期窗口过滤后的 NtTable + 仓库代码
// 输出: StageOutcome<MetricsBundle>
// ==========================================

use crate::domain::metrics::{MetricsBundle, NtStatusRow, StatusMatrix};
use crate::domain::nt_row::{Column, NtTable};
use crate::domain::types::{DepotScope, OperatorType};
use crate::engine::classifier::{group_by_nt, RowClassifier};
use crate::engine::outcome::{EmptyReason, StageOutcome};
use crate::engine::quantity::parse_quantity;
use tracing::{debug, error, instrument, warn};

// ==========================================
// MetricsAggregator - 指标汇总引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct MetricsAggregator {
    classifier: RowClassifier,
    depot_scope: DepotScope,
    /// 已配置的全部仓库代码（仅 AllKnown 口径使用）
    known_depots: Vec<String>,
}

impl MetricsAggregator {
    /// 创建指标汇总引擎
    ///
    /// # 参数
    /// - classifier: 行分类器（持有 Normal 名单）
    /// - depot_scope: 仓库筛选口径
    /// - known_depots: 已配置的仓库代码
    pub fn new(classifier: RowClassifier, depot_scope: DepotScope, known_depots: Vec<String>) -> Self {
        Self {
            classifier,
            depot_scope,
            known_depots,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算看板指标
    ///
    /// 返回 Empty 的情况:
    /// - 输入表为空
    /// - 缺少 DEPOSITO 列
    /// - 仓库过滤后没有行
    #[instrument(skip(self, table), fields(rows = table.len(), depot = %depot))]
    pub fn process(&self, table: &NtTable, depot: &str) -> StageOutcome<MetricsBundle> {
        if table.is_empty() {
            debug!("输入数据为空");
            return StageOutcome::Empty(EmptyReason::EmptyInput);
        }
        if !table.has_column(Column::Deposito) {
            warn!("缺少 DEPOSITO 列");
            return StageOutcome::Empty(EmptyReason::MissingColumn {
                column: Column::Deposito,
            });
        }

        // 1. 仓库过滤
        let scoped = self.scope(table, depot);
        if scoped.is_empty() {
            debug!("仓库过滤后没有记录");
            return StageOutcome::Empty(EmptyReason::NoRowsForDepot {
                depot: depot.to_string(),
            });
        }

        // 2. 行类型
        let types = self.classifier.classify_types(&scoped);

        // 3. 行数 / 数量汇总
        let has_quant = scoped.has_column(Column::QuantNt);
        if !has_quant {
            warn!("缺少 QUANT_NT 列, 数量按 0 计");
        }
        let units: Vec<f64> = scoped
            .rows
            .iter()
            .map(|r| if has_quant { parse_quantity(&r.quant_nt) } else { 0.0 })
            .collect();

        let mut bundle = MetricsBundle {
            rows: Vec::new(),
            total_linhas: scoped.len(),
            finalizadas: scoped.rows.iter().filter(|r| r.is_finalized()).count(),
            total_um: units.iter().sum(),
            normal_linhas: 0,
            normal_um: 0.0,
            reforco_linhas: 0,
            reforco_um: 0.0,
            status_counts: StatusMatrix::zeroed(),
            status_nts: Vec::new(),
        };
        for (tipo, um) in types.iter().zip(&units) {
            match tipo {
                OperatorType::Normal => {
                    bundle.normal_linhas += 1;
                    bundle.normal_um += um;
                }
                OperatorType::Reforco => {
                    bundle.reforco_linhas += 1;
                    bundle.reforco_um += um;
                }
                OperatorType::Indefinido => {}
            }
        }

        // 4. NT 状态表 + 状态矩阵
        if scoped.has_column(Column::NumeroNt) {
            let mut status_nts = Vec::new();
            for (numero_nt, group) in group_by_nt(&scoped) {
                let rows: Vec<_> = group.iter().map(|(_, r)| *r).collect();
                let status = match RowClassifier::classify_status(&rows) {
                    Some(s) => s,
                    None => {
                        error!(numero_nt, "NT 分组为空");
                        return StageOutcome::Failure(format!("NT {} 分组为空", numero_nt));
                    }
                };
                // NT 类型取首行
                let tipo = types[group[0].0];
                status_nts.push(NtStatusRow {
                    numero_nt: numero_nt.to_string(),
                    status,
                    tipo,
                });
            }
            bundle.status_counts = StatusMatrix::from_status_rows(&status_nts);
            bundle.status_nts = status_nts;
        } else {
            warn!("缺少 NUMERO_NT 列, NT 状态表为空");
        }

        debug!(
            total_linhas = bundle.total_linhas,
            finalizadas = bundle.finalizadas,
            nts = bundle.status_nts.len(),
            "看板指标计算完成"
        );

        bundle.rows = scoped.rows;
        StageOutcome::Ready(bundle)
    }

    /// 按口径筛选仓库（返回新表）
    pub fn scope(&self, table: &NtTable, depot: &str) -> NtTable {
        match self.depot_scope {
            DepotScope::Requested => table.filtered(|r| r.deposito == depot),
            DepotScope::AllKnown => {
                warn!("DepotScope::AllKnown 已废弃, 请使用 Requested");
                table.filtered(|r| self.known_depots.iter().any(|code| *code == r.deposito))
            }
        }
    }
}
