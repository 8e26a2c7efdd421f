// ==========================================
// 物流 NT 看板 - 作业员排名
// ==========================================
// 依据: 看板业务规则 - 计算页排名
// 红线: 同数时保持首次出现顺序 (稳定排序)
// ==========================================

use crate::domain::nt_row::{Column, NtTable};
use crate::domain::progress::RankingEntry;
use crate::engine::outcome::{EmptyReason, StageOutcome};
use tracing::{debug, instrument, warn};

/// 排名必需的列
pub const REQUIRED_COLUMNS: [Column; 2] = [Column::ItemFinalizado, Column::NomeUsuario];

#[derive(Debug, Clone, Default)]
pub struct OperatorRanking;

impl OperatorRanking {
    pub fn new() -> Self {
        Self
    }

    /// 按完成行数给作业员排名
    ///
    /// 只统计 ITEM_FINALIZADO = "X" 且 NOME_USUARIO 非空的行
    #[instrument(skip(self, table), fields(rows = table.len(), depot = ?depot))]
    pub fn process(&self, table: &NtTable, depot: Option<&str>) -> StageOutcome<Vec<RankingEntry>> {
        if table.is_empty() {
            return StageOutcome::Empty(EmptyReason::EmptyInput);
        }
        if let Some(column) = table.first_missing(&REQUIRED_COLUMNS) {
            warn!(column = %column, "排名缺少必需列");
            return StageOutcome::Empty(EmptyReason::MissingColumn { column });
        }

        let scoped = match depot {
            Some(code) if table.has_column(Column::Deposito) => {
                table.filtered(|r| r.deposito == code)
            }
            _ => table.clone(),
        };

        // 按首次出现顺序计数
        let mut counts: Vec<(String, usize)> = Vec::new();
        for row in scoped
            .rows
            .iter()
            .filter(|r| r.is_finalized() && r.has_operator())
        {
            let nome = row.nome_usuario.trim();
            match counts.iter_mut().find(|(n, _)| n == nome) {
                Some((_, count)) => *count += 1,
                None => counts.push((nome.to_string(), 1)),
            }
        }

        if counts.is_empty() {
            debug!("没有已完成的作业员记录");
            return StageOutcome::Empty(EmptyReason::NothingMatched);
        }

        // sort_by 是稳定排序
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let ranking: Vec<RankingEntry> = counts
            .into_iter()
            .enumerate()
            .map(|(idx, (nome, total))| RankingEntry {
                posicao: idx + 1,
                posicao_texto: format!("{}º", idx + 1),
                nome_usuario: nome,
                total_finalizadas: total,
            })
            .collect();

        debug!(operators = ranking.len(), "作业员排名完成");
        StageOutcome::Ready(ranking)
    }
}
