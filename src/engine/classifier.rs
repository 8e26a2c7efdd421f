// ==========================================
// 物流 NT 看板 - 行/NT 分类引擎
// ==========================================
// 依据: 看板业务规则 - NT 状态判定 / Normal-Reforço 判定
// 红线: 状态是"规则序",命中即返回,三态互斥
// ==========================================
// 职责: 给单行打作业员类型, 给同一 NUMERO_NT 的行组打状态
// 输入: NtTable / 同 NT 的行组
// 输出: OperatorType / NtStatus
// ==========================================

use crate::domain::nt_row::{Column, NtRow, NtTable};
use crate::domain::types::{NtStatus, OperatorType};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

// ==========================================
// RowClassifier - 分类引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct RowClassifier {
    /// 固定作业员名单 (USUARIO)
    normal_users: HashSet<String>,
}

impl RowClassifier {
    /// 创建分类引擎
    ///
    /// # 参数
    /// - normal_users: Normal 作业员名单
    pub fn new<I, S>(normal_users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            normal_users: normal_users.into_iter().map(Into::into).collect(),
        }
    }

    // ==========================================
    // 作业员类型
    // ==========================================

    /// 判定单行类型
    ///
    /// 规则:
    /// 1) 表中没有 USUARIO 列 → Indefinido
    /// 2) USUARIO ∈ 名单 → Normal
    /// 3) 其他 → Reforço
    pub fn classify_type(&self, row: &NtRow, has_usuario_column: bool) -> OperatorType {
        if !has_usuario_column {
            return OperatorType::Indefinido;
        }
        if self.normal_users.contains(row.usuario.as_str()) {
            OperatorType::Normal
        } else {
            OperatorType::Reforco
        }
    }

    /// 对整表逐行判定类型（顺序与行顺序一致）
    pub fn classify_types(&self, table: &NtTable) -> Vec<OperatorType> {
        let has_usuario = table.has_column(Column::Usuario);
        table
            .rows
            .iter()
            .map(|row| self.classify_type(row, has_usuario))
            .collect()
    }

    // ==========================================
    // NT 状态
    // ==========================================

    /// 判定一个 NT 的状态
    ///
    /// 规则（顺序执行，命中即返回）:
    /// 1) 所有行 ITEM_FINALIZADO = "X" → Finalizadas
    /// 2) 存在未完成行 且 所有行 NOME_USUARIO 为空 → Pendentes
    /// 3) 其他 → Em Separação
    ///
    /// 空行组返回 None（分组保证不会出现）
    pub fn classify_status(rows: &[&NtRow]) -> Option<NtStatus> {
        if rows.is_empty() {
            return None;
        }

        let finalized = rows.iter().filter(|r| r.is_finalized()).count();
        let without_operator = rows.iter().filter(|r| r.nome_usuario.is_empty()).count();

        debug!(
            numero_nt = %rows[0].numero_nt,
            finalized,
            total = rows.len(),
            without_operator,
            "NT 状态判定"
        );

        if finalized == rows.len() {
            Some(NtStatus::Finalizadas)
        } else if without_operator == rows.len() {
            Some(NtStatus::Pendentes)
        } else {
            Some(NtStatus::EmSeparacao)
        }
    }
}

/// 按 NUMERO_NT 分组（键有序, 组内保持行顺序）
pub fn group_by_nt(table: &NtTable) -> BTreeMap<&str, Vec<(usize, &NtRow)>> {
    let mut groups: BTreeMap<&str, Vec<(usize, &NtRow)>> = BTreeMap::new();
    for (idx, row) in table.rows.iter().enumerate() {
        groups
            .entry(row.numero_nt.as_str())
            .or_default()
            .push((idx, row));
    }
    groups
}
