// ==========================================
// 物流 NT 看板 - NT 行与数据表
// ==========================================
// 依据: SAP 导出文件 (ZBI) 列定义
// 红线: 所有字段保持文本; QUANT_NT 不以数值存储
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ==========================================
// 导出列 (Column)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    NumeroNt,
    Material,
    DescMaterial,
    QuantNt,
    ItemFinalizado,
    NomeUsuario,
    Usuario,
    Deposito,
    DtPlanejada,
    DtProducao,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::NumeroNt,
        Column::Material,
        Column::DescMaterial,
        Column::QuantNt,
        Column::ItemFinalizado,
        Column::NomeUsuario,
        Column::Usuario,
        Column::Deposito,
        Column::DtPlanejada,
        Column::DtProducao,
    ];

    /// 导出文件中的列名
    pub fn header(&self) -> &'static str {
        match self {
            Column::NumeroNt => "NUMERO_NT",
            Column::Material => "MATERIAL",
            Column::DescMaterial => "DESC_MATERIAL",
            Column::QuantNt => "QUANT_NT",
            Column::ItemFinalizado => "ITEM_FINALIZADO",
            Column::NomeUsuario => "NOME_USUARIO",
            Column::Usuario => "USUARIO",
            Column::Deposito => "DEPOSITO",
            Column::DtPlanejada => "DT_PLANEJADA",
            Column::DtProducao => "DT_PRODUCAO",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())
    }
}

// ==========================================
// NtRow - 导出文件中的一行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NtRow {
    pub numero_nt: String,
    pub material: String,
    pub desc_material: String,
    /// 原始文本，使用 engine::quantity::parse_quantity 解析
    pub quant_nt: String,
    pub item_finalizado: String,
    /// 完成该行的作业员（未处理时为空）
    pub nome_usuario: String,
    /// 创建/归属该行的用户（用于 Normal/Reforço 判定）
    pub usuario: String,
    pub deposito: String,
    pub dt_planejada: String,
    pub dt_producao: String,
}

impl NtRow {
    /// ITEM_FINALIZADO == "X"（严格大小写）
    pub fn is_finalized(&self) -> bool {
        self.item_finalizado == "X"
    }

    /// NOME_USUARIO 非空白
    pub fn has_operator(&self) -> bool {
        !self.nome_usuario.trim().is_empty()
    }
}

// ==========================================
// NtTable - 行 + 列存在性
// ==========================================
// 列缺失只在导入边界记录一次，引擎通过 has_column 判断
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NtTable {
    pub columns: BTreeSet<Column>,
    pub rows: Vec<NtRow>,
}

impl NtTable {
    pub fn new(columns: BTreeSet<Column>, rows: Vec<NtRow>) -> Self {
        Self { columns, rows }
    }

    /// 所有列齐全的表（测试与内部构造使用）
    pub fn with_all_columns(rows: Vec<NtRow>) -> Self {
        Self {
            columns: Column::ALL.iter().copied().collect(),
            rows,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// 返回第一个缺失的列
    pub fn first_missing(&self, required: &[Column]) -> Option<Column> {
        required.iter().copied().find(|c| !self.has_column(*c))
    }

    /// 复制满足条件的行，列集合保持不变（不修改原表）
    pub fn filtered<F>(&self, predicate: F) -> NtTable
    where
        F: Fn(&NtRow) -> bool,
    {
        NtTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }

    /// DEPOSITO 列去重值（保持出现顺序）
    pub fn distinct_depots(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.deposito) {
                seen.push(row.deposito.clone());
            }
        }
        seen
    }
}
