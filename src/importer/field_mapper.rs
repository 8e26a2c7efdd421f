// ==========================================
// 物流 NT 看板 - 字段映射器实现
// ==========================================
// 依据: SAP 导出文件 (ZBI) 列定义
// 职责: 原始列 → NtRow 字段 + 记录列存在性
// 红线: 列缺失只在此处记录一次, 缺失字段填空字符串
// ==========================================

use crate::domain::nt_row::{Column, NtRow, NtTable};
use crate::importer::file_parser::RawTable;
use crate::importer::importer_trait::FieldMapper as FieldMapperTrait;
use std::collections::BTreeSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_table(&self, raw: &RawTable) -> NtTable {
        // 1. 列定位
        let positions: Vec<(Column, Option<usize>)> = Column::ALL
            .iter()
            .map(|&column| (column, self.locate(raw, column)))
            .collect();

        let columns: BTreeSet<Column> = positions
            .iter()
            .filter_map(|(column, idx)| idx.map(|_| *column))
            .collect();
        for (column, idx) in &positions {
            if idx.is_none() {
                warn!(column = %column, "导出文件缺少列");
            }
        }

        // 2. 行映射
        let rows: Vec<NtRow> = raw
            .records
            .iter()
            .map(|record| {
                let mut row = NtRow::default();
                for (column, idx) in &positions {
                    if let Some(value) = idx.and_then(|i| record.get(i)) {
                        *self.field_mut(&mut row, *column) = value.trim().to_string();
                    }
                }
                row
            })
            .collect();

        debug!(rows = rows.len(), columns = columns.len(), "字段映射完成");
        NtTable::new(columns, rows)
    }
}

impl FieldMapper {
    /// 列名别名（大写比较）
    fn aliases(column: Column) -> &'static [&'static str] {
        match column {
            Column::NumeroNt => &["NUMERO_NT", "NÚMERO_NT", "NT"],
            Column::QuantNt => &["QUANT_NT", "QTD_NT", "QUANTIDADE_NT"],
            Column::DescMaterial => &["DESC_MATERIAL", "DESCRICAO_MATERIAL"],
            Column::Deposito => &["DEPOSITO", "DEPÓSITO"],
            Column::DtPlanejada => &["DT_PLANEJADA", "DATA_PLANEJADA"],
            Column::DtProducao => &["DT_PRODUCAO", "DT_PRODUÇÃO", "DATA_PRODUCAO"],
            Column::Material => &["MATERIAL"],
            Column::ItemFinalizado => &["ITEM_FINALIZADO"],
            Column::NomeUsuario => &["NOME_USUARIO", "NOME_USUÁRIO"],
            Column::Usuario => &["USUARIO", "USUÁRIO"],
        }
    }

    /// 查找列下标, 依次尝试所有别名
    fn locate(&self, raw: &RawTable, column: Column) -> Option<usize> {
        Self::aliases(column).iter().find_map(|alias| {
            raw.headers
                .iter()
                .position(|h| h.to_uppercase() == *alias)
        })
    }

    fn field_mut<'a>(&self, row: &'a mut NtRow, column: Column) -> &'a mut String {
        match column {
            Column::NumeroNt => &mut row.numero_nt,
            Column::Material => &mut row.material,
            Column::DescMaterial => &mut row.desc_material,
            Column::QuantNt => &mut row.quant_nt,
            Column::ItemFinalizado => &mut row.item_finalizado,
            Column::NomeUsuario => &mut row.nome_usuario,
            Column::Usuario => &mut row.usuario,
            Column::Deposito => &mut row.deposito,
            Column::DtPlanejada => &mut row.dt_planejada,
            Column::DtProducao => &mut row.dt_producao,
        }
    }
}
