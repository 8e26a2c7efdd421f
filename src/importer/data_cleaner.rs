// ==========================================
// 物流 NT 看板 - 数据清洗器实现
// ==========================================
// 职责: TRIM 标准化 + 剔除 "幽灵行"
// 幽灵行: ITEM_FINALIZADO = "X" 且 QUANT_NT 解析后为 0
// 红线: 不改大小写（切单判定自行处理大小写）
// ==========================================

use crate::domain::nt_row::{Column, NtRow, NtTable};
use crate::engine::quantity::parse_quantity;
use crate::importer::importer_trait::DataCleaner as DataCleanerTrait;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct DataCleaner {
    strip_ghost_rows: bool,
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self {
            strip_ghost_rows: true,
        }
    }
}

impl DataCleaner {
    pub fn new(strip_ghost_rows: bool) -> Self {
        Self { strip_ghost_rows }
    }

    /// 幽灵行判定（与完成数统计一致, 只认大写 "X"）
    pub fn is_ghost_row(&self, row: &NtRow) -> bool {
        row.is_finalized() && parse_quantity(&row.quant_nt) == 0.0
    }

    /// TRIM 所有文本字段
    fn clean_text(&self, mut row: NtRow) -> NtRow {
        for field in [
            &mut row.numero_nt,
            &mut row.material,
            &mut row.desc_material,
            &mut row.quant_nt,
            &mut row.item_finalizado,
            &mut row.nome_usuario,
            &mut row.usuario,
            &mut row.deposito,
            &mut row.dt_planejada,
            &mut row.dt_producao,
        ] {
            if field.trim().len() != field.len() {
                *field = field.trim().to_string();
            }
        }
        row
    }
}

impl DataCleanerTrait for DataCleaner {
    fn clean(&self, table: NtTable) -> (NtTable, usize) {
        let NtTable { columns, rows } = table;
        let before = rows.len();

        // 缺少 QUANT_NT 列时无法判断数量, 不剔除
        let strip = self.strip_ghost_rows && columns.contains(&Column::QuantNt);

        let rows: Vec<NtRow> = rows
            .into_iter()
            .map(|row| self.clean_text(row))
            .filter(|row| !(strip && self.is_ghost_row(row)))
            .collect();

        let removed = before - rows.len();
        if removed > 0 {
            info!(removed, "已剔除幽灵行");
        }
        debug!(before, after = rows.len(), "数据清洗完成");

        (NtTable::new(columns, rows), removed)
    }
}
