// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================
// 职责: 构造 NT 行并写成 SAP 导出格式（分号分隔, Latin-1）
// ==========================================

use chrono::NaiveDate;

/// 导出文件的完整表头
pub const FULL_HEADER: [&str; 10] = [
    "NUMERO_NT",
    "MATERIAL",
    "DESC_MATERIAL",
    "QUANT_NT",
    "ITEM_FINALIZADO",
    "NOME_USUARIO",
    "USUARIO",
    "DEPOSITO",
    "DT_PLANEJADA",
    "DT_PRODUCAO",
];

/// 导出文件中的日期写法
pub fn sap_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

// ==========================================
// NT 行构建器
// ==========================================

#[derive(Debug, Clone)]
pub struct NtRowBuilder {
    numero_nt: String,
    material: String,
    desc_material: String,
    quant_nt: String,
    item_finalizado: String,
    nome_usuario: String,
    usuario: String,
    deposito: String,
    dt_planejada: String,
    dt_producao: String,
}

impl NtRowBuilder {
    pub fn new(numero_nt: &str, deposito: &str) -> Self {
        Self {
            numero_nt: numero_nt.to_string(),
            material: "100200".to_string(),
            desc_material: "ARROZ 5KG".to_string(),
            quant_nt: "1".to_string(),
            item_finalizado: String::new(),
            nome_usuario: String::new(),
            usuario: "FERN.PINTO".to_string(),
            deposito: deposito.to_string(),
            dt_planejada: String::new(),
            dt_producao: String::new(),
        }
    }

    pub fn material(mut self, code: &str, desc: &str) -> Self {
        self.material = code.to_string();
        self.desc_material = desc.to_string();
        self
    }

    pub fn quantity(mut self, quant: &str) -> Self {
        self.quant_nt = quant.to_string();
        self
    }

    /// 已完成（ITEM_FINALIZADO = X）
    pub fn finalized_by(mut self, operator: &str) -> Self {
        self.item_finalizado = "X".to_string();
        self.nome_usuario = operator.to_string();
        self
    }

    /// 拣货中（有作业员, 未完成）
    pub fn picked_by(mut self, operator: &str) -> Self {
        self.nome_usuario = operator.to_string();
        self
    }

    /// 原样设置 ITEM_FINALIZADO
    pub fn flag(mut self, flag: &str) -> Self {
        self.item_finalizado = flag.to_string();
        self
    }

    pub fn usuario(mut self, usuario: &str) -> Self {
        self.usuario = usuario.to_string();
        self
    }

    pub fn planned(mut self, date: NaiveDate) -> Self {
        self.dt_planejada = sap_date(date);
        self
    }

    pub fn produced(mut self, date: NaiveDate) -> Self {
        self.dt_producao = sap_date(date);
        self
    }

    /// 原样设置 DT_PRODUCAO（例如 "00/00/0000"）
    pub fn produced_raw(mut self, raw: &str) -> Self {
        self.dt_producao = raw.to_string();
        self
    }

    pub fn fields(&self) -> [String; 10] {
        [
            self.numero_nt.clone(),
            self.material.clone(),
            self.desc_material.clone(),
            self.quant_nt.clone(),
            self.item_finalizado.clone(),
            self.nome_usuario.clone(),
            self.usuario.clone(),
            self.deposito.clone(),
            self.dt_planejada.clone(),
            self.dt_producao.clone(),
        ]
    }
}

// ==========================================
// 导出文件内容
// ==========================================

/// 完整表头的导出文件内容
pub fn export_bytes(rows: &[NtRowBuilder]) -> Vec<u8> {
    let mut lines = vec![FULL_HEADER.join(";")];
    lines.extend(rows.iter().map(|r| r.fields().join(";")));
    encode_latin1(&(lines.join("\n") + "\n"))
}

/// 省略部分列的导出文件内容
pub fn export_bytes_without(rows: &[NtRowBuilder], skip: &[&str]) -> Vec<u8> {
    let keep: Vec<usize> = FULL_HEADER
        .iter()
        .enumerate()
        .filter(|(_, h)| !skip.contains(h))
        .map(|(i, _)| i)
        .collect();

    let header: Vec<&str> = keep.iter().map(|&i| FULL_HEADER[i]).collect();
    let mut lines = vec![header.join(";")];
    for row in rows {
        let fields = row.fields();
        let kept: Vec<&str> = keep.iter().map(|&i| fields[i].as_str()).collect();
        lines.push(kept.join(";"));
    }
    encode_latin1(&(lines.join("\n") + "\n"))
}

/// UTF-8 文本 → Latin-1 字节（测试数据只含 Latin-1 字符）
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u32 as u8).collect()
}
