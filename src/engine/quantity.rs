// ==========================================
// 物流 NT 看板 - QUANT_NT 数量解析
// ==========================================
// 红线: QUANT_NT 永远以文本存储, 每个使用方独立解析
// 规则: TRIM → 去千分位 "." → 小数逗号 "," 转 "." → 解析; 失败记 0
// ==========================================
// 文法:
// - 含逗号: 逗号为小数点, 所有 "." 为千分位   ("1.234,50" → 1234.5)
// - 不含逗号且 "." 按三位分组: "." 为千分位     ("1.234" → 1234)
// - 不含逗号且只有一个 "." 不按三位分组: 小数点 ("1234.50" → 1234.5)
// ==========================================

/// 解析 QUANT_NT 文本, 无法解析时返回 0
pub fn parse_quantity(raw: &str) -> f64 {
    try_parse_quantity(raw).unwrap_or(0.0)
}

/// 解析 QUANT_NT 文本, 无法解析时返回 None
pub fn try_parse_quantity(raw: &str) -> Option<f64> {
    let text: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if text.is_empty() {
        return None;
    }

    let normalized = if text.contains(',') {
        text.replace('.', "").replace(',', ".")
    } else if is_thousands_grouped(&text) {
        text.replace('.', "")
    } else {
        text
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// 判断不含逗号的文本中 "." 是否为千分位分组
///
/// 首段 1~3 位数字, 之后每段恰好 3 位数字
fn is_thousands_grouped(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let mut groups = unsigned.split('.');

    let head = match groups.next() {
        Some(h) => h,
        None => return false,
    };
    if head.is_empty() || head.len() > 3 || !head.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let mut tail_count = 0;
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        tail_count += 1;
    }
    tail_count > 0
}

/// 对一组文本求和（无法解析的值按 0 计）
pub fn sum_quantities<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    values.into_iter().map(parse_quantity).sum()
}
