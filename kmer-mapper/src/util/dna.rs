/// 摘要中展示的碱基数量
pub const PREVIEW_LEN: usize = 20;

/// 逐位比较两段等长序列，返回不同位置的数量（Hamming 距离）。
/// 只比较公共前缀长度，调用方负责保证长度一致。
#[inline]
pub fn hamming(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

/// 取序列前 `n` 个字符；不足 `n` 时返回全部。
/// 按字符边界截断，非 ASCII 输入也不会 panic。
pub fn preview(bases: &str, n: usize) -> &str {
    match bases.char_indices().nth(n) {
        Some((idx, _)) => &bases[..idx],
        None => bases,
    }
}
