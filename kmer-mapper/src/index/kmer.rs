use std::collections::HashMap;

use crate::error::{MapperError, Result};

/// 朴素 k-mer 索引：
/// - 窗口宽度 k、步长 1，从位置 0 扫描到 `len - k`（含）。
/// - 每个 k-mer 记录其所有出现位置，按升序排列，重叠出现也保留。
/// - 构建后只读，可在多个线程间共享查询。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmerIndex {
    k: usize,
    table: HashMap<Vec<u8>, Vec<usize>>,
}

impl KmerIndex {
    pub fn build(seq: &[u8], k: usize) -> Result<Self> {
        if k == 0 {
            return Err(MapperError::InvalidKmerSize(k));
        }
        let mut table: HashMap<Vec<u8>, Vec<usize>> = HashMap::new();
        // windows() 在 k > len 时不产生任何窗口，得到空索引
        for (pos, window) in seq.windows(k).enumerate() {
            table.entry(window.to_vec()).or_default().push(pos);
        }
        log::debug!("k-mer index built: k={}, distinct={}", k, table.len());
        Ok(Self { k, table })
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// 精确查找 k-mer 的出现位置；未出现或长度不为 k 时返回空切片。
    pub fn positions(&self, kmer: &[u8]) -> &[usize] {
        if kmer.len() != self.k {
            return &[];
        }
        self.table.get(kmer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 不同 k-mer 的数量
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// 被索引的窗口总数（即 `len - k + 1`，序列短于 k 时为 0）
    pub fn total_windows(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[usize])> {
        self.table
            .iter()
            .map(|(kmer, pos)| (kmer.as_slice(), pos.as_slice()))
    }
}
