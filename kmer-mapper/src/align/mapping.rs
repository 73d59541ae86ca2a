use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::sequence::{Read, Reference};

use super::MapOpt;

/// 比对结果：参考位置 -> 按插入顺序排列的 read 列表。
/// 只借用参考与 read，不做拷贝。
#[derive(Debug, Clone)]
pub struct Mapping<'a> {
    reference: &'a Reference,
    placements: BTreeMap<usize, Vec<&'a Read>>,
    /// 由 `map_reads*` 产生时记录本次使用的参数与输入 read 数
    run: Option<(MapOpt, usize)>,
}

impl<'a> Mapping<'a> {
    pub fn new(reference: &'a Reference) -> Self {
        Self {
            reference,
            placements: BTreeMap::new(),
            run: None,
        }
    }

    pub(crate) fn for_run(reference: &'a Reference, opt: MapOpt, total_reads: usize) -> Self {
        Self {
            run: Some((opt, total_reads)),
            ..Self::new(reference)
        }
    }

    /// 生成本结果所用的比对参数；手工构造的结果为 `None`
    pub fn opt(&self) -> Option<&MapOpt> {
        self.run.as_ref().map(|(opt, _)| opt)
    }

    pub fn total_reads(&self) -> Option<usize> {
        self.run.map(|(_, n)| n)
    }

    pub fn reference(&self) -> &'a Reference {
        self.reference
    }

    /// 追加到该位置列表末尾；同一 read 重复添加也会保留。
    pub fn add_read(&mut self, read: &'a Read, position: usize) {
        self.placements.entry(position).or_default().push(read);
    }

    /// 未写入过的位置返回空切片。
    pub fn get_reads_at_position(&self, position: usize) -> &[&'a Read] {
        self.placements
            .get(&position)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 按位置升序遍历
    pub fn positions(&self) -> impl Iterator<Item = (usize, &[&'a Read])> + '_ {
        self.placements
            .iter()
            .map(|(&pos, reads)| (pos, reads.as_slice()))
    }

    /// (read, 位置) 记录总数；多重比对的 read 计多次
    pub fn placement_count(&self) -> usize {
        self.placements.values().map(Vec::len).sum()
    }

    /// 至少比对上一次的不同 read 数。
    /// 按对象地址去重，名称允许重复。
    pub fn mapped_read_count(&self) -> usize {
        self.placements
            .values()
            .flatten()
            .map(|&r| r as *const Read)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn summary(&self) -> MappingSummary {
        MappingSummary {
            reference: self.reference.name().to_string(),
            reference_len: self.reference.len(),
            kmer_size: self.opt().map(|o| o.kmer_size),
            max_mismatches: self.opt().map(|o| o.max_mismatches),
            total_reads: self.total_reads(),
            mapped_reads: self.mapped_read_count(),
            placements: self.placement_count(),
            positions: self
                .positions()
                .map(|(position, reads)| PositionEntry {
                    position,
                    reads: reads.iter().map(|r| r.name().to_string()).collect(),
                })
                .collect(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl fmt::Display for Mapping<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Mapping to {} ({} bp)",
            self.reference.name(),
            self.reference.len()
        )?;
        if self.is_empty() {
            return writeln!(f, "(no reads mapped)");
        }
        for (pos, reads) in self.positions() {
            let names: Vec<&str> = reads.iter().map(|r| r.name()).collect();
            writeln!(f, "{}: {}", pos, names.join(", "))?;
        }
        Ok(())
    }
}

/// 可序列化的比对摘要，供 `--json` 输出
#[derive(Debug, Clone, Serialize)]
pub struct MappingSummary {
    pub reference: String,
    pub reference_len: usize,
    pub kmer_size: Option<usize>,
    pub max_mismatches: Option<usize>,
    pub total_reads: Option<usize>,
    pub mapped_reads: usize,
    pub placements: usize,
    pub positions: Vec<PositionEntry>,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionEntry {
    pub position: usize,
    pub reads: Vec<String>,
}
