pub mod mapping;

pub use mapping::{Mapping, MappingSummary, PositionEntry};

use rayon::prelude::*;

use crate::error::Result;
use crate::index::KmerIndex;
use crate::sequence::{Read, Reference};

/// 比对参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapOpt {
    /// 种子 / k-mer 长度
    pub kmer_size: usize,
    /// 允许的最大错配数（含）
    pub max_mismatches: usize,
    /// 1 为单线程；其余值使用独立的 rayon 线程池（0 交给 rayon 自行决定）
    pub threads: usize,
}

impl Default for MapOpt {
    fn default() -> Self {
        Self {
            kmer_size: 8,
            max_mismatches: 2,
            threads: 1,
        }
    }
}

/// 将 reads 比对到参考序列：精确种子查找 + 全长错配过滤。
/// 一个 read 可以落在多个位置，所有满足阈值的位置都会保留。
pub fn map_reads<'a>(
    reads: &'a [Read],
    reference: &'a mut Reference,
    kmer_size: usize,
    max_mismatches: usize,
) -> Result<Mapping<'a>> {
    let opt = MapOpt {
        kmer_size,
        max_mismatches,
        ..MapOpt::default()
    };
    map_reads_with_opt(reads, reference, &opt)
}

/// 先在参考上构建（或复用）索引，再以只读方式进行比对。
pub fn map_reads_with_opt<'a>(
    reads: &'a [Read],
    reference: &'a mut Reference,
    opt: &MapOpt,
) -> Result<Mapping<'a>> {
    reference.calculate_kmers(opt.kmer_size)?;
    let reference: &'a Reference = reference;
    map_reads_indexed(reads, reference, opt)
}

/// 只读比对入口。参考上已有对应 k 的索引时直接使用，否则临时构建一份。
pub fn map_reads_indexed<'a>(
    reads: &'a [Read],
    reference: &'a Reference,
    opt: &MapOpt,
) -> Result<Mapping<'a>> {
    let local;
    let index = match reference.kmer_index(opt.kmer_size) {
        Some(idx) => idx,
        None => {
            local = KmerIndex::build(reference.bases().as_bytes(), opt.kmer_size)?;
            &local
        }
    };

    // 每个 read 独立求出命中位置，再按 read 原始顺序合并，
    // 保证多线程与单线程结果一致
    let hits: Vec<Vec<usize>> = if opt.threads == 1 {
        reads
            .iter()
            .map(|read| place_read(read, reference, index, opt))
            .collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opt.threads)
            .build()?;
        pool.install(|| {
            reads
                .par_iter()
                .map(|read| place_read(read, reference, index, opt))
                .collect::<Vec<_>>()
        })
    };

    let mut mapping = Mapping::for_run(reference, *opt, reads.len());
    for (read, positions) in reads.iter().zip(hits) {
        for pos in positions {
            mapping.add_read(read, pos);
        }
    }

    log::info!(
        "mapped {}/{} reads to '{}' ({} placements, k={}, max_mismatches={})",
        mapping.mapped_read_count(),
        reads.len(),
        reference.name(),
        mapping.placement_count(),
        opt.kmer_size,
        opt.max_mismatches
    );
    Ok(mapping)
}

/// 单个 read 的候选位置过滤，返回升序的命中位置
fn place_read(read: &Read, reference: &Reference, index: &KmerIndex, opt: &MapOpt) -> Vec<usize> {
    let seed = match read.get_seed(opt.kmer_size) {
        Ok(seed) => seed,
        Err(e) => {
            log::debug!("skipping read: {}", e);
            return Vec::new();
        }
    };

    index
        .positions(seed.as_bytes())
        .iter()
        .copied()
        .filter(|&pos| match reference.count_mismatches(read, pos) {
            Ok(mm) => mm <= opt.max_mismatches,
            Err(e) => {
                // 种子命中但 read 伸出参考末端
                log::debug!("read '{}' candidate dropped: {}", read.name(), e);
                false
            }
        })
        .collect()
}
