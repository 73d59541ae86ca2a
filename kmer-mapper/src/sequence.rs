use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

use crate::error::{MapperError, Result};
use crate::index::KmerIndex;
use crate::util::dna;

/// 从一条 FASTA 记录的原始行构造序列对象。
/// 第 0 行为 header，其余行为序列体。
pub trait FromFasta: Sized {
    fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self>;
}

/// 带名称的核苷酸序列，构造后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    name: String,
    description: Option<String>,
    bases: String,
}

impl Sequence {
    /// header 首字符（通常为 `>`）被去掉，第一个空白分隔的词作为名称，
    /// 其余部分作为描述；序列行去掉全部空白字符后按顺序拼接，大小写保持不变。
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let (header, body) = match lines.split_first() {
            Some((h, b)) if !b.is_empty() => (h.as_ref(), b),
            _ => {
                return Err(MapperError::malformed(format!(
                    "expected a header and at least one sequence line, got {} line(s)",
                    lines.len()
                )))
            }
        };

        let mut chars = header.trim().chars();
        chars.next();
        let header = chars.as_str();
        let mut parts = header.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or("").to_string();
        if name.is_empty() {
            return Err(MapperError::malformed("header line has no sequence name"));
        }
        let description = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let bases: String = body
            .iter()
            .flat_map(|l| l.as_ref().chars())
            .filter(|c| !c.is_whitespace())
            .collect();
        if bases.is_empty() {
            return Err(MapperError::malformed(format!("sequence '{}' has no bases", name)));
        }

        Ok(Self {
            name,
            description,
            bases,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    pub fn bases(&self) -> &str {
        &self.bases
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

impl FromFasta for Sequence {
    fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        Sequence::from_lines(lines)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}...", self.name, dna::preview(&self.bases, dna::PREVIEW_LEN))
    }
}

/// 待比对的短序列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Read {
    seq: Sequence,
}

impl Read {
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        Ok(Self {
            seq: Sequence::from_lines(lines)?,
        })
    }

    /// 取前 `seed_length` 个碱基作为种子。
    /// read 长度不足时返回 `SeedTooShort`，不做截断。
    pub fn get_seed(&self, seed_length: usize) -> Result<&str> {
        if seed_length > self.len() {
            return Err(MapperError::SeedTooShort {
                name: self.name().to_string(),
                len: self.len(),
                seed_length,
            });
        }
        self.bases().get(..seed_length).ok_or_else(|| {
            MapperError::malformed(format!(
                "seed of length {} splits a multi-byte character in '{}'",
                seed_length,
                self.name()
            ))
        })
    }

    pub fn sequence(&self) -> &Sequence {
        &self.seq
    }
}

impl Deref for Read {
    type Target = Sequence;

    fn deref(&self) -> &Sequence {
        &self.seq
    }
}

impl FromFasta for Read {
    fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        Read::from_lines(lines)
    }
}

impl fmt::Display for Read {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.seq, f)
    }
}

/// 参考序列。k-mer 索引按 k 分别保存，需显式调用 [`Reference::calculate_kmers`] 构建。
#[derive(Debug, Clone)]
pub struct Reference {
    seq: Sequence,
    indexes: BTreeMap<usize, KmerIndex>,
}

impl Reference {
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        Ok(Self {
            seq: Sequence::from_lines(lines)?,
            indexes: BTreeMap::new(),
        })
    }

    /// 为长度 k 构建 k-mer 索引；已构建过则直接复用。
    pub fn calculate_kmers(&mut self, k: usize) -> Result<&KmerIndex> {
        if !self.indexes.contains_key(&k) {
            log::info!(
                "building {}-mer index for '{}' ({} bp)",
                k,
                self.seq.name(),
                self.seq.len()
            );
            let idx = KmerIndex::build(self.seq.bases().as_bytes(), k)?;
            self.indexes.insert(k, idx);
        }
        Ok(&self.indexes[&k])
    }

    pub fn kmer_index(&self, k: usize) -> Option<&KmerIndex> {
        self.indexes.get(&k)
    }

    /// 查询 k-mer 的升序位置列表。
    /// 对应长度的索引尚未构建、或 k-mer 不存在时返回空切片。
    pub fn get_kmer_positions(&self, kmer: &str) -> &[usize] {
        self.indexes
            .get(&kmer.len())
            .map(|idx| idx.positions(kmer.as_bytes()))
            .unwrap_or(&[])
    }

    /// 统计 read 与参考 `[position, position + len(read))` 区间的错配数。
    /// 区间超出参考末端时返回 `PositionOutOfBounds`。
    pub fn count_mismatches(&self, read: &Read, position: usize) -> Result<usize> {
        let query = read.bases().as_bytes();
        let target = self.seq.bases().as_bytes();
        let window = position
            .checked_add(query.len())
            .and_then(|end| target.get(position..end))
            .ok_or_else(|| MapperError::PositionOutOfBounds {
                position,
                len: query.len(),
                reference_len: target.len(),
            })?;
        Ok(dna::hamming(query, window))
    }

    pub fn sequence(&self) -> &Sequence {
        &self.seq
    }
}

impl Deref for Reference {
    type Target = Sequence;

    fn deref(&self) -> &Sequence {
        &self.seq
    }
}

impl FromFasta for Reference {
    fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        Reference::from_lines(lines)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.seq, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read0() -> Read {
        Read::from_lines(&[">Read_0", "AGTCGTAG", "TTCAGCCT", "CGTTAGCT", "AGGCAATG"]).unwrap()
    }

    fn small_ref() -> Reference {
        Reference::from_lines(&[">ref", "AGTCCTGATTAGCGGTTAGCGAAT"]).unwrap()
    }

    #[test]
    fn read_from_lines() {
        let read = read0();
        assert_eq!(read.bases(), "AGTCGTAGTTCAGCCTCGTTAGCTAGGCAATG");
        assert_eq!(read.name(), "Read_0");
        assert_eq!(read.description(), None);
    }

    #[test]
    fn read_display() {
        assert_eq!(read0().to_string(), "Read_0: AGTCGTAGTTCAGCCTCGTT...");
    }

    #[test]
    fn short_sequence_display_keeps_ellipsis() {
        let read = Read::from_lines(&[">r", "ACG"]).unwrap();
        assert_eq!(read.to_string(), "r: ACG...");
    }

    #[test]
    fn read_seed() {
        let read = read0();
        assert_eq!(read.get_seed(5).unwrap(), "AGTCG");
        assert_eq!(read.get_seed(0).unwrap(), "");
        assert_eq!(read.get_seed(read.len()).unwrap(), read.bases());
    }

    #[test]
    fn seed_longer_than_read_is_rejected() {
        let read = Read::from_lines(&[">short", "ACGT"]).unwrap();
        let err = read.get_seed(5).unwrap_err();
        assert!(matches!(
            err,
            MapperError::SeedTooShort { len: 4, seed_length: 5, .. }
        ));
    }

    #[test]
    fn reference_from_lines() {
        let r = Reference::from_lines(&[
            ">Reference",
            "TTTACTGTGTCCATGGTGTATCCTGTTCCT",
            "GTTCCATGGCTGTATGGAGGATCTCCAGTATAAGAGAATG",
        ])
        .unwrap();
        assert_eq!(
            r.bases(),
            "TTTACTGTGTCCATGGTGTATCCTGTTCCTGTTCCATGGCTGTATGGAGGATCTCCAGTATAAGAGAATG"
        );
        assert_eq!(r.name(), "Reference");
        assert_eq!(r.to_string(), "Reference: TTTACTGTGTCCATGGTGTA...");
    }

    #[test]
    fn header_description_and_line_endings() {
        let s = Sequence::from_lines(&[">chr1 segment 4\r\n", "acGT\r\n", "  NNa \n"]).unwrap();
        assert_eq!(s.name(), "chr1");
        assert_eq!(s.description(), Some("segment 4"));
        assert_eq!(s.bases(), "acGTNNa");
    }

    #[test]
    fn internal_whitespace_is_not_part_of_bases() {
        let s = Sequence::from_lines(&[">r", "AC GT", "TT\tA"]).unwrap();
        assert_eq!(s.bases(), "ACGTTTA");
        assert_eq!(s.len(), 7);
    }

    #[test]
    fn malformed_records_are_rejected() {
        let only_header: [&str; 1] = [">lonely"];
        assert!(matches!(
            Sequence::from_lines(&only_header),
            Err(MapperError::MalformedRecord { .. })
        ));
        let empty: [&str; 0] = [];
        assert!(matches!(
            Read::from_lines(&empty),
            Err(MapperError::MalformedRecord { .. })
        ));
        assert!(matches!(
            Reference::from_lines(&[">blank", "   ", ""]),
            Err(MapperError::MalformedRecord { .. })
        ));
        assert!(matches!(
            Sequence::from_lines(&[">", "ACGT"]),
            Err(MapperError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn reference_kmer_positions() {
        let mut r = small_ref();
        // 未构建索引时查询为空
        assert!(r.get_kmer_positions("TAG").is_empty());
        r.calculate_kmers(3).unwrap();
        r.calculate_kmers(4).unwrap();
        assert_eq!(r.get_kmer_positions("TAG"), &[9, 16]);
        assert_eq!(r.get_kmer_positions("AGTC"), &[0]);
        assert!(r.get_kmer_positions("AGTCC").is_empty());
        assert!(r.get_kmer_positions("GGG").is_empty());
    }

    #[test]
    fn calculate_kmers_is_idempotent() {
        let mut r = small_ref();
        let first = r.calculate_kmers(3).unwrap().clone();
        let second = r.calculate_kmers(3).unwrap();
        assert_eq!(&first, second);
        assert_eq!(r.kmer_index(3).map(KmerIndex::k), Some(3));
        assert!(r.kmer_index(5).is_none());
    }

    #[test]
    fn reference_count_mismatches() {
        let r = small_ref();
        let read = Read::from_lines(&[">read_1", "CCTGAT"]).unwrap();
        assert_eq!(r.count_mismatches(&read, 0).unwrap(), 4);
        assert_eq!(r.count_mismatches(&read, 3).unwrap(), 0);
    }

    #[test]
    fn count_mismatches_matches_bytewise_definition() {
        let r = small_ref();
        let read = Read::from_lines(&[">read_1", "CCTGAT"]).unwrap();
        let rb = r.bases().as_bytes();
        let qb = read.bases().as_bytes();
        for pos in 0..=rb.len() - qb.len() {
            let expected = (0..qb.len()).filter(|&i| qb[i] != rb[pos + i]).count();
            assert_eq!(r.count_mismatches(&read, pos).unwrap(), expected, "pos={}", pos);
        }
    }

    #[test]
    fn count_mismatches_rejects_window_past_end() {
        let r = small_ref();
        let read = Read::from_lines(&[">read_1", "CCTGAT"]).unwrap();
        // 最后一个合法起点
        assert!(r.count_mismatches(&read, 18).is_ok());
        let err = r.count_mismatches(&read, 19).unwrap_err();
        assert!(matches!(
            err,
            MapperError::PositionOutOfBounds { position: 19, len: 6, reference_len: 24 }
        ));
        assert!(r.count_mismatches(&read, usize::MAX).is_err());
    }
}
