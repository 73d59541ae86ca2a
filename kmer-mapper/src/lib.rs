//! # kmer-mapper
//!
//! 极简短序列比对器：精确 k-mer 种子 + 有界错配延伸。
//!
//! 本 crate 提供：
//!
//! - **序列模型**：从 FASTA 记录行构造 `Read` / `Reference`
//! - **k-mer 索引**：参考序列滑窗索引，k-mer -> 升序位置列表
//! - **比对**：种子查找、全长错配计数与阈值过滤（保留多重比对）
//! - **结果存储**：按参考位置聚合比对上的 read
//!
//! ## 快速示例
//!
//! ```rust
//! use kmer_mapper::align;
//! use kmer_mapper::sequence::{Read, Reference};
//!
//! let mut reference = Reference::from_lines(&[">ref", "AGTCCTGATTAGCGGTTAGCGAAT"]).unwrap();
//! let reads = vec![Read::from_lines(&[">read_1", "CCTGAT"]).unwrap()];
//!
//! let mapping = align::map_reads(&reads, &mut reference, 3, 0).unwrap();
//! assert_eq!(mapping.get_reads_at_position(3)[0].name(), "read_1");
//! ```
//!
//! ## 模块说明
//!
//! - [`sequence`] — 序列模型与 `FromFasta` 构造接口
//! - [`index`] — k-mer 索引
//! - [`align`] — 比对流程与结果存储
//! - [`io`] — FASTA 解析
//! - [`util`] — 错配计数、摘要截取等工具函数
//! - [`error`] — 错误类型

pub mod error;
pub mod sequence;
pub mod index;
pub mod align;
pub mod io;
pub mod util;

pub use error::{MapperError, Result};
