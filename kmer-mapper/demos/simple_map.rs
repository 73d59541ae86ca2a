//! 演示如何在 library 模式下使用 kmer-mapper 进行比对。
//!
//! 运行方式：
//! ```bash
//! cargo run --example simple_map
//! ```

use kmer_mapper::align;
use kmer_mapper::io::fasta;
use kmer_mapper::sequence::{Read, Reference};

const REFERENCE: &str = ">ref demo reference
AGTCCTGATTAGCGG
TTAGCGAAT
";

const READS: &str = ">read_1
CCTGAT
>read_2
TAGCGGT
>read_3
TAGCGAT
>read_4
GGGGGG
";

fn main() -> kmer_mapper::Result<()> {
    // 1. 解析 FASTA
    let mut reference: Reference = fasta::read_fasta_from(REFERENCE.as_bytes())?.remove(0);
    let reads: Vec<Read> = fasta::read_fasta_from(READS.as_bytes())?;
    println!("{}", reference);
    for r in &reads {
        println!("  {}", r);
    }

    // 2. 构建 3-mer 索引并查询
    reference.calculate_kmers(3)?;
    println!("\nTAG 出现位置: {:?}", reference.get_kmer_positions("TAG"));

    // 3. 错配计数
    println!("read_1 @0 错配数: {}", reference.count_mismatches(&reads[0], 0)?);
    println!("read_1 @3 错配数: {}", reference.count_mismatches(&reads[0], 3)?);

    // 4. 比对（k=3，最多 1 个错配）
    let mapping = align::map_reads(&reads, &mut reference, 3, 1)?;
    println!("\n{}", mapping);

    Ok(())
}
