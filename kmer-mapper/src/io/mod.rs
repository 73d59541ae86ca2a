pub mod fasta;

pub use fasta::{read_fasta, read_fasta_from, FastaReader};
