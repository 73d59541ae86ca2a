use std::io::BufRead;
use std::path::Path;

use crate::error::{MapperError, Result};
use crate::sequence::FromFasta;

/// Streams FASTA records as raw line groups: the header line (marker kept)
/// followed by its sequence lines. Blank lines and anything before the
/// first header are skipped.
pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    peek_header: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            done: false,
            peek_header: None,
        }
    }

    pub fn next_lines(&mut self) -> std::io::Result<Option<Vec<String>>> {
        if self.done {
            return Ok(None);
        }

        // Find header line
        let header = if let Some(h) = self.peek_header.take() {
            h
        } else {
            loop {
                self.buf.clear();
                let n = self.reader.read_line(&mut self.buf)?;
                if n == 0 {
                    self.done = true;
                    return Ok(None);
                }
                if self.buf.starts_with('>') {
                    break self.buf.trim_end().to_string();
                }
            }
        };

        let mut lines = vec![header];
        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf)?;
            if n == 0 {
                self.done = true;
                break;
            }
            if self.buf.starts_with('>') {
                self.peek_header = Some(self.buf.trim_end().to_string());
                break;
            }
            let line: String = self.buf.chars().filter(|c| !c.is_whitespace()).collect();
            if !line.is_empty() {
                lines.push(line);
            }
        }

        Ok(Some(lines))
    }

    /// Parse the next record into a typed sequence.
    pub fn next_record<T: FromFasta>(&mut self) -> Result<Option<T>> {
        match self.next_lines() {
            Ok(Some(lines)) => T::from_lines(&lines).map(Some),
            Ok(None) => Ok(None),
            Err(source) => Err(MapperError::Stream(source)),
        }
    }
}

/// Load every record of a FASTA stream, in file order.
pub fn read_fasta_from<T: FromFasta, R: BufRead>(reader: R) -> Result<Vec<T>> {
    let mut r = FastaReader::new(reader);
    let mut out = Vec::new();
    while let Some(rec) = r.next_record()? {
        out.push(rec);
    }
    Ok(out)
}

/// Load every record of a FASTA file, in file order.
pub fn read_fasta<T: FromFasta>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let io_err = |source| MapperError::Io {
        path: path.to_path_buf(),
        source,
    };
    let fh = std::fs::File::open(path).map_err(io_err)?;
    let mut reader = FastaReader::new(std::io::BufReader::new(fh));

    let mut out = Vec::new();
    while let Some(lines) = reader.next_lines().map_err(io_err)? {
        out.push(T::from_lines(&lines)?);
    }
    log::info!("loaded {} record(s) from '{}'", out.len(), path.display());
    Ok(out)
}
