//! Parser for transcript FASTA files.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::Error;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Reads a FASTA file from disk, transparently decompressing gzip input.
pub fn read_fasta_path(path: &Path) -> Result<Vec<(String, Vec<u8>)>, Error> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 2];
    let n = file.read(&mut magic)?;
    let file = File::open(path)?;
    if n == 2 && magic == GZIP_MAGIC {
        parse_fasta_gz(file)
    } else {
        parse_fasta(BufReader::new(file))
    }
}

/// Reads gzip-compressed FASTA and yields (accession, sequence) pairs.
pub fn parse_fasta_gz<R: Read>(reader: R) -> Result<Vec<(String, Vec<u8>)>, Error> {
    let decoder = MultiGzDecoder::new(reader);
    parse_fasta(BufReader::new(decoder))
}

/// Reads FASTA from a buffered reader and yields (accession, sequence) pairs.
///
/// The accession is the first `|`-delimited token of the record identifier,
/// so `>PB.1.1|chr1:100-200(+)|transcript/1 len=2` yields `PB.1.1`.
/// Sequence bases are uppercased.
pub fn parse_fasta<R: BufRead>(reader: R) -> Result<Vec<(String, Vec<u8>)>, Error> {
    let mut results: Vec<(String, Vec<u8>)> = Vec::new();
    let mut current_accession: Option<String> = None;
    let mut current_sequence: Vec<u8> = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(header) = line.strip_prefix('>') {
            if let Some(acc) = current_accession.take() {
                results.push((acc, std::mem::take(&mut current_sequence)));
            }
            let accession = extract_accession(header).ok_or_else(|| {
                Error::Parse(format!("empty FASTA header on line {}", line_num + 1))
            })?;
            current_accession = Some(accession);
        } else if current_accession.is_some() {
            let trimmed = line.trim();
            let start = current_sequence.len();
            current_sequence.extend_from_slice(trimmed.as_bytes());
            current_sequence[start..].make_ascii_uppercase();
        }
    }

    if let Some(acc) = current_accession {
        results.push((acc, current_sequence));
    }

    Ok(results)
}

fn extract_accession(header: &str) -> Option<String> {
    let identifier = header.split_whitespace().next()?;
    let accession = identifier.split('|').next().unwrap_or(identifier);
    if accession.is_empty() {
        None
    } else {
        Some(accession.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::{Cursor, Write};

    fn make_gz(content: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn accession_is_first_pipe_token() {
        let fasta = b">PB.1.1|chr1:100-900(+)|transcript/7 full_length_coverage=5\nATGAAA\nTAG\n";
        let results = parse_fasta(Cursor::new(&fasta[..])).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "PB.1.1");
        assert_eq!(results[0].1, b"ATGAAATAG");
    }

    #[test]
    fn multiple_records_uppercased() {
        let fasta = b">PB.1.1\nacgt\n\n>PB.1.2 desc\nTTTT\naaaa\n";
        let results = parse_fasta(Cursor::new(&fasta[..])).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], ("PB.1.1".to_string(), b"ACGT".to_vec()));
        assert_eq!(results[1], ("PB.1.2".to_string(), b"TTTTAAAA".to_vec()));
    }

    #[test]
    fn gzip_input() {
        let gz = make_gz(b">PB.3.1|x\nATG\n");
        let results = parse_fasta_gz(Cursor::new(gz)).unwrap();
        assert_eq!(results[0].0, "PB.3.1");
        assert_eq!(results[0].1, b"ATG");
    }

    #[test]
    fn empty_header_is_error() {
        let fasta = b">PB.1.1\nATG\n>\nATG\n";
        let err = parse_fasta(Cursor::new(&fasta[..])).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn path_detects_gzip() {
        let mut plain = tempfile::NamedTempFile::new().unwrap();
        plain.write_all(b">PB.1.1\nATG\n").unwrap();
        let mut gz = tempfile::NamedTempFile::new().unwrap();
        gz.write_all(&make_gz(b">PB.2.1\nTAA\n")).unwrap();

        let a = read_fasta_path(plain.path()).unwrap();
        let b = read_fasta_path(gz.path()).unwrap();
        assert_eq!(a[0].0, "PB.1.1");
        assert_eq!(b[0].0, "PB.2.1");
        assert_eq!(b[0].1, b"TAA");
    }
}
