//! Codon translation tables (standard and mitochondrial).

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;

/// Which genetic code to translate ORFs with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneticCode {
    #[default]
    Standard,
    Mitochondrial,
}

impl GeneticCode {
    #[must_use]
    pub fn table(self) -> CodonTable {
        match self {
            Self::Standard => CodonTable::standard(),
            Self::Mitochondrial => CodonTable::mitochondrial(),
        }
    }
}

impl FromStr for GeneticCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "1" => Ok(Self::Standard),
            "mitochondrial" | "2" => Ok(Self::Mitochondrial),
            _ => Err(Error::Validation(format!("unrecognized genetic code: {s}"))),
        }
    }
}

impl fmt::Display for GeneticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Mitochondrial => write!(f, "mitochondrial"),
        }
    }
}

/// Lookup table for translating codons to amino acids.
///
/// Indexed by 6-bit codon encoding: A=0, C=1, G=2, T/U=3.
/// Index = first*16 + second*4 + third.
#[derive(Debug, Clone)]
pub struct CodonTable {
    table: [u8; 64],
}

fn base_to_index(b: u8) -> Option<usize> {
    match b {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' | b'U' | b'u' => Some(3),
        _ => None,
    }
}

impl CodonTable {
    /// Standard genetic code (NCBI translation table 1).
    #[must_use]
    pub fn standard() -> Self {
        #[rustfmt::skip]
        let table: [u8; 64] = [
            b'K', b'N', b'K', b'N',  // AA*
            b'T', b'T', b'T', b'T',  // AC*
            b'R', b'S', b'R', b'S',  // AG*
            b'I', b'I', b'M', b'I',  // AT*
            b'Q', b'H', b'Q', b'H',  // CA*
            b'P', b'P', b'P', b'P',  // CC*
            b'R', b'R', b'R', b'R',  // CG*
            b'L', b'L', b'L', b'L',  // CT*
            b'E', b'D', b'E', b'D',  // GA*
            b'A', b'A', b'A', b'A',  // GC*
            b'G', b'G', b'G', b'G',  // GG*
            b'V', b'V', b'V', b'V',  // GT*
            b'*', b'Y', b'*', b'Y',  // TA*
            b'S', b'S', b'S', b'S',  // TC*
            b'*', b'C', b'W', b'C',  // TG*
            b'L', b'F', b'L', b'F',  // TT*
        ];
        Self { table }
    }

    /// Vertebrate mitochondrial genetic code (NCBI translation table 2).
    /// Differences from standard: UGA→W, AGA→*, AGG→*, AUA→M.
    #[must_use]
    pub fn mitochondrial() -> Self {
        let mut table = Self::standard().table;
        table[56] = b'W'; // TGA
        table[8] = b'*'; // AGA
        table[10] = b'*'; // AGG
        table[12] = b'M'; // ATA
        Self { table }
    }

    /// Translate a single codon (3 bytes) to an amino acid.
    ///
    /// Returns `X` for codons that cannot be resolved. An ambiguous third base
    /// still resolves when all four completions code for the same residue
    /// (e.g. `GCN` is always alanine).
    #[must_use]
    pub fn translate_codon(&self, codon: &[u8]) -> u8 {
        if codon.len() < 3 {
            return b'X';
        }
        let i0 = base_to_index(codon[0]);
        let i1 = base_to_index(codon[1]);
        let i2 = base_to_index(codon[2]);
        match (i0, i1, i2) {
            (Some(a), Some(b), Some(c)) => self.table[a * 16 + b * 4 + c],
            (Some(a), Some(b), None) => {
                let row = &self.table[a * 16 + b * 4..a * 16 + b * 4 + 4];
                if row.iter().all(|&aa| aa == row[0]) {
                    row[0]
                } else {
                    b'X'
                }
            }
            _ => b'X',
        }
    }

    #[must_use]
    pub fn is_stop(&self, codon: &[u8]) -> bool {
        self.translate_codon(codon) == b'*'
    }
}

/// Translate a coding sequence up to, but not including, the first stop codon.
///
/// A trailing partial codon is ignored.
#[must_use]
pub fn translate_to_stop(cds: &[u8], table: &CodonTable) -> Vec<u8> {
    let mut protein = Vec::with_capacity(cds.len() / 3);
    for codon in cds.chunks_exact(3) {
        let aa = table.translate_codon(codon);
        if aa == b'*' {
            break;
        }
        protein.push(aa);
    }
    protein
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_start_and_stops() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"ATG"), b'M');
        assert!(table.is_stop(b"TAA"));
        assert!(table.is_stop(b"TAG"));
        assert!(table.is_stop(b"TGA"));
        assert!(!table.is_stop(b"TGG"));
    }

    #[test]
    fn mitochondrial_differences() {
        let table = CodonTable::mitochondrial();
        assert_eq!(table.translate_codon(b"TGA"), b'W');
        assert_eq!(table.translate_codon(b"AGA"), b'*');
        assert_eq!(table.translate_codon(b"AGG"), b'*');
        assert_eq!(table.translate_codon(b"ATA"), b'M');
    }

    #[test]
    fn stops_at_first_stop_codon() {
        let table = CodonTable::standard();
        assert_eq!(translate_to_stop(b"ATGAAATAG", &table), b"MK");
        assert_eq!(translate_to_stop(b"ATGAAATAGCCCGGG", &table), b"MK");
        assert_eq!(translate_to_stop(b"TAAATG", &table), b"");
    }

    #[test]
    fn partial_codon_ignored() {
        let table = CodonTable::standard();
        assert_eq!(translate_to_stop(b"ATGGCATG", &table), b"MA");
    }

    #[test]
    fn no_stop_translates_everything() {
        let table = CodonTable::standard();
        assert_eq!(translate_to_stop(b"ATGGCATGC", &table), b"MAC");
    }

    #[test]
    fn ambiguous_bases() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"NNN"), b'X');
        assert_eq!(table.translate_codon(b"ANG"), b'X');
        // fourfold degenerate
        assert_eq!(table.translate_codon(b"GCN"), b'A');
        assert_eq!(table.translate_codon(b"CTN"), b'L');
        // twofold only
        assert_eq!(table.translate_codon(b"ATN"), b'X');
        assert_eq!(table.translate_codon(b"TAN"), b'X');
    }

    #[test]
    fn genetic_code_parsing() {
        assert_eq!("standard".parse::<GeneticCode>().unwrap(), GeneticCode::Standard);
        assert_eq!("2".parse::<GeneticCode>().unwrap(), GeneticCode::Mitochondrial);
        assert!("bacterial".parse::<GeneticCode>().is_err());
        assert_eq!(GeneticCode::Mitochondrial.table().translate_codon(b"TGA"), b'W');
    }
}
