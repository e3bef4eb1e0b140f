//! Transcript sequence store keyed by isoform accession.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::cli;

/// Transcript nucleotide sequences indexed by accession.
///
/// Duplicate accessions do not abort loading: the first occurrence is kept
/// and the accession is recorded in [`SequenceStore::redundant`].
#[derive(Debug, Default)]
pub struct SequenceStore {
    sequences: HashMap<String, Vec<u8>>,
    redundant: Vec<String>,
}

impl SequenceStore {
    /// Build from (accession, sequence) pairs, e.g. the output of
    /// [`crate::fasta::parse_fasta`].
    pub fn load<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        let entries = entries.into_iter();
        let mut sequences = HashMap::with_capacity(entries.size_hint().0);
        let mut redundant = Vec::new();

        for (accession, seq) in entries {
            match sequences.entry(accession) {
                Entry::Occupied(e) => {
                    cli::warning(&format!(
                        "duplicate transcript accession {}, keeping first occurrence",
                        e.key()
                    ));
                    redundant.push(e.key().clone());
                }
                Entry::Vacant(e) => {
                    e.insert(seq);
                }
            }
        }

        Self {
            sequences,
            redundant,
        }
    }

    /// Get a transcript sequence by accession.
    #[must_use]
    pub fn get(&self, accession: &str) -> Option<&[u8]> {
        self.sequences.get(accession).map(|v| v.as_slice())
    }

    /// Accessions seen more than once while loading, once per extra occurrence.
    #[must_use]
    pub fn redundant(&self) -> &[String] {
        &self.redundant
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(acc: &str, seq: &[u8]) -> (String, Vec<u8>) {
        (acc.to_string(), seq.to_vec())
    }

    #[test]
    fn lookup_by_accession() {
        let store = SequenceStore::load([entry("PB.1.1", b"ATGAAATAG"), entry("PB.1.2", b"ATG")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("PB.1.1"), Some(b"ATGAAATAG".as_slice()));
        assert!(store.get("PB.9.9").is_none());
        assert!(store.redundant().is_empty());
    }

    #[test]
    fn duplicate_keeps_first() {
        let store = SequenceStore::load([
            entry("PB.1.1", b"ATGAAATAG"),
            entry("PB.1.1", b"CCCCCC"),
            entry("PB.2.1", b"ATG"),
            entry("PB.1.1", b"GGG"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("PB.1.1"), Some(b"ATGAAATAG".as_slice()));
        assert_eq!(store.redundant(), ["PB.1.1", "PB.1.1"]);
    }

    #[test]
    fn empty_store() {
        let store = SequenceStore::load(Vec::new());
        assert!(store.is_empty());
    }
}
