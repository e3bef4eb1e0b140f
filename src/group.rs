//! Collapse isoforms that encode identical proteins.

use std::collections::HashMap;

use crate::codon::CodonTable;
use crate::error::Error;
use crate::orf::AdmittedOrfs;
use crate::sequence::SequenceStore;
use crate::translate::translate_orf;

/// Protein sequence → accessions encoding it, in first-seen order.
#[derive(Debug, Default)]
pub struct ProteinGroups {
    groups: HashMap<String, Vec<String>>,
}

impl ProteinGroups {
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn members(&self, protein: &str) -> Option<&[String]> {
        self.groups.get(protein).map(Vec::as_slice)
    }

    /// Number of isoforms that share their protein with at least one other.
    #[must_use]
    pub fn collapsed_isoforms(&self) -> usize {
        self.groups
            .values()
            .filter(|m| m.len() > 1)
            .map(Vec::len)
            .sum()
    }

    /// Groups sorted by protein sequence.
    #[must_use]
    pub fn into_sorted(self) -> Vec<(String, Vec<String>)> {
        let mut groups: Vec<_> = self.groups.into_iter().collect();
        groups.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        groups
    }
}

/// Translate every admitted ORF and group accessions by protein.
///
/// The first translation failure aborts grouping.
pub fn group_by_protein(
    admitted: &AdmittedOrfs,
    store: &SequenceStore,
    table: &CodonTable,
) -> Result<ProteinGroups, Error> {
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();

    for orf in admitted.rows() {
        let protein = translate_orf(&orf.pb_acc, orf.orf_start, orf.orf_end, store, table)?;
        groups.entry(protein).or_default().push(orf.pb_acc.clone());
    }

    Ok(ProteinGroups { groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orf::{AdmissionFilter, OrfRecord, OrfTable};

    fn orf(acc: &str, start: u64, end: u64) -> OrfRecord {
        OrfRecord {
            pb_acc: acc.to_string(),
            orf_start: start,
            orf_end: end,
            orf_len: end - start + 1,
            coding_score: 1.0,
            coding_score_text: "1.0".to_string(),
            has_stop_codon: true,
            gene: None,
            orf_calling_confidence: None,
            upstream_atgs: None,
            orf_score: None,
            fl: 0,
            cpm: 0.0,
        }
    }

    fn store() -> SequenceStore {
        SequenceStore::load([
            ("PB.1.1".to_string(), b"ATGAAATAG".to_vec()),
            ("PB.2.3".to_string(), b"ATGAAATAA".to_vec()),
            ("PB.2.4".to_string(), b"GGATGAAGTGA".to_vec()),
            ("PB.3.1".to_string(), b"ATGCCCTAG".to_vec()),
        ])
    }

    fn admitted(rows: Vec<OrfRecord>) -> AdmittedOrfs {
        OrfTable {
            records: rows,
            has_gene_column: false,
        }
        .admitted(&AdmissionFilter::default())
    }

    #[test]
    fn identical_proteins_share_group() {
        let rows = vec![
            orf("PB.1.1", 1, 9),
            orf("PB.2.3", 1, 9),
            orf("PB.2.4", 3, 11),
            orf("PB.3.1", 1, 9),
        ];
        let groups = group_by_protein(&admitted(rows), &store(), &CodonTable::standard()).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.members("MK").unwrap(), ["PB.1.1", "PB.2.3", "PB.2.4"]);
        assert_eq!(groups.members("MP").unwrap(), ["PB.3.1"]);
        assert_eq!(groups.collapsed_isoforms(), 3);
    }

    #[test]
    fn membership_independent_of_row_order() {
        let forward = vec![orf("PB.1.1", 1, 9), orf("PB.3.1", 1, 9), orf("PB.2.3", 1, 9)];
        let mut reversed = forward.clone();
        reversed.reverse();

        let table = CodonTable::standard();
        let a = group_by_protein(&admitted(forward), &store(), &table).unwrap();
        let b = group_by_protein(&admitted(reversed), &store(), &table).unwrap();

        let as_sets = |g: ProteinGroups| -> Vec<(String, Vec<String>)> {
            g.into_sorted()
                .into_iter()
                .map(|(p, mut m)| {
                    m.sort();
                    (p, m)
                })
                .collect()
        };
        assert_eq!(as_sets(a), as_sets(b));
    }

    #[test]
    fn missing_sequence_aborts() {
        let rows = vec![orf("PB.1.1", 1, 9), orf("PB.9.9", 1, 9)];
        let err = group_by_protein(&admitted(rows), &store(), &CodonTable::standard()).unwrap_err();
        assert!(matches!(err, Error::MissingSequence { .. }));
    }
}
