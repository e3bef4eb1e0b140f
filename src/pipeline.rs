//! End-to-end refinement: filter, translate, collapse, order, aggregate.
//!
//! Everything runs in memory. A fatal error (missing sequence, malformed
//! coordinates) is returned before any record is produced, so callers never
//! see a partial database.

use crate::accession::order_accessions;
use crate::aggregate::{AggregateRecord, aggregate};
use crate::codon::CodonTable;
use crate::emit::{self, RefinedDatabase};
use crate::error::Error;
use crate::group::group_by_protein;
use crate::orf::{AdmissionFilter, OrfTable};
use crate::sequence::SequenceStore;

/// Counters describing one refinement run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RefineStats {
    pub num_orf_rows: usize,
    pub num_admitted: usize,
    pub num_dropped_by_score: usize,
    pub num_dropped_without_stop: usize,
    pub num_duplicate_orf_rows: usize,
    pub num_redundant_sequences: usize,
    pub num_groups: usize,
    pub num_collapsed_isoforms: usize,
    pub num_unrecognized_accessions: usize,
    pub num_unordered_groups: usize,
    pub num_skipped_groups: usize,
    pub num_metadata_fallbacks: usize,
    pub num_absent_members: usize,
}

/// Result of [`refine`].
#[derive(Debug, Clone)]
pub struct Refinement {
    /// One record per distinct protein, sorted by (protein, merged accession).
    pub records: Vec<AggregateRecord>,
    /// Accessions that were not `PB.<g>.<i>`. They appear in a merged accession
    /// only when their whole group is unrecognized.
    pub unrecognized: Vec<String>,
    pub include_gene: bool,
    pub stats: RefineStats,
}

impl Refinement {
    pub fn database(&self) -> Result<RefinedDatabase, Error> {
        emit::emit(&self.records, self.include_gene)
    }

    pub fn combined(&self) -> Result<String, Error> {
        emit::emit_combined(&self.records)
    }
}

pub fn refine(
    store: &SequenceStore,
    orfs: &OrfTable,
    filter: &AdmissionFilter,
    table: &CodonTable,
) -> Result<Refinement, Error> {
    let admitted = orfs.admitted(filter);
    let groups = group_by_protein(&admitted, store, table)?;

    let mut stats = RefineStats {
        num_orf_rows: orfs.records.len(),
        num_admitted: admitted.len(),
        num_dropped_by_score: admitted.dropped_by_score,
        num_dropped_without_stop: admitted.dropped_without_stop,
        num_duplicate_orf_rows: admitted.duplicate_rows.len(),
        num_redundant_sequences: store.redundant().len(),
        num_groups: groups.len(),
        num_collapsed_isoforms: groups.collapsed_isoforms(),
        ..RefineStats::default()
    };

    let mut records = Vec::with_capacity(groups.len());
    let mut unrecognized = Vec::new();

    for (protein, members) in groups.into_sorted() {
        let order = order_accessions(&members);
        unrecognized.extend(order.unrecognized.iter().cloned());

        match aggregate(&protein, &order, &admitted) {
            Some(record) => {
                if record.metadata_acc != record.base_acc {
                    stats.num_metadata_fallbacks += 1;
                }
                if record.unordered {
                    stats.num_unordered_groups += 1;
                }
                stats.num_absent_members += record.absent_members.len();
                records.push(record);
            }
            None => stats.num_skipped_groups += 1,
        }
    }

    records.sort_by(|a, b| {
        a.protein
            .cmp(&b.protein)
            .then_with(|| a.pb_accs.cmp(&b.pb_accs))
    });
    stats.num_unrecognized_accessions = unrecognized.len();

    Ok(Refinement {
        records,
        unrecognized,
        include_gene: orfs.has_gene_column,
        stats,
    })
}
