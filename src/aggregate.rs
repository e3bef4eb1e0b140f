//! Per-group quantification and representative metadata.

use crate::accession::CanonicalOrder;
use crate::cli;
use crate::orf::{AdmittedOrfs, OrfRecord};

/// One refined database entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRecord {
    pub protein: String,
    /// `|`-joined canonical accession.
    pub pb_accs: String,
    pub base_acc: String,
    /// Accession whose row supplied the metadata below. Equals `base_acc`
    /// unless the base row was absent.
    pub metadata_acc: String,
    pub coding_score: String,
    pub orf_calling_confidence: Option<String>,
    pub upstream_atgs: Option<String>,
    pub orf_score: Option<String>,
    pub gene: Option<String>,
    pub fl: u64,
    pub cpm: f64,
    /// No member matched `PB.<gene>.<isoform>`; `pb_accs` is in string order.
    pub unordered: bool,
    /// Canonical members with no admitted row; they contributed nothing to FL/CPM.
    pub absent_members: Vec<String>,
}

/// Sum FL and CPM over a group's members and copy metadata from its base row.
///
/// Returns `None` when no member of the merged accession is present in `admitted`.
pub fn aggregate(
    protein: &str,
    order: &CanonicalOrder,
    admitted: &AdmittedOrfs,
) -> Option<AggregateRecord> {
    let base_acc = order.base()?;

    let mut fl = 0u64;
    let mut cpm = 0.0f64;
    let mut absent_members = Vec::new();
    let mut representative: Option<&OrfRecord> = None;

    for acc in order.members() {
        match admitted.get(acc) {
            Some(row) => {
                fl += row.fl;
                cpm += row.cpm;
                if representative.is_none() {
                    representative = Some(row);
                }
            }
            None => absent_members.push(acc.clone()),
        }
    }

    if !absent_members.is_empty() {
        cli::warning(&format!(
            "{} has no ORF row for {}; counted as zero",
            order.merged(),
            absent_members.join(", ")
        ));
    }

    let Some(meta) = representative else {
        cli::warning(&format!(
            "no ORF row for any member of {}, group skipped",
            order.merged()
        ));
        return None;
    };
    if order.is_unordered() {
        cli::warning(&format!(
            "no member of {} matches PB.<gene>.<isoform>, emitted in string order",
            order.merged()
        ));
    }
    if meta.pb_acc != base_acc {
        cli::warning(&format!(
            "base accession {base_acc} has no ORF row, using {} for metadata",
            meta.pb_acc
        ));
    }

    Some(AggregateRecord {
        protein: protein.to_string(),
        pb_accs: order.merged(),
        base_acc: base_acc.to_string(),
        metadata_acc: meta.pb_acc.clone(),
        coding_score: meta.coding_score_text.clone(),
        orf_calling_confidence: meta.orf_calling_confidence.clone(),
        upstream_atgs: meta.upstream_atgs.clone(),
        orf_score: meta.orf_score.clone(),
        gene: meta.gene.clone(),
        fl,
        cpm,
        unordered: order.is_unordered(),
        absent_members,
    })
}
