//! ORF extraction and translation.

use crate::codon::{CodonTable, translate_to_stop};
use crate::error::Error;
use crate::sequence::SequenceStore;

/// Translate the ORF `[start, end]` (1-based, inclusive) of `accession`.
///
/// Translation stops at the first in-frame stop codon, which is not included.
pub fn translate_orf(
    accession: &str,
    start: u64,
    end: u64,
    store: &SequenceStore,
    table: &CodonTable,
) -> Result<String, Error> {
    let seq = store
        .get(accession)
        .ok_or_else(|| Error::MissingSequence {
            accession: accession.to_string(),
        })?;

    let orf = orf_slice(seq, start, end).ok_or_else(|| Error::MalformedCoordinates {
        accession: accession.to_string(),
        start,
        end,
        seq_len: seq.len(),
    })?;

    let protein = translate_to_stop(orf, table);
    // Codon tables only emit ASCII residues.
    Ok(protein.into_iter().map(char::from).collect())
}

/// Half-open zero-based slice for 1-based inclusive coordinates, if in bounds.
fn orf_slice(seq: &[u8], start: u64, end: u64) -> Option<&[u8]> {
    if start < 1 || start > end {
        return None;
    }
    let start = usize::try_from(start - 1).ok()?;
    let end = usize::try_from(end).ok()?;
    seq.get(start..end)
}
