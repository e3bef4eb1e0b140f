//! Error types for the ORF refinement library.

use thiserror::Error;

/// Errors that can occur while refining an ORF database.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The ORF table could not be read as delimited text.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A parse error occurred while reading input data.
    #[error("{0}")]
    Parse(String),

    /// A configuration value was rejected.
    #[error("{0}")]
    Validation(String),

    /// An ORF row references a transcript with no sequence.
    #[error("no transcript sequence for ORF accession {accession}")]
    MissingSequence { accession: String },

    /// ORF coordinates fall outside `1 <= start <= end <= len(sequence)`.
    #[error(
        "malformed ORF coordinates for {accession}: start={start}, end={end}, sequence length={seq_len}"
    )]
    MalformedCoordinates {
        accession: String,
        start: u64,
        end: u64,
        seq_len: usize,
    },

    /// An accession does not follow the `PB.<gene>.<isoform>` pattern.
    /// Callers exclude the accession from ordering rather than aborting.
    #[error("unrecognized accession format: {0}")]
    UnrecognizedAccessionFormat(String),
}
