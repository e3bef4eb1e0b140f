//! ORF table parsing and the admission filter.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::Read;

use csv::StringRecord;

use crate::cli;
use crate::error::Error;

const REQUIRED_COLUMNS: [&str; 6] = [
    "pb_acc",
    "orf_start",
    "orf_end",
    "orf_len",
    "coding_score",
    "has_stop_codon",
];

/// One row of the ORF table.
#[derive(Debug, Clone, PartialEq)]
pub struct OrfRecord {
    pub pb_acc: String,
    pub orf_start: u64,
    pub orf_end: u64,
    pub orf_len: u64,
    pub coding_score: f64,
    /// `coding_score` exactly as written in the input.
    pub coding_score_text: String,
    pub has_stop_codon: bool,
    pub gene: Option<String>,
    pub orf_calling_confidence: Option<String>,
    pub upstream_atgs: Option<String>,
    pub orf_score: Option<String>,
    pub fl: u64,
    pub cpm: f64,
}

/// The parsed ORF table.
#[derive(Debug, Clone, Default)]
pub struct OrfTable {
    pub records: Vec<OrfRecord>,
    /// Whether the input carried a `gene` column.
    pub has_gene_column: bool,
}

/// Rows admitted by an [`AdmissionFilter`], indexed by accession.
#[derive(Debug, Clone, Default)]
pub struct AdmittedOrfs {
    rows: Vec<OrfRecord>,
    index: HashMap<String, usize>,
    pub dropped_by_score: usize,
    pub dropped_without_stop: usize,
    /// Accessions that appeared in more than one admitted row.
    pub duplicate_rows: Vec<String>,
}

impl AdmittedOrfs {
    /// Admitted rows in input order, one per accession.
    #[must_use]
    pub fn rows(&self) -> &[OrfRecord] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, accession: &str) -> Option<&OrfRecord> {
        self.index.get(accession).map(|&i| &self.rows[i])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Which ORF predictions go on to translation and grouping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdmissionFilter {
    pub cutoff: f64,
    pub require_stop_codon: bool,
}

impl Default for AdmissionFilter {
    fn default() -> Self {
        Self {
            cutoff: 0.0,
            require_stop_codon: true,
        }
    }
}

impl AdmissionFilter {
    #[must_use]
    pub fn admits(&self, orf: &OrfRecord) -> bool {
        orf.coding_score >= self.cutoff && (orf.has_stop_codon || !self.require_stop_codon)
    }
}

impl OrfTable {
    /// Apply `filter`, dropping failing rows silently.
    ///
    /// A repeated accession keeps its first admitted row.
    pub fn admitted(&self, filter: &AdmissionFilter) -> AdmittedOrfs {
        let mut admitted = AdmittedOrfs::default();

        for orf in &self.records {
            if orf.coding_score.is_nan() || orf.coding_score < filter.cutoff {
                admitted.dropped_by_score += 1;
                continue;
            }
            if !filter.admits(orf) {
                admitted.dropped_without_stop += 1;
                continue;
            }
            match admitted.index.entry(orf.pb_acc.clone()) {
                Entry::Occupied(_) => {
                    cli::warning(&format!(
                        "duplicate ORF row for {}, keeping first occurrence",
                        orf.pb_acc
                    ));
                    admitted.duplicate_rows.push(orf.pb_acc.clone());
                }
                Entry::Vacant(e) => {
                    e.insert(admitted.rows.len());
                    admitted.rows.push(orf.clone());
                }
            }
        }

        admitted
    }
}

/// Column positions resolved from the header row.
struct Columns {
    pb_acc: usize,
    orf_start: usize,
    orf_end: usize,
    orf_len: usize,
    coding_score: usize,
    has_stop_codon: usize,
    gene: Option<usize>,
    orf_calling_confidence: Option<usize>,
    upstream_atgs: Option<usize>,
    orf_score: Option<usize>,
    fl: Option<usize>,
    cpm: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, Error> {
        let hdr_to_idx: HashMap<&str, usize> =
            header.iter().enumerate().map(|(i, h)| (h.trim(), i)).collect();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !hdr_to_idx.contains_key(c))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Parse(format!(
                "ORF table is missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let opt = |name: &str| hdr_to_idx.get(name).copied();
        Ok(Self {
            pb_acc: hdr_to_idx["pb_acc"],
            orf_start: hdr_to_idx["orf_start"],
            orf_end: hdr_to_idx["orf_end"],
            orf_len: hdr_to_idx["orf_len"],
            coding_score: hdr_to_idx["coding_score"],
            has_stop_codon: hdr_to_idx["has_stop_codon"],
            gene: opt("gene"),
            orf_calling_confidence: opt("orf_calling_confidence"),
            upstream_atgs: opt("upstream_atgs"),
            orf_score: opt("orf_score"),
            fl: opt("FL"),
            cpm: opt("CPM"),
        })
    }
}

/// Read a tab-separated ORF table with a header row.
pub fn read_orf_table<R: Read>(reader: R) -> Result<OrfTable, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .from_reader(reader);

    let columns = Columns::from_header(reader.headers()?)?;
    if columns.gene.is_none() {
        cli::warning("'gene' column not found in ORF table, proceeding without it");
    }

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        // Header is line 1.
        let line = i + 2;
        records.push(parse_row(&row, &columns).map_err(|e| match e {
            Error::Parse(msg) => Error::Parse(format!("{msg} (ORF table line {line})")),
            other => other,
        })?);
    }

    Ok(OrfTable {
        records,
        has_gene_column: columns.gene.is_some(),
    })
}

fn parse_row(row: &StringRecord, columns: &Columns) -> Result<OrfRecord, Error> {
    let field = |idx: usize| row.get(idx).unwrap_or("").trim();
    let optional = |idx: Option<usize>| {
        idx.map(field)
            .filter(|v| !v.is_empty() && !is_na(v))
            .map(str::to_string)
    };

    let pb_acc = field(columns.pb_acc);
    if pb_acc.is_empty() {
        return Err(Error::Parse("empty pb_acc".to_string()));
    }
    let context = |name: &str, value: &str| format!("invalid {name} '{value}' for {pb_acc}");

    let parse_u64 = |name: &str, idx: usize| {
        let value = field(idx);
        value.parse::<u64>().map_err(|_| Error::Parse(context(name, value)))
    };
    let parse_f64 = |name: &str, value: &str| {
        value.parse::<f64>().map_err(|_| Error::Parse(context(name, value)))
    };

    // A missing score parses to NaN, which no cutoff admits.
    let coding_score_text = field(columns.coding_score);
    let coding_score = if coding_score_text.is_empty() || is_na(coding_score_text) {
        f64::NAN
    } else {
        parse_f64("coding_score", coding_score_text)?
    };
    let has_stop = field(columns.has_stop_codon);

    let fl = match optional(columns.fl) {
        Some(v) => parse_count(&v).ok_or_else(|| Error::Parse(context("FL", &v)))?,
        None => 0,
    };
    let cpm = match optional(columns.cpm) {
        Some(v) => parse_f64("CPM", &v)?,
        None => 0.0,
    };

    Ok(OrfRecord {
        pb_acc: pb_acc.to_string(),
        orf_start: parse_u64("orf_start", columns.orf_start)?,
        orf_end: parse_u64("orf_end", columns.orf_end)?,
        orf_len: parse_u64("orf_len", columns.orf_len)?,
        coding_score,
        coding_score_text: coding_score_text.to_string(),
        has_stop_codon: parse_bool(has_stop)
            .ok_or_else(|| Error::Parse(context("has_stop_codon", has_stop)))?,
        gene: optional(columns.gene),
        orf_calling_confidence: optional(columns.orf_calling_confidence),
        upstream_atgs: optional(columns.upstream_atgs),
        orf_score: optional(columns.orf_score),
        fl,
        cpm,
    })
}

/// Accepts yes/true/t/y/1 and no/false/f/n/0, case-insensitively.
#[must_use]
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "yes" | "true" | "t" | "y" | "1" => Some(true),
        "no" | "false" | "f" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Full-length counts are integers but are often written as `5.0`.
fn parse_count(s: &str) -> Option<u64> {
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

fn is_na(s: &str) -> bool {
    s.eq_ignore_ascii_case("na") || s.eq_ignore_ascii_case("nan")
}
