//! Refined protein FASTA and companion table writers.

use std::io;

use crate::aggregate::AggregateRecord;
use crate::error::Error;

/// Rendered outputs of one refinement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefinedDatabase {
    pub fasta: String,
    pub table: String,
}

/// Render records as a protein FASTA and a tab-separated table.
///
/// `include_gene` controls the `gene` column; it should reflect whether the
/// ORF table carried one.
pub fn emit(records: &[AggregateRecord], include_gene: bool) -> Result<RefinedDatabase, Error> {
    let mut fasta = String::new();
    let mut wtr = tsv_writer();

    let mut header = vec![
        "pb_accs",
        "base_acc",
        "coding_score",
        "orf_calling_confidence",
        "upstream_atgs",
        "orf_score",
    ];
    if include_gene {
        header.push("gene");
    }
    header.extend(["FL", "CPM"]);
    wtr.write_record(&header)?;

    for rec in records {
        fasta.push_str(&fasta_header(rec));
        fasta.push('\n');
        fasta.push_str(&rec.protein);
        fasta.push('\n');

        let fl = rec.fl.to_string();
        let cpm = format_float(rec.cpm);
        let mut row = vec![
            rec.pb_accs.as_str(),
            rec.base_acc.as_str(),
            rec.coding_score.as_str(),
            rec.orf_calling_confidence.as_deref().unwrap_or(""),
            rec.upstream_atgs.as_deref().unwrap_or(""),
            rec.orf_score.as_deref().unwrap_or(""),
        ];
        if include_gene {
            row.push(rec.gene.as_deref().unwrap_or(""));
        }
        row.extend([fl.as_str(), cpm.as_str()]);
        wtr.write_record(&row)?;
    }

    Ok(RefinedDatabase {
        fasta,
        table: finish(wtr)?,
    })
}

/// `>pb|<base_acc>|fullname GN=<gene>`, or `>pb|<base_acc>` without a gene.
#[must_use]
pub fn fasta_header(rec: &AggregateRecord) -> String {
    match rec.gene.as_deref() {
        Some(gene) => format!(">pb|{}|fullname GN={gene}", rec.base_acc),
        None => format!(">pb|{}", rec.base_acc),
    }
}

/// Protein sequence to merged accession, one line per group.
pub fn emit_combined(records: &[AggregateRecord]) -> Result<String, Error> {
    let mut wtr = tsv_writer();
    wtr.write_record(["protein_sequence", "pb_accs"])?;
    for rec in records {
        wtr.write_record([rec.protein.as_str(), rec.pb_accs.as_str()])?;
    }
    finish(wtr)
}

/// Floats keep a decimal point when integral (`100.0`, not `100`).
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn tsv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(Vec::new())
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, Error> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| Error::Io(io::Error::new(e.error().kind(), e.error().to_string())))?;
    String::from_utf8(bytes).map_err(|e| Error::Parse(format!("table output is not UTF-8: {e}")))
}
