//! ORF Refine: collapse long-read isoforms that encode identical proteins into
//! a deduplicated protein database with aggregated quantification.

pub mod error;

pub mod accession;
pub mod aggregate;
pub mod cli;
pub mod codon;
pub mod config;
pub mod emit;
pub mod fasta;
pub mod group;
pub mod orf;
pub mod pipeline;
pub mod sequence;
pub mod translate;
