//! PacBio isoform accessions and canonical group ordering.

use std::fmt;
use std::str::FromStr;

use crate::cli;
use crate::error::Error;

/// Numeric key of a `PB.<gene>.<isoform>` accession.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PbAccession {
    pub gene_idx: u64,
    pub iso_idx: u64,
}

impl FromStr for PbAccession {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unrecognized = || Error::UnrecognizedAccessionFormat(s.to_string());
        let rest = s.strip_prefix("PB.").ok_or_else(unrecognized)?;
        let (gene, iso) = rest.split_once('.').ok_or_else(unrecognized)?;
        let parse = |part: &str| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(unrecognized());
            }
            part.parse::<u64>().map_err(|_| unrecognized())
        };
        Ok(Self {
            gene_idx: parse(gene)?,
            iso_idx: parse(iso)?,
        })
    }
}

impl fmt::Display for PbAccession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PB.{}.{}", self.gene_idx, self.iso_idx)
    }
}

/// Members of a collapsed group in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalOrder {
    /// Recognized accessions sorted by (gene index, isoform index).
    pub ordered: Vec<String>,
    /// Members that could not be parsed, sorted as strings. Left out of the
    /// merged accession unless no member was recognized.
    pub unrecognized: Vec<String>,
}

impl CanonicalOrder {
    /// True when no member was recognized and the group falls back to
    /// string order of its raw accessions.
    #[must_use]
    pub fn is_unordered(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Accessions making up the merged accession.
    #[must_use]
    pub fn members(&self) -> &[String] {
        if self.is_unordered() {
            &self.unrecognized
        } else {
            &self.ordered
        }
    }

    /// The `|`-joined merged accession.
    #[must_use]
    pub fn merged(&self) -> String {
        self.members().join("|")
    }

    /// Representative accession, or `None` for an empty group.
    #[must_use]
    pub fn base(&self) -> Option<&str> {
        self.members().first().map(String::as_str)
    }
}

/// Sort group members numerically by gene then isoform index.
///
/// Members that do not match `PB.<gene>.<isoform>` are reported and kept
/// aside in [`CanonicalOrder::unrecognized`]. If none is recognized the
/// raw accessions stand in, sorted as strings.
pub fn order_accessions<S: AsRef<str>>(members: &[S]) -> CanonicalOrder {
    let mut keyed: Vec<(PbAccession, &str)> = Vec::with_capacity(members.len());
    let mut unrecognized = Vec::new();

    for member in members {
        let member = member.as_ref();
        match member.parse::<PbAccession>() {
            Ok(key) => keyed.push((key, member)),
            Err(e) => {
                cli::warning(&format!("{e}; not ordered numerically"));
                unrecognized.push(member.to_string());
            }
        }
    }

    // Distinct accessions may share a key (e.g. "PB.1.01" and "PB.1.1");
    // the string breaks the tie so the order stays total.
    keyed.sort_unstable();
    unrecognized.sort_unstable();

    CanonicalOrder {
        ordered: keyed.into_iter().map(|(_, acc)| acc.to_string()).collect(),
        unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accession() {
        let acc: PbAccession = "PB.12.3".parse().unwrap();
        assert_eq!(acc.gene_idx, 12);
        assert_eq!(acc.iso_idx, 3);
        assert_eq!(acc.to_string(), "PB.12.3");
    }

    #[test]
    fn reject_malformed() {
        for bad in ["ENST00000456328.2", "PB.1", "PB.1.2.3", "PB.a.1", "pb.1.1", "PB..1", ""] {
            let err = bad.parse::<PbAccession>().unwrap_err();
            assert!(matches!(err, Error::UnrecognizedAccessionFormat(_)), "{bad}");
        }
    }

    #[test]
    fn numeric_not_lexical_order() {
        let order = order_accessions(&["PB.10.1", "PB.2.9", "PB.2.10", "PB.1.2", "PB.1.1"]);
        assert_eq!(order.merged(), "PB.1.1|PB.1.2|PB.2.9|PB.2.10|PB.10.1");
        assert_eq!(order.base(), Some("PB.1.1"));
        assert!(order.unrecognized.is_empty());
    }

    #[test]
    fn order_independent_of_input_order() {
        let a = order_accessions(&["PB.1.2", "PB.1.1"]);
        let b = order_accessions(&["PB.1.1", "PB.1.2"]);
        assert_eq!(a, b);
        assert_eq!(a.merged(), "PB.1.1|PB.1.2");
    }

    #[test]
    fn unrecognized_members_set_aside() {
        let order = order_accessions(&["PB.3.1", "novel_tx", "PB.1.4"]);
        assert_eq!(order.ordered, ["PB.1.4", "PB.3.1"]);
        assert_eq!(order.unrecognized, ["novel_tx"]);
    }

    #[test]
    fn all_unrecognized_falls_back_to_string_order() {
        let order = order_accessions(&["tx2", "tx1"]);
        assert!(order.is_unordered());
        assert_eq!(order.base(), Some("tx1"));
        assert_eq!(order.merged(), "tx1|tx2");
    }

    #[test]
    fn unrecognized_not_merged_when_some_recognized() {
        let order = order_accessions(&["zz", "PB.2.1", "aa"]);
        assert!(!order.is_unordered());
        assert_eq!(order.merged(), "PB.2.1");
        assert_eq!(order.unrecognized, ["aa", "zz"]);
    }

    #[test]
    fn empty_group_has_no_base() {
        let order = order_accessions::<&str>(&[]);
        assert_eq!(order.base(), None);
    }
}
