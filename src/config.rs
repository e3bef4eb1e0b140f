use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::codon::GeneticCode;
use crate::orf::AdmissionFilter;

/// Run settings, loadable from a JSON file and overridable on the command line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RefineConfig {
    pub coding_score_cutoff: f64,
    pub require_stop_codon: bool,
    pub codon_table: GeneticCode,
    pub write_combined: bool,
}

impl Default for RefineConfig {
    fn default() -> Self {
        let filter = AdmissionFilter::default();
        Self {
            coding_score_cutoff: filter.cutoff,
            require_stop_codon: filter.require_stop_codon,
            codon_table: GeneticCode::default(),
            write_combined: false,
        }
    }
}

impl RefineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.coding_score_cutoff.is_finite() {
            bail!(
                "invalid coding score cutoff: {}",
                self.coding_score_cutoff
            );
        }
        Ok(())
    }

    #[must_use]
    pub fn admission_filter(&self) -> AdmissionFilter {
        AdmissionFilter {
            cutoff: self.coding_score_cutoff,
            require_stop_codon: self.require_stop_codon,
        }
    }
}
