//! Phenotype table (pht) discovery
//!
//! A study's `pheno_variable_summaries` directory holds one variable report
//! per phenotype table, named like
//! `phs000007.v32.pht000009.v2.p13.genotype_var_report.xml`. The pht
//! accessions in those names become the `resultsIn` entries of the study.

use crate::config::DbgapConfig;
use crate::fetch::StudyDownloader;
use crate::identifier::StudyIdentifier;
use dbgap_common::{DbgapError, Result};
use regex::Regex;
use tracing::{info, instrument};

/// Versioned pht accession, e.g. `pht000009.v2`
const PHT_PATTERN: &str = r"pht\d{6,}\.v\d+";

/// Pull the distinct pht accessions out of a directory listing, in first-seen
/// order of the sorted listing
pub fn extract_pht_entries<S: AsRef<str>>(file_names: &[S]) -> Result<Vec<String>> {
    let pattern = Regex::new(PHT_PATTERN).map_err(|e| DbgapError::Parse(e.to_string()))?;

    let mut names: Vec<&str> = file_names.iter().map(AsRef::as_ref).collect();
    names.sort_unstable();

    let mut entries: Vec<String> = Vec::new();
    for name in names {
        if let Some(found) = pattern.find(name) {
            let pht = found.as_str();
            if !entries.iter().any(|e| e == pht) {
                entries.push(pht.to_string());
            }
        }
    }

    Ok(entries)
}

/// List the study's phenotype summaries and return its pht accessions
#[instrument(skip_all, fields(study = %study))]
pub async fn discover_pht_entries(
    study: &StudyIdentifier,
    config: &DbgapConfig,
    downloader: &dyn StudyDownloader,
) -> Result<Vec<String>> {
    let dir = config.pheno_dir_path(study)?;
    let files = downloader.list_files(&dir).await?;
    let entries = extract_pht_entries(&files)?;

    info!(count = entries.len(), "Discovered phenotype tables");
    Ok(entries)
}
