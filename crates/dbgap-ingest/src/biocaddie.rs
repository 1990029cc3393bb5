//! Biocaddie study documents
//!
//! Maps a [`GapExchange`] record and the study's phenotype table (pht)
//! accessions onto the normalized biocaddie `Study` entry.
//!
//! Start/end dates, duration, location, performer and biological process are
//! not available in the exchange record and are never emitted.

use crate::exchange::GapExchange;
use crate::identifier::StudyIdentifier;
use dbgap_common::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Value of `@type` for every study document
pub const STUDY_ENTRY_TYPE: &str = "Study";

/// Value of `identifierScheme` for dbGaP accessions
pub const IDENTIFIER_SCHEME: &str = "dbGaP";

/// One entry of `identifierInfo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierInfo {
    identifier: String,
    #[serde(rename = "identifierScheme")]
    identifier_scheme: String,
}

impl IdentifierInfo {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn identifier_scheme(&self) -> &str {
        &self.identifier_scheme
    }
}

/// Normalized biocaddie study document.
///
/// Serializes to exactly `@type`, `identifierInfo`, `title`, `description`,
/// `study_types` and `resultsIn`, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiocaddieStudy {
    #[serde(rename = "@type")]
    entry_type: String,
    #[serde(rename = "identifierInfo")]
    identifier_info: Vec<IdentifierInfo>,
    title: String,
    description: String,
    study_types: Vec<String>,
    #[serde(rename = "resultsIn")]
    results_in: Vec<String>,
}

impl BiocaddieStudy {
    pub fn entry_type(&self) -> &str {
        &self.entry_type
    }

    pub fn identifier_info(&self) -> &[IdentifierInfo] {
        &self.identifier_info
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn study_types(&self) -> &[String] {
        &self.study_types
    }

    pub fn results_in(&self) -> &[String] {
        &self.results_in
    }

    /// Whether the document's study accession is the full id of `study`
    pub fn describes(&self, study: &StudyIdentifier) -> bool {
        self.identifier_info
            .iter()
            .any(|info| info.identifier.ends_with(study.fullid()))
    }

    /// Pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Convert a GaPExchange record into its biocaddie equivalent.
///
/// `prefix` is prepended to the study accession and to every pht entry.
/// Every source field is read before the document is assembled, so a missing
/// field fails the whole call.
pub fn biocaddie_study<S: AsRef<str>>(
    raw: &GapExchange,
    pht_entries: &[S],
    prefix: &str,
) -> Result<BiocaddieStudy> {
    let study = raw.study()?;
    let accession = study.accession()?;
    let configuration = study.configuration()?;
    let title = configuration.study_name_entrez()?;
    let description = configuration.study_name_report_page()?;
    let study_types = configuration.study_types()?;

    debug!(
        accession = %accession,
        pht_entries = pht_entries.len(),
        "Mapping GaPExchange record to biocaddie"
    );

    Ok(BiocaddieStudy {
        entry_type: STUDY_ENTRY_TYPE.to_string(),
        identifier_info: vec![IdentifierInfo {
            identifier: format!("{}{}", prefix, accession),
            identifier_scheme: IDENTIFIER_SCHEME.to_string(),
        }],
        title: title.to_string(),
        description: description.to_string(),
        study_types: study_types.to_vec(),
        results_in: pht_entries
            .iter()
            .map(|pht| format!("{}{}", prefix, pht.as_ref()))
            .collect(),
    })
}
