//! GaPExchange study records
//!
//! Typed view of the parts of a `GapExchange_<fullid>.xml` file that the
//! biocaddie mapping reads. Everything else in the record is ignored.
//! Fields are optional at parse time; the accessors turn an absent field into
//! [`DbgapError::MissingField`] carrying its dotted path.

use dbgap_common::{DbgapError, Result};
use serde::Deserialize;

const STUDY_PATH: &str = "GaPExchange.Studies.Study";

/// Root `<GaPExchange>` element
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct GapExchange {
    #[serde(rename = "Studies", default)]
    studies: Option<Studies>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
struct Studies {
    #[serde(rename = "Study", default)]
    study: Option<Study>,
}

/// `<Study accession="phs000123.v4.p5">`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Study {
    #[serde(rename = "@accession", alias = "accession", default)]
    accession: Option<String>,

    #[serde(rename = "Configuration", default)]
    configuration: Option<Configuration>,
}

/// `<Configuration>` block of a study
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Configuration {
    #[serde(rename = "StudyNameEntrez", default)]
    study_name_entrez: Option<String>,

    #[serde(rename = "StudyNameReportPage", default)]
    study_name_report_page: Option<String>,

    #[serde(rename = "StudyTypes", default)]
    study_types: Option<StudyTypes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
struct StudyTypes {
    #[serde(rename = "StudyType", default)]
    study_type: Vec<String>,
}

impl GapExchange {
    /// Parse GaPExchange XML text
    pub fn from_xml(xml: &str) -> Result<Self> {
        Ok(quick_xml::de::from_str(xml)?)
    }

    /// `GaPExchange.Studies.Study`
    pub fn study(&self) -> Result<&Study> {
        let studies = self
            .studies
            .as_ref()
            .ok_or_else(|| DbgapError::missing_field("GaPExchange.Studies"))?;

        studies
            .study
            .as_ref()
            .ok_or_else(|| DbgapError::missing_field(STUDY_PATH))
    }
}

impl Study {
    pub fn accession(&self) -> Result<&str> {
        self.accession
            .as_deref()
            .ok_or_else(|| missing("accession"))
    }

    pub fn configuration(&self) -> Result<&Configuration> {
        self.configuration
            .as_ref()
            .ok_or_else(|| missing("Configuration"))
    }
}

impl Configuration {
    /// Short study title used by Entrez
    pub fn study_name_entrez(&self) -> Result<&str> {
        self.study_name_entrez
            .as_deref()
            .ok_or_else(|| missing("Configuration.StudyNameEntrez"))
    }

    /// Long study name shown on the dbGaP report page
    pub fn study_name_report_page(&self) -> Result<&str> {
        self.study_name_report_page
            .as_deref()
            .ok_or_else(|| missing("Configuration.StudyNameReportPage"))
    }

    /// Every `<StudyType>` in document order
    pub fn study_types(&self) -> Result<&[String]> {
        match &self.study_types {
            Some(types) if !types.study_type.is_empty() => Ok(types.study_type.as_slice()),
            _ => Err(missing("Configuration.StudyTypes.StudyType")),
        }
    }
}

fn missing(field: &str) -> DbgapError {
    DbgapError::missing_field(format!("{}.{}", STUDY_PATH, field))
}
