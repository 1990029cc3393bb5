//! dbGaP study identifiers
//!
//! A study is addressed by three numbers: the study id, the study version and
//! the participant set. They render as `phs000123`, `phs000123.v4` and
//! `phs000123.v4.p5`.

use dbgap_common::{DbgapError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Accession prefix for dbGaP studies
pub const STUDY_PREFIX: &str = "phs";

/// Field names exposed by [`StudyIdentifier::identifiers`]
pub const STUDYID: &str = "studyid";
pub const VERSIONEDID: &str = "versionedid";
pub const FULLID: &str = "fullid";

/// The three string forms of a dbGaP study identifier.
///
/// All forms are computed once in [`StudyIdentifier::new`]. The id is padded
/// to a minimum of six digits; ids of 1,000,000 or more are not rejected and
/// simply render wider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StudyIdentifier {
    studyid: String,
    versionedid: String,
    fullid: String,
}

impl StudyIdentifier {
    pub fn new(id: u32, version: u32, participant_set: u32) -> Self {
        let studyid = format!("{}{:06}", STUDY_PREFIX, id);
        let versionedid = format!("{}.v{}", studyid, version);
        let fullid = format!("{}.p{}", versionedid, participant_set);

        Self {
            studyid,
            versionedid,
            fullid,
        }
    }

    /// `phs` + zero padded id, e.g. `phs000123`
    pub fn studyid(&self) -> &str {
        &self.studyid
    }

    /// Study id plus version, e.g. `phs000123.v4`
    pub fn versionedid(&self) -> &str {
        &self.versionedid
    }

    /// Versioned id plus participant set, e.g. `phs000123.v4.p5`
    pub fn fullid(&self) -> &str {
        &self.fullid
    }

    /// Field name to value view, used as template substitution parameters
    pub fn identifiers(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            (STUDYID, self.studyid.as_str()),
            (VERSIONEDID, self.versionedid.as_str()),
            (FULLID, self.fullid.as_str()),
        ])
    }

    /// Look up a single field by name
    pub fn get(&self, field: &str) -> Option<&str> {
        match field {
            STUDYID => Some(self.studyid.as_str()),
            VERSIONEDID => Some(self.versionedid.as_str()),
            FULLID => Some(self.fullid.as_str()),
            _ => None,
        }
    }

    /// Parse a full accession such as `phs000123.v4.p5`
    pub fn parse(accession: &str) -> Result<Self> {
        let invalid = || {
            DbgapError::InvalidIdentifier(format!(
                "'{}' (expected phsNNNNNN.vN.pN)",
                accession
            ))
        };

        let rest = accession.trim().strip_prefix(STUDY_PREFIX).ok_or_else(invalid)?;
        let (id, rest) = rest.split_once(".v").ok_or_else(invalid)?;
        let (version, participant_set) = rest.split_once(".p").ok_or_else(invalid)?;

        let number = |part: &str| -> Result<u32> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };

        Ok(Self::new(number(id)?, number(version)?, number(participant_set)?))
    }
}

impl fmt::Display for StudyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fullid)
    }
}

impl FromStr for StudyIdentifier {
    type Err = DbgapError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}
