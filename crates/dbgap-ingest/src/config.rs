//! dbGaP data source configuration

use crate::fetch::resolve_template;
use crate::identifier::StudyIdentifier;
use dbgap_common::{DbgapError, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Configuration Constants
// ============================================================================

/// NCBI host serving the dbGaP study tree over both FTP and HTTPS.
pub const DEFAULT_FTP_HOST: &str = "ftp.ncbi.nlm.nih.gov";

pub const DEFAULT_FTP_PORT: u16 = 21;

pub const DEFAULT_FTP_USERNAME: &str = "anonymous";

pub const DEFAULT_FTP_PASSWORD: &str = "anonymous";

pub const DEFAULT_HTTP_BASE_URL: &str = "https://ftp.ncbi.nlm.nih.gov";

/// Location of the GaPExchange record relative to the server root.
pub const DEFAULT_STUDY_FILE_TEMPLATE: &str =
    "/dbgap/studies/{studyid}/{fullid}/GapExchange_{fullid}.xml";

/// Directory holding the per-table phenotype variable summaries.
pub const DEFAULT_PHENO_DIR_TEMPLATE: &str =
    "/dbgap/studies/{studyid}/{fullid}/pheno_variable_summaries";

/// Prefix applied to every identifier written to the biocaddie document.
pub const DEFAULT_DBGAP_PREFIX: &str = "dbgap:";

pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 300;

/// Transport used to reach the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Ftp,
    Http,
}

impl std::str::FromStr for Transport {
    type Err = DbgapError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ftp" => Ok(Transport::Ftp),
            "http" | "https" => Ok(Transport::Http),
            _ => Err(DbgapError::config(format!("Invalid transport: {}", s))),
        }
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Ftp => f.write_str("ftp"),
            Transport::Http => f.write_str("http"),
        }
    }
}

/// Configuration for retrieving and mapping dbGaP study records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbgapConfig {
    pub transport: Transport,
    /// FTP server hostname
    pub ftp_host: String,
    pub ftp_port: u16,
    pub ftp_username: String,
    pub ftp_password: String,
    /// Base URL used when `transport` is HTTP
    pub http_base_url: String,
    /// Path of the GaPExchange file, with `{studyid}`, `{versionedid}` and
    /// `{fullid}` placeholders
    pub study_file_template: String,
    /// Directory listed to discover pht entries
    pub pheno_dir_template: String,
    pub dbgap_prefix: String,
    pub connection_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for DbgapConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Ftp,
            ftp_host: DEFAULT_FTP_HOST.to_string(),
            ftp_port: DEFAULT_FTP_PORT,
            ftp_username: DEFAULT_FTP_USERNAME.to_string(),
            ftp_password: DEFAULT_FTP_PASSWORD.to_string(),
            http_base_url: DEFAULT_HTTP_BASE_URL.to_string(),
            study_file_template: DEFAULT_STUDY_FILE_TEMPLATE.to_string(),
            pheno_dir_template: DEFAULT_PHENO_DIR_TEMPLATE.to_string(),
            dbgap_prefix: DEFAULT_DBGAP_PREFIX.to_string(),
            connection_timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}

impl DbgapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from `.env` and the process environment.
    ///
    /// Environment variables (all optional):
    /// - `DBGAP_TRANSPORT`: ftp or http
    /// - `DBGAP_FTP_HOST`, `DBGAP_FTP_PORT`, `DBGAP_FTP_USERNAME`, `DBGAP_FTP_PASSWORD`
    /// - `DBGAP_HTTP_BASE_URL`
    /// - `DBGAP_STUDY_FILE_TEMPLATE`, `DBGAP_PHENO_DIR_TEMPLATE`
    /// - `DBGAP_PREFIX`
    /// - `DBGAP_CONNECT_TIMEOUT`, `DBGAP_READ_TIMEOUT` (seconds)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(transport) = lookup("DBGAP_TRANSPORT") {
            config.transport = transport.parse()?;
        }
        if let Some(host) = lookup("DBGAP_FTP_HOST") {
            config.ftp_host = host;
        }
        if let Some(port) = lookup("DBGAP_FTP_PORT") {
            config.ftp_port = parse_number("DBGAP_FTP_PORT", &port)?;
        }
        if let Some(username) = lookup("DBGAP_FTP_USERNAME") {
            config.ftp_username = username;
        }
        if let Some(password) = lookup("DBGAP_FTP_PASSWORD") {
            config.ftp_password = password;
        }
        if let Some(url) = lookup("DBGAP_HTTP_BASE_URL") {
            config.http_base_url = url;
        }
        if let Some(template) = lookup("DBGAP_STUDY_FILE_TEMPLATE") {
            config.study_file_template = template;
        }
        if let Some(template) = lookup("DBGAP_PHENO_DIR_TEMPLATE") {
            config.pheno_dir_template = template;
        }
        if let Some(prefix) = lookup("DBGAP_PREFIX") {
            config.dbgap_prefix = prefix;
        }
        if let Some(secs) = lookup("DBGAP_CONNECT_TIMEOUT") {
            config.connection_timeout_secs = parse_number("DBGAP_CONNECT_TIMEOUT", &secs)?;
        }
        if let Some(secs) = lookup("DBGAP_READ_TIMEOUT") {
            config.read_timeout_secs = parse_number("DBGAP_READ_TIMEOUT", &secs)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_ftp_host(mut self, host: impl Into<String>) -> Self {
        self.ftp_host = host.into();
        self
    }

    pub fn with_http_base_url(mut self, url: impl Into<String>) -> Self {
        self.http_base_url = url.into();
        self
    }

    pub fn with_study_file_template(mut self, template: impl Into<String>) -> Self {
        self.study_file_template = template.into();
        self
    }

    pub fn with_dbgap_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dbgap_prefix = prefix.into();
        self
    }

    pub fn with_read_timeout(mut self, timeout_secs: u64) -> Self {
        self.read_timeout_secs = timeout_secs;
        self
    }

    /// Resolved path of the GaPExchange file for `study`
    pub fn study_file_path(&self, study: &StudyIdentifier) -> Result<String> {
        resolve_template(&self.study_file_template, study)
    }

    /// Resolved phenotype summary directory for `study`
    pub fn pheno_dir_path(&self, study: &StudyIdentifier) -> Result<String> {
        resolve_template(&self.pheno_dir_template, study)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.ftp_host.is_empty() {
            return Err(DbgapError::config("FTP host cannot be empty"));
        }

        if self.ftp_port == 0 {
            return Err(DbgapError::config("FTP port must be greater than 0"));
        }

        if !(self.http_base_url.starts_with("http://") || self.http_base_url.starts_with("https://"))
        {
            return Err(DbgapError::config(format!(
                "HTTP base URL must start with http:// or https://, got '{}'",
                self.http_base_url
            )));
        }

        if self.connection_timeout_secs == 0 || self.read_timeout_secs == 0 {
            return Err(DbgapError::config("Timeouts must be greater than 0"));
        }

        // Catch unknown placeholders before anything touches the network
        let probe = StudyIdentifier::new(0, 0, 0);
        for (name, template) in [
            ("study file template", &self.study_file_template),
            ("pheno dir template", &self.pheno_dir_template),
        ] {
            if template.is_empty() {
                return Err(DbgapError::config(format!("{} cannot be empty", name)));
            }
            resolve_template(template, &probe)
                .map_err(|e| DbgapError::config(format!("Invalid {}: {}", name, e)))?;
        }

        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DbgapError::config(format!("{} must be a number, got '{}'", key, value)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = DbgapConfig::default();
        assert_eq!(config.transport, Transport::Ftp);
        assert_eq!(config.ftp_host, "ftp.ncbi.nlm.nih.gov");
        assert_eq!(config.ftp_port, 21);
        assert_eq!(config.dbgap_prefix, "dbgap:");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_study_file_path() {
        let config = DbgapConfig::default();
        let path = config.study_file_path(&StudyIdentifier::new(123, 4, 5)).unwrap();
        assert_eq!(
            path,
            "/dbgap/studies/phs000123/phs000123.v4.p5/GapExchange_phs000123.v4.p5.xml"
        );
    }

    #[test]
    fn test_pheno_dir_path() {
        let config = DbgapConfig::default();
        let path = config.pheno_dir_path(&StudyIdentifier::new(7, 32, 13)).unwrap();
        assert_eq!(path, "/dbgap/studies/phs000007/phs000007.v32.p13/pheno_variable_summaries");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = DbgapConfig::from_lookup(lookup(&[
            ("DBGAP_TRANSPORT", "https"),
            ("DBGAP_HTTP_BASE_URL", "http://localhost:9000"),
            ("DBGAP_PREFIX", "https://www.ncbi.nlm.nih.gov/gap/"),
            ("DBGAP_READ_TIMEOUT", "60"),
        ]))
        .unwrap();

        assert_eq!(config.transport, Transport::Http);
        assert_eq!(config.http_base_url, "http://localhost:9000");
        assert_eq!(config.dbgap_prefix, "https://www.ncbi.nlm.nih.gov/gap/");
        assert_eq!(config.read_timeout_secs, 60);
        assert_eq!(config.ftp_host, DEFAULT_FTP_HOST);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(DbgapConfig::from_lookup(lookup(&[("DBGAP_FTP_PORT", "twenty-one")])).is_err());
        assert!(DbgapConfig::from_lookup(lookup(&[("DBGAP_TRANSPORT", "gopher")])).is_err());
        assert!(DbgapConfig::from_lookup(lookup(&[("DBGAP_READ_TIMEOUT", "0")])).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_placeholder() {
        let config = DbgapConfig::default().with_study_file_template("/studies/{accession}.xml");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("study file template"));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let config = DbgapConfig::default().with_http_base_url("ftp.ncbi.nlm.nih.gov");
        assert!(config.validate().is_err());
    }
}
