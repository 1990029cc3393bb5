//! Remote retrieval of dbGaP study files
//!
//! The [`StudyDownloader`] trait is the seam between the pipeline and the
//! archive. [`FtpDownloader`] and [`HttpDownloader`] talk to the real NCBI
//! server; tests substitute their own implementations.
//!
//! Transport failures are returned as-is. Nothing here retries or caches.

mod ftp;
mod http;

pub use ftp::{FtpDownloader, FtpEntry};
pub use http::HttpDownloader;

use crate::config::{DbgapConfig, Transport};
use crate::identifier::StudyIdentifier;
use async_trait::async_trait;
use dbgap_common::{DbgapError, Result};

/// Fetches files from a dbGaP archive
#[async_trait]
pub trait StudyDownloader: Send + Sync {
    /// Download the file at `path` (relative to the server root) as text
    async fn download(&self, path: &str) -> Result<String>;

    /// List the file names in directory `path`
    async fn list_files(&self, path: &str) -> Result<Vec<String>>;

    /// Human-readable server location, for logging
    fn location(&self) -> String;
}

/// Build the downloader selected by `config.transport`
pub fn downloader_for(config: &DbgapConfig) -> Result<Box<dyn StudyDownloader>> {
    Ok(match config.transport {
        Transport::Ftp => Box::new(FtpDownloader::from_config(config)),
        Transport::Http => Box::new(HttpDownloader::from_config(config)?),
    })
}

/// Substitute `{field}` placeholders in `template` with the identifier's values.
///
/// Recognised fields are `studyid`, `versionedid` and `fullid`.
pub fn resolve_template(template: &str, study: &StudyIdentifier) -> Result<String> {
    let mut resolved = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        resolved.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            DbgapError::Template(format!("unterminated placeholder in '{}'", template))
        })?;

        let field = &after[..close];
        let value = study.get(field).ok_or_else(|| {
            DbgapError::Template(format!("unknown placeholder '{{{}}}' in '{}'", field, template))
        })?;
        resolved.push_str(value);
        rest = &after[close + 1..];
    }

    resolved.push_str(rest);
    Ok(resolved)
}

/// Join a server base and a path with exactly one slash between them
pub(crate) fn join_path(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_all_fields() {
        let study = StudyIdentifier::new(123, 4, 5);
        let path = resolve_template("{studyid}/{versionedid}/{fullid}", &study).unwrap();
        assert_eq!(path, "phs000123/phs000123.v4/phs000123.v4.p5");
    }

    #[test]
    fn test_resolve_without_placeholders() {
        let study = StudyIdentifier::new(1, 1, 1);
        assert_eq!(resolve_template("/dbgap/README", &study).unwrap(), "/dbgap/README");
    }

    #[test]
    fn test_resolve_unknown_placeholder() {
        let study = StudyIdentifier::new(1, 1, 1);
        let err = resolve_template("/{studyid}/{pht}", &study).unwrap_err();
        assert!(matches!(err, DbgapError::Template(_)));
        assert!(err.to_string().contains("{pht}"));
    }

    #[test]
    fn test_resolve_unterminated_placeholder() {
        let study = StudyIdentifier::new(1, 1, 1);
        assert!(resolve_template("/{studyid", &study).is_err());
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("https://host/", "/a/b.xml"), "https://host/a/b.xml");
        assert_eq!(join_path("https://host", "a/b.xml"), "https://host/a/b.xml");
    }

    #[test]
    fn test_downloader_for_transport() {
        let config = DbgapConfig::default();
        assert_eq!(downloader_for(&config).unwrap().location(), "ftp://ftp.ncbi.nlm.nih.gov:21");

        let config = config.with_transport(Transport::Http);
        assert_eq!(downloader_for(&config).unwrap().location(), "https://ftp.ncbi.nlm.nih.gov");
    }
}
