//! dbGaP Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Retrieves dbGaP study records and converts them to biocaddie documents.
//!
//! # Pipeline
//!
//! 1. [`StudyIdentifier`] builds `phs000123`, `phs000123.v4` and
//!    `phs000123.v4.p5` from three numbers
//! 2. A [`StudyDownloader`] fetches `GapExchange_<fullid>.xml` from the
//!    archive (FTP or HTTPS)
//! 3. [`GapExchange`] parses the XML
//! 4. [`biocaddie_study`] maps it onto the biocaddie `Study` schema
//!
//! # Example
//!
//! ```no_run
//! use dbgap_ingest::{downloader_for, ingest_study, DbgapConfig, StudyIdentifier};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DbgapConfig::from_env()?;
//!     let downloader = downloader_for(&config)?;
//!     let study = StudyIdentifier::new(7, 32, 13);
//!
//!     let document = ingest_study(&study, &["pht000009.v2"], &config, downloader.as_ref()).await?;
//!     println!("{}", document.to_json_pretty()?);
//!     Ok(())
//! }
//! ```

pub mod biocaddie;
pub mod config;
pub mod exchange;
pub mod fetch;
pub mod identifier;
pub mod phenotype;
pub mod study;

pub use biocaddie::{biocaddie_study, BiocaddieStudy, IdentifierInfo};
pub use config::{DbgapConfig, Transport};
pub use exchange::GapExchange;
pub use fetch::{downloader_for, resolve_template, FtpDownloader, HttpDownloader, StudyDownloader};
pub use identifier::StudyIdentifier;
pub use phenotype::{discover_pht_entries, extract_pht_entries};
pub use study::{get_study_information, ingest_study, transform_exchange};
