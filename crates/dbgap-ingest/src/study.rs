//! Fetch-and-transform pipeline for a single study

use crate::biocaddie::{biocaddie_study, BiocaddieStudy};
use crate::config::DbgapConfig;
use crate::exchange::GapExchange;
use crate::fetch::StudyDownloader;
use crate::identifier::StudyIdentifier;
use dbgap_common::Result;
use tracing::{debug, info, instrument};

/// Download the raw GaPExchange record for `study`
#[instrument(skip_all, fields(study = %study))]
pub async fn get_study_information(
    study: &StudyIdentifier,
    config: &DbgapConfig,
    downloader: &dyn StudyDownloader,
) -> Result<String> {
    let path = config.study_file_path(study)?;
    info!(server = %downloader.location(), path = %path, "Fetching GaPExchange record");

    downloader.download(&path).await
}

/// Parse GaPExchange XML and map it to a biocaddie document
pub fn transform_exchange<S: AsRef<str>>(
    xml: &str,
    pht_entries: &[S],
    prefix: &str,
) -> Result<BiocaddieStudy> {
    let raw = GapExchange::from_xml(xml)?;
    debug!(bytes = xml.len(), "Parsed GaPExchange record");
    biocaddie_study(&raw, pht_entries, prefix)
}

/// Fetch the record for `study` and return its biocaddie document
pub async fn ingest_study<S: AsRef<str>>(
    study: &StudyIdentifier,
    pht_entries: &[S],
    config: &DbgapConfig,
    downloader: &dyn StudyDownloader,
) -> Result<BiocaddieStudy> {
    let xml = get_study_information(study, config, downloader).await?;
    let document = transform_exchange(&xml, pht_entries, &config.dbgap_prefix)?;

    info!(
        study = %study,
        results = document.results_in().len(),
        "Mapped study to biocaddie"
    );
    Ok(document)
}
