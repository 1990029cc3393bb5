//! End-to-end pipeline tests against an in-memory archive

mod common;

use common::{InMemoryDownloader, EXAMPLE_PATH, EXAMPLE_RECORD};
use dbgap_common::DbgapError;
use dbgap_ingest::{
    discover_pht_entries, get_study_information, ingest_study, DbgapConfig, StudyIdentifier,
};
use serde_json::json;

#[tokio::test]
async fn test_get_study_information_resolves_template() {
    let downloader = InMemoryDownloader::new().with_file(EXAMPLE_PATH, EXAMPLE_RECORD);
    let study = StudyIdentifier::new(123, 4, 5);

    let xml = get_study_information(&study, &DbgapConfig::default(), &downloader)
        .await
        .unwrap();

    assert_eq!(xml, EXAMPLE_RECORD);
    assert_eq!(downloader.requests(), vec![EXAMPLE_PATH]);
}

#[tokio::test]
async fn test_ingest_example_study() {
    let downloader = InMemoryDownloader::new().with_file(EXAMPLE_PATH, EXAMPLE_RECORD);
    let study = StudyIdentifier::new(123, 4, 5);

    let document = ingest_study(
        &study,
        &["pht000111", "pht000112"],
        &DbgapConfig::default(),
        &downloader,
    )
    .await
    .unwrap();

    assert_eq!(
        serde_json::to_value(&document).unwrap(),
        json!({
            "@type": "Study",
            "identifierInfo": [{"identifier": "dbgap:phs000123.v4.p5", "identifierScheme": "dbGaP"}],
            "title": "Example Study",
            "description": "An example.",
            "study_types": ["Case Set"],
            "resultsIn": ["dbgap:pht000111", "dbgap:pht000112"]
        })
    );
}

#[tokio::test]
async fn test_configured_prefix_and_template() {
    let downloader =
        InMemoryDownloader::new().with_file("mirror/phs000123.v4/record.xml", EXAMPLE_RECORD);
    let config = DbgapConfig::default()
        .with_study_file_template("mirror/{versionedid}/record.xml")
        .with_dbgap_prefix("https://identifiers.org/dbgap:");

    let document = ingest_study(&StudyIdentifier::new(123, 4, 5), &["pht000111"], &config, &downloader)
        .await
        .unwrap();

    assert_eq!(
        document.identifier_info()[0].identifier(),
        "https://identifiers.org/dbgap:phs000123.v4.p5"
    );
    assert_eq!(document.results_in(), ["https://identifiers.org/dbgap:pht000111"]);
}

#[tokio::test]
async fn test_transport_error_propagates() {
    let downloader = InMemoryDownloader::new();
    let study = StudyIdentifier::new(999, 1, 1);

    let err = ingest_study::<&str>(&study, &[], &DbgapConfig::default(), &downloader)
        .await
        .unwrap_err();

    assert!(matches!(err, DbgapError::Network(ref msg) if msg.contains("phs000999.v1.p1")));
}

#[tokio::test]
async fn test_missing_field_fails_without_output() {
    let record = EXAMPLE_RECORD.replace("<StudyNameEntrez>Example Study</StudyNameEntrez>", "");
    let downloader = InMemoryDownloader::new().with_file(EXAMPLE_PATH, &record);

    let err = ingest_study(
        &StudyIdentifier::new(123, 4, 5),
        &["pht000111"],
        &DbgapConfig::default(),
        &downloader,
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Missing field: GaPExchange.Studies.Study.Configuration.StudyNameEntrez"
    );
}

#[tokio::test]
async fn test_discover_pht_entries() {
    let dir = "/dbgap/studies/phs000123/phs000123.v4.p5/pheno_variable_summaries";
    let downloader = InMemoryDownloader::new().with_listing(
        dir,
        &[
            "phs000123.v4.pht000112.v1.p5.Subject_var_report.xml",
            "phs000123.v4.pht000111.v2.p5.Pedigree_var_report.xml",
            "phs000123.v4_study_report.xml",
        ],
    );

    let entries = discover_pht_entries(&StudyIdentifier::new(123, 4, 5), &DbgapConfig::default(), &downloader)
        .await
        .unwrap();

    assert_eq!(entries, vec!["pht000111.v2", "pht000112.v1"]);
    assert_eq!(downloader.requests(), vec![dir]);
}
