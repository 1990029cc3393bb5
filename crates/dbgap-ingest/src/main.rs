//! dbGaP Ingest - fetch a study record and emit its biocaddie document

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dbgap_common::logging::{init_logging, LogConfig, LogLevel};
use dbgap_ingest::{
    discover_pht_entries, downloader_for, ingest_study, transform_exchange, BiocaddieStudy,
    DbgapConfig, StudyIdentifier, Transport,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "dbgap-ingest")]
#[command(author, version, about = "dbGaP study to biocaddie converter")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a study's GaPExchange record and print the biocaddie document
    Study {
        #[command(flatten)]
        study: StudyArgs,

        /// Phenotype table accession to list in resultsIn (repeatable)
        #[arg(long = "pht", value_delimiter = ',')]
        pht_entries: Vec<String>,

        /// Discover pht accessions from the study's pheno_variable_summaries directory
        #[arg(long, conflicts_with = "input")]
        discover_pht: bool,

        /// Read GaPExchange XML from a local file instead of the archive
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write the document to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,

        /// Override DBGAP_TRANSPORT (ftp or http)
        #[arg(long)]
        transport: Option<Transport>,
    },

    /// Print the archive path of a study's GaPExchange record
    Path {
        #[command(flatten)]
        study: StudyArgs,
    },
}

#[derive(Args, Debug)]
struct StudyArgs {
    /// Full study accession, e.g. phs000007.v32.p13
    #[arg(long, conflicts_with_all = ["id", "study_version", "participant_set"])]
    accession: Option<StudyIdentifier>,

    /// Numeric study id (phs number)
    #[arg(long, required_unless_present = "accession", requires_all = ["study_version", "participant_set"])]
    id: Option<u32>,

    /// Study version (the vN part)
    #[arg(long = "study-version", requires = "id")]
    study_version: Option<u32>,

    /// Participant set (the pN part)
    #[arg(long, requires = "id")]
    participant_set: Option<u32>,
}

impl StudyArgs {
    fn identifier(self) -> Result<StudyIdentifier> {
        if let Some(accession) = self.accession {
            return Ok(accession);
        }

        match (self.id, self.study_version, self.participant_set) {
            (Some(id), Some(version), Some(pset)) => Ok(StudyIdentifier::new(id, version, pset)),
            _ => anyhow::bail!("Either --accession or all of --id, --study-version and --participant-set are required"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("dbgap-ingest")
        .build()
        .merge_env()?;

    let _log_guard = init_logging(&log_config)?;

    let config = DbgapConfig::from_env().context("Failed to load dbGaP configuration")?;

    match cli.command {
        Command::Study {
            study,
            pht_entries,
            discover_pht,
            input,
            output,
            compact,
            transport,
        } => {
            let study = study.identifier()?;
            let config = match transport {
                Some(transport) => config.with_transport(transport),
                None => config,
            };

            let document = match input {
                Some(path) => {
                    info!(input = %path.display(), "Reading GaPExchange record from file");
                    let xml = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    let document = transform_exchange(&xml, &pht_entries, &config.dbgap_prefix)?;
                    if !document.describes(&study) {
                        warn!(
                            study = %study,
                            identifier = document.identifier_info().first().map(|i| i.identifier()).unwrap_or_default(),
                            "Record in {} does not match the requested study",
                            path.display()
                        );
                    }
                    document
                },
                None => {
                    let downloader = downloader_for(&config)?;
                    let mut pht_entries = pht_entries;
                    if discover_pht {
                        for pht in discover_pht_entries(&study, &config, downloader.as_ref()).await? {
                            if !pht_entries.contains(&pht) {
                                pht_entries.push(pht);
                            }
                        }
                    }
                    ingest_study(&study, &pht_entries, &config, downloader.as_ref())
                        .await
                        .with_context(|| format!("Failed to ingest {}", study))?
                },
            };

            write_document(&document, output.as_deref(), compact)?;
        },
        Command::Path { study } => {
            let study = study.identifier()?;
            let path = config.study_file_path(&study)?;
            writeln!(std::io::stdout(), "{}", path)?;
        },
    }

    Ok(())
}

fn write_document(document: &BiocaddieStudy, output: Option<&std::path::Path>, compact: bool) -> Result<()> {
    let json = if compact {
        document.to_json()?
    } else {
        document.to_json_pretty()?
    };

    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(output = %path.display(), "Wrote biocaddie document");
        },
        None => writeln!(std::io::stdout(), "{}", json)?,
    }

    Ok(())
}
