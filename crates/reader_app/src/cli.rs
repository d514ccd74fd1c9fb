use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use reader_engine::ServiceSettings;

use crate::platform::logging::LogDestination;
use crate::platform::AppOptions;

/// Aztec Reader - submit PDFs for barcode extraction and follow the jobs
#[derive(Parser, Debug)]
#[command(name = "aztec_reader")]
#[command(version)]
#[command(
    about = "Upload PDFs to the extraction service and follow the jobs",
    long_about = None
)]
pub struct Cli {
    /// PDF files to queue; uploaded right away unless --no-upload is given
    pub files: Vec<PathBuf>,

    /// Extraction service base URL
    #[arg(short = 's', long = "server", default_value = "http://127.0.0.1:8000")]
    pub server: String,

    /// Report Aztec codes only
    #[arg(long = "only-aztec")]
    pub only_aztec: bool,

    /// Queue the files without submitting them (use the `upload` command)
    #[arg(long = "no-upload")]
    pub no_upload: bool,

    /// Write accumulated results here on exit (.json for JSON, CSV otherwise)
    #[arg(long = "export")]
    pub export: Option<PathBuf>,

    /// Where log output goes
    #[arg(long = "log", value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Debug-level logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn into_options(self) -> AppOptions {
        AppOptions {
            settings: ServiceSettings {
                base_url: self.server,
                ..ServiceSettings::default()
            },
            auto_upload: !self.no_upload && !self.files.is_empty(),
            files: self.files,
            only_aztec: self.only_aztec,
            export_on_exit: self.export,
        }
    }
}
