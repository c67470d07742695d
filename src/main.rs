//! `ehr-report <record.json> [--out <dir>] [--config <config.json>] [--text]`
//!
//! Reads one patient record in the web client's JSON shape and writes
//! `patient_<id>_report.pdf` (or `.txt` with `--text`) into the output
//! directory, then prints the written path.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ehr_report::compositor::DOCUMENT_TITLE;
use ehr_report::config::{self, ReportConfig};
use ehr_report::{
    init_tracing, Clock, PatientReportInput, PdfCanvas, ReportCompositor, ReportError, TextCanvas,
};

#[derive(Debug, Parser)]
#[command(
    name = "ehr-report",
    version,
    about = "Lay a patient record out as a paginated medical report"
)]
struct Args {
    /// Patient record JSON file
    record: PathBuf,

    /// Output directory (defaults to the EHR exports directory)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Layout and locale configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write plain text instead of PDF
    #[arg(long)]
    text: bool,
}

impl Args {
    fn out_dir(&self) -> PathBuf {
        self.out.clone().unwrap_or_else(config::exports_dir)
    }
}

fn run(args: Args) -> Result<PathBuf, ReportError> {
    let report_config = match &args.config {
        Some(path) => ReportConfig::from_json_file(path)?,
        None => ReportConfig::default(),
    };
    let compositor = ReportCompositor::from_config(&report_config)?;

    let raw = std::fs::read_to_string(&args.record)?;
    let input: PatientReportInput = serde_json::from_str(&raw)?;

    if args.text {
        compositor.export(&input, TextCanvas::new(), &args.out_dir())
    } else {
        let canvas = PdfCanvas::new(DOCUMENT_TITLE, compositor.layout())?
            .with_timestamp(compositor.clock().now())?;
        compositor.export(&input, canvas, &args.out_dir())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    match run(args) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Report export failed: {e}");
            ExitCode::FAILURE
        }
    }
}
