pub mod canvas;
pub mod clinical;
pub mod compositor;
pub mod config;
pub mod datetime;
pub mod error;
pub mod models;
pub mod validation;

pub use canvas::{PageCanvas, PdfCanvas, TextCanvas};
pub use compositor::{export_pdf_report, report_filename, LayoutSummary, ReportCompositor};
pub use datetime::{Clock, DateFormatter, FieldText, FixedClock, LocaleFormatter, SystemClock};
pub use error::ReportError;
pub use models::PatientReportInput;

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` wins over the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} report exporter v{}", config::APP_NAME, config::APP_VERSION);
}
