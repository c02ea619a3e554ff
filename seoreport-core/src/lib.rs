pub mod error;
pub mod export;
pub mod projects;
pub mod report;

pub use error::ReportError;
pub use export::CsvExporter;
pub use projects::{ReportSettings, active_projects};
pub use report::{
    Metric, ProjectReport, ReportProgressCallback, RunSummary, execute_reports,
    gather_project_report,
};
