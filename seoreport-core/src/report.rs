// Per-project report gathering and the run over all active projects

use crate::error::{ReportError, Result};
use crate::export::CsvExporter;
use crate::projects::{ReportSettings, active_projects};
use seoreport_api::{
    CrawlIssue, CrawlOverviewRecord, OptimizerApi, Project, RankingRecord, ReportClient,
    VisibilityRecord,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Callback for reporting run progress
pub type ReportProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Metric categories, one CSV file each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Visibility,
    Crawls,
    Rankings,
    Overview,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Visibility,
        Metric::Crawls,
        Metric::Rankings,
        Metric::Overview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Visibility => "visibility",
            Metric::Crawls => "crawls",
            Metric::Rankings => "rankings",
            Metric::Overview => "overview",
        }
    }
}

/// `<project-name>.<metric>`, with path separators in the name replaced
pub fn report_file_stem(project_name: &str, metric: Metric) -> String {
    let safe_name: String = project_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}.{}", safe_name, metric.as_str())
}

/// Everything fetched for one project
#[derive(Debug, Clone, Default)]
pub struct ProjectReport {
    pub visibility: Vec<VisibilityRecord>,
    pub crawls: Vec<CrawlIssue>,
    pub rankings: Vec<RankingRecord>,
    pub overview: Vec<CrawlOverviewRecord>,
}

impl ProjectReport {
    pub fn record_count(&self, metric: Metric) -> usize {
        match metric {
            Metric::Visibility => self.visibility.len(),
            Metric::Crawls => self.crawls.len(),
            Metric::Rankings => self.rankings.len(),
            Metric::Overview => self.overview.len(),
        }
    }

    /// Write one CSV per metric, returning the paths in `Metric::ALL` order
    pub fn write(&self, exporter: &CsvExporter, project_name: &str) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(Metric::ALL.len());
        for metric in Metric::ALL {
            let name = report_file_stem(project_name, metric);
            let path = match metric {
                Metric::Visibility => exporter.write_csv(&self.visibility, &name)?,
                Metric::Crawls => exporter.write_csv(&self.crawls, &name)?,
                Metric::Rankings => exporter.write_csv(&self.rankings, &name)?,
                Metric::Overview => exporter.write_csv(&self.overview, &name)?,
            };
            paths.push(path);
        }
        Ok(paths)
    }
}

fn notify(progress: Option<&ReportProgressCallback>, msg: String) {
    if let Some(callback) = progress {
        callback(msg);
    }
}

/// Fetch visibility, crawls, rankings and crawl history for one project, in that order
pub async fn gather_project_report(
    client: &ReportClient,
    project_name: &str,
    weeks_back: usize,
    progress: Option<&ReportProgressCallback>,
) -> Result<ProjectReport> {
    let visibility = client.fetch_visibility_history(weeks_back).await?;
    notify(progress, format!("Visibility fetched for {}", project_name));

    let crawls = client.fetch_all_crawls().await?;
    notify(progress, format!("Crawls fetched for {}", project_name));

    let rankings = client.fetch_all_rankings().await?;
    notify(progress, format!("Rankings fetched for {}", project_name));

    let overview = client.fetch_crawl_history().await?;
    notify(progress, format!("Crawl history fetched for {}", project_name));

    Ok(ProjectReport {
        visibility,
        crawls,
        rankings,
        overview,
    })
}

/// A project whose four CSV files were written
#[derive(Debug)]
pub struct ProjectOutcome {
    pub project: Project,
    pub files: Vec<PathBuf>,
}

/// A project that was skipped after an error
#[derive(Debug)]
pub struct ProjectFailure {
    pub project: Project,
    pub error: ReportError,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub total_projects: usize,
    pub excluded_projects: usize,
    pub completed: Vec<ProjectOutcome>,
    pub failed: Vec<ProjectFailure>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Generate reports for every active project.
///
/// Fails only when the project list cannot be fetched; a project whose
/// fetches or writes fail is recorded in `RunSummary::failed` and the run
/// moves on to the next one.
pub async fn execute_reports(
    api: &OptimizerApi,
    settings: &ReportSettings,
    progress: Option<ReportProgressCallback>,
) -> Result<RunSummary> {
    let progress = progress.as_ref();
    let projects = api.list_projects().await?;
    let active = active_projects(&projects, &settings.excluded);

    let mut summary = RunSummary {
        total_projects: projects.len(),
        excluded_projects: projects.len() - active.len(),
        ..Default::default()
    };

    notify(progress, format!("Found {} Optimizer projects.", summary.total_projects));
    notify(
        progress,
        format!("Skipping {} inactive Optimizer projects.", summary.excluded_projects),
    );
    notify(progress, format!("Found {} active Optimizer projects.", active.len()));

    let exporter = CsvExporter::new(&settings.out_dir);

    for project in active {
        notify(progress, format!("Starting with {}", project.name));

        match run_project(api, &exporter, &project, settings.weeks_back, progress).await {
            Ok(files) => {
                info!("Finished report for {} ({})", project.name, project.hash);
                notify(progress, format!("Finished with {}", project.name));
                summary.completed.push(ProjectOutcome { project, files });
            }
            Err(error) => {
                warn!("Skipping {} ({}): {}", project.name, project.hash, error);
                notify(progress, format!("[!] Skipping {}: {}", project.name, error));
                summary.failed.push(ProjectFailure { project, error });
            }
        }
    }

    Ok(summary)
}

async fn run_project(
    api: &OptimizerApi,
    exporter: &CsvExporter,
    project: &Project,
    weeks_back: usize,
    progress: Option<&ReportProgressCallback>,
) -> Result<Vec<PathBuf>> {
    let client = api.project(&project.hash);
    let report = gather_project_report(&client, &project.name, weeks_back, progress).await?;

    notify(progress, format!("Building CSVs for {}", project.name));
    report.write(exporter, &project.name)
}
