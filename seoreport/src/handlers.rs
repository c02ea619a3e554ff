use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use seoreport_api::{ApiConfig, OptimizerApi, Project};
use seoreport_core::projects::{ReportSettings, active_projects, default_exclusions};
use seoreport_core::{ReportProgressCallback, RunSummary, execute_reports};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

/// Build the API configuration from the global options
pub fn api_config_from_args(args: &ArgMatches) -> Result<ApiConfig> {
    let api_key = args
        .get_one::<String>("api-key")
        .map(|key| key.trim())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| anyhow!("No API key given: set API_KEY or pass --api-key"))?;

    let mut config = ApiConfig::new(api_key);
    if let Some(base_url) = args.get_one::<String>("base-url") {
        config = config.with_base_url(base_url)?;
    }
    if let Some(delay_ms) = args.get_one::<u64>("delay-ms") {
        config = config.with_request_delay(Duration::from_millis(*delay_ms));
    }
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        config = config.with_timeout(*timeout);
    }
    debug!("API settings: {:?}", config);
    Ok(config)
}

/// `--include-all` clears the list, `--exclude` replaces it, otherwise the built-in list
pub fn exclusions_from_args(args: &ArgMatches) -> HashSet<String> {
    if args.get_flag("include-all") {
        return HashSet::new();
    }

    match args.get_many::<String>("exclude") {
        Some(hashes) => hashes.cloned().collect(),
        None => default_exclusions(),
    }
}

pub fn report_settings_from_args(args: &ArgMatches) -> ReportSettings {
    let defaults = ReportSettings::default();

    let out_dir = args
        .get_one::<String>("out-dir")
        .map(|dir| PathBuf::from(shellexpand::tilde(dir).as_ref()))
        .unwrap_or(defaults.out_dir);
    let weeks_back = args
        .get_one::<usize>("weeks")
        .copied()
        .unwrap_or(defaults.weeks_back);

    ReportSettings {
        out_dir,
        weeks_back,
        excluded: exclusions_from_args(args),
    }
}

/// One line per project: hash, then name
pub fn format_project_list(projects: &[Project]) -> String {
    let width = projects.iter().map(|p| p.hash.len()).max().unwrap_or(0);
    let mut list = String::new();
    for project in projects {
        list.push_str(&format!("  {:<width$}  {}\n", project.hash, project.name, width = width));
    }
    list
}

pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut report = String::new();
    let attempted = summary.completed.len() + summary.failed.len();

    report.push_str(&format!(
        "Projects: {} found, {} excluded, {} processed\n\n",
        summary.total_projects, summary.excluded_projects, attempted
    ));

    for outcome in &summary.completed {
        report.push_str(&format!(
            "{} {} ({} files)\n",
            "✓".green().bold(),
            outcome.project.name,
            outcome.files.len()
        ));
    }
    for failure in &summary.failed {
        report.push_str(&format!(
            "{} {} ({}): {}\n",
            "✗".red().bold(),
            failure.project.name,
            failure.project.hash,
            failure.error
        ));
    }

    if !summary.failed.is_empty() {
        report.push_str(&format!(
            "\n{} of {} projects failed\n",
            summary.failed.len(),
            attempted
        ));
    }
    report
}

fn progress_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub async fn handle_run(args: &ArgMatches) -> Result<()> {
    let quiet = args.get_flag("quiet");
    let api = OptimizerApi::new(api_config_from_args(args)?)?;
    let settings = report_settings_from_args(args);
    debug!("Report settings: {:?}", settings);

    if !quiet {
        print_divider();
        println!("{}", "  SEO REPORT EXPORT".bright_white().bold());
        print_divider();
        println!(
            "{} Output: {}",
            "→".blue(),
            settings.out_dir.display().to_string().bright_white()
        );
        println!(
            "{} Visibility: most recent Monday + {} weeks",
            "→".blue(),
            settings.weeks_back
        );
        println!();
    }

    let spinner = (!quiet).then(progress_spinner);
    let progress: Option<ReportProgressCallback> = spinner.clone().map(|pb| {
        let callback: ReportProgressCallback = Arc::new(move |msg: String| {
            pb.println(format!("  {} {}", "•".cyan(), msg));
            pb.set_message(msg);
        });
        callback
    });

    let result = execute_reports(&api, &settings, progress).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let summary = result.context("Could not list Optimizer projects")?;

    if !quiet {
        println!();
        print!("{}", format_run_summary(&summary));
    }

    if summary.is_success() {
        if !quiet {
            println!("\n{} All reports successfully generated.", "✓".green().bold());
        }
        Ok(())
    } else {
        bail!(
            "{} of {} projects failed",
            summary.failed.len(),
            summary.completed.len() + summary.failed.len()
        )
    }
}

pub async fn handle_projects(args: &ArgMatches) -> Result<()> {
    let api = OptimizerApi::new(api_config_from_args(args)?)?;
    let excluded = exclusions_from_args(args);

    let projects = api
        .list_projects()
        .await
        .context("Could not list Optimizer projects")?;
    let active = active_projects(&projects, &excluded);

    println!("Found {} Optimizer projects.", projects.len());
    println!("Found {} active Optimizer projects.\n", active.len());
    print!("{}", format_project_list(&active));
    Ok(())
}

pub async fn handle_keywords(args: &ArgMatches) -> Result<()> {
    let api = OptimizerApi::new(api_config_from_args(args)?)?;
    let hash = args
        .get_one::<String>("project")
        .ok_or_else(|| anyhow!("--project is required"))?;

    let keywords = api
        .project(hash.as_str())
        .fetch_keywords()
        .await
        .with_context(|| format!("Could not fetch keywords for {}", hash))?;

    for keyword in keywords {
        println!("{}", keyword);
    }
    Ok(())
}
