use seoreport_api::Project;
use std::collections::HashSet;
use std::path::PathBuf;

/// Projects that are no longer maintained and are skipped unless overridden
pub const DEFAULT_INACTIVE_PROJECTS: [&str; 4] = [
    "KTqxfedTXmGHCuXA",
    "NhzfBbbxLTkuWG8N",
    "nCJxwpS2BRFUrCJN",
    "JeqTHyFMCSqCf2La",
];

pub const DEFAULT_OUT_DIR: &str = "./out";

pub const DEFAULT_WEEKS_BACK: usize = 10;

/// Upper bound for `--weeks`: ten years of weekly samples
pub const MAX_WEEKS_BACK: u64 = 520;

/// Options for a report run
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub out_dir: PathBuf,
    pub weeks_back: usize,
    pub excluded: HashSet<String>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            weeks_back: DEFAULT_WEEKS_BACK,
            excluded: default_exclusions(),
        }
    }
}

pub fn default_exclusions() -> HashSet<String> {
    DEFAULT_INACTIVE_PROJECTS
        .iter()
        .map(|hash| hash.to_string())
        .collect()
}

/// Projects whose hash is not excluded, in API order
pub fn active_projects(projects: &[Project], excluded: &HashSet<String>) -> Vec<Project> {
    projects
        .iter()
        .filter(|project| !excluded.contains(&project.hash))
        .cloned()
        .collect()
}
