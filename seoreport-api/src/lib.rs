pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod model;
mod response;
pub mod schedule;

pub use client::{OptimizerApi, ReportClient};
pub use config::ApiConfig;
pub use endpoint::Endpoint;
pub use error::ApiError;
pub use model::{
    CrawlIssue, CrawlOverviewRecord, Position, Project, RankingPage, RankingRecord,
    VisibilityEntry, VisibilityRecord,
};
