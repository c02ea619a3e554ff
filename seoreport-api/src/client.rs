use crate::config::ApiConfig;
use crate::endpoint::Endpoint;
use crate::error::{ApiError, Result};
use crate::model::{
    CrawlIssue, CrawlOverviewRecord, MERGED_URL_PLACEHOLDER, PAGE_URL_PLACEHOLDER, Project,
    RankingPage, RankingRecord, VisibilityEntry, VisibilityRecord, normalize_blank_urls,
};
use crate::response::{
    CrawlIssuesAnswer, CrawlOverviewAnswer, Envelope, ProjectsAnswer, RankingsAnswer,
    VisibilityAnswer,
};
use crate::schedule::mondays_back;
use chrono::{Local, NaiveDate};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Rankings are served in pages of this many records
pub const RANKINGS_PAGE_SIZE: u64 = 100;

/// Offset of the second rankings page; later pages follow every `RANKINGS_PAGE_SIZE`
pub const RANKINGS_FIRST_PAGE_OFFSET: u64 = 101;

type Params = Vec<(&'static str, String)>;

/// Shared handle on the Optimizer API. Cheap to clone.
#[derive(Clone)]
pub struct OptimizerApi {
    client: Client,
    config: Arc<ApiConfig>,
}

impl OptimizerApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("seoreport/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs((config.timeout_secs / 2).max(1)))
            .build()
            .map_err(|e| ApiError::ClientError(e.without_url().to_string()))?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Client scoped to one project
    pub fn project(&self, hash: impl Into<String>) -> ReportClient {
        ReportClient::new(self.clone(), hash)
    }

    /// All Optimizer projects visible to the API key
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let answer: ProjectsAnswer = self.fetch_payload(Endpoint::Projects, Vec::new()).await?;
        info!("Found {} Optimizer projects", answer.projects.len());
        Ok(answer.projects)
    }

    /// GET one API method and decode its envelope. Waits the configured
    /// request delay after every response.
    async fn fetch_envelope(&self, endpoint: Endpoint, params: Params) -> Result<Envelope> {
        let mut url = self.config.endpoint_url(endpoint.as_str());
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.config.api_key);
            for (key, value) in &params {
                query.append_pair(key, value);
            }
            query.append_pair("format", "json");
        }

        debug!("GET {} {:?}", endpoint, params);

        let response = self.client.get(url).send().await;

        if !self.config.request_delay.is_zero() {
            tokio::time::sleep(self.config.request_delay).await;
        }

        let body = response?.error_for_status()?.bytes().await?;
        debug!("{} answered with {} bytes", endpoint, body.len());

        Envelope::parse(endpoint, &body)
    }

    async fn fetch_payload<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: Params,
    ) -> Result<T> {
        self.fetch_envelope(endpoint, params)
            .await?
            .into_payload(endpoint)
    }
}

/// Report operations for a single project
#[derive(Clone)]
pub struct ReportClient {
    api: OptimizerApi,
    project: String,
}

impl ReportClient {
    pub fn new(api: OptimizerApi, project: impl Into<String>) -> Self {
        Self {
            api,
            project: project.into(),
        }
    }

    fn params(&self) -> Params {
        vec![("project", self.project.clone())]
    }

    /// Visibility of the project and its competitors, for `date` or the latest value
    pub async fn fetch_visibility(&self, date: Option<&str>) -> Result<Vec<VisibilityEntry>> {
        let mut params = self.params();
        params.push(("competitors", "true".to_string()));
        if let Some(date) = date {
            params.push(("date", date.to_string()));
        }

        let answer: VisibilityAnswer = self.api.fetch_payload(Endpoint::Visibility, params).await?;
        let mut entries = answer.entries;
        for entry in entries.iter_mut() {
            entry.derive_short_date();
        }
        Ok(entries)
    }

    /// Visibility on the most recent Monday and `weeks_back` Mondays before it
    pub async fn fetch_visibility_history(
        &self,
        weeks_back: usize,
    ) -> Result<Vec<VisibilityRecord>> {
        self.fetch_visibility_history_from(Local::now().date_naive(), weeks_back)
            .await
    }

    pub async fn fetch_visibility_history_from(
        &self,
        today: NaiveDate,
        weeks_back: usize,
    ) -> Result<Vec<VisibilityRecord>> {
        let dates = mondays_back(today, weeks_back);
        info!(
            "Fetching visibility for {} on {} Mondays",
            self.project,
            dates.len()
        );

        let mut records = Vec::new();
        for date in dates {
            let date = date.format("%Y-%m-%d").to_string();
            let entries = self.fetch_visibility(Some(&date)).await?;
            records.extend(entries.iter().map(VisibilityEntry::to_record));
        }
        Ok(records)
    }

    /// Timestamps of every crawl available for the project
    pub async fn fetch_crawl_dates(&self) -> Result<Vec<String>> {
        let records = self.fetch_crawl_history().await?;
        Ok(records.into_iter().map(|record| record.time).collect())
    }

    /// Issues found by the crawl on `date` (or the latest crawl).
    /// `None` when the API reports the crawl as failed.
    pub async fn fetch_crawl(&self, date: Option<&str>) -> Result<Option<Vec<CrawlIssue>>> {
        let mut params = self.params();
        if let Some(date) = date {
            params.push(("date", date.to_string()));
        }

        let envelope = self.api.fetch_envelope(Endpoint::CrawlIssues, params).await?;
        if envelope.is_failure() {
            debug!(
                "Crawl {} for {} unavailable: {}",
                date.unwrap_or("latest"),
                self.project,
                envelope.failure_message()
            );
            return Ok(None);
        }

        let answer: CrawlIssuesAnswer = envelope.into_payload(Endpoint::CrawlIssues)?;
        let mut issues = answer.issues;
        for issue in issues.iter_mut() {
            issue.derive_clean_name();
        }
        Ok(Some(issues))
    }

    /// Issues from every available crawl, each tagged with its crawl date
    pub async fn fetch_all_crawls(&self) -> Result<Vec<CrawlIssue>> {
        let dates = self.fetch_crawl_dates().await?;
        info!("Fetching {} crawls for {}", dates.len(), self.project);

        let mut crawls = Vec::new();
        for date in dates {
            match self.fetch_crawl(Some(&date)).await? {
                Some(issues) => {
                    crawls.extend(issues.into_iter().map(|mut issue| {
                        issue.date = Some(date.clone());
                        issue
                    }));
                }
                None => warn!("Skipping failed crawl {} for {}", date, self.project),
            }
        }
        Ok(crawls)
    }

    /// Raw crawl overview records
    pub async fn fetch_crawl_history(&self) -> Result<Vec<CrawlOverviewRecord>> {
        let answer: CrawlOverviewAnswer = self
            .api
            .fetch_payload(Endpoint::CrawlOverview, self.params())
            .await?;
        Ok(answer.records)
    }

    /// One page of keyword rankings. Blank URLs are filled in.
    pub async fn fetch_rankings(&self, offset: Option<u64>) -> Result<RankingPage> {
        let mut params = self.params();
        if let Some(offset) = offset.filter(|offset| *offset > 0) {
            params.push(("offset", offset.to_string()));
        }

        let answer: RankingsAnswer = self.api.fetch_payload(Endpoint::Rankings, params).await?;
        let mut page = answer
            .pages
            .into_iter()
            .next()
            .ok_or(ApiError::MissingAnswer {
                endpoint: Endpoint::Rankings,
            })?;

        normalize_blank_urls(&mut page.rankings, PAGE_URL_PLACEHOLDER);
        Ok(page)
    }

    /// Every tracked keyword ranking, following pagination
    pub async fn fetch_all_rankings(&self) -> Result<Vec<RankingRecord>> {
        let first = self.fetch_rankings(None).await?;
        let count = first.count;
        let mut rankings = first.rankings;

        if count >= RANKINGS_PAGE_SIZE {
            let extra_pages = count / RANKINGS_PAGE_SIZE;
            info!(
                "Paginating rankings for {}: {} keywords, {} more pages",
                self.project, count, extra_pages
            );

            let mut offset = RANKINGS_FIRST_PAGE_OFFSET;
            for _ in 0..extra_pages {
                let page = self.fetch_rankings(Some(offset)).await?;
                rankings.extend(page.rankings);
                debug!("Offset = {} | Items: {}", offset, rankings.len());
                offset += RANKINGS_PAGE_SIZE;
            }
        }

        normalize_blank_urls(&mut rankings, MERGED_URL_PLACEHOLDER);
        Ok(rankings)
    }

    /// Tracked keywords, in ranking order
    pub async fn fetch_keywords(&self) -> Result<Vec<String>> {
        let rankings = self.fetch_all_rankings().await?;
        Ok(rankings.into_iter().map(|record| record.keyword).collect())
    }
}
