use crate::schedule::short_date;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// API fields the exporter passes through untouched, in response order
pub type Fields = serde_json::Map<String, Value>;

/// Placeholder written into `position` for keywords without a ranking URL
pub const UNRANKED_POSITION: &str = ">100";

/// Blank-URL placeholder applied to each rankings page
pub const PAGE_URL_PLACEHOLDER: &str = "no urls";

/// Blank-URL placeholder applied after all pages are concatenated
pub const MERGED_URL_PLACEHOLDER: &str = "no url";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub hash: String,
    pub name: String,
}

/// One domain or competitor visibility value as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityEntry {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    pub date: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(flatten)]
    pub fields: Fields,
    #[serde(rename = "shortDate", default, skip_deserializing)]
    pub short_date: String,
}

impl VisibilityEntry {
    pub fn derive_short_date(&mut self) {
        self.short_date = short_date(&self.date).to_string();
    }

    /// The path when the entry tracks a directory, otherwise the domain
    pub fn scope(&self) -> &str {
        match self.path.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => self.domain.as_deref().unwrap_or_default(),
        }
    }

    pub fn to_record(&self) -> VisibilityRecord {
        VisibilityRecord {
            scope: self.scope().to_string(),
            date: self.short_date.clone(),
            visibility: self.value,
        }
    }
}

/// Flattened visibility row written to `<project>.visibility.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityRecord {
    pub scope: String,
    pub date: String,
    pub visibility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlIssue {
    pub name: String,
    #[serde(flatten)]
    pub fields: Fields,
    #[serde(rename = "cleanName", default)]
    pub clean_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl CrawlIssue {
    /// `missing_alt_text` -> `missing alt text`
    pub fn derive_clean_name(&mut self) {
        self.clean_name = self.name.replace('_', " ");
    }
}

/// Summary of one on-page crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlOverviewRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub time: String,
    #[serde(flatten)]
    pub fields: Fields,
}

/// A ranking position is numeric when ranked, a label such as `>100` otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Position {
    Rank(i64),
    Label(String),
}

impl Position {
    pub fn unranked() -> Self {
        Position::Label(UNRANKED_POSITION.to_string())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Rank(rank) => write!(f, "{}", rank),
            Position::Label(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRecord {
    pub keyword: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(flatten)]
    pub fields: Fields,
}

impl RankingRecord {
    /// Fill a blank URL with `placeholder` and mark the keyword unranked.
    /// Records that already carry a URL (including a placeholder) are left alone.
    pub fn normalize_blank_url(&mut self, placeholder: &str) {
        if self.url.is_empty() {
            self.url = placeholder.to_string();
            self.position = Some(Position::unranked());
        }
    }
}

pub fn normalize_blank_urls(records: &mut [RankingRecord], placeholder: &str) {
    for record in records.iter_mut() {
        record.normalize_blank_url(placeholder);
    }
}

/// One page of keyword rankings plus the total the API reports
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RankingPage {
    #[serde(deserialize_with = "count_from_number_or_string")]
    pub count: u64,
    #[serde(rename = "optimizer.ranking", default)]
    pub rankings: Vec<RankingRecord>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, found {}",
            other
        ))),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn count_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("invalid count {}", n))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid count {:?}", s))),
        other => Err(serde::de::Error::custom(format!(
            "expected count, found {}",
            other
        ))),
    }
}
