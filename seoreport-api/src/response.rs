// Response envelopes shared by every Optimizer API method

use crate::endpoint::Endpoint;
use crate::error::{ApiError, Result};
use crate::model::{CrawlIssue, CrawlOverviewRecord, Project, RankingPage, VisibilityEntry};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// `{ "status": ..., "error": ..., "answer": [ { "<method key>": ... } ] }`
///
/// The answer is kept as raw JSON until the status has been checked, so a
/// failed request never has to match the success shape.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    answer: Vec<Value>,
}

impl Envelope {
    pub(crate) fn parse(endpoint: Endpoint, body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|source| ApiError::SchemaError { endpoint, source })
    }

    pub(crate) fn is_failure(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("fail"))
    }

    pub(crate) fn failure_message(&self) -> String {
        let messages: Vec<String> = match &self.error {
            Some(Value::Array(errors)) => errors.iter().map(error_text).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![error_text(other)],
        };

        if messages.is_empty() {
            "status: fail".to_string()
        } else {
            messages.join("; ")
        }
    }

    /// Decode `answer[0]`, turning an API-reported failure into `Rejected`
    pub(crate) fn into_payload<T: DeserializeOwned>(self, endpoint: Endpoint) -> Result<T> {
        if self.is_failure() {
            return Err(ApiError::Rejected {
                endpoint,
                message: self.failure_message(),
            });
        }

        let first = self
            .answer
            .into_iter()
            .next()
            .ok_or(ApiError::MissingAnswer { endpoint })?;

        serde_json::from_value(first).map_err(|source| ApiError::SchemaError { endpoint, source })
    }
}

fn error_text(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        Value::Object(map) => match (map.get("code"), map.get("message")) {
            (Some(code), Some(Value::String(message))) => format!("{} ({})", message, plain(code)),
            (None, Some(Value::String(message))) => message.clone(),
            _ => error.to_string(),
        },
        other => other.to_string(),
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectsAnswer {
    #[serde(rename = "optimizer.project")]
    pub projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VisibilityAnswer {
    #[serde(rename = "optimizer.visibility")]
    pub entries: Vec<VisibilityEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CrawlIssuesAnswer {
    #[serde(rename = "optimizer.onpage.crawl")]
    pub issues: Vec<CrawlIssue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CrawlOverviewAnswer {
    #[serde(rename = "optimizer.onpage.overview")]
    pub records: Vec<CrawlOverviewRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RankingsAnswer {
    #[serde(rename = "optimizer.rankings")]
    pub pages: Vec<RankingPage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> Envelope {
        Envelope::parse(Endpoint::Projects, value.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_payload_from_first_answer() {
        let env = envelope(json!({
            "method": [["optimizer.projects"]],
            "answer": [{"optimizer.project": [{"hash": "abc", "name": "Shop"}]}],
            "credits": [{"used": 1}]
        }));
        let payload: ProjectsAnswer = env.into_payload(Endpoint::Projects).unwrap();
        assert_eq!(payload.projects.len(), 1);
        assert_eq!(payload.projects[0].hash, "abc");
    }

    #[test]
    fn test_failure_is_rejected_with_message() {
        let env = envelope(json!({
            "status": "fail",
            "error": [{"code": "400", "message": "invalid project"}]
        }));
        assert!(env.is_failure());

        match env.into_payload::<ProjectsAnswer>(Endpoint::Projects) {
            Err(ApiError::Rejected { endpoint, message }) => {
                assert_eq!(endpoint, Endpoint::Projects);
                assert_eq!(message, "invalid project (400)");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_without_error_details() {
        let env = envelope(json!({"status": "fail"}));
        assert_eq!(env.failure_message(), "status: fail");
    }

    #[test]
    fn test_missing_answer() {
        let env = envelope(json!({"answer": []}));
        let result = env.into_payload::<ProjectsAnswer>(Endpoint::Projects);
        assert!(matches!(result, Err(ApiError::MissingAnswer { .. })));
    }

    #[test]
    fn test_shape_mismatch_is_schema_error() {
        let env = envelope(json!({"answer": [{"optimizer.project": "nope"}]}));
        let result = env.into_payload::<ProjectsAnswer>(Endpoint::Projects);
        assert!(matches!(result, Err(ApiError::SchemaError { .. })));
    }

    #[test]
    fn test_invalid_json_is_schema_error() {
        let result = Envelope::parse(Endpoint::Rankings, b"<html>502</html>");
        match result {
            Err(ApiError::SchemaError { endpoint, .. }) => assert_eq!(endpoint, Endpoint::Rankings),
            other => panic!("expected SchemaError, got {:?}", other),
        }
    }
}
