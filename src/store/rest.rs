//! PostgREST client for the hosted `tasks` table

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::error::Result;
use super::{NewTask, StoreError, Task, TaskId, TaskStore};
use crate::config::StoreConfig;

const REST_PATH: [&str; 2] = ["rest", "v1"];
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

pub struct RestStore {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

/// Error body PostgREST sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InsertedRows {
    One(Task),
    Many(Vec<Task>),
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let base = config
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                StoreError::Config("no store URL (set --url or [store].url)".to_string())
            })?;
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                StoreError::Config("no API key (set --api-key or [store].api_key)".to_string())
            })?;

        let endpoint = table_endpoint(base, &config.table)?;

        let mut builder =
            reqwest::Client::builder().user_agent(concat!("tasklist/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
            api_key: api_key.to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn row_url(&self, id: &TaskId) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id));
        url
    }
}

fn table_endpoint(base: &str, table: &str) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| StoreError::Config(format!("invalid store URL '{}': {}", base, e)))?;
    if table.trim().is_empty() {
        return Err(StoreError::Config("table name is empty".to_string()));
    }

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| StoreError::Config(format!("store URL cannot be a base: {}", base)))?;
        segments.pop_if_empty().extend(REST_PATH).push(table.trim());
    }
    url.set_query(None);
    Ok(url)
}

async fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(api_error(status, &body))
    }
}

fn api_error(status: StatusCode, body: &str) -> StoreError {
    let fallback = || {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            trimmed.to_string()
        }
    };

    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => {
            let mut message = err.message.unwrap_or_else(fallback);
            if let Some(details) = err.details.filter(|d| !d.is_empty()) {
                message.push_str(&format!(" ({})", details));
            }
            if let Some(hint) = err.hint.filter(|h| !h.is_empty()) {
                message.push_str(&format!(" hint: {}", hint));
            }
            StoreError::Api {
                status: status.as_u16(),
                code: err.code,
                message,
            }
        }
        Err(_) => StoreError::Api {
            status: status.as_u16(),
            code: None,
            message: fallback(),
        },
    }
}

impl TaskStore for RestStore {
    async fn list(&self) -> Result<Vec<Task>> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");

        let response = self.request(Method::GET, url).send().await?;
        let body = read_body(response).await?;
        let tasks: Vec<Task> = serde_json::from_str(&body)?;
        debug!("Fetched {} rows from {}", tasks.len(), self.endpoint);
        Ok(tasks)
    }

    async fn insert(&self, task: &NewTask) -> Result<Task> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("select", "*");

        let response = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&[task])?)
            .send()
            .await?;
        let body = read_body(response).await?;

        match serde_json::from_str::<InsertedRows>(&body) {
            Ok(InsertedRows::One(row)) => Ok(row),
            Ok(InsertedRows::Many(rows)) => rows.into_iter().next().ok_or(StoreError::MissingRow),
            // Re-decode as a single row to surface the precise serde error.
            Err(_) => Ok(serde_json::from_str::<Task>(&body)?),
        }
    }

    async fn set_completed(&self, id: &TaskId, completed: bool) -> Result<()> {
        let response = self
            .request(Method::PATCH, self.row_url(id))
            .header("Prefer", "return=minimal")
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&serde_json::json!({ "completed": completed }))?)
            .send()
            .await?;
        read_body(response).await?;
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> Result<()> {
        let response = self
            .request(Method::DELETE, self.row_url(id))
            .header("Prefer", "return=minimal")
            .send()
            .await?;
        read_body(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> StoreConfig {
        StoreConfig {
            url: Some(url.to_string()),
            api_key: Some("anon-key".to_string()),
            ..StoreConfig::default()
        }
    }

    #[test]
    fn test_endpoint_appends_rest_path_and_table() {
        let store = RestStore::new(&config("https://abc.supabase.co")).unwrap();
        assert_eq!(
            store.endpoint().as_str(),
            "https://abc.supabase.co/rest/v1/tasks"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let store = RestStore::new(&config("https://abc.supabase.co/")).unwrap();
        assert_eq!(
            store.endpoint().as_str(),
            "https://abc.supabase.co/rest/v1/tasks"
        );
    }

    #[test]
    fn test_endpoint_uses_configured_table() {
        let mut cfg = config("http://localhost:54321");
        cfg.table = "todos".to_string();
        let store = RestStore::new(&cfg).unwrap();
        assert_eq!(store.endpoint().path(), "/rest/v1/todos");
    }

    #[test]
    fn test_row_url_filters_by_id() {
        let store = RestStore::new(&config("https://abc.supabase.co")).unwrap();
        let url = store.row_url(&TaskId::new("abc"));
        assert_eq!(url.query(), Some("id=eq.abc"));
    }

    #[test]
    fn test_missing_url_is_config_error() {
        let cfg = StoreConfig {
            api_key: Some("k".to_string()),
            ..StoreConfig::default()
        };
        assert!(matches!(RestStore::new(&cfg), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_blank_api_key_is_config_error() {
        let mut cfg = config("https://abc.supabase.co");
        cfg.api_key = Some("   ".to_string());
        assert!(matches!(RestStore::new(&cfg), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        assert!(matches!(
            RestStore::new(&config("not a url")),
            Err(StoreError::Config(_))
        ));
    }

    #[test]
    fn test_api_error_parses_postgrest_body() {
        let body = r#"{"code":"42501","details":null,"hint":null,"message":"permission denied for table tasks"}"#;
        match api_error(StatusCode::FORBIDDEN, body) {
            StoreError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 403);
                assert_eq!(code.as_deref(), Some("42501"));
                assert_eq!(message, "permission denied for table tasks");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_appends_details_and_hint() {
        let body = r#"{"code":"22P02","details":"bad uuid","hint":"check id","message":"invalid input"}"#;
        let err = api_error(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            err.to_string(),
            "Table store returned HTTP 400: invalid input (bad uuid) hint: check id"
        );
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        let err = api_error(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(err.to_string(), "Table store returned HTTP 502: upstream down");
    }

    #[test]
    fn test_api_error_empty_body_uses_reason() {
        let err = api_error(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(
            err.to_string(),
            "Table store returned HTTP 503: Service Unavailable"
        );
    }
}
