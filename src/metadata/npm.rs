//! Fetch latest-version metadata from an npm-compatible registry

use crate::config::RegistryConfig;
use crate::error::{ReportError, Result};
use crate::types::{RegistryRecord, UNKNOWN};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION")
);

/// Response from `<registry>/<name>/latest`
#[derive(Debug, Deserialize)]
struct LatestResponse {
    version: String,
    description: Option<String>,
    license: Option<License>,
    author: Option<Person>,
    homepage: Option<String>,
    repository: Option<Repository>,
    keywords: Option<Keywords>,
    maintainers: Option<Vec<serde_json::Value>>,
    time: Option<Times>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum License {
    Id(String),
    Object {
        #[serde(rename = "type")]
        kind: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Person {
    Name(String),
    Object { name: Option<String> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Repository {
    Url(String),
    Object { url: Option<String> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Keywords {
    List(Vec<String>),
    Single(String),
}

#[derive(Debug, Deserialize)]
struct Times {
    created: Option<String>,
    modified: Option<String>,
}

impl LatestResponse {
    fn into_record(self) -> RegistryRecord {
        let license = match self.license {
            Some(License::Id(id)) => Some(id),
            Some(License::Object { kind }) => kind,
            None => None,
        };
        let author = match self.author {
            Some(Person::Name(name)) => Some(name),
            Some(Person::Object { name }) => name,
            None => None,
        };
        let repository_url = match self.repository {
            Some(Repository::Url(url)) => Some(url),
            Some(Repository::Object { url }) => url,
            None => None,
        };
        let keywords = match self.keywords {
            Some(Keywords::List(list)) => list,
            Some(Keywords::Single(word)) => vec![word],
            None => Vec::new(),
        };
        let (created_at, modified_at) = match &self.time {
            Some(times) => (
                times.created.as_deref().and_then(parse_datetime),
                times.modified.as_deref().and_then(parse_datetime),
            ),
            None => (None, None),
        };

        RegistryRecord {
            latest_version: self.version,
            description: self.description,
            license: non_empty_or_unknown(license),
            author: non_empty_or_unknown(author),
            homepage: self.homepage,
            repository_url,
            keywords,
            maintainer_count: self.maintainers.map_or(0, |m| m.len()),
            created_at,
            modified_at,
        }
    }
}

/// Sequential registry client with a courtesy throttle
pub struct RegistryClient {
    client: Client,
    config: RegistryConfig,
    request_count: u64,
}

impl RegistryClient {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ReportError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
            request_count: 0,
        })
    }

    /// Number of registry requests issued so far
    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    /// Fetch the latest published metadata for `name`.
    ///
    /// Every call counts toward the throttle, whether or not it succeeds.
    pub async fn fetch_latest(&mut self, name: &str) -> Result<RegistryRecord> {
        let result = self.request(name).await;
        self.throttle().await;
        result
    }

    async fn request(&self, name: &str) -> Result<RegistryRecord> {
        let url = format!(
            "{}/{}/latest",
            self.config.base_url.trim_end_matches('/'),
            name
        );
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ReportError::fetch(name, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::fetch_msg(name, format!("HTTP {}", status)));
        }

        let data: LatestResponse = response
            .json()
            .await
            .map_err(|e| ReportError::fetch(name, e))?;

        Ok(data.into_record())
    }

    async fn throttle(&mut self) {
        self.request_count += 1;

        if batch_pause_due(self.request_count, self.config.batch_size) {
            warn!(
                "Made {} requests, pausing {:?} to respect registry rate limits",
                self.request_count,
                self.config.batch_pause()
            );
            sleep(self.config.batch_pause()).await;
        }

        sleep(self.config.request_delay()).await;
    }
}

fn batch_pause_due(count: u64, batch_size: u64) -> bool {
    batch_size > 0 && count % batch_size == 0
}

fn non_empty_or_unknown(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
