use crate::session::config::SessionConfig;
use crate::session::error::SessionError;

/// Raw payloads of the three provider resources, fetched together.
#[derive(Debug, Clone)]
pub struct RawBundle {
    pub ports: String,
    pub samples: String,
    pub visits: String,
}

/// HTTP client for the data provider. All three resources must succeed
/// before a bundle is returned; the fetches run concurrently but are joined,
/// not raced, so a failure is reported only after every request settles.
pub struct DataClient {
    http: reqwest::Client,
    ports_url: String,
    samples_url: String,
    visits_url: String,
}

impl DataClient {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            ports_url: config.ports_url.clone(),
            samples_url: config.samples_url.clone(),
            visits_url: config.visits_url.clone(),
        }
    }

    pub async fn fetch_bundle(&self) -> Result<RawBundle, SessionError> {
        let (ports, samples, visits) = tokio::join!(
            self.fetch_text("ports", &self.ports_url),
            self.fetch_text("samples", &self.samples_url),
            self.fetch_text("visits", &self.visits_url),
        );
        Ok(RawBundle {
            ports: ports?,
            samples: samples?,
            visits: visits?,
        })
    }

    async fn fetch_text(&self, resource: &'static str, url: &str) -> Result<String, SessionError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| SessionError::Fetch {
                resource,
                detail: err.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(SessionError::Fetch {
                resource,
                detail: format!("status {}", response.status()),
            });
        }
        response.text().await.map_err(|err| SessionError::Fetch {
            resource,
            detail: err.to_string(),
        })
    }
}
