//! Blocking `ureq` agent behind the async `Transport` seam.
//!
//! Each request runs on tokio's blocking pool. Status codes are returned as
//! data (`http_status_as_error(false)`) so the core client classifies them;
//! only failures to obtain a response become `ApiError::Network`.

use async_trait::async_trait;
use todo_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};
use tracing::trace;

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|err| ApiError::Unknown(format!("transport task failed: {err}")))?
    }
}

fn execute_blocking(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let url = req.url.as_str();
    let result = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(url).call(),
        (HttpMethod::Delete, _) => agent.delete(url).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(url)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(url).send_empty(),
        (HttpMethod::Patch, Some(body)) => agent
            .patch(url)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Patch, None) => agent.patch(url).send_empty(),
    };
    let mut response = result.map_err(|err| ApiError::Network(err.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|err| ApiError::Network(err.to_string()))?;
    trace!(status, bytes = body.len(), "response received");

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
