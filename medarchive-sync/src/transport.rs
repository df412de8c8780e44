//! Blocking HTTP transport for the forms service and the program website.
//!
//! Connection-level failures (DNS, refused, reset, timeout) are retried after
//! a fixed delay, forever unless `max_attempts` is set. Anything the server
//! actually answered is returned or failed immediately.

use std::thread;
use std::time::Duration;

use thiserror::Error;

use medarchive_core::Settings;

/// Body the forms service returns with a 200 status for unknown endpoints.
pub const API_ERROR_BODY: &str = "Sorry, but an error has occurred";

#[derive(Debug, Error)]
pub enum TransportError {
    /// Server answered with a status other than 200.
    #[error("HTTP error {status} from {url}: {body}")]
    Http { url: String, status: u16, body: String },

    /// Server answered 200 with its generic error page.
    #[error("API error from {url}: \"{API_ERROR_BODY}\" (invalid endpoint?)")]
    Api { url: String },

    /// Gave up reconnecting after the configured number of attempts.
    #[error("could not connect to {url} after {attempts} attempts: {message}")]
    Exhausted {
        url: String,
        attempts: u32,
        message: String,
    },

    /// Response body was not what the caller expected.
    #[error("malformed response from {url}: {message}")]
    Malformed { url: String, message: String },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// Request seam between the run logic and the network.
pub trait Transport {
    /// GET `endpoint` (relative to the API base) with query parameters.
    fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, TransportError>;

    /// POST a urlencoded form to an absolute `url`.
    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<String, TransportError>;
}

/// [`Transport`] over a shared `ureq` agent.
pub struct HttpTransport {
    agent: ureq::Agent,
    api_base: String,
    retry_delay: Duration,
    max_attempts: Option<u32>,
}

impl HttpTransport {
    pub fn new(
        api_base: impl Into<String>,
        timeout: Duration,
        retry_delay: Duration,
        max_attempts: Option<u32>,
    ) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self {
            agent,
            api_base: api_base.into(),
            retry_delay,
            max_attempts,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.api_base.clone(),
            Duration::from_secs(settings.timeout_secs),
            Duration::from_secs(settings.retry_delay_secs),
            settings.max_attempts,
        )
    }

    /// Full URL for an API endpoint. Query parameters are not part of it, so
    /// it is safe to log.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base, endpoint.trim_start_matches('/'))
    }

    fn execute<F>(&self, url: &str, send: F) -> Result<String, TransportError>
    where
        F: Fn() -> Result<ureq::Response, ureq::Error>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match send() {
                Ok(resp) => return read_body(url, resp),
                Err(ureq::Error::Status(status, resp)) => {
                    let body = resp.into_string().unwrap_or_default();
                    return Err(TransportError::Http {
                        url: url.to_string(),
                        status,
                        body,
                    });
                }
                Err(ureq::Error::Transport(err)) => {
                    let message = describe_transport(&err);
                    if self.max_attempts.is_some_and(|max| attempt >= max) {
                        return Err(TransportError::Exhausted {
                            url: url.to_string(),
                            attempts: attempt,
                            message,
                        });
                    }
                    tracing::warn!(
                        url,
                        attempt,
                        error = %message,
                        "connection failed, retrying in {}s",
                        self.retry_delay.as_secs()
                    );
                    thread::sleep(self.retry_delay);
                }
            }
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, TransportError> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(url = %url, "GET");
        self.execute(&url, || {
            params
                .iter()
                .fold(self.agent.get(&url), |req, (k, v)| req.query(k, v))
                .call()
        })
    }

    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<String, TransportError> {
        tracing::debug!(url, "POST");
        self.execute(url, || self.agent.post(url).send_form(fields))
    }
}

/// Connection failure text without the request URL, whose query string
/// carries the credentials.
fn describe_transport(err: &ureq::Transport) -> String {
    let mut text = err.kind().to_string();
    if let Some(message) = err.message() {
        text.push_str(": ");
        text.push_str(message);
    }
    if let Some(source) = std::error::Error::source(err) {
        text.push_str(": ");
        text.push_str(&source.to_string());
    }
    text
}

fn read_body(url: &str, resp: ureq::Response) -> Result<String, TransportError> {
    let status = resp.status();
    let body = resp.into_string().map_err(|source| TransportError::Body {
        url: url.to_string(),
        source,
    })?;
    check_body(url, status, body)
}

/// Apply the success rules to an answered request: only 200 counts, and the
/// service's generic error page is an error even then.
pub fn check_body(url: &str, status: u16, body: String) -> Result<String, TransportError> {
    if status != 200 {
        return Err(TransportError::Http {
            url: url.to_string(),
            status,
            body,
        });
    }
    if body.trim() == API_ERROR_BODY {
        return Err(TransportError::Api { url: url.to_string() });
    }
    Ok(body)
}
