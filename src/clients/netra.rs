use reqwest::{Client, StatusCode, header};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::constants::upstream;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream did not respond within {0} seconds")]
    Timeout(u64),

    #[error("failed to reach upstream: {0}")]
    Transport(String),

    #[error("upstream returned a non-JSON body: {0}")]
    MalformedResponse(String),
}

/// One relayed data operation against the provider API. Each variant maps to
/// a fixed upstream path; the id-carrying variants are addressed by the
/// subject claim of the caller's token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentOp {
    Attendance,
    SubjectAttendance,
    Timetable,
    InternalResults(i64),
    SemesterResults(i64),
    NoticesCount(i64),
    Profile(i64),
}

impl StudentOp {
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::Attendance => "/sanjaya/getAttendance".to_string(),
            Self::SubjectAttendance => "/sanjaya/getSubjectAttendance".to_string(),
            Self::Timetable => "/sanjaya/getTimeTablebyStudent".to_string(),
            Self::InternalResults(id) => format!("/sanjaya/getInternalResultsbyStudent/{id}"),
            Self::SemesterResults(id) => format!("/sanjaya/getSemResults/{id}"),
            Self::NoticesCount(id) => format!("/sanjaya/getNotificationsCount/{id}"),
            Self::Profile(id) => format!("/studentmaster/studentprofile/{id}"),
        }
    }
}

/// Credential payload the provider login endpoint expects, relayed verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
    pub application: &'static str,
    pub token: String,
}

impl LoginPayload {
    #[must_use]
    pub fn new(username: String, password: String, captcha_token: Option<String>) -> Self {
        Self {
            username,
            password,
            application: upstream::LOGIN_APPLICATION,
            token: captcha_token.unwrap_or_default(),
        }
    }
}

/// Status and body exactly as the upstream sent them. The body is never
/// edited or reinterpreted; a non-JSON failure body is carried as a raw
/// string for caller diagnosis.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Value,
    expected: StatusCode,
}

impl UpstreamReply {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == self.expected
    }
}

#[derive(Clone)]
pub struct NetraClient {
    client: Client,
    base_url: String,
    portal_origin: String,
    login_timeout: Duration,
    fetch_timeout: Duration,
}

impl NetraClient {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(upstream::BROWSER_USER_AGENT)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build upstream HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            portal_origin: config.portal_origin.clone(),
            login_timeout: Duration::from_secs(config.login_timeout_secs),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
        })
    }

    /// Relays a credential pair to the provider login endpoint. The provider
    /// answers 201 on success; any other status comes back in the reply for
    /// the caller to surface.
    pub async fn login(&self, payload: &LoginPayload) -> Result<UpstreamReply, UpstreamError> {
        let request = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .timeout(self.login_timeout)
            .header(header::ORIGIN, &self.portal_origin)
            .header(header::REFERER, format!("{}/", self.portal_origin))
            .json(payload);

        self.execute(request, StatusCode::CREATED, self.login_timeout)
            .await
    }

    /// Relays one data operation with the caller's bearer token.
    pub async fn fetch(&self, op: StudentOp, token: &str) -> Result<UpstreamReply, UpstreamError> {
        let request = self
            .client
            .get(format!("{}{}", self.base_url, op.path()))
            .timeout(self.fetch_timeout)
            .bearer_auth(token);

        self.execute(request, StatusCode::OK, self.fetch_timeout)
            .await
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        expected: StatusCode,
        bound: Duration,
    ) -> Result<UpstreamReply, UpstreamError> {
        let response = request.send().await.map_err(|e| classify(&e, bound))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| classify(&e, bound))?;

        let body = match serde_json::from_str::<Value>(&text) {
            Ok(value) => value,
            // A success reply must be JSON; a failure body is attached raw.
            Err(_) if status == expected => return Err(UpstreamError::MalformedResponse(text)),
            Err(_) => Value::String(text),
        };

        Ok(UpstreamReply {
            status,
            body,
            expected,
        })
    }
}

fn classify(err: &reqwest::Error, bound: Duration) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout(bound.as_secs())
    } else {
        UpstreamError::Transport(err.to_string())
    }
}
