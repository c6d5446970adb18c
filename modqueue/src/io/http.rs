//! HTTP implementation of [`ReportsApi`] backed by `reqwest`.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::core::types::ReportKind;
use crate::core::views::{
    CommentReportResponse, ListCommentReportsResponse, ListPostReportsResponse,
    ListPrivateMessageReportsResponse, ListReports, PostReportResponse,
    PrivateMessageReportResponse, ResolveReport,
};
use crate::io::api::ReportsApi;
use crate::io::config::ModqueueConfig;

const API_PREFIX: &str = "api/v3";

/// Report API client for a single instance.
pub struct HttpReportsApi {
    client: Client,
    base_url: String,
}

impl HttpReportsApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(cfg: &ModqueueConfig) -> Result<Self> {
        Self::new(
            &cfg.instance_url,
            Duration::from_secs(cfg.request_timeout_secs),
        )
    }

    fn endpoint(&self, kind: ReportKind, action: &str) -> String {
        format!(
            "{}/{}/{}/report/{}",
            self.base_url,
            API_PREFIX,
            kind.as_str(),
            action
        )
    }

    #[instrument(skip_all, fields(kind = %kind))]
    async fn list<R: DeserializeOwned>(&self, kind: ReportKind, form: &ListReports) -> Result<R> {
        let url = self.endpoint(kind, "list");
        debug!(url = %url, page = form.page, unresolved_only = form.unresolved_only, "GET");
        let response = self
            .client
            .get(&url)
            .query(form)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("GET {url}"))?;
        decode(response, &url).await
    }

    #[instrument(skip_all, fields(kind = %kind, report_id = form.report_id))]
    async fn resolve<R: DeserializeOwned>(&self, kind: ReportKind, form: &ResolveReport) -> Result<R> {
        let url = self.endpoint(kind, "resolve");
        debug!(url = %url, resolved = form.resolved, "PUT");
        let response = self
            .client
            .put(&url)
            .json(form)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("PUT {url}"))?;
        decode(response, &url).await
    }
}

/// Read the body and hand it to [`parse_body`].
///
/// Errors name the endpoint path only; the request URL carries the session
/// token in its query.
async fn decode<R: DeserializeOwned>(response: Response, url: &str) -> Result<R> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(reqwest::Error::without_url)
        .with_context(|| format!("read response from {url}"))?;
    if !status.is_success() {
        warn!(url = %url, status = status.as_u16(), "report api request failed");
    }
    parse_body(status, &body, url)
}

fn parse_body<R: DeserializeOwned>(status: StatusCode, body: &str, url: &str) -> Result<R> {
    if !status.is_success() {
        return Err(anyhow!("{url} returned {status}: {}", error_message(body)));
    }
    serde_json::from_str(body).with_context(|| format!("decode response from {url}"))
}

/// The service reports failures as `{"error": "..."}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: String,
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body.trim().to_string(),
    }
}

impl ReportsApi for HttpReportsApi {
    async fn list_comment_reports(&self, form: &ListReports) -> Result<ListCommentReportsResponse> {
        self.list(ReportKind::Comment, form).await
    }

    async fn list_post_reports(&self, form: &ListReports) -> Result<ListPostReportsResponse> {
        self.list(ReportKind::Post, form).await
    }

    async fn list_private_message_reports(
        &self,
        form: &ListReports,
    ) -> Result<ListPrivateMessageReportsResponse> {
        self.list(ReportKind::PrivateMessage, form).await
    }

    async fn resolve_comment_report(&self, form: &ResolveReport) -> Result<CommentReportResponse> {
        self.resolve(ReportKind::Comment, form).await
    }

    async fn resolve_post_report(&self, form: &ResolveReport) -> Result<PostReportResponse> {
        self.resolve(ReportKind::Post, form).await
    }

    async fn resolve_private_message_report(
        &self,
        form: &ResolveReport,
    ) -> Result<PrivateMessageReportResponse> {
        self.resolve(ReportKind::PrivateMessage, form).await
    }
}
