//! Remote report API abstraction.
//!
//! The [`ReportsApi`] trait decouples the view orchestration from the actual
//! transport (currently HTTP via [`crate::io::http::HttpReportsApi`]). Tests
//! use scripted implementations that return predetermined responses without
//! touching the network.

use std::future::Future;

use anyhow::Result;

use crate::core::views::{
    CommentReportResponse, ListCommentReportsResponse, ListPostReportsResponse,
    ListPrivateMessageReportsResponse, ListReports, PostReportResponse,
    PrivateMessageReportResponse, ResolveReport,
};

/// Typed request/response calls against the moderation report service.
pub trait ReportsApi: Send + Sync {
    fn list_comment_reports(
        &self,
        form: &ListReports,
    ) -> impl Future<Output = Result<ListCommentReportsResponse>> + Send;

    fn list_post_reports(
        &self,
        form: &ListReports,
    ) -> impl Future<Output = Result<ListPostReportsResponse>> + Send;

    fn list_private_message_reports(
        &self,
        form: &ListReports,
    ) -> impl Future<Output = Result<ListPrivateMessageReportsResponse>> + Send;

    fn resolve_comment_report(
        &self,
        form: &ResolveReport,
    ) -> impl Future<Output = Result<CommentReportResponse>> + Send;

    fn resolve_post_report(
        &self,
        form: &ResolveReport,
    ) -> impl Future<Output = Result<PostReportResponse>> + Send;

    fn resolve_private_message_report(
        &self,
        form: &ResolveReport,
    ) -> impl Future<Output = Result<PrivateMessageReportResponse>> + Send;
}
