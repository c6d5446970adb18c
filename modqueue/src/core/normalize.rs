//! Normalization of the three report view shapes into one sortable item.

use serde::{Deserialize, Serialize};

use crate::core::types::ReportKind;
use crate::core::views::{CommentReportView, PostReportView, PrivateMessageReportView};

/// Kind-specific report view, carried unchanged through the merged feed.
///
/// The variant is the kind; consumers match on it before reading the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "view", rename_all = "snake_case")]
pub enum ReportPayload {
    Comment(CommentReportView),
    Post(PostReportView),
    PrivateMessage(PrivateMessageReportView),
}

impl ReportPayload {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportPayload::Comment(_) => ReportKind::Comment,
            ReportPayload::Post(_) => ReportKind::Post,
            ReportPayload::PrivateMessage(_) => ReportKind::PrivateMessage,
        }
    }

    pub fn report_id(&self) -> i64 {
        match self {
            ReportPayload::Comment(view) => view.report_id(),
            ReportPayload::Post(view) => view.report_id(),
            ReportPayload::PrivateMessage(view) => view.report_id(),
        }
    }

    pub fn resolved(&self) -> bool {
        match self {
            ReportPayload::Comment(view) => view.comment_report.resolved,
            ReportPayload::Post(view) => view.post_report.resolved,
            ReportPayload::PrivateMessage(view) => view.private_message_report.resolved,
        }
    }
}

/// One report in the merged feed.
///
/// `id` is unique within its kind only; `(kind, id)` identifies an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedReportItem {
    pub id: i64,
    /// Sort key (ISO-8601).
    pub published: String,
    #[serde(flatten)]
    pub payload: ReportPayload,
}

impl UnifiedReportItem {
    pub fn kind(&self) -> ReportKind {
        self.payload.kind()
    }
}

/// Access to the nested report record shared by all three view shapes.
pub trait ReportView: Clone {
    const KIND: ReportKind;

    fn report_id(&self) -> i64;

    fn published(&self) -> &str;

    fn into_payload(self) -> ReportPayload;
}

impl ReportView for CommentReportView {
    const KIND: ReportKind = ReportKind::Comment;

    fn report_id(&self) -> i64 {
        self.comment_report.id
    }

    fn published(&self) -> &str {
        &self.comment_report.published
    }

    fn into_payload(self) -> ReportPayload {
        ReportPayload::Comment(self)
    }
}

impl ReportView for PostReportView {
    const KIND: ReportKind = ReportKind::Post;

    fn report_id(&self) -> i64 {
        self.post_report.id
    }

    fn published(&self) -> &str {
        &self.post_report.published
    }

    fn into_payload(self) -> ReportPayload {
        ReportPayload::Post(self)
    }
}

impl ReportView for PrivateMessageReportView {
    const KIND: ReportKind = ReportKind::PrivateMessage;

    fn report_id(&self) -> i64 {
        self.private_message_report.id
    }

    fn published(&self) -> &str {
        &self.private_message_report.published
    }

    fn into_payload(self) -> ReportPayload {
        ReportPayload::PrivateMessage(self)
    }
}

/// Wrap a view as a unified item. The view itself is left untouched.
pub fn to_unified<V: ReportView>(view: &V) -> UnifiedReportItem {
    UnifiedReportItem {
        id: view.report_id(),
        published: view.published().to_string(),
        payload: view.clone().into_payload(),
    }
}
