//! Wire shapes exchanged with the remote report API.
//!
//! Field names follow the service's JSON contract, so these derive serde
//! without renames. Views are carried opaquely through the merged feed; only
//! the nested report record's `id` and `published` are interpreted here.

use serde::{Deserialize, Serialize};

/// Minimal public profile of a person referenced by a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRef {
    pub id: i64,
    pub post_id: i64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateMessageRef {
    pub id: i64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentReport {
    pub id: i64,
    pub creator_id: i64,
    pub comment_id: i64,
    pub original_comment_text: String,
    pub reason: String,
    pub resolved: bool,
    pub resolver_id: Option<i64>,
    /// ISO-8601 timestamp; lexicographic order is chronological order.
    pub published: String,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentReportView {
    pub comment_report: CommentReport,
    pub comment: CommentRef,
    pub post: PostRef,
    pub community: CommunityRef,
    pub creator: PersonRef,
    pub comment_creator: PersonRef,
    pub resolver: Option<PersonRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReport {
    pub id: i64,
    pub creator_id: i64,
    pub post_id: i64,
    pub original_post_name: String,
    pub original_post_url: Option<String>,
    pub original_post_body: Option<String>,
    pub reason: String,
    pub resolved: bool,
    pub resolver_id: Option<i64>,
    pub published: String,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReportView {
    pub post_report: PostReport,
    pub post: PostRef,
    pub community: CommunityRef,
    pub creator: PersonRef,
    pub post_creator: PersonRef,
    pub resolver: Option<PersonRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateMessageReport {
    pub id: i64,
    pub creator_id: i64,
    pub private_message_id: i64,
    pub original_pm_text: String,
    pub reason: String,
    pub resolved: bool,
    pub resolver_id: Option<i64>,
    pub published: String,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateMessageReportView {
    pub private_message_report: PrivateMessageReport,
    pub private_message: PrivateMessageRef,
    pub private_message_creator: PersonRef,
    pub creator: PersonRef,
    pub resolver: Option<PersonRef>,
}

/// Form shared by the three list calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListReports {
    pub unresolved_only: bool,
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    pub auth: String,
}

/// Form shared by the three resolve calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveReport {
    pub report_id: i64,
    pub resolved: bool,
    pub auth: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCommentReportsResponse {
    pub comment_reports: Vec<CommentReportView>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPostReportsResponse {
    pub post_reports: Vec<PostReportView>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPrivateMessageReportsResponse {
    pub private_message_reports: Vec<PrivateMessageReportView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentReportResponse {
    pub comment_report_view: CommentReportView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReportResponse {
    pub post_report_view: PostReportView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateMessageReportResponse {
    pub private_message_report_view: PrivateMessageReportView,
}
