//! Test-only helpers: report builders, sessions, and a scripted report API.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use tokio::sync::oneshot;

use crate::core::views::{
    CommentRef, CommentReport, CommentReportResponse, CommentReportView, CommunityRef,
    ListCommentReportsResponse, ListPostReportsResponse, ListPrivateMessageReportsResponse,
    ListReports, PersonRef, PostRef, PostReport, PostReportResponse, PostReportView,
    PrivateMessageRef, PrivateMessageReport, PrivateMessageReportResponse,
    PrivateMessageReportView, ResolveReport,
};
use crate::io::api::ReportsApi;
use crate::session::Session;

fn person(id: i64, name: &str) -> PersonRef {
    PersonRef {
        id,
        name: name.to_string(),
    }
}

fn community() -> CommunityRef {
    CommunityRef {
        id: 1,
        name: "general".to_string(),
    }
}

/// Create a deterministic, unresolved comment report.
pub fn comment_report(id: i64, published: &str) -> CommentReportView {
    CommentReportView {
        comment_report: CommentReport {
            id,
            creator_id: 10,
            comment_id: 100 + id,
            original_comment_text: format!("comment {id}"),
            reason: "spam".to_string(),
            resolved: false,
            resolver_id: None,
            published: published.to_string(),
            updated: None,
        },
        comment: CommentRef {
            id: 100 + id,
            post_id: 7,
            content: format!("comment {id}"),
        },
        post: PostRef {
            id: 7,
            name: "a post".to_string(),
        },
        community: community(),
        creator: person(10, "reporter"),
        comment_creator: person(11, "commenter"),
        resolver: None,
    }
}

/// Create a deterministic, unresolved post report.
pub fn post_report(id: i64, published: &str) -> PostReportView {
    PostReportView {
        post_report: PostReport {
            id,
            creator_id: 10,
            post_id: 200 + id,
            original_post_name: format!("post {id}"),
            original_post_url: None,
            original_post_body: None,
            reason: "off topic".to_string(),
            resolved: false,
            resolver_id: None,
            published: published.to_string(),
            updated: None,
        },
        post: PostRef {
            id: 200 + id,
            name: format!("post {id}"),
        },
        community: community(),
        creator: person(10, "reporter"),
        post_creator: person(12, "poster"),
        resolver: None,
    }
}

/// Create a deterministic, unresolved private-message report.
pub fn message_report(id: i64, published: &str) -> PrivateMessageReportView {
    PrivateMessageReportView {
        private_message_report: PrivateMessageReport {
            id,
            creator_id: 10,
            private_message_id: 300 + id,
            original_pm_text: format!("message {id}"),
            reason: "harassment".to_string(),
            resolved: false,
            resolver_id: None,
            published: published.to_string(),
            updated: None,
        },
        private_message: PrivateMessageRef {
            id: 300 + id,
            content: format!("message {id}"),
        },
        private_message_creator: person(13, "sender"),
        creator: person(10, "reporter"),
        resolver: None,
    }
}

/// Mark a comment report as resolved by the test moderator.
pub fn resolved_comment(mut view: CommentReportView) -> CommentReportView {
    view.comment_report.resolved = true;
    view.comment_report.resolver_id = Some(1);
    view.resolver = Some(person(1, "mod_user"));
    view
}

pub fn resolved_post(mut view: PostReportView) -> PostReportView {
    view.post_report.resolved = true;
    view.post_report.resolver_id = Some(1);
    view.resolver = Some(person(1, "mod_user"));
    view
}

pub fn resolved_message(mut view: PrivateMessageReportView) -> PrivateMessageReportView {
    view.private_message_report.resolved = true;
    view.private_message_report.resolver_id = Some(1);
    view.resolver = Some(person(1, "admin_user"));
    view
}

pub fn comments_page(reports: Vec<CommentReportView>) -> ListCommentReportsResponse {
    ListCommentReportsResponse {
        comment_reports: reports,
    }
}

pub fn posts_page(reports: Vec<PostReportView>) -> ListPostReportsResponse {
    ListPostReportsResponse {
        post_reports: reports,
    }
}

pub fn messages_page(reports: Vec<PrivateMessageReportView>) -> ListPrivateMessageReportsResponse {
    ListPrivateMessageReportsResponse {
        private_message_reports: reports,
    }
}

/// Logged-in moderator without admin privilege.
pub fn user_session() -> Session {
    Session {
        auth: Some("user-token".to_string()),
        person_name: Some("mod_user".to_string()),
        admin: false,
    }
}

/// Logged-in admin; sees private-message reports.
pub fn admin_session() -> Session {
    Session {
        auth: Some("admin-token".to_string()),
        person_name: Some("admin_user".to_string()),
        admin: true,
    }
}

/// Releases a gated scripted response.
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    pub fn open(self) {
        let _ = self.0.send(());
    }
}

/// One predetermined response, optionally held until its [`Gate`] opens.
pub struct Scripted<T> {
    result: Result<T, String>,
    gate: Option<oneshot::Receiver<()>>,
}

impl<T> Scripted<T> {
    pub fn ok(value: T) -> Self {
        Self {
            result: Ok(value),
            gate: None,
        }
    }

    pub fn err(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            gate: None,
        }
    }

    /// Hold this response until the returned gate is opened (or dropped).
    pub fn gated(mut self) -> (Self, Gate) {
        let (tx, rx) = oneshot::channel();
        self.gate = Some(rx);
        (self, Gate(tx))
    }
}

/// A request received by [`ScriptedApi`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListComments(ListReports),
    ListPosts(ListReports),
    ListMessages(ListReports),
    ResolveComment(ResolveReport),
    ResolvePost(ResolveReport),
    ResolveMessage(ResolveReport),
}

/// Report API that replays queued responses per endpoint.
///
/// An endpoint with an empty queue fails with an error.
#[derive(Default)]
pub struct ScriptedApi {
    comments: Mutex<VecDeque<Scripted<ListCommentReportsResponse>>>,
    posts: Mutex<VecDeque<Scripted<ListPostReportsResponse>>>,
    messages: Mutex<VecDeque<Scripted<ListPrivateMessageReportsResponse>>>,
    resolve_comments: Mutex<VecDeque<Scripted<CommentReportResponse>>>,
    resolve_posts: Mutex<VecDeque<Scripted<PostReportResponse>>>,
    resolve_messages: Mutex<VecDeque<Scripted<PrivateMessageReportResponse>>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comments(self, scripted: Scripted<ListCommentReportsResponse>) -> Self {
        push(&self.comments, scripted);
        self
    }

    pub fn with_posts(self, scripted: Scripted<ListPostReportsResponse>) -> Self {
        push(&self.posts, scripted);
        self
    }

    pub fn with_messages(self, scripted: Scripted<ListPrivateMessageReportsResponse>) -> Self {
        push(&self.messages, scripted);
        self
    }

    pub fn with_resolved_comment(self, scripted: Scripted<CommentReportView>) -> Self {
        push(
            &self.resolve_comments,
            map_scripted(scripted, |view| CommentReportResponse {
                comment_report_view: view,
            }),
        );
        self
    }

    pub fn with_resolved_post(self, scripted: Scripted<PostReportView>) -> Self {
        push(
            &self.resolve_posts,
            map_scripted(scripted, |view| PostReportResponse {
                post_report_view: view,
            }),
        );
        self
    }

    pub fn with_resolved_message(self, scripted: Scripted<PrivateMessageReportView>) -> Self {
        push(
            &self.resolve_messages,
            map_scripted(scripted, |view| PrivateMessageReportResponse {
                private_message_report_view: view,
            }),
        );
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

fn push<T>(queue: &Mutex<VecDeque<Scripted<T>>>, scripted: Scripted<T>) {
    queue.lock().expect("scripted queue lock").push_back(scripted);
}

fn map_scripted<T, U>(scripted: Scripted<T>, f: impl FnOnce(T) -> U) -> Scripted<U> {
    Scripted {
        result: scripted.result.map(f),
        gate: scripted.gate,
    }
}

async fn next<T>(queue: &Mutex<VecDeque<Scripted<T>>>, endpoint: &str) -> Result<T> {
    let scripted = queue
        .lock()
        .expect("scripted queue lock")
        .pop_front()
        .ok_or_else(|| anyhow!("no scripted response for {endpoint}"))?;
    if let Some(gate) = scripted.gate {
        let _ = gate.await;
    }
    scripted.result.map_err(|message| anyhow!(message))
}

impl ReportsApi for ScriptedApi {
    async fn list_comment_reports(&self, form: &ListReports) -> Result<ListCommentReportsResponse> {
        self.record(ApiCall::ListComments(form.clone()));
        next(&self.comments, "list_comment_reports").await
    }

    async fn list_post_reports(&self, form: &ListReports) -> Result<ListPostReportsResponse> {
        self.record(ApiCall::ListPosts(form.clone()));
        next(&self.posts, "list_post_reports").await
    }

    async fn list_private_message_reports(
        &self,
        form: &ListReports,
    ) -> Result<ListPrivateMessageReportsResponse> {
        self.record(ApiCall::ListMessages(form.clone()));
        next(&self.messages, "list_private_message_reports").await
    }

    async fn resolve_comment_report(&self, form: &ResolveReport) -> Result<CommentReportResponse> {
        self.record(ApiCall::ResolveComment(form.clone()));
        next(&self.resolve_comments, "resolve_comment_report").await
    }

    async fn resolve_post_report(&self, form: &ResolveReport) -> Result<PostReportResponse> {
        self.record(ApiCall::ResolvePost(form.clone()));
        next(&self.resolve_posts, "resolve_post_report").await
    }

    async fn resolve_private_message_report(
        &self,
        form: &ResolveReport,
    ) -> Result<PrivateMessageReportResponse> {
        self.record(ApiCall::ResolveMessage(form.clone()));
        next(&self.resolve_messages, "resolve_private_message_report").await
    }
}

/// Yield to the executor until `condition` holds.
///
/// Panics if it does not hold after a bounded number of yields.
pub async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..1_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
