//! Orchestration for one report view session.
//!
//! [`ReportsView`] owns the collection store and coordinates it with a
//! [`ReportsApi`]: fetch rounds write each collection independently as its
//! request completes, and resolves patch exactly one report in place.
//!
//! The store sits behind a `std::sync::Mutex` that is only held for
//! synchronous mutations, never across an `.await`, so concurrent requests
//! interleave freely between suspension points.

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::core::normalize::{ReportPayload, UnifiedReportItem, to_unified};
use crate::core::patch::PatchOutcome;
use crate::core::request_state::{FetchError, RequestState, SliceStatus};
use crate::core::store::{CollectionStore, SliceState, SliceStatuses};
use crate::core::types::{FilterState, ReportKind, TypeFilter, UnreadOrAll};
use crate::core::views::{
    ListCommentReportsResponse, ListPostReportsResponse, ListPrivateMessageReportsResponse,
    ListReports, ResolveReport,
};
use crate::io::api::ReportsApi;
use crate::session::Session;

/// Notifications emitted as the view changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    SliceChanged {
        kind: ReportKind,
        status: SliceStatus,
    },
    FiltersChanged {
        filters: FilterState,
    },
    ReportResolved {
        kind: ReportKind,
        report_id: i64,
        patch: PatchOutcome,
    },
    ResolveFailed {
        kind: ReportKind,
        report_id: i64,
        message: String,
    },
}

/// Outcome of entering the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Fetches were issued and have settled.
    Ready,
    /// No session token; nothing was requested. The caller must send the
    /// user to log in.
    RedirectToLogin,
}

/// A successful resolve: the server's updated item and what the patch did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub item: UnifiedReportItem,
    pub patch: PatchOutcome,
}

/// Responses preloaded before the view is entered (first page, unresolved only).
#[derive(Debug, Clone)]
pub struct InitialData {
    pub comments: Result<ListCommentReportsResponse, FetchError>,
    pub posts: Result<ListPostReportsResponse, FetchError>,
    /// Only present when the preload ran for a privileged caller.
    pub messages: Option<Result<ListPrivateMessageReportsResponse, FetchError>>,
}

/// Everything a UI collaborator needs to draw the current view.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub filters: FilterState,
    pub statuses: SliceStatuses,
    pub partial_failure: Vec<ReportKind>,
    pub items: Vec<UnifiedReportItem>,
}

const EVENT_CAPACITY: usize = 64;

pub struct ReportsView<A> {
    api: A,
    fetch_limit: u32,
    store: Mutex<CollectionStore>,
    events: broadcast::Sender<ViewEvent>,
}

impl<A: ReportsApi> ReportsView<A> {
    pub fn new(api: A, fetch_limit: u32) -> Self {
        Self::with_filters(api, fetch_limit, FilterState::default())
    }

    pub fn with_filters(api: A, fetch_limit: u32, filters: FilterState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            api,
            fetch_limit,
            store: Mutex::new(CollectionStore::new(filters)),
            events,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    fn store(&self) -> MutexGuard<'_, CollectionStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ViewEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    pub fn filters(&self) -> FilterState {
        self.store().filters()
    }

    pub fn statuses(&self) -> SliceStatuses {
        self.store().statuses()
    }

    pub fn partial_failure(&self) -> Vec<ReportKind> {
        self.store().partial_failure()
    }

    /// Current merged feed, newest first.
    pub fn merged_and_sorted(&self) -> Vec<UnifiedReportItem> {
        self.store().merged_and_sorted().collect()
    }

    /// Copy of the underlying store, for inspection.
    pub fn store_snapshot(&self) -> CollectionStore {
        self.store().clone()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let store = self.store();
        ViewSnapshot {
            filters: store.filters(),
            statuses: store.statuses(),
            partial_failure: store.partial_failure(),
            items: store.merged_and_sorted().collect(),
        }
    }

    /// Enter the view: refuse without a session token, otherwise fetch.
    pub async fn enter(&self, session: &Session) -> Entry {
        if !session.is_authenticated() {
            warn!("not logged in; redirecting to login");
            return Entry::RedirectToLogin;
        }
        self.refetch(session).await;
        Entry::Ready
    }

    /// Populate the slices from preloaded responses without issuing requests.
    pub fn hydrate(&self, session: &Session, data: InitialData) {
        let mut slices = vec![
            SliceState::Comments(RequestState::from_result(data.comments)),
            SliceState::Posts(RequestState::from_result(data.posts)),
        ];
        if session.is_admin() {
            if let Some(messages) = data.messages {
                slices.push(SliceState::Messages(RequestState::from_result(messages)));
            }
        }
        let mut store = self.store();
        for slice in slices {
            let event = ViewEvent::SliceChanged {
                kind: slice.kind(),
                status: slice.status(),
            };
            store.replace_slice(slice);
            self.emit(event);
        }
    }

    /// Re-request every collection the caller may see, for the current filters.
    ///
    /// Comments and posts are always requested; private messages only for
    /// admins. The requests run concurrently and each result is written to its
    /// own slice as soon as it arrives; a failure only affects its own slice.
    #[instrument(skip_all, fields(admin = session.is_admin()))]
    pub async fn refetch(&self, session: &Session) {
        let Some(auth) = session.auth() else {
            warn!("refetch skipped: not logged in");
            return;
        };
        let privileged = session.is_admin();
        let (generation, filters) = {
            let mut store = self.store();
            (store.begin_fetch(privileged), store.filters())
        };
        self.emit(ViewEvent::SliceChanged {
            kind: ReportKind::Comment,
            status: SliceStatus::Loading,
        });
        self.emit(ViewEvent::SliceChanged {
            kind: ReportKind::Post,
            status: SliceStatus::Loading,
        });
        if privileged {
            self.emit(ViewEvent::SliceChanged {
                kind: ReportKind::PrivateMessage,
                status: SliceStatus::Loading,
            });
        }

        let form = ListReports {
            unresolved_only: filters.unresolved_only(),
            page: filters.page,
            limit: self.fetch_limit,
            auth: auth.to_string(),
        };
        info!(
            generation,
            page = form.page,
            unresolved_only = form.unresolved_only,
            "fetching reports"
        );

        let comments = async {
            let result = self
                .api
                .list_comment_reports(&form)
                .await
                .context("list comment reports");
            self.write_slice(
                generation,
                SliceState::Comments(RequestState::from_result(result.map_err(FetchError::from))),
            );
        };
        let posts = async {
            let result = self
                .api
                .list_post_reports(&form)
                .await
                .context("list post reports");
            self.write_slice(
                generation,
                SliceState::Posts(RequestState::from_result(result.map_err(FetchError::from))),
            );
        };
        let messages = async {
            if !privileged {
                return;
            }
            let result = self
                .api
                .list_private_message_reports(&form)
                .await
                .context("list private message reports");
            self.write_slice(
                generation,
                SliceState::Messages(RequestState::from_result(result.map_err(FetchError::from))),
            );
        };
        futures::join!(comments, posts, messages);
    }

    fn write_slice(&self, generation: u64, slice: SliceState) {
        let kind = slice.kind();
        let status = slice.status();
        if let SliceState::Comments(RequestState::Error(err))
        | SliceState::Posts(RequestState::Error(err))
        | SliceState::Messages(RequestState::Error(err)) = &slice
        {
            warn!(%kind, error = %err, "report fetch failed");
        }
        let applied = self.store().replace_slice_if_current(generation, slice);
        if applied {
            debug!(%kind, ?status, generation, "slice updated");
            self.emit(ViewEvent::SliceChanged { kind, status });
        } else {
            debug!(%kind, generation, "dropping result of superseded fetch");
        }
    }

    /// Change the unread/all and type filters, return to page 1, and refetch.
    pub async fn change_filter(
        &self,
        session: &Session,
        unread_or_all: UnreadOrAll,
        type_filter: TypeFilter,
    ) {
        let filters = {
            let mut store = self.store();
            store.filters_mut().apply_filter(unread_or_all, type_filter);
            store.filters()
        };
        self.emit(ViewEvent::FiltersChanged { filters });
        self.refetch(session).await;
    }

    /// Move to `page` (1-based) keeping the filters, and refetch.
    pub async fn change_page(&self, session: &Session, page: u32) {
        if page == 0 {
            warn!("page 0 requested; using page 1");
        }
        let filters = {
            let mut store = self.store();
            store.filters_mut().apply_page(page);
            store.filters()
        };
        self.emit(ViewEvent::FiltersChanged { filters });
        self.refetch(session).await;
    }

    /// Resolve (or unresolve) one report and patch it into its loaded slice.
    ///
    /// Never refetches and never reorders. On failure the collections are left
    /// untouched, a [`ViewEvent::ResolveFailed`] is emitted, and the error is
    /// returned.
    #[instrument(skip_all, fields(kind = %kind, report_id = form.report_id, resolved = form.resolved))]
    pub async fn resolve(&self, kind: ReportKind, form: &ResolveReport) -> Result<Resolved> {
        let result = match kind {
            ReportKind::Comment => self
                .api
                .resolve_comment_report(form)
                .await
                .map(|res| ReportPayload::Comment(res.comment_report_view)),
            ReportKind::Post => self
                .api
                .resolve_post_report(form)
                .await
                .map(|res| ReportPayload::Post(res.post_report_view)),
            ReportKind::PrivateMessage => self
                .api
                .resolve_private_message_report(form)
                .await
                .map(|res| ReportPayload::PrivateMessage(res.private_message_report_view)),
        };

        let payload = match result {
            Ok(payload) => payload,
            Err(err) => return Err(self.resolve_failed(kind, form.report_id, err)),
        };

        let item = match &payload {
            ReportPayload::Comment(view) => to_unified(view),
            ReportPayload::Post(view) => to_unified(view),
            ReportPayload::PrivateMessage(view) => to_unified(view),
        };
        let patch = self.store().patch_item(payload);
        match patch {
            PatchOutcome::Replaced { index } => debug!(index, "patched resolved report"),
            PatchOutcome::SliceNotLoaded | PatchOutcome::NotFound => {
                debug!(?patch, "resolved report not in loaded slice")
            }
        }
        info!("report resolve applied");
        self.emit(ViewEvent::ReportResolved {
            kind,
            report_id: form.report_id,
            patch,
        });
        Ok(Resolved { item, patch })
    }

    fn resolve_failed(&self, kind: ReportKind, report_id: i64, err: anyhow::Error) -> anyhow::Error {
        let err = err.context(format!("resolve {kind} report {report_id}"));
        let message = format!("{err:#}");
        warn!(error = %message, "resolve failed");
        self.emit(ViewEvent::ResolveFailed {
            kind,
            report_id,
            message,
        });
        err
    }
}

/// Preload the first page of unresolved reports for `session`.
///
/// Returns `None` without issuing requests when nobody is logged in.
pub async fn fetch_initial_data<A: ReportsApi>(
    api: &A,
    session: &Session,
    limit: u32,
) -> Option<InitialData> {
    let auth = session.auth()?;
    let form = ListReports {
        unresolved_only: true,
        page: 1,
        limit,
        auth: auth.to_string(),
    };
    let messages = async {
        if session.is_admin() {
            Some(
                api.list_private_message_reports(&form)
                    .await
                    .context("list private message reports")
                    .map_err(FetchError::from),
            )
        } else {
            None
        }
    };
    let (comments, posts, messages) = futures::join!(
        api.list_comment_reports(&form),
        api.list_post_reports(&form),
        messages
    );
    Some(InitialData {
        comments: comments
            .context("list comment reports")
            .map_err(FetchError::from),
        posts: posts.context("list post reports").map_err(FetchError::from),
        messages,
    })
}

/// Resolve form for `report_id` on behalf of `session`.
///
/// Returns an error when nobody is logged in.
pub fn resolve_form(session: &Session, report_id: i64, resolved: bool) -> Result<ResolveReport> {
    let auth = session
        .auth()
        .context("not logged in: a session token is required to resolve reports")?;
    Ok(ResolveReport {
        report_id,
        resolved,
        auth: auth.to_string(),
    })
}
