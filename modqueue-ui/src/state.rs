//! Shared application state for the UI server.

use std::sync::Arc;

use modqueue::io::http::HttpReportsApi;
use modqueue::session::Session;
use modqueue::view::ReportsView;

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single report view session served by this process.
    pub view: Arc<ReportsView<HttpReportsApi>>,
    /// Caller identity used for every fetch and resolve.
    pub session: Arc<Session>,
    /// Site name for the document title.
    pub site_name: Arc<str>,
}

impl AppState {
    pub fn new(view: ReportsView<HttpReportsApi>, session: Session, site_name: &str) -> Self {
        Self {
            view: Arc::new(view),
            session: Arc::new(session),
            site_name: Arc::from(site_name),
        }
    }

    /// Fetch all collections in the background; results arrive as SSE events.
    pub fn spawn_refetch(&self) {
        let view = Arc::clone(&self.view);
        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            view.refetch(&session).await;
        });
    }
}
