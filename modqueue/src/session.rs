//! Explicit caller context passed into every fetch and resolve.

use serde::{Deserialize, Serialize};

use crate::core::types::TypeFilter;

/// The authenticated (or anonymous) caller of a report view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session token; `None` means nobody is logged in.
    pub auth: Option<String>,
    pub person_name: Option<String>,
    /// Elevated privilege required to see private-message reports.
    pub admin: bool,
}

impl Session {
    pub fn auth(&self) -> Option<&str> {
        self.auth.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }
}

/// Title for the reports page, e.g. `@alice Reports - My Site`.
///
/// Empty when nobody is logged in.
pub fn document_title(session: &Session, site_name: &str) -> String {
    match (&session.auth, &session.person_name) {
        (Some(_), Some(name)) => format!("@{name} Reports - {site_name}"),
        _ => String::new(),
    }
}

/// Type filters the caller may choose. Private messages are admin-only.
pub fn available_type_filters(session: &Session) -> Vec<TypeFilter> {
    let mut filters = vec![TypeFilter::All, TypeFilter::Comment, TypeFilter::Post];
    if session.is_admin() {
        filters.push(TypeFilter::PrivateMessage);
    }
    filters
}
