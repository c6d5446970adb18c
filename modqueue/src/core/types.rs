//! Shared deterministic types for report core logic.
//!
//! These types define stable contracts between core components and the
//! surfaces built on top of them (CLI, UI server). They must not depend on
//! external state or I/O.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of the three report collections an item or slice belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Comment,
    Post,
    PrivateMessage,
}

impl ReportKind {
    /// Concatenation order used by the merged feed.
    pub const ALL: [ReportKind; 3] = [
        ReportKind::Comment,
        ReportKind::Post,
        ReportKind::PrivateMessage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Comment => "comment",
            ReportKind::Post => "post",
            ReportKind::PrivateMessage => "private_message",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether list requests ask only for unresolved reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnreadOrAll {
    #[default]
    Unread,
    All,
}

/// Which kinds the merged view shows. Does not gate fetching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeFilter {
    #[default]
    All,
    Comment,
    Post,
    PrivateMessage,
}

impl TypeFilter {
    /// Returns true if items of `kind` belong in the filtered view.
    pub fn includes(self, kind: ReportKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Comment => kind == ReportKind::Comment,
            TypeFilter::Post => kind == ReportKind::Post,
            TypeFilter::PrivateMessage => kind == ReportKind::PrivateMessage,
        }
    }
}

/// Filter and pagination state for one report view session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub unread_or_all: UnreadOrAll,
    pub type_filter: TypeFilter,
    /// 1-based page number.
    pub page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            unread_or_all: UnreadOrAll::Unread,
            type_filter: TypeFilter::All,
            page: 1,
        }
    }
}

impl FilterState {
    /// Apply new filter selections. Always returns to the first page.
    pub fn apply_filter(&mut self, unread_or_all: UnreadOrAll, type_filter: TypeFilter) {
        self.unread_or_all = unread_or_all;
        self.type_filter = type_filter;
        self.page = 1;
    }

    /// Move to `page`, clamped to the first page. Filters are untouched.
    pub fn apply_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn unresolved_only(&self) -> bool {
        self.unread_or_all == UnreadOrAll::Unread
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_filter_resets_page() {
        let mut filters = FilterState::default();
        filters.apply_page(4);
        filters.apply_filter(UnreadOrAll::Unread, TypeFilter::All);
        assert_eq!(filters.page, 1);
    }

    #[test]
    fn apply_page_keeps_filters_and_clamps_zero() {
        let mut filters = FilterState::default();
        filters.apply_filter(UnreadOrAll::All, TypeFilter::Post);
        filters.apply_page(0);
        assert_eq!(filters.page, 1);
        filters.apply_page(3);
        assert_eq!(filters.unread_or_all, UnreadOrAll::All);
        assert_eq!(filters.type_filter, TypeFilter::Post);
        assert_eq!(filters.page, 3);
        assert!(!filters.unresolved_only());
    }

    #[test]
    fn type_filter_all_includes_every_kind() {
        for kind in ReportKind::ALL {
            assert!(TypeFilter::All.includes(kind));
        }
        assert!(!TypeFilter::Post.includes(ReportKind::Comment));
        assert!(TypeFilter::PrivateMessage.includes(ReportKind::PrivateMessage));
    }
}
