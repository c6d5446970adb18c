//! In-memory collection store for one report view session.
//!
//! Holds the three per-kind request slots plus the filter state and owns every
//! transition between them. Fetch results are fenced by a generation counter:
//! each fetch round bumps it, and results from an older round are dropped so a
//! slow response for a superseded filter/page cannot overwrite newer state.

use serde::Serialize;

use crate::core::merge::merge_and_sort;
use crate::core::normalize::{ReportPayload, UnifiedReportItem};
use crate::core::patch::{PatchOutcome, replace_by_id};
use crate::core::request_state::{RequestState, SliceStatus};
use crate::core::types::{FilterState, ReportKind};
use crate::core::views::{
    ListCommentReportsResponse, ListPostReportsResponse, ListPrivateMessageReportsResponse,
};

/// Replacement state for one slot, addressed by its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceState {
    Comments(RequestState<ListCommentReportsResponse>),
    Posts(RequestState<ListPostReportsResponse>),
    Messages(RequestState<ListPrivateMessageReportsResponse>),
}

impl SliceState {
    pub fn kind(&self) -> ReportKind {
        match self {
            SliceState::Comments(_) => ReportKind::Comment,
            SliceState::Posts(_) => ReportKind::Post,
            SliceState::Messages(_) => ReportKind::PrivateMessage,
        }
    }

    pub fn status(&self) -> SliceStatus {
        match self {
            SliceState::Comments(state) => state.status(),
            SliceState::Posts(state) => state.status(),
            SliceState::Messages(state) => state.status(),
        }
    }

    /// `Loading` state for the slot of `kind`.
    pub fn loading(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Comment => SliceState::Comments(RequestState::loading()),
            ReportKind::Post => SliceState::Posts(RequestState::loading()),
            ReportKind::PrivateMessage => SliceState::Messages(RequestState::loading()),
        }
    }
}

/// Per-kind status flags for spinners and error banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SliceStatuses {
    pub comments: SliceStatus,
    pub posts: SliceStatus,
    pub messages: SliceStatus,
}

/// The three report slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportCollectionState {
    pub comments: RequestState<ListCommentReportsResponse>,
    pub posts: RequestState<ListPostReportsResponse>,
    pub messages: RequestState<ListPrivateMessageReportsResponse>,
}

#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    collections: ReportCollectionState,
    filters: FilterState,
    generation: u64,
}

impl CollectionStore {
    pub fn new(filters: FilterState) -> Self {
        Self {
            collections: ReportCollectionState::default(),
            filters,
            generation: 0,
        }
    }

    pub fn collections(&self) -> &ReportCollectionState {
        &self.collections
    }

    pub fn filters(&self) -> FilterState {
        self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new fetch round and mark the slots it will request as loading.
    ///
    /// The messages slot is only touched when `privileged`; otherwise it keeps
    /// whatever state it had. Returns the round's generation.
    pub fn begin_fetch(&mut self, privileged: bool) -> u64 {
        self.generation += 1;
        self.replace_slice(SliceState::loading(ReportKind::Comment));
        self.replace_slice(SliceState::loading(ReportKind::Post));
        if privileged {
            self.replace_slice(SliceState::loading(ReportKind::PrivateMessage));
        }
        self.generation
    }

    /// Overwrite one slot wholesale.
    pub fn replace_slice(&mut self, slice: SliceState) {
        match slice {
            SliceState::Comments(state) => self.collections.comments = state,
            SliceState::Posts(state) => self.collections.posts = state,
            SliceState::Messages(state) => self.collections.messages = state,
        }
    }

    /// Overwrite one slot if `generation` is still the current fetch round.
    ///
    /// Returns false (and leaves the slot alone) for results of a superseded
    /// round.
    pub fn replace_slice_if_current(&mut self, generation: u64, slice: SliceState) -> bool {
        if generation != self.generation {
            return false;
        }
        self.replace_slice(slice);
        true
    }

    /// Replace the loaded report whose id matches `updated`, keeping its index.
    ///
    /// No-op when the slot of that kind is not `Success` or holds no such id.
    pub fn patch_item(&mut self, updated: ReportPayload) -> PatchOutcome {
        match updated {
            ReportPayload::Comment(view) => match self.collections.comments.data_mut() {
                Some(list) => replace_by_id(&mut list.comment_reports, view),
                None => PatchOutcome::SliceNotLoaded,
            },
            ReportPayload::Post(view) => match self.collections.posts.data_mut() {
                Some(list) => replace_by_id(&mut list.post_reports, view),
                None => PatchOutcome::SliceNotLoaded,
            },
            ReportPayload::PrivateMessage(view) => match self.collections.messages.data_mut() {
                Some(list) => replace_by_id(&mut list.private_message_reports, view),
                None => PatchOutcome::SliceNotLoaded,
            },
        }
    }

    /// Merged feed of every loaded slot under the current type filter.
    ///
    /// Call again to restart; slots that are not `Success` contribute nothing.
    pub fn merged_and_sorted(&self) -> impl Iterator<Item = UnifiedReportItem> + use<> {
        let comments = self
            .collections
            .comments
            .data()
            .map_or(&[][..], |list| &list.comment_reports[..]);
        let posts = self
            .collections
            .posts
            .data()
            .map_or(&[][..], |list| &list.post_reports[..]);
        let messages = self
            .collections
            .messages
            .data()
            .map_or(&[][..], |list| &list.private_message_reports[..]);
        merge_and_sort(comments, posts, messages, self.filters.type_filter).into_iter()
    }

    pub fn status(&self, kind: ReportKind) -> SliceStatus {
        match kind {
            ReportKind::Comment => self.collections.comments.status(),
            ReportKind::Post => self.collections.posts.status(),
            ReportKind::PrivateMessage => self.collections.messages.status(),
        }
    }

    pub fn statuses(&self) -> SliceStatuses {
        SliceStatuses {
            comments: self.collections.comments.status(),
            posts: self.collections.posts.status(),
            messages: self.collections.messages.status(),
        }
    }

    /// Kinds whose last fetch failed. Their items are missing from the feed.
    pub fn partial_failure(&self) -> Vec<ReportKind> {
        ReportKind::ALL
            .into_iter()
            .filter(|kind| self.status(*kind) == SliceStatus::Error)
            .collect()
    }
}
