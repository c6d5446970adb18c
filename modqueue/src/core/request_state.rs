//! Lifecycle wrapper for one remote request.

use std::fmt;

use serde::{Deserialize, Serialize};

/// State of the most recent request for one collection.
///
/// Exactly one tag is active. Data is only reachable through `Success`, so
/// readers must match every tag before touching it. Any state may move to any
/// other state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum RequestState<T, E = FetchError> {
    /// No request issued yet.
    Empty,
    /// Request in flight; no prior data retained.
    Loading,
    /// Last request succeeded; the payload is the authoritative snapshot.
    Success(T),
    /// Last request failed; no data retained.
    Error(E),
}

impl<T, E> Default for RequestState<T, E> {
    fn default() -> Self {
        RequestState::Empty
    }
}

impl<T, E> RequestState<T, E> {
    pub fn empty() -> Self {
        RequestState::Empty
    }

    pub fn loading() -> Self {
        RequestState::Loading
    }

    pub fn from_result(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => RequestState::Success(value),
            Err(err) => RequestState::Error(err),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestState::Success(data) => Some(data),
            RequestState::Empty | RequestState::Loading | RequestState::Error(_) => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            RequestState::Success(data) => Some(data),
            RequestState::Empty | RequestState::Loading | RequestState::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            RequestState::Error(err) => Some(err),
            RequestState::Empty | RequestState::Loading | RequestState::Success(_) => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn status(&self) -> SliceStatus {
        match self {
            RequestState::Empty => SliceStatus::Empty,
            RequestState::Loading => SliceStatus::Loading,
            RequestState::Success(_) => SliceStatus::Success,
            RequestState::Error(_) => SliceStatus::Error,
        }
    }
}

/// Data-free tag of a [`RequestState`], used for spinners and error banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceStatus {
    Empty,
    Loading,
    Success,
    Error,
}

/// Failure of a list fetch, kept as the rendered error chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<anyhow::Error> for FetchError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            message: format!("{err:#}"),
        }
    }
}
