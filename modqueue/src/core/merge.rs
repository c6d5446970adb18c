//! Deterministic merge of the three report collections.

use crate::core::normalize::{ReportView, UnifiedReportItem, to_unified};
use crate::core::types::TypeFilter;
use crate::core::views::{CommentReportView, PostReportView, PrivateMessageReportView};

/// Combine loaded collections into one feed, newest first.
///
/// Items are concatenated comments, posts, then private messages, each in
/// source order, restricted to kinds the filter includes. The sort is stable,
/// so equal timestamps keep concatenation order.
pub fn merge_and_sort(
    comments: &[CommentReportView],
    posts: &[PostReportView],
    messages: &[PrivateMessageReportView],
    type_filter: TypeFilter,
) -> Vec<UnifiedReportItem> {
    let mut items = Vec::with_capacity(comments.len() + posts.len() + messages.len());
    extend_filtered(&mut items, comments, type_filter);
    extend_filtered(&mut items, posts, type_filter);
    extend_filtered(&mut items, messages, type_filter);
    items.sort_by(|a, b| b.published.cmp(&a.published));
    items
}

fn extend_filtered<V: ReportView>(
    items: &mut Vec<UnifiedReportItem>,
    views: &[V],
    type_filter: TypeFilter,
) {
    if type_filter.includes(V::KIND) {
        items.extend(views.iter().map(to_unified));
    }
}
