//! View-level tests for fetch rounds, filter changes and resolves.
//!
//! These tests drive `ReportsView` against a `ScriptedApi` to verify that each
//! collection settles independently, that privilege gates the private-message
//! collection, and that resolving a report patches exactly one item.

use modqueue::core::patch::PatchOutcome;
use modqueue::core::request_state::SliceStatus;
use modqueue::core::store::SliceStatuses;
use modqueue::core::types::{ReportKind, TypeFilter, UnreadOrAll};
use modqueue::session::Session;
use modqueue::test_support::{
    ApiCall, ScriptedApi, Scripted, admin_session, comment_report, comments_page, message_report,
    messages_page, post_report, posts_page, resolved_comment, resolved_message, resolved_post,
    user_session, wait_until,
};
use modqueue::view::{Entry, ReportsView, ViewEvent, fetch_initial_data, resolve_form};

fn feed_keys<A: modqueue::io::api::ReportsApi>(view: &ReportsView<A>) -> Vec<(ReportKind, i64)> {
    view.merged_and_sorted()
        .iter()
        .map(|item| (item.kind(), item.id))
        .collect()
}

fn list_forms(calls: &[ApiCall]) -> Vec<(u32, bool)> {
    calls
        .iter()
        .filter_map(|call| match call {
            ApiCall::ListComments(form) | ApiCall::ListPosts(form) | ApiCall::ListMessages(form) => {
                Some((form.page, form.unresolved_only))
            }
            ApiCall::ResolveComment(_) | ApiCall::ResolvePost(_) | ApiCall::ResolveMessage(_) => {
                None
            }
        })
        .collect()
}

/// Two loaded collections merge newest first.
#[tokio::test]
async fn refetch_merges_comments_and_posts_newest_first() {
    let api = ScriptedApi::new()
        .with_comments(Scripted::ok(comments_page(vec![comment_report(
            1,
            "2024-01-02T00:00:00Z",
        )])))
        .with_posts(Scripted::ok(posts_page(vec![post_report(
            5,
            "2024-01-03T00:00:00Z",
        )])));
    let view = ReportsView::new(api, 20);

    assert_eq!(view.enter(&user_session()).await, Entry::Ready);

    assert_eq!(
        feed_keys(&view),
        vec![(ReportKind::Post, 5), (ReportKind::Comment, 1)]
    );
    assert_eq!(
        view.api().calls(),
        vec![
            ApiCall::ListComments(modqueue::core::views::ListReports {
                unresolved_only: true,
                page: 1,
                limit: 20,
                auth: "user-token".to_string(),
            }),
            ApiCall::ListPosts(modqueue::core::views::ListReports {
                unresolved_only: true,
                page: 1,
                limit: 20,
                auth: "user-token".to_string(),
            }),
        ]
    );
}

/// A failing post fetch leaves the comment fetch's result intact.
#[tokio::test]
async fn failed_post_fetch_only_affects_posts_slice() {
    let api = ScriptedApi::new()
        .with_comments(Scripted::ok(comments_page(vec![comment_report(
            1,
            "2024-01-02T00:00:00Z",
        )])))
        .with_posts(Scripted::err("502 bad gateway"));
    let view = ReportsView::new(api, 20);

    view.refetch(&user_session()).await;

    assert_eq!(
        view.statuses(),
        SliceStatuses {
            comments: SliceStatus::Success,
            posts: SliceStatus::Error,
            messages: SliceStatus::Empty,
        }
    );
    assert_eq!(feed_keys(&view), vec![(ReportKind::Comment, 1)]);
    assert_eq!(view.partial_failure(), vec![ReportKind::Post]);

    let store = view.store_snapshot();
    let err = store.collections().posts.error().expect("posts error");
    assert!(err.message.contains("list post reports"));
    assert!(err.message.contains("502 bad gateway"));
}

/// Admins also fetch private-message reports, which join the merged feed.
#[tokio::test]
async fn admin_refetch_includes_private_messages() {
    let api = ScriptedApi::new()
        .with_comments(Scripted::ok(comments_page(vec![comment_report(
            1,
            "2024-01-02T00:00:00Z",
        )])))
        .with_posts(Scripted::ok(posts_page(vec![])))
        .with_messages(Scripted::ok(messages_page(vec![message_report(
            3,
            "2024-01-05T00:00:00Z",
        )])));
    let view = ReportsView::new(api, 20);

    view.refetch(&admin_session()).await;

    assert_eq!(view.statuses().messages, SliceStatus::Success);
    assert_eq!(
        feed_keys(&view),
        vec![(ReportKind::PrivateMessage, 3), (ReportKind::Comment, 1)]
    );
}

/// Non-admins never request private-message reports, across repeated fetches.
#[tokio::test]
async fn non_admin_never_touches_messages_slice() {
    let api = ScriptedApi::new()
        .with_comments(Scripted::ok(comments_page(vec![])))
        .with_comments(Scripted::ok(comments_page(vec![])))
        .with_posts(Scripted::ok(posts_page(vec![])))
        .with_posts(Scripted::ok(posts_page(vec![])))
        .with_messages(Scripted::ok(messages_page(vec![message_report(
            3,
            "2024-01-05T00:00:00Z",
        )])));
    let view = ReportsView::new(api, 20);
    let session = user_session();

    view.refetch(&session).await;
    view.change_page(&session, 2).await;

    assert_eq!(view.statuses().messages, SliceStatus::Empty);
    assert!(
        !view
            .api()
            .calls()
            .iter()
            .any(|call| matches!(call, ApiCall::ListMessages(_)))
    );
}

/// Without a session token nothing is requested and the caller is redirected.
#[tokio::test]
async fn entering_without_token_redirects_and_issues_no_requests() {
    let view = ReportsView::new(ScriptedApi::new(), 20);
    let anonymous = Session::default();

    assert_eq!(view.enter(&anonymous).await, Entry::RedirectToLogin);
    view.refetch(&anonymous).await;

    assert!(view.api().calls().is_empty());
    assert_eq!(view.statuses().comments, SliceStatus::Empty);
    assert!(fetch_initial_data(view.api(), &anonymous, 20).await.is_none());
    assert!(resolve_form(&anonymous, 1, true).is_err());
}

/// Filter changes reset the page; page changes keep the filters.
#[tokio::test]
async fn filter_change_resets_page_and_page_change_keeps_filters() {
    let api = ScriptedApi::new();
    let view = ReportsView::new(api, 20);
    let session = user_session();

    view.change_page(&session, 3).await;
    assert_eq!(view.filters().page, 3);

    view.change_filter(&session, UnreadOrAll::All, TypeFilter::Post)
        .await;
    let filters = view.filters();
    assert_eq!(filters.page, 1);
    assert_eq!(filters.unread_or_all, UnreadOrAll::All);
    assert_eq!(filters.type_filter, TypeFilter::Post);

    view.change_page(&session, 2).await;
    let filters = view.filters();
    assert_eq!(filters.page, 2);
    assert_eq!(filters.unread_or_all, UnreadOrAll::All);
    assert_eq!(filters.type_filter, TypeFilter::Post);

    // Comments and posts per round: page 3 unread, page 1 all, page 2 all.
    assert_eq!(
        list_forms(&view.api().calls()),
        vec![
            (3, true),
            (3, true),
            (1, false),
            (1, false),
            (2, false),
            (2, false)
        ]
    );
}

/// The type filter narrows the merged feed but every permitted kind is fetched.
#[tokio::test]
async fn type_filter_narrows_feed_without_skipping_fetches() {
    let api = ScriptedApi::new()
        .with_comments(Scripted::ok(comments_page(vec![comment_report(
            1,
            "2024-01-02T00:00:00Z",
        )])))
        .with_posts(Scripted::ok(posts_page(vec![post_report(
            5,
            "2024-01-03T00:00:00Z",
        )])));
    let view = ReportsView::new(api, 20);

    view.change_filter(&user_session(), UnreadOrAll::Unread, TypeFilter::Comment)
        .await;

    assert_eq!(feed_keys(&view), vec![(ReportKind::Comment, 1)]);
    assert_eq!(view.api().calls().len(), 2);
    assert_eq!(view.statuses().posts, SliceStatus::Success);
}

/// Slices settle in completion order; readers see partial feeds mid-flight.
#[tokio::test]
async fn slices_settle_independently_in_completion_order() {
    let (comments, comments_gate) = Scripted::ok(comments_page(vec![comment_report(
        1,
        "2024-01-02T00:00:00Z",
    )]))
    .gated();
    let (posts, posts_gate) =
        Scripted::ok(posts_page(vec![post_report(5, "2024-01-03T00:00:00Z")])).gated();
    let api = ScriptedApi::new().with_comments(comments).with_posts(posts);
    let view = ReportsView::new(api, 20);
    let session = user_session();

    let driver = async {
        wait_until(|| view.api().calls().len() == 2).await;
        assert_eq!(view.statuses().comments, SliceStatus::Loading);
        assert!(view.merged_and_sorted().is_empty());

        posts_gate.open();
        wait_until(|| view.statuses().posts == SliceStatus::Success).await;
        assert_eq!(view.statuses().comments, SliceStatus::Loading);
        assert_eq!(feed_keys(&view), vec![(ReportKind::Post, 5)]);

        comments_gate.open();
    };
    tokio::join!(view.refetch(&session), driver);

    assert_eq!(
        feed_keys(&view),
        vec![(ReportKind::Post, 5), (ReportKind::Comment, 1)]
    );
}

/// A slow response from a superseded fetch round cannot overwrite newer state.
#[tokio::test]
async fn stale_fetch_results_are_ignored() {
    let (stale, stale_gate) =
        Scripted::ok(comments_page(vec![comment_report(1, "2024-01-01T00:00:00Z")])).gated();
    let api = ScriptedApi::new()
        .with_comments(stale)
        .with_comments(Scripted::ok(comments_page(vec![comment_report(
            2,
            "2024-01-02T00:00:00Z",
        )])))
        .with_posts(Scripted::ok(posts_page(vec![])))
        .with_posts(Scripted::ok(posts_page(vec![])));
    let view = ReportsView::new(api, 20);
    let session = user_session();

    let newer_round = async {
        wait_until(|| view.api().calls().len() == 2).await;
        view.change_page(&session, 2).await;
        stale_gate.open();
    };
    tokio::join!(view.refetch(&session), newer_round);

    assert_eq!(view.filters().page, 2);
    assert_eq!(feed_keys(&view), vec![(ReportKind::Comment, 2)]);
}

/// Resolving a comment report patches it in place and leaves posts alone.
#[tokio::test]
async fn resolve_patches_one_item_in_place() {
    let first = comment_report(1, "2024-01-02T00:00:00Z");
    let second = comment_report(2, "2024-01-01T00:00:00Z");
    let api = ScriptedApi::new()
        .with_comments(Scripted::ok(comments_page(vec![
            first.clone(),
            second.clone(),
        ])))
        .with_posts(Scripted::ok(posts_page(vec![post_report(
            5,
            "2024-01-03T00:00:00Z",
        )])))
        .with_resolved_comment(Scripted::ok(resolved_comment(first.clone())));
    let view = ReportsView::new(api, 20);
    let session = user_session();
    view.refetch(&session).await;
    let posts_before = view.store_snapshot().collections().posts.clone();
    let mut events = view.subscribe();

    let form = resolve_form(&session, 1, true).expect("form");
    let resolved = view
        .resolve(ReportKind::Comment, &form)
        .await
        .expect("resolve");

    assert_eq!(resolved.patch, PatchOutcome::Replaced { index: 0 });
    assert_eq!(resolved.item.id, 1);
    assert!(resolved.item.payload.resolved());

    let store = view.store_snapshot();
    let comments = &store
        .collections()
        .comments
        .data()
        .expect("comments loaded")
        .comment_reports;
    assert_eq!(comments.len(), 2);
    assert!(comments[0].comment_report.resolved);
    assert_eq!(comments[0].comment_report.published, "2024-01-02T00:00:00Z");
    assert_eq!(comments[1], second);
    assert_eq!(store.collections().posts, posts_before);

    // One resolve call, no refetch.
    assert_eq!(
        view.api().calls().last(),
        Some(&ApiCall::ResolveComment(form.clone()))
    );
    assert_eq!(view.api().calls().len(), 3);
    assert_eq!(
        events.try_recv().expect("event"),
        ViewEvent::ReportResolved {
            kind: ReportKind::Comment,
            report_id: 1,
            patch: PatchOutcome::Replaced { index: 0 },
        }
    );
}

/// Admins resolve private-message reports through the same in-place patch.
#[tokio::test]
async fn admin_resolves_private_message_report_in_place() {
    let first = message_report(7, "2024-01-03T00:00:00Z");
    let second = message_report(8, "2024-01-01T00:00:00Z");
    let api = ScriptedApi::new()
        .with_comments(Scripted::ok(comments_page(vec![comment_report(
            1,
            "2024-01-02T00:00:00Z",
        )])))
        .with_posts(Scripted::ok(posts_page(vec![post_report(
            5,
            "2024-01-04T00:00:00Z",
        )])))
        .with_messages(Scripted::ok(messages_page(vec![
            first.clone(),
            second.clone(),
        ])))
        .with_resolved_message(Scripted::ok(resolved_message(second.clone())));
    let view = ReportsView::new(api, 20);
    let session = admin_session();
    view.refetch(&session).await;
    let before = view.store_snapshot();
    let mut events = view.subscribe();

    let form = resolve_form(&session, 8, true).expect("form");
    let resolved = view
        .resolve(ReportKind::PrivateMessage, &form)
        .await
        .expect("resolve");

    assert_eq!(resolved.patch, PatchOutcome::Replaced { index: 1 });
    assert_eq!(resolved.item.kind(), ReportKind::PrivateMessage);
    assert_eq!(resolved.item.id, 8);
    assert!(resolved.item.payload.resolved());

    let store = view.store_snapshot();
    let messages = &store
        .collections()
        .messages
        .data()
        .expect("messages loaded")
        .private_message_reports;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], first);
    assert!(messages[1].private_message_report.resolved);
    assert_eq!(messages[1].private_message_report.id, 8);
    assert_eq!(store.collections().comments, before.collections().comments);
    assert_eq!(store.collections().posts, before.collections().posts);

    assert_eq!(
        view.api().calls().last(),
        Some(&ApiCall::ResolveMessage(form.clone()))
    );
    assert_eq!(
        feed_keys(&view),
        vec![
            (ReportKind::Post, 5),
            (ReportKind::PrivateMessage, 7),
            (ReportKind::Comment, 1),
            (ReportKind::PrivateMessage, 8),
        ]
    );
    assert_eq!(
        events.try_recv().expect("event"),
        ViewEvent::ReportResolved {
            kind: ReportKind::PrivateMessage,
            report_id: 8,
            patch: PatchOutcome::Replaced { index: 1 },
        }
    );
}

/// A failed resolve leaves the collection untouched and notifies the caller.
#[tokio::test]
async fn failed_resolve_leaves_collection_untouched() {
    let api = ScriptedApi::new()
        .with_comments(Scripted::ok(comments_page(vec![comment_report(
            1,
            "2024-01-02T00:00:00Z",
        )])))
        .with_posts(Scripted::ok(posts_page(vec![])))
        .with_resolved_comment(Scripted::err("not_a_moderator"));
    let view = ReportsView::new(api, 20);
    let session = user_session();
    view.refetch(&session).await;
    let before = view.store_snapshot().collections().clone();
    let mut events = view.subscribe();

    let form = resolve_form(&session, 1, true).expect("form");
    let err = view
        .resolve(ReportKind::Comment, &form)
        .await
        .expect_err("resolve should fail");

    assert!(format!("{err:#}").contains("not_a_moderator"));
    assert_eq!(view.store_snapshot().collections(), &before);
    assert_eq!(view.statuses().comments, SliceStatus::Success);
    match events.try_recv().expect("event") {
        ViewEvent::ResolveFailed {
            kind,
            report_id,
            message,
        } => {
            assert_eq!(kind, ReportKind::Comment);
            assert_eq!(report_id, 1);
            assert!(message.contains("resolve comment report 1"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

/// A resolve arriving before the list loads is a silent no-op patch.
#[tokio::test]
async fn resolve_before_list_loads_does_not_patch() {
    let api = ScriptedApi::new()
        .with_resolved_post(Scripted::ok(resolved_post(post_report(
            5,
            "2024-01-03T00:00:00Z",
        ))));
    let view = ReportsView::new(api, 20);
    let form = resolve_form(&user_session(), 5, true).expect("form");

    let resolved = view
        .resolve(ReportKind::Post, &form)
        .await
        .expect("resolve");

    assert_eq!(resolved.patch, PatchOutcome::SliceNotLoaded);
    assert_eq!(view.statuses().posts, SliceStatus::Empty);
    assert!(view.merged_and_sorted().is_empty());
}

/// Two resolves of the same kind completing out of order both land by id.
#[tokio::test]
async fn concurrent_resolves_patch_their_own_items() {
    let first = comment_report(1, "2024-01-02T00:00:00Z");
    let second = comment_report(2, "2024-01-01T00:00:00Z");
    let (slow, slow_gate) = Scripted::ok(resolved_comment(first.clone())).gated();
    let api = ScriptedApi::new()
        .with_comments(Scripted::ok(comments_page(vec![
            first.clone(),
            second.clone(),
        ])))
        .with_posts(Scripted::ok(posts_page(vec![])))
        .with_resolved_comment(slow)
        .with_resolved_comment(Scripted::ok(resolved_comment(second.clone())));
    let view = ReportsView::new(api, 20);
    let session = user_session();
    view.refetch(&session).await;

    let first_form = resolve_form(&session, 1, true).expect("form");
    let second_form = resolve_form(&session, 2, true).expect("form");
    let (first_result, second_result) = tokio::join!(
        view.resolve(ReportKind::Comment, &first_form),
        async {
            wait_until(|| view.api().calls().len() == 3).await;
            let result = view.resolve(ReportKind::Comment, &second_form).await;
            slow_gate.open();
            result
        }
    );

    assert_eq!(
        second_result.expect("second").patch,
        PatchOutcome::Replaced { index: 1 }
    );
    assert_eq!(
        first_result.expect("first").patch,
        PatchOutcome::Replaced { index: 0 }
    );
    let store = view.store_snapshot();
    let comments = &store
        .collections()
        .comments
        .data()
        .expect("comments loaded")
        .comment_reports;
    let ids: Vec<i64> = comments.iter().map(|c| c.comment_report.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(comments.iter().all(|c| c.comment_report.resolved));
}

/// Preloaded first-page data hydrates slices without any request.
#[tokio::test]
async fn hydrate_uses_preloaded_data_and_respects_privilege() {
    let preload_api = ScriptedApi::new()
        .with_comments(Scripted::ok(comments_page(vec![comment_report(
            1,
            "2024-01-02T00:00:00Z",
        )])))
        .with_posts(Scripted::err("timeout"))
        .with_messages(Scripted::ok(messages_page(vec![message_report(
            3,
            "2024-01-05T00:00:00Z",
        )])));
    let data = fetch_initial_data(&preload_api, &admin_session(), 20)
        .await
        .expect("logged in");
    assert_eq!(list_forms(&preload_api.calls()), vec![(1, true); 3]);

    let admin_view = ReportsView::new(ScriptedApi::new(), 20);
    admin_view.hydrate(&admin_session(), data.clone());
    assert!(admin_view.api().calls().is_empty());
    assert_eq!(
        admin_view.statuses(),
        SliceStatuses {
            comments: SliceStatus::Success,
            posts: SliceStatus::Error,
            messages: SliceStatus::Success,
        }
    );
    assert_eq!(
        feed_keys(&admin_view),
        vec![(ReportKind::PrivateMessage, 3), (ReportKind::Comment, 1)]
    );

    let user_view = ReportsView::new(ScriptedApi::new(), 20);
    user_view.hydrate(&user_session(), data);
    assert_eq!(user_view.statuses().messages, SliceStatus::Empty);
}
