use std::sync::atomic::Ordering;
use std::sync::Arc;

use watchlog_backend::{BackendError, IdentityService};
use watchlog_models::{PosterSource, SortMode, UserId};

use crate::app::WatchlistApp;
use crate::cache::WatchlistView;
use crate::intent::{ActionOutcome, UserIntent};

use super::fakes::{movie, owner, FakeIdentity, FakeObjects, FakeStore};

fn app(store: Arc<FakeStore>, identity: Arc<FakeIdentity>) -> WatchlistApp {
    WatchlistApp::new(identity, store, Arc::new(FakeObjects::new()))
}

#[tokio::test]
async fn dispatch_without_a_session_is_rejected_locally() {
    let store = Arc::new(FakeStore::new());
    let mut app = app(store.clone(), Arc::new(FakeIdentity::new(owner())));

    let result = app.dispatch(UserIntent::DeleteMovie { id: 1 }).await;

    assert!(matches!(result, Err(BackendError::NotAuthenticated)));
    assert_eq!(store.delete_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn sign_in_opens_a_session_populated_most_recent_first() {
    let store = Arc::new(FakeStore::with_rows(vec![
        movie(1, "a"),
        movie(3, "c"),
        movie(2, "b"),
    ]));
    let mut app = app(store, Arc::new(FakeIdentity::new(owner())));

    app.sign_in("user@example.com", "hunter2").await.expect("sign in");

    assert!(app.is_signed_in());
    match app.view("", SortMode::Recent).expect("session view") {
        WatchlistView::Rows(rows) => {
            let ids: Vec<_> = rows.iter().map(|m| m.id).collect();
            assert_eq!(ids, vec![3, 2, 1]);
        }
        other => panic!("expected rows, got {:?}", other),
    }
}

#[tokio::test]
async fn failed_sign_in_leaves_the_app_signed_out() {
    let identity = Arc::new(FakeIdentity::new(owner()));
    identity.fail_auth.store(true, Ordering::SeqCst);
    let mut app = app(Arc::new(FakeStore::new()), identity);

    let result = app.sign_in("user@example.com", "wrong").await;

    assert!(matches!(result, Err(BackendError::Auth(_))));
    assert!(!app.is_signed_in());
    assert!(app.view("", SortMode::Recent).is_none());
}

#[tokio::test]
async fn sign_up_does_not_open_a_session() {
    let app = app(Arc::new(FakeStore::new()), Arc::new(FakeIdentity::new(owner())));
    app.sign_up("new@example.com", "hunter2").await.expect("sign up");
    assert!(!app.is_signed_in());
}

#[tokio::test]
async fn sign_out_tears_the_session_down() {
    let mut app = app(
        Arc::new(FakeStore::with_rows(vec![movie(1, "Heat")])),
        Arc::new(FakeIdentity::new(owner())),
    );
    app.sign_in("user@example.com", "hunter2").await.expect("sign in");
    assert!(app.is_signed_in());

    app.sign_out().await.expect("sign out");

    assert!(!app.is_signed_in());
    assert!(app.view("", SortMode::Recent).is_none());
}

#[tokio::test]
async fn session_change_notifications_drive_the_lifecycle() {
    let identity = Arc::new(FakeIdentity::new(owner()));
    let mut app = app(
        Arc::new(FakeStore::with_rows(vec![movie(1, "Heat")])),
        identity.clone(),
    );
    let mut changes = app.subscribe_session_changes();

    identity.sign_in("user@example.com", "hunter2").await.expect("sign in");
    changes.changed().await.expect("notification");
    let change = changes.borrow_and_update().clone();
    app.apply_session_change(change).await.expect("open");
    assert!(app.is_signed_in());

    identity.sign_out().await.expect("sign out");
    changes.changed().await.expect("notification");
    let change = changes.borrow_and_update().clone();
    app.apply_session_change(change).await.expect("teardown");
    assert!(!app.is_signed_in());
}

#[tokio::test]
async fn dispatch_maps_intents_onto_single_mutations() {
    let store = Arc::new(FakeStore::with_rows(vec![movie(1, "Heat")]));
    let mut app = app(store.clone(), Arc::new(FakeIdentity::new(owner())));
    app.sign_in("user@example.com", "hunter2").await.expect("sign in");

    let outcome = app
        .dispatch(UserIntent::AddMovie {
            title: "Alien".to_string(),
            year: 1979,
            poster: PosterSource::None,
        })
        .await
        .expect("add");
    assert_eq!(outcome, ActionOutcome::Created);
    assert_eq!(store.insert_calls.load(Ordering::SeqCst), 1);

    let added_id = app.session().expect("session").cache().movies()[0].id;
    let outcome = app
        .dispatch(UserIntent::MarkWatched {
            id: added_id,
            rating: 8.0,
            review: "tense".to_string(),
        })
        .await
        .expect("mark watched");
    assert_eq!(outcome, ActionOutcome::Updated);
    assert_eq!(store.update_calls.load(Ordering::SeqCst), 1);

    let row = app.session().expect("session").cache().get(added_id).expect("row");
    assert!(row.is_watched);
    assert_eq!(row.rating, Some(8.0));
    assert_eq!(row.review.as_deref(), Some("tense"));

    let outcome = app
        .dispatch(UserIntent::ResetWatched { id: added_id })
        .await
        .expect("reset");
    assert_eq!(outcome, ActionOutcome::Updated);
    let row = app.session().expect("session").cache().get(added_id).expect("row");
    assert!(!row.is_watched);
    assert_eq!(row.rating, None);

    let outcome = app
        .dispatch(UserIntent::DeleteMovie { id: added_id })
        .await
        .expect("delete");
    assert_eq!(outcome, ActionOutcome::Deleted);
    assert!(app.session().expect("session").cache().get(added_id).is_none());

    let outcome = app.dispatch(UserIntent::Refresh).await.expect("refresh");
    assert_eq!(outcome, ActionOutcome::Refreshed);
    // Sign-in fetched once, refresh fetched again.
    assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn owner_scoping_reaches_the_store_on_every_mutation() {
    let other = UserId::new("user-2");
    let mut foreign = movie(7, "Not Yours");
    foreign.user_id = other;
    let store = Arc::new(FakeStore::with_rows(vec![foreign.clone(), movie(1, "Heat")]));
    let mut app = app(store.clone(), Arc::new(FakeIdentity::new(owner())));
    app.sign_in("user@example.com", "hunter2").await.expect("sign in");

    // The foreign row never reaches this user's cache.
    assert!(app.session().expect("session").cache().get(7).is_none());

    // A delete aimed at the foreign id is scoped by owner and removes
    // nothing remotely.
    app.dispatch(UserIntent::DeleteMovie { id: 7 }).await.expect("delete");
    assert!(store.rows.lock().unwrap().iter().any(|m| m.id == 7));
}
