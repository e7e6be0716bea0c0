//! End-to-end workflow tests: a real `Store` running the application reducer
//! against the in-memory reservation service.

#![allow(clippy::unwrap_used)]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tripsync::reducers::BUSY_MESSAGE;
use tripsync::reducers::notifications::UNEXPECTED_FAILURE;
use tripsync::{AppAction, AppEnvironment, AppState, AppStore, AuthPhase, Screen, build_store};
use tripsync_core::environment::ReservationApi;
use tripsync_core::error::ApiError;
use tripsync_core::ticket::{Credentials, Registration, Ticket, TicketId, TicketPayload};
use tripsync_testing::fixtures::ticket;
use tripsync_testing::{ApiCall, ApiOperation, MockReservationApi, ScriptedConfirmer, test_clock};

fn store_with<A>(api: A, confirmer: ScriptedConfirmer) -> AppStore<A, ScriptedConfirmer>
where
    A: ReservationApi + 'static,
{
    store_with_ttl(api, confirmer, Duration::from_secs(4))
}

fn store_with_ttl<A>(api: A, confirmer: ScriptedConfirmer, ttl: Duration) -> AppStore<A, ScriptedConfirmer>
where
    A: ReservationApi + 'static,
{
    build_store(AppEnvironment::new(api, confirmer, Arc::new(test_clock()), ttl))
}

async fn run<A>(store: &AppStore<A, ScriptedConfirmer>, action: AppAction)
where
    A: ReservationApi + 'static,
{
    let mut handle = store.send(action).await.unwrap();
    handle
        .wait_with_timeout(Duration::from_secs(5))
        .await
        .unwrap();
}

async fn snapshot<A>(store: &AppStore<A, ScriptedConfirmer>) -> AppState
where
    A: ReservationApi + 'static,
{
    store.state(Clone::clone).await
}

fn messages(state: &AppState) -> Vec<String> {
    state.notifications.iter().map(|n| n.message.clone()).collect()
}

#[tokio::test]
async fn reserve_a_ticket_end_to_end() {
    let api = MockReservationApi::new().with_user("asha", "secret1");
    let store = store_with(api.clone(), ScriptedConfirmer::always(true));

    run(&store, AppAction::login("asha", "secret1")).await;
    let state = snapshot(&store).await;
    assert_eq!(state.session_username.as_deref(), Some("asha"));
    assert_eq!(state.auth_phase, AuthPhase::Authenticated);
    assert_eq!(state.screen, Screen::Dashboard);
    assert!(state.tickets.is_empty());
    assert!(messages(&state).contains(&"Welcome back, asha!".to_string()));

    run(&store, AppAction::select_train("Local Passenger")).await;
    assert_eq!(snapshot(&store).await.draft.price, Some(150.0));

    run(&store, AppAction::select_source("New Delhi")).await;
    run(&store, AppAction::select_destination("Mumbai Central")).await;
    run(&store, AppAction::SaveTicket).await;

    let state = snapshot(&store).await;
    assert_eq!(state.tickets.len(), 1);
    let saved = &state.tickets[0];
    assert_eq!(saved.train_name, "Local Passenger");
    assert_eq!(saved.source, "New Delhi");
    assert_eq!(saved.destination, "Mumbai Central");
    assert!((saved.price - 150.0).abs() < f64::EPSILON);
    assert!(state.draft.train_name.is_empty());
    assert!(!state.loading);
    assert!(messages(&state).contains(&"Ticket reserved successfully!".to_string()));

    let operations: Vec<ApiOperation> = api.calls().iter().map(ApiCall::operation).collect();
    assert_eq!(
        operations,
        vec![
            ApiOperation::Login,
            ApiOperation::ListTickets,
            ApiOperation::CreateTicket,
            ApiOperation::ListTickets,
        ]
    );
}

#[tokio::test]
async fn sign_in_settles_with_the_users_tickets_loaded() {
    let api = MockReservationApi::new()
        .with_user("asha", "secret1")
        .with_ticket(ticket("t-1", "asha", "Local Passenger", "Kanpur", "Lucknow"))
        .with_ticket(ticket("t-2", "ravi", "Duronto Express", "Pune", "Nagpur"));
    let store = store_with(api, ScriptedConfirmer::always(true));

    let loaded = store
        .send_and_wait_for(
            AppAction::login("asha", "secret1"),
            |action| matches!(action, AppAction::TicketsLoaded { .. }),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    let AppAction::TicketsLoaded { tickets, .. } = loaded else {
        unreachable!("predicate only matches TicketsLoaded");
    };
    assert_eq!(tickets.len(), 1);
    let state = snapshot(&store).await;
    assert_eq!(state.tickets, tickets);
    assert!(!state.loading);
}

#[tokio::test]
async fn edit_uses_update_with_catalog_fare() {
    let existing = ticket("t-7", "asha", "Duronto Express", "Pune", "Nagpur");
    let api = MockReservationApi::new()
        .with_user("asha", "secret1")
        .with_ticket(existing.clone())
        .with_opaque_acknowledgements();
    let store = store_with(api.clone(), ScriptedConfirmer::always(true));

    run(&store, AppAction::login("asha", "secret1")).await;
    run(&store, AppAction::EditTicket { ticket: existing }).await;
    assert_eq!(
        snapshot(&store).await.editing_ticket_id,
        Some(TicketId::new("t-7"))
    );

    run(&store, AppAction::select_train("Vande Bharat Express")).await;
    run(&store, AppAction::SaveTicket).await;

    let state = snapshot(&store).await;
    assert!(state.editing_ticket_id.is_none());
    assert!(messages(&state).contains(&"Ticket updated successfully!".to_string()));
    assert_eq!(state.tickets[0].train_name, "Vande Bharat Express");
    assert!((state.tickets[0].price - 2500.0).abs() < f64::EPSILON);
    assert!(api.calls().iter().any(|call| matches!(
        call,
        ApiCall::UpdateTicket(id, payload) if id.as_str() == "t-7" && payload.price > 2499.0
    )));
}

#[tokio::test]
async fn register_then_sign_in() {
    let api = MockReservationApi::new();
    let store = store_with(api, ScriptedConfirmer::always(true));

    run(&store, AppAction::ShowRegister).await;
    run(&store, AppAction::register("ravi", Some("ravi@example.com"), "secret1")).await;

    let state = snapshot(&store).await;
    assert_eq!(state.screen, Screen::Login);
    assert_eq!(state.auth_phase, AuthPhase::Anonymous);
    assert_eq!(
        state.notifications.latest().map(|n| n.message.as_str()),
        Some("Account created successfully! Please sign in to continue.")
    );

    run(&store, AppAction::login("ravi", "secret1")).await;
    assert_eq!(snapshot(&store).await.screen, Screen::Dashboard);
}

#[tokio::test]
async fn logout_while_anonymous_changes_nothing() {
    let api = MockReservationApi::new();
    let confirmer = ScriptedConfirmer::always(true);
    let store = store_with(api.clone(), confirmer.clone());
    let before = snapshot(&store).await;

    run(&store, AppAction::Logout).await;

    let after = snapshot(&store).await;
    assert_eq!(after.session_username, before.session_username);
    assert_eq!(after.screen, Screen::Login);
    assert_eq!(
        after.notifications.latest().map(|n| n.message.as_str()),
        Some("You are not currently signed in")
    );
    assert!(confirmer.prompts().is_empty());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn confirmed_logout_ends_the_session() {
    let api = MockReservationApi::new()
        .with_user("asha", "secret1")
        .with_ticket(ticket("t-1", "asha", "Local Passenger", "Pune", "Kanpur"));
    let confirmer = ScriptedConfirmer::answers([true]);
    let store = store_with(api, confirmer.clone());

    run(&store, AppAction::login("asha", "secret1")).await;
    assert_eq!(snapshot(&store).await.tickets.len(), 1);

    run(&store, AppAction::Logout).await;

    let state = snapshot(&store).await;
    assert_eq!(confirmer.prompts(), vec!["Sign out from asha's account?".to_string()]);
    assert!(state.session_username.is_none());
    assert!(state.tickets.is_empty());
    assert_eq!(state.screen, Screen::Login);
    assert_eq!(
        state.notifications.latest().map(|n| n.message.as_str()),
        Some("Successfully signed out. Goodbye, asha!")
    );
}

#[tokio::test]
async fn cancel_asks_then_refreshes() {
    let api = MockReservationApi::new()
        .with_user("asha", "secret1")
        .with_ticket(ticket("t-1", "asha", "Local Passenger", "Pune", "Kanpur"))
        .with_ticket(ticket("t-2", "asha", "Intercity Express", "Jaipur", "Lucknow"));
    let confirmer = ScriptedConfirmer::answers([false, true]);
    let store = store_with(api.clone(), confirmer.clone());

    run(&store, AppAction::login("asha", "secret1")).await;

    let cancel = AppAction::DeleteTicket {
        ticket_id: TicketId::new("t-1"),
    };
    run(&store, cancel.clone()).await;
    assert_eq!(snapshot(&store).await.tickets.len(), 2);
    assert_eq!(api.call_count(ApiOperation::DeleteTicket), 0);

    run(&store, cancel).await;
    let state = snapshot(&store).await;
    assert_eq!(state.tickets.len(), 1);
    assert_eq!(state.tickets[0].id, TicketId::new("t-2"));
    assert_eq!(confirmer.prompts().len(), 2);
    assert!(messages(&state).contains(&"Ticket cancelled successfully".to_string()));
}

#[tokio::test]
async fn failed_save_keeps_form_and_reports_server_message() {
    let api = MockReservationApi::new().with_user("asha", "secret1");
    let store = store_with(api.clone(), ScriptedConfirmer::always(true));

    run(&store, AppAction::login("asha", "secret1")).await;
    run(&store, AppAction::select_train("Garib Rath Express")).await;
    run(&store, AppAction::select_source("Kolkata")).await;
    run(&store, AppAction::select_destination("Hyderabad")).await;

    api.fail_next(
        ApiOperation::CreateTicket,
        ApiError::http(503, "Service Unavailable", "No seats left"),
    );
    run(&store, AppAction::SaveTicket).await;

    let state = snapshot(&store).await;
    assert_eq!(state.draft.train_name, "Garib Rath Express");
    assert!(state.tickets.is_empty());
    assert!(!state.loading);
    assert_eq!(
        state.notifications.latest().map(|n| n.message.as_str()),
        Some("Failed to save ticket: No seats left")
    );
}

#[tokio::test]
async fn second_request_is_refused_while_first_is_in_flight() {
    let api = MockReservationApi::new()
        .with_user("asha", "secret1")
        .with_latency(Duration::from_millis(100));
    let store = store_with(api.clone(), ScriptedConfirmer::always(true));

    run(&store, AppAction::login("asha", "secret1")).await;

    let mut first = store.send(AppAction::LoadTickets).await.unwrap();
    run(&store, AppAction::LoadTickets).await;
    assert_eq!(
        snapshot(&store).await.notifications.latest().map(|n| n.message.as_str()),
        Some(BUSY_MESSAGE)
    );

    first.wait().await;
    assert!(!snapshot(&store).await.loading);
    // Dashboard load plus the accepted refresh
    assert_eq!(api.call_count(ApiOperation::ListTickets), 2);
}

#[tokio::test]
async fn stale_completion_is_ignored() {
    let api = MockReservationApi::new().with_user("asha", "secret1");
    let store = store_with(api, ScriptedConfirmer::always(true));
    run(&store, AppAction::login("asha", "secret1")).await;

    run(
        &store,
        AppAction::TicketsLoaded {
            generation: 99,
            tickets: vec![ticket("t-9", "mallory", "Local Passenger", "Pune", "Kanpur")],
        },
    )
    .await;

    assert!(snapshot(&store).await.tickets.is_empty());
}

#[tokio::test]
async fn notifications_expire() {
    let api = MockReservationApi::new();
    let store = store_with_ttl(api, ScriptedConfirmer::always(true), Duration::from_millis(30));

    let mut observer = store.subscribe_actions();

    run(&store, AppAction::Logout).await;
    let shown = snapshot(&store).await;
    assert_eq!(shown.notifications.len(), 1);
    let id = shown.notifications.latest().unwrap().id;

    let dismissed = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let Ok(AppAction::DismissNotification { id: expired }) = observer.recv().await {
                return expired;
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(dismissed, id);
    assert!(snapshot(&store).await.notifications.is_empty());
}

/// A service whose every call panics, standing in for a defect in an effect.
struct PanickingApi;

#[allow(clippy::panic)]
async fn explode<T>(operation: &'static str) -> T {
    panic!("{operation} exploded")
}

impl ReservationApi for PanickingApi {
    fn register(&self, _: &Registration) -> impl Future<Output = Result<(), ApiError>> + Send {
        explode("register")
    }

    fn login(&self, _: &Credentials) -> impl Future<Output = Result<(), ApiError>> + Send {
        explode("login")
    }

    fn create_ticket(&self, _: &TicketPayload) -> impl Future<Output = Result<Option<Ticket>, ApiError>> + Send {
        explode("create_ticket")
    }

    fn update_ticket(
        &self,
        _: &TicketId,
        _: &TicketPayload,
    ) -> impl Future<Output = Result<Option<Ticket>, ApiError>> + Send {
        explode("update_ticket")
    }

    fn list_tickets(&self, _: &str) -> impl Future<Output = Result<Vec<Ticket>, ApiError>> + Send {
        explode("list_tickets")
    }

    fn delete_ticket(&self, _: &TicketId) -> impl Future<Output = Result<(), ApiError>> + Send {
        explode("delete_ticket")
    }
}

#[tokio::test]
async fn panicking_effect_becomes_unexpected_failure() {
    let store = store_with(PanickingApi, ScriptedConfirmer::always(true));

    run(&store, AppAction::login("asha", "secret1")).await;

    let state = snapshot(&store).await;
    assert!(state.pending.is_none());
    assert!(!state.loading);
    assert_eq!(state.auth_phase, AuthPhase::Anonymous);
    assert_eq!(
        state.notifications.latest().map(|n| n.message.as_str()),
        Some(UNEXPECTED_FAILURE)
    );

    // The guard is released, so the user can try again.
    let mut retry = store.send(AppAction::login("asha", "secret1")).await.unwrap();
    retry.wait().await;
    assert_eq!(snapshot(&store).await.request_generation, 2);
}
