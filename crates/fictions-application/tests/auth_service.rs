use fictions_application::AuthService;
use fictions_core::FictionsError;
use fictions_core::config::ClientConfig;
use fictions_core::session::{KeyValueStore, SessionStore, USER_KEY};
use fictions_infrastructure::MemoryStore;
use fictions_interaction::ApiClient;
use fictions_test_utils::MockBackend;
use std::sync::Arc;

struct Harness {
    backend: MockBackend,
    storage: Arc<MemoryStore>,
    store: Arc<SessionStore>,
    auth: AuthService,
}

async fn harness() -> Harness {
    let backend = MockBackend::start().await;
    let storage = Arc::new(MemoryStore::new());
    let store = Arc::new(SessionStore::new(storage.clone()));
    let config = ClientConfig::default().with_base_url(backend.base_url());
    let api = ApiClient::new(&config, store.clone()).unwrap();
    let auth = AuthService::new(api, store.clone());
    Harness {
        backend,
        storage,
        store,
        auth,
    }
}

#[tokio::test]
async fn login_then_logout() {
    let h = harness().await;
    let alice = h.backend.add_user("alice", "a@b.com", "secret1");
    assert!(!h.auth.is_authenticated());

    let user = h.auth.login("a@b.com", "secret1").await.unwrap();

    assert_eq!(user, alice);
    assert!(h.auth.is_authenticated());
    assert_eq!(h.auth.current_user(), Some(alice));
    assert!(h.store.token().unwrap().starts_with("token-"));

    h.auth.logout();

    assert!(!h.auth.is_authenticated());
    assert_eq!(h.auth.current_user(), None);
    assert_eq!(h.backend.request_count(), 1);
}

#[tokio::test]
async fn failed_login_leaves_session_unchanged() {
    let h = harness().await;
    let alice = h.backend.add_user("alice", "a@b.com", "secret1");
    h.store.save("previous", &alice).unwrap();

    let err = h.auth.login("a@b.com", "wrong-password").await.unwrap_err();

    assert_eq!(err, FictionsError::request(401, "Invalid email or password"));
    assert_eq!(h.store.token().as_deref(), Some("previous"));
    assert_eq!(h.auth.current_user(), Some(alice));
}

#[tokio::test]
async fn register_authenticates_immediately() {
    let h = harness().await;

    let user = h.auth.register("bob", "bob@b.com", "hunter22").await.unwrap();

    assert_eq!(user.username, "bob");
    assert!(h.auth.is_authenticated());
    assert_eq!(h.auth.current_user().unwrap().id, user.id);
}

#[tokio::test]
async fn short_password_is_rejected_without_a_request() {
    let h = harness().await;

    let err = h.auth.register("bob", "bob@b.com", "12345").await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.to_string(), "Password must be at least 6 characters");
    assert_eq!(h.backend.request_count(), 0);
    assert!(!h.auth.is_authenticated());
}

#[tokio::test]
async fn invalid_login_input_is_rejected_without_a_request() {
    let h = harness().await;

    assert!(h.auth.login("", "secret1").await.unwrap_err().is_validation());
    assert!(h.auth.login("not-an-email", "secret1").await.unwrap_err().is_validation());
    assert!(h.auth.login("a@b.com", "").await.unwrap_err().is_validation());
    assert_eq!(h.backend.request_count(), 0);
}

#[tokio::test]
async fn duplicate_registration_surfaces_backend_message() {
    let h = harness().await;
    h.backend.add_user("alice", "a@b.com", "secret1");

    let err = h.auth.register("alice2", "a@b.com", "secret1").await.unwrap_err();
    assert_eq!(err.to_string(), "Email already registered");

    let err = h.auth.register("alice", "other@b.com", "secret1").await.unwrap_err();
    assert_eq!(err.to_string(), "Username already taken");
    assert!(!h.auth.is_authenticated());
}

#[tokio::test]
async fn malformed_cached_user_reads_as_absent() {
    let h = harness().await;
    h.backend.add_user("alice", "a@b.com", "secret1");
    h.auth.login("a@b.com", "secret1").await.unwrap();

    h.storage.set(USER_KEY, "{not json").unwrap();

    assert!(h.auth.is_authenticated());
    assert_eq!(h.auth.current_user(), None);
}
