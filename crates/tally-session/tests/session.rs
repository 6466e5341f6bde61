//! Session context behavior against a scripted API.

use std::cell::{Cell, RefCell};

use chrono::{DateTime, Duration, TimeZone, Utc};
use tally_session::{
    AuthApi, AuthResponse, Credentials, FileTokenStore, MemoryTokenStore, Registration, Result,
    SessionConfig, SessionContext, SessionError, TokenPair, TokenStore, UserProfile,
};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
}

fn user() -> UserProfile {
    UserProfile {
        id: "u-1".to_string(),
        email: "ana@example.com".to_string(),
        name: Some("Ana".to_string()),
    }
}

/// Accepts exactly one access token; everything else is a 401.
#[derive(Default)]
struct FakeApi {
    valid_access: RefCell<String>,
    refresh_ok: Cell<bool>,
    refresh_calls: Cell<usize>,
    password_changes: Cell<usize>,
}

impl FakeApi {
    fn accepting(access: &str) -> Self {
        let api = Self::default();
        *api.valid_access.borrow_mut() = access.to_string();
        api.refresh_ok.set(true);
        api
    }

    fn check(&self, token: &str) -> Result<()> {
        if *self.valid_access.borrow() == token {
            Ok(())
        } else {
            Err(SessionError::Unauthorized)
        }
    }
}

impl AuthApi for FakeApi {
    fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        if credentials.password != "secret" {
            return Err(SessionError::Transport("401 bad credentials".to_string()));
        }
        Ok(AuthResponse {
            tokens: TokenPair::new(self.valid_access.borrow().clone(), "refresh-1", None),
            user: user(),
        })
    }

    fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        let mut user = user();
        user.name = registration.name.clone();
        Ok(AuthResponse {
            tokens: TokenPair::new(self.valid_access.borrow().clone(), "refresh-1", None),
            user,
        })
    }

    fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        self.refresh_calls.set(self.refresh_calls.get() + 1);
        if !self.refresh_ok.get() || refresh_token.is_empty() {
            return Err(SessionError::Transport("refresh rejected".to_string()));
        }
        let next = format!("access-{}", self.refresh_calls.get() + 1);
        *self.valid_access.borrow_mut() = next.clone();
        Ok(TokenPair::new(next, "refresh-2", None))
    }

    fn current_user(&self, access_token: &str) -> Result<UserProfile> {
        self.check(access_token)?;
        Ok(user())
    }

    fn change_password(&self, access_token: &str, _current: &str, _new: &str) -> Result<()> {
        self.check(access_token)?;
        self.password_changes.set(self.password_changes.get() + 1);
        Ok(())
    }
}

fn session(api: FakeApi, store: MemoryTokenStore) -> SessionContext<FakeApi, MemoryTokenStore> {
    SessionContext::new(api, store, SessionConfig::default()).with_clock(fixed_now)
}

#[test]
fn login_persists_tokens() {
    let mut session = session(FakeApi::accepting("access-1"), MemoryTokenStore::default());
    let profile = session
        .login(&Credentials::new("ana@example.com", "secret"))
        .unwrap();
    assert_eq!(profile.email, "ana@example.com");
    assert!(session.is_authenticated());
    assert_eq!(session.access_token(), Some("access-1"));
}

#[test]
fn login_rejects_blank_fields_locally() {
    let mut session = session(FakeApi::accepting("access-1"), MemoryTokenStore::default());
    let err = session.login(&Credentials::new("", "secret")).unwrap_err();
    assert!(matches!(err, SessionError::InvalidCredentials(_)));
    assert!(!session.is_authenticated());
}

#[test]
fn register_signs_in() {
    let mut session = session(FakeApi::accepting("access-1"), MemoryTokenStore::default());
    let registration = Registration {
        credentials: Credentials::new("ana@example.com", "secret"),
        name: Some("Ana M.".to_string()),
    };
    let profile = session.register(&registration).unwrap();
    assert_eq!(profile.name.as_deref(), Some("Ana M."));
    assert!(session.is_authenticated());
}

#[test]
fn unauthorized_call_refreshes_once_and_retries() {
    let api = FakeApi::accepting("access-1");
    let store = MemoryTokenStore::with_tokens(TokenPair::new("stale", "refresh-1", None));
    let mut session = session(api, store);
    assert!(session.restore().unwrap());

    assert_eq!(session.api().refresh_calls.get(), 1);
    assert_eq!(session.access_token(), Some("access-2"));
    assert_eq!(session.user(), Some(&user()));
}

#[test]
fn second_unauthorized_is_returned_without_another_refresh() {
    let mut session = session(FakeApi::accepting("access-1"), MemoryTokenStore::default());
    session
        .login(&Credentials::new("ana@example.com", "secret"))
        .unwrap();

    let err = session
        .authorized(|_, _| -> Result<()> { Err(SessionError::Unauthorized) })
        .unwrap_err();
    assert!(matches!(err, SessionError::Unauthorized));
    assert_eq!(session.api().refresh_calls.get(), 1);
    assert!(session.is_authenticated());
}

#[test]
fn failed_refresh_clears_session() {
    let api = FakeApi::accepting("access-1");
    api.refresh_ok.set(false);
    let store = MemoryTokenStore::with_tokens(TokenPair::new("stale", "refresh-1", None));
    let mut session = session(api, store);

    assert!(!session.restore().unwrap());
    assert!(!session.is_authenticated());

    let err = session.change_password("old", "new").unwrap_err();
    assert!(matches!(err, SessionError::NotAuthenticated));
    assert!(err.requires_login());
}

#[test]
fn near_expiry_refreshes_before_calling() {
    let api = FakeApi::accepting("access-1");
    let store = MemoryTokenStore::with_tokens(TokenPair::new(
        "access-1",
        "refresh-1",
        Some(fixed_now() + Duration::seconds(5)),
    ));
    let mut session = session(api, store);

    assert!(session.restore().unwrap());
    assert_eq!(session.api().refresh_calls.get(), 1);
    assert_eq!(session.access_token(), Some("access-2"));
}

#[test]
fn change_password_goes_through_authorized_call() {
    let mut session = session(FakeApi::accepting("access-1"), MemoryTokenStore::default());
    session
        .login(&Credentials::new("ana@example.com", "secret"))
        .unwrap();

    session.change_password("secret", "better-secret").unwrap();
    assert_eq!(session.api().password_changes.get(), 1);

    let err = session.change_password("same", "same").unwrap_err();
    assert!(matches!(err, SessionError::InvalidCredentials(_)));
}

#[test]
fn configured_token_path_persists_across_contexts() {
    let dir = tempfile::tempdir().unwrap();
    let config = SessionConfig {
        token_path: Some(dir.path().join("session.json")),
        ..SessionConfig::default()
    };

    let mut first = SessionContext::new(
        FakeApi::accepting("access-1"),
        config.token_store(),
        config.clone(),
    );
    first
        .login(&Credentials::new("ana@example.com", "secret"))
        .unwrap();

    let mut second = SessionContext::new(
        FakeApi::accepting("access-1"),
        config.token_store(),
        config,
    );
    assert!(second.restore().unwrap());
    assert_eq!(second.access_token(), Some("access-1"));
}

#[test]
fn logout_forgets_file_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("session.json"));
    let mut session = SessionContext::new(
        FakeApi::accepting("access-1"),
        store.clone(),
        SessionConfig::default(),
    );

    session
        .login(&Credentials::new("ana@example.com", "secret"))
        .unwrap();
    assert!(store.load().unwrap().is_some());

    session.logout().unwrap();
    assert!(store.load().unwrap().is_none());
    assert!(session.user().is_none());
}
