//! The session store: single source of truth for who is logged in

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::models::{LoginRequest, Registration, User};
use crate::policy::Action;

use super::{CredentialStore, Session, SessionState, StoredCredentials};

/// Shared handle to the current session.
///
/// Cloning is cheap; every clone observes the same state. Each transition
/// that touches durable storage bumps a generation counter under a lock, and
/// a user lookup only publishes its result if no newer transition happened
/// while it was in flight. A slow lookup from an earlier login, or one that
/// finishes after a logout, is discarded.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    client: ApiClient,
    generation: Mutex<u64>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Create a store in the `Uninitialized` state. Credentials are read
    /// from, and written to, the client's credential store.
    pub fn new(client: ApiClient) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            inner: Arc::new(Inner {
                client,
                generation: Mutex::new(0),
                state,
            }),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    fn credentials(&self) -> &dyn CredentialStore {
        self.inner.client.credentials().as_ref()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.state.borrow().session().cloned()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().user().cloned()
    }

    /// Watch for state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Wait until the session is either authenticated or unauthenticated
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(|state| !state.is_pending()).await {
            Ok(state) => state.clone(),
            // The sender lives in `self`, so the channel cannot close here
            Err(_) => self.state(),
        };
        settled
    }

    /// Restore the session persisted by an earlier run.
    ///
    /// Without stored credentials the session becomes unauthenticated.
    /// Otherwise the stored user id is resolved exactly as `login` does.
    pub async fn initialize(&self) -> SessionState {
        let generation = self.begin();

        let stored = match self.credentials().load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "stored credentials unreadable, discarding");
                self.finish(generation, Outcome::Rejected);
                return self.state();
            }
        };

        match stored {
            Some(credentials) => self.resolve(generation, credentials).await,
            None => {
                tracing::debug!("no stored session");
                self.finish(generation, Outcome::Unavailable);
            }
        }

        self.state()
    }

    /// Persist a token grant and resolve the user it belongs to.
    ///
    /// Only a storage failure is returned as an error. If the user lookup
    /// fails, the failure is logged and the session ends unauthenticated.
    /// The stored credentials are dropped only when the server rejected
    /// them; an unreachable server leaves them for the next attempt.
    pub async fn login(
        &self,
        user_id: i64,
        access_token: impl Into<String>,
    ) -> Result<SessionState> {
        let credentials = StoredCredentials::new(user_id, access_token);
        let generation = self.begin_with(&credentials)?;
        self.resolve(generation, credentials).await;
        Ok(self.state())
    }

    /// Clear the in-memory session, then the persisted credentials.
    ///
    /// The in-memory session is always cleared. A failed storage clear is
    /// retried once; if that fails too the error is returned and the stale
    /// credentials stay on disk until the next `logout` or rejected lookup.
    pub fn logout(&self) -> Result<()> {
        let mut generation = self.lock_generation();
        *generation += 1;
        self.inner.state.send_replace(SessionState::Unauthenticated);
        tracing::info!("logged out");

        if let Err(e) = self.credentials().clear() {
            tracing::warn!(error = %e, "failed to clear stored credentials, retrying");
            return self.credentials().clear().inspect_err(|e| {
                tracing::error!(error = %e, "stored credentials survived logout");
            });
        }
        Ok(())
    }

    /// Create an account and log into it
    pub async fn register(&self, form: &Registration) -> Result<SessionState> {
        let grant = self.inner.client.register(form).await?;
        self.login(grant.id, grant.access_token).await
    }

    /// Exchange email and password for a token and log in
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionState> {
        let grant = self
            .inner
            .client
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        self.login(grant.id, grant.access_token).await
    }

    /// Users visible to the logged-in account, as scoped by its role
    pub async fn visible_users(&self) -> Result<Vec<User>> {
        let session = self.current().ok_or(Error::NotAuthenticated)?;
        self.inner.client.users().visible_to(session.user_id()).await
    }

    /// Whether a view may offer `action` on the record with id `target`
    pub fn can(&self, action: Action, target: Option<i64>) -> bool {
        self.inner.state.borrow().permits(action, target)
    }

    /// Like [`can`](Self::can), with the reason as an error
    pub fn authorize(&self, action: Action, target: Option<i64>) -> Result<()> {
        let state = self.inner.state.borrow();
        if !state.is_authenticated() {
            return Err(Error::NotAuthenticated);
        }
        if state.permits(action, target) {
            Ok(())
        } else {
            Err(Error::NotPermitted(action))
        }
    }

    fn lock_generation(&self) -> MutexGuard<'_, u64> {
        self.inner
            .generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a resolution without touching storage
    fn begin(&self) -> u64 {
        let mut generation = self.lock_generation();
        *generation += 1;
        self.inner.state.send_replace(SessionState::Resolving);
        *generation
    }

    /// Persist credentials and start resolving them
    fn begin_with(&self, credentials: &StoredCredentials) -> Result<u64> {
        let mut generation = self.lock_generation();
        self.credentials().save(credentials)?;
        *generation += 1;
        self.inner.state.send_replace(SessionState::Resolving);
        Ok(*generation)
    }

    async fn resolve(&self, generation: u64, credentials: StoredCredentials) {
        let user_id = credentials.user_id;
        match self.inner.client.users().get(user_id).await {
            Ok(user) => {
                let session = Session {
                    user,
                    access_token: credentials.access_token,
                };
                if self.finish(generation, Outcome::Authenticated(session)) {
                    tracing::info!(user_id, "session authenticated");
                }
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "failed to resolve session user");
                let outcome = if rejects_credentials(&e) {
                    Outcome::Rejected
                } else {
                    Outcome::Unavailable
                };
                self.finish(generation, outcome);
            }
        }
    }

    /// Publish the outcome of resolution `generation`, unless something newer
    /// has happened since.
    fn finish(&self, generation: u64, outcome: Outcome) -> bool {
        let current = self.lock_generation();
        if *current != generation {
            tracing::debug!(generation, current = *current, "discarding stale session resolution");
            return false;
        }

        match outcome {
            Outcome::Authenticated(session) => {
                self.inner
                    .state
                    .send_replace(SessionState::Authenticated(session));
            }
            Outcome::Rejected => {
                if let Err(e) = self.credentials().clear() {
                    tracing::warn!(error = %e, "failed to clear stored credentials");
                }
                self.inner.state.send_replace(SessionState::Unauthenticated);
            }
            Outcome::Unavailable => {
                self.inner.state.send_replace(SessionState::Unauthenticated);
            }
        }
        true
    }
}

/// How a resolution ended
enum Outcome {
    Authenticated(Session),
    /// The server refused the stored credentials, so they are dropped
    Rejected,
    /// No verdict on the credentials; storage is left alone
    Unavailable,
}

/// 401/403 mean the token is no good; 404 means its user is gone
fn rejects_credentials(err: &Error) -> bool {
    matches!(err.status(), Some(401 | 403 | 404))
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.inner.state.borrow().label())
            .finish_non_exhaustive()
    }
}
