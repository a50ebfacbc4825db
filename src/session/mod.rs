//! Client-side session: who is logged in, and how that survives a restart

mod state;
mod storage;
mod store;

pub use state::{Session, SessionState};
pub use storage::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StoredCredentials};
pub use store::SessionStore;
