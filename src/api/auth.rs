//! Token exchange endpoints. These are the only unauthenticated calls.

use crate::error::Result;
use crate::models::{AuthGrant, LoginRequest, Registration};

use super::{ApiClient, RequestDescriptor};

pub const REGISTER_PATH: &str = "/api/users/register";
pub const LOGIN_PATH: &str = "/api/users/login";

impl ApiClient {
    /// Create an account and receive a token for it
    pub async fn register(&self, form: &Registration) -> Result<AuthGrant> {
        let request = RequestDescriptor::post(REGISTER_PATH, form)?.public();
        self.fetch(request, "Error registering user").await
    }

    /// Exchange email and password for a token
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthGrant> {
        let request = RequestDescriptor::post(LOGIN_PATH, credentials)?.public();
        self.fetch(request, "Error logging in").await
    }
}
