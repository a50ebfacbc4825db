//! Per-call request descriptors

use reqwest::Method;
use serde::Serialize;

use crate::error::Result;

/// Everything needed to issue one API call. Built per call, never stored.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path under the base URL, starting with `/api`
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub requires_auth: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            requires_auth: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: &impl Serialize) -> Result<Self> {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: &impl Serialize) -> Result<Self> {
        Self::new(Method::PUT, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: &impl Serialize) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Send without a bearer token (login and registration)
    pub fn public(mut self) -> Self {
        self.requires_auth = false;
        self
    }
}
