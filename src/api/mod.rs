//! OAuth 1.0a signing and the platform's v2 endpoints.

pub mod client;
pub mod oauth;

pub use client::{AccessToken, ApiClient, RequestToken, TimelinePage, UserIdentity, PAGE_SIZE};
pub use oauth::SigningKeys;
