//! Blocking client for the platform's v2 endpoints.
//!
//! One client per invocation; requests are signed per-call with OAuth 1.0a.
//! HTTP failures are categorized into the error variants the exit-code
//! contract distinguishes.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::api::oauth::{self, SigningKeys};
use crate::error::{MoltError, Result};

/// Items requested per timeline page; the endpoint's maximum.
pub const PAGE_SIZE: usize = 100;

pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    keys: SigningKeys,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub username: String,
}

/// One page of timeline IDs plus the token for the next page, if any.
#[derive(Debug)]
pub struct TimelinePage {
    pub ids: Vec<String>,
    pub next_token: Option<String>,
}

/// Temporary credentials from the request-token leg of the authorize dance.
#[derive(Debug)]
pub struct RequestToken {
    pub token: String,
    pub secret: String,
}

#[derive(Debug)]
pub struct AccessToken {
    pub token: String,
    pub secret: String,
    pub screen_name: Option<String>,
}

#[derive(Deserialize)]
struct UserEnvelope {
    data: UserIdentity,
}

#[derive(Deserialize)]
struct TimelineEnvelope {
    #[serde(default)]
    data: Vec<TweetRef>,
    #[serde(default)]
    meta: Option<TimelineMeta>,
}

#[derive(Deserialize)]
struct TweetRef {
    id: String,
}

#[derive(Deserialize)]
struct TimelineMeta {
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Deserialize)]
struct DeleteEnvelope {
    data: DeleteData,
}

#[derive(Deserialize)]
struct DeleteData {
    deleted: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, keys: SigningKeys, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .user_agent(concat!("molt/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| MoltError::Config(format!("http client: {err}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            keys,
        })
    }

    /// Confirms the token works and resolves the account ID when it is
    /// not configured (`GET /2/users/me`).
    pub fn verify_credentials(&self) -> Result<UserIdentity> {
        let url = format!("{}/2/users/me", self.base_url);
        let envelope: UserEnvelope = self.get(&url, &[])?;
        Ok(envelope.data)
    }

    /// Fetches one page of the user's timeline (`GET /2/users/:id/tweets`).
    pub fn user_timeline(
        &self,
        user_id: &str,
        pagination_token: Option<&str>,
        max_results: usize,
    ) -> Result<TimelinePage> {
        let url = format!("{}/2/users/{}/tweets", self.base_url, user_id);
        let max = max_results.to_string();
        let mut query: Vec<(&str, &str)> = vec![("max_results", &max)];
        if let Some(token) = pagination_token {
            query.push(("pagination_token", token));
        }
        let envelope: TimelineEnvelope = self.get(&url, &query)?;
        Ok(TimelinePage {
            ids: envelope.data.into_iter().map(|tweet| tweet.id).collect(),
            next_token: envelope.meta.and_then(|meta| meta.next_token),
        })
    }

    /// Deletes one post and returns the platform's deleted flag.
    pub fn delete_post(&self, id: &str) -> Result<bool> {
        let url = format!("{}/2/tweets/{}", self.base_url, id);
        let auth = oauth::authorization_header(&self.keys, "DELETE", &url, &[], &[]);
        let response = self.http.delete(&url).header(AUTHORIZATION, auth).send()?;
        let envelope: DeleteEnvelope = Self::read_json(response)?;
        Ok(envelope.data.deleted)
    }

    /// `POST /oauth/request_token` with an out-of-band callback.
    pub fn fetch_request_token(&self) -> Result<RequestToken> {
        let url = format!("{}/oauth/request_token", self.base_url);
        let auth =
            oauth::authorization_header(&self.keys, "POST", &url, &[], &[("oauth_callback", "oob")]);
        let response = self.http.post(&url).header(AUTHORIZATION, auth).send()?;
        let form = Self::read_form(response)?;
        Ok(RequestToken {
            token: Self::form_field(&form, "oauth_token")?,
            secret: Self::form_field(&form, "oauth_token_secret")?,
        })
    }

    /// Where the user grants access and receives the PIN.
    pub fn authorize_url(&self, request_token: &str) -> String {
        format!(
            "{}/oauth/authorize?oauth_token={}",
            self.base_url,
            urlencoding::encode(request_token)
        )
    }

    /// Trades the request token and PIN for the long-lived user token
    /// pair (`POST /oauth/access_token`).
    pub fn fetch_access_token(&self, request: &RequestToken, verifier: &str) -> Result<AccessToken> {
        let url = format!("{}/oauth/access_token", self.base_url);
        let keys = SigningKeys {
            consumer_key: self.keys.consumer_key.clone(),
            consumer_secret: self.keys.consumer_secret.clone(),
            token: Some(request.token.clone()),
            token_secret: Some(request.secret.clone()),
        };
        let auth =
            oauth::authorization_header(&keys, "POST", &url, &[], &[("oauth_verifier", verifier)]);
        let response = self.http.post(&url).header(AUTHORIZATION, auth).send()?;
        let form = Self::read_form(response)?;
        Ok(AccessToken {
            token: Self::form_field(&form, "oauth_token")?,
            secret: Self::form_field(&form, "oauth_token_secret")?,
            screen_name: form.get("screen_name").cloned(),
        })
    }

    fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let auth = oauth::authorization_header(&self.keys, "GET", url, query, &[]);
        let response = self
            .http
            .get(url)
            .query(query)
            .header(AUTHORIZATION, auth)
            .send()?;
        Self::read_json(response)
    }

    fn read_json<T: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T> {
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(Self::categorize(status, &body));
        }
        serde_json::from_str(&body).map_err(|err| MoltError::Api {
            status: status.as_u16(),
            message: format!("unexpected response body: {err}"),
        })
    }

    fn read_form(response: reqwest::blocking::Response) -> Result<HashMap<String, String>> {
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(Self::categorize(status, &body));
        }
        Ok(oauth::parse_form(&body))
    }

    fn form_field(form: &HashMap<String, String>, name: &str) -> Result<String> {
        form.get(name).cloned().ok_or_else(|| MoltError::Api {
            status: 200,
            message: format!("token response missing {name}"),
        })
    }

    /// Maps an error response to the variant the exit-code contract needs.
    /// The platform reports the monthly cap as a 429 with a distinct title.
    fn categorize(status: StatusCode, body: &str) -> MoltError {
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .detail
            .clone()
            .or_else(|| parsed.title.clone())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        match status.as_u16() {
            401 | 403 => MoltError::Auth(message),
            429 if parsed.title.as_deref() == Some("UsageCapExceeded") => {
                MoltError::UsageCapExceeded(message)
            }
            429 => MoltError::RateLimited(message),
            _ => MoltError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}
