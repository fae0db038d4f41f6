//! OAuth 1.0a request signing (HMAC-SHA1, RFC 5849).

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Key material for signing: the consumer pair plus an optional token pair.
/// The token pair is absent during the request-token leg of the authorize
/// dance.
#[derive(Clone)]
pub struct SigningKeys {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: Option<String>,
    pub token_secret: Option<String>,
}

/// Builds the `Authorization: OAuth ...` header for one request.
///
/// `query` must carry every query-string pair the request will send, since
/// the signature covers them. `oauth_extra` carries protocol parameters such
/// as `oauth_callback` or `oauth_verifier` that live in the header itself.
pub fn authorization_header(
    keys: &SigningKeys,
    method: &str,
    url: &str,
    query: &[(&str, &str)],
    oauth_extra: &[(&str, &str)],
) -> String {
    let nonce = hex::encode(rand::random::<[u8; 16]>());
    let timestamp = Utc::now().timestamp().to_string();
    build_header(keys, method, url, query, oauth_extra, &nonce, &timestamp)
}

fn build_header(
    keys: &SigningKeys,
    method: &str,
    url: &str,
    query: &[(&str, &str)],
    oauth_extra: &[(&str, &str)],
    nonce: &str,
    timestamp: &str,
) -> String {
    let mut oauth_params: Vec<(String, String)> = vec![
        ("oauth_consumer_key".to_string(), keys.consumer_key.clone()),
        ("oauth_nonce".to_string(), nonce.to_string()),
        ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
        ("oauth_timestamp".to_string(), timestamp.to_string()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];
    if let Some(token) = &keys.token {
        oauth_params.push(("oauth_token".to_string(), token.clone()));
    }
    for (name, value) in oauth_extra {
        oauth_params.push((name.to_string(), value.to_string()));
    }

    let mut all: Vec<(&str, &str)> = oauth_params
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    all.extend(query.iter().copied());

    let base = signature_base_string(method, url, &all);
    let signature = sign(&base, &keys.consumer_secret, keys.token_secret.as_deref());
    oauth_params.push(("oauth_signature".to_string(), signature));
    oauth_params.sort();

    let fields = oauth_params
        .iter()
        .map(|(name, value)| format!("{}=\"{}\"", percent_encode(name), percent_encode(value)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {fields}")
}

/// `METHOD&encoded-url&encoded-sorted-params` per RFC 5849 section 3.4.1.
fn signature_base_string(method: &str, url: &str, params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(name, value)| (percent_encode(name), percent_encode(value)))
        .collect();
    encoded.sort();
    let param_string = encoded
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    )
}

fn sign(base: &str, consumer_secret: &str, token_secret: Option<&str>) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret.unwrap_or_default())
    );
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("hmac accepts keys of any length");
    mac.update(base.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// RFC 3986 unreserved-set percent encoding; OAuth requires it everywhere.
fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Parses the form-encoded body returned by the token endpoints.
pub fn parse_form(body: &str) -> HashMap<String, String> {
    body.trim()
        .split('&')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = urlencoding::decode(name).ok()?.into_owned();
            let value = urlencoding::decode(value).ok()?.into_owned();
            Some((name, value))
        })
        .collect()
}
