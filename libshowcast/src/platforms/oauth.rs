//! OAuth 1.0a request signing (RFC 5849, HMAC-SHA1).
//!
//! Only the signing side is implemented; token acquisition happens outside
//! this system. Request parameters that take part in the signature base
//! string are passed explicitly; JSON and multipart bodies do not.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use crate::credentials::TwitterCredentials;
use crate::error::{PlatformError, Result};

type HmacSha1 = Hmac<Sha1>;

/// Percent-encode with the RFC 3986 unreserved set, as OAuth requires.
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Build the `Authorization: OAuth ...` header value for a request.
///
/// `request_params` carries the query/form parameters of the request, which
/// must be covered by the signature.
pub fn authorization_header(
    credentials: &TwitterCredentials,
    method: &str,
    url: &str,
    request_params: &[(String, String)],
) -> Result<String> {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    let timestamp = chrono::Utc::now().timestamp().to_string();

    header_with(credentials, method, url, request_params, &nonce, &timestamp)
}

fn protocol_params(
    credentials: &TwitterCredentials,
    nonce: &str,
    timestamp: &str,
) -> Vec<(String, String)> {
    vec![
        (
            "oauth_consumer_key".to_string(),
            credentials.consumer_key.clone(),
        ),
        ("oauth_nonce".to_string(), nonce.to_string()),
        (
            "oauth_signature_method".to_string(),
            "HMAC-SHA1".to_string(),
        ),
        ("oauth_timestamp".to_string(), timestamp.to_string()),
        ("oauth_token".to_string(), credentials.access_token.clone()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ]
}

/// HMAC-SHA1 over the signature base string, base64-encoded.
fn signature(
    credentials: &TwitterCredentials,
    method: &str,
    url: &str,
    params: &[(String, String)],
) -> Result<String> {
    // Parameter string: each pair percent-encoded, then sorted.
    let mut pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect();
    pairs.sort();
    let param_string = pairs.join("&");

    let base = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&param_string)
    );
    let signing_key = format!(
        "{}&{}",
        encode(credentials.consumer_secret()),
        encode(credentials.access_token_secret())
    );

    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .map_err(|e| PlatformError::Posting(format!("Failed to build signing key: {}", e)))?;
    mac.update(base.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

fn header_with(
    credentials: &TwitterCredentials,
    method: &str,
    url: &str,
    request_params: &[(String, String)],
    nonce: &str,
    timestamp: &str,
) -> Result<String> {
    let mut oauth_params = protocol_params(credentials, nonce, timestamp);

    let mut all_params = oauth_params.clone();
    all_params.extend_from_slice(request_params);
    let signature = signature(credentials, method, url, &all_params)?;

    oauth_params.push(("oauth_signature".to_string(), signature));
    oauth_params.sort();

    let fields: Vec<String> = oauth_params
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", encode(key), encode(value)))
        .collect();
    Ok(format!("OAuth {}", fields.join(", ")))
}
