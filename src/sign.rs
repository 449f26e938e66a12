//! OAuth 1.0 base-string construction and HMAC-SHA1 signature computation.
//!
//! All three helpers are pure: identical inputs always produce byte-identical
//! output, which the golden-vector tests below rely on.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;
// self
use crate::{http::Method, query};

type HmacSha1 = Hmac<Sha1>;

/// Builds the canonical signable representation of a request.
///
/// Both the resource URL and the canonical query string are percent-encoded as
/// single tokens, so any `%` they already contain is encoded again. That double
/// encoding is required by the OAuth 1.0 base-string rules, not a bug.
pub fn base_string(method: Method, resource_url: &str, canonical_query: &str) -> String {
	format!(
		"{}&{}&{}",
		method.as_str(),
		query::percent_encode(resource_url),
		query::percent_encode(canonical_query)
	)
}

/// Derives the HMAC key as `{consumer_secret}&{token_secret-or-empty}`.
pub fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
	format!("{consumer_secret}&{}", token_secret.unwrap_or_default())
}

/// Computes `base64(HMAC-SHA1(key, base_string))` with newline characters stripped.
pub fn sign(key: &str, base_string: &str) -> String {
	let mut mac =
		HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC-SHA1 accepts keys of any length.");

	mac.update(base_string.as_bytes());

	STANDARD.encode(mac.finalize().into_bytes()).replace(['\r', '\n'], "")
}
