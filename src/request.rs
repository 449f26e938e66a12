//! Signed request assembly: per-call context, `oauth_*` parameter packaging,
//! and pure URL signing.
//!
//! Signing never mutates the caller's [`QuerySet`]; it clones the parameter
//! set, appends `oauth_signature`, and hands back a [`SignedRequest`]. Calling
//! it twice on the same context yields the same result instead of stacking a
//! second signature over the first.

// crates.io
use rand::Rng;
// self
use crate::{
	_prelude::*,
	http::Method,
	provider::{CatalogDescriptor, SIGNATURE_METHOD},
	query::{OAUTH_SIGNATURE_KEY, QuerySet},
	sign,
};

/// Protocol version advertised in every signed request.
pub const OAUTH_VERSION: &str = "1.0";

/// Merges the fixed `oauth_*` parameter set into `query`.
///
/// Stamps the current unix time and a fresh 64-bit random nonce, rendered as
/// a decimal integer.
pub fn apply_oauth_parameters(query: &mut QuerySet, consumer_key: &str) {
	query.extend([
		("oauth_consumer_key", consumer_key),
		("oauth_signature_method", SIGNATURE_METHOD),
		("oauth_timestamp", &OffsetDateTime::now_utc().unix_timestamp().to_string()),
		("oauth_nonce", &rand::rng().random::<u64>().to_string()),
		("oauth_version", OAUTH_VERSION),
	]);
}

/// Per-call state for one outbound signed request.
///
/// Created per call and discarded after use; reusing a context across
/// unrelated requests would carry stale `oauth_*` fields into the next
/// signature.
#[derive(Clone, Debug)]
pub struct RequestContext {
	/// Resource path relative to the descriptor's API base.
	pub base_path: String,
	/// HTTP method the signature covers.
	pub method: Method,
	/// Query parameters, including any `oauth_*` fields already applied.
	pub query: QuerySet,
}
impl RequestContext {
	/// Creates a context with an empty query.
	pub fn new(base_path: impl Into<String>, method: Method) -> Self {
		Self { base_path: base_path.into(), method, query: QuerySet::new() }
	}

	/// Replaces the query set.
	pub fn with_query(mut self, query: QuerySet) -> Self {
		self.query = query;

		self
	}

	/// Fully qualified resource URL for this context, without a query string.
	pub fn resource_url(&self, descriptor: &CatalogDescriptor) -> String {
		descriptor.resource_url(&self.base_path)
	}

	/// Signs the context against `key`, leaving the context untouched.
	pub fn sign(&self, descriptor: &CatalogDescriptor, key: &str) -> SignedRequest {
		sign_url(&self.resource_url(descriptor), self.method, &self.query, key)
	}
}

/// Outcome of signing: the final URL plus the signed parameter set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
	/// Full request URL, `{resource_url}?{canonical_query}`. The query always
	/// carries at least the `oauth_signature` entry.
	pub url: String,
	/// The computed `oauth_signature` value, before percent-encoding.
	pub signature: String,
	/// Parameter set including the `oauth_signature` entry.
	pub query: QuerySet,
}

/// Signs an arbitrary resource URL with the given parameter set.
///
/// The base string is computed over the current parameters minus any existing
/// `oauth_signature` entry, so a set that was already signed re-signs cleanly.
pub fn sign_url(resource_url: &str, method: Method, query: &QuerySet, key: &str) -> SignedRequest {
	let canonical = query.serialize(false);
	let base = sign::base_string(method, resource_url, &canonical);
	let signature = sign::sign(key, &base);
	let mut signed = query.clone();

	signed.insert(OAUTH_SIGNATURE_KEY, &signature);

	let serialized = signed.serialize(true);
	let url = if serialized.is_empty() {
		resource_url.to_owned()
	} else {
		format!("{resource_url}?{serialized}")
	};

	SignedRequest { url, signature, query: signed }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn golden_context() -> RequestContext {
		let query: QuerySet = [
			("max_result", "2"),
			("oauth_consumer_key", "my_big_key"),
			("oauth_nonce", "37137"),
			("oauth_signature_method", "HMAC-SHA1"),
			("oauth_timestamp", "1241641821"),
			("oauth_version", "1.0"),
			("term", "sneakers"),
		]
		.into_iter()
		.collect();

		RequestContext::new("catalog/titles", Method::Get).with_query(query)
	}

	fn default_descriptor() -> CatalogDescriptor {
		CatalogDescriptor::builder().build().expect("Default descriptor should validate.")
	}

	#[test]
	fn signed_url_matches_golden_vector() {
		let descriptor = default_descriptor();
		let signed = golden_context().sign(&descriptor, "uber_secret&");

		assert_eq!(signed.signature, "BaX9f5cXTu1B1pKA5b9md61axak=");
		assert_eq!(
			signed.url,
			"http://api.netflix.com/catalog/titles?max_result=2&oauth_consumer_key=my_big_key&oauth_nonce=37137&oauth_signature=BaX9f5cXTu1B1pKA5b9md61axak%3D&oauth_signature_method=HMAC-SHA1&oauth_timestamp=1241641821&oauth_version=1.0&term=sneakers"
		);
	}

	#[test]
	fn signing_is_pure_and_repeatable() {
		let descriptor = default_descriptor();
		let context = golden_context();
		let first = context.sign(&descriptor, "uber_secret&");
		let second = context.sign(&descriptor, "uber_secret&");

		assert_eq!(first, second);
		assert!(
			!context.query.contains_key(OAUTH_SIGNATURE_KEY),
			"Signing must not mutate the caller's query set."
		);
	}

	#[test]
	fn resigning_an_already_signed_set_does_not_stack_signatures() {
		let descriptor = default_descriptor();
		let context = golden_context();
		let once = context.sign(&descriptor, "uber_secret&");
		let twice =
			sign_url(&context.resource_url(&descriptor), Method::Get, &once.query, "uber_secret&");

		assert_eq!(once.signature, twice.signature);
		assert_eq!(once.url, twice.url);
	}

	#[test]
	fn signing_an_empty_query_yields_only_the_signature_parameter() {
		let signed =
			sign_url("http://api.netflix.com/catalog/titles", Method::Get, &QuerySet::new(), "k&");
		let expected = format!(
			"http://api.netflix.com/catalog/titles?oauth_signature={}",
			crate::query::percent_encode(&signed.signature)
		);

		assert_eq!(signed.url, expected);
		assert_eq!(signed.query.len(), 1);
		assert!(signed.query.contains_key(OAUTH_SIGNATURE_KEY));
	}

	#[test]
	fn oauth_parameters_carry_the_fixed_fields() {
		let mut query = QuerySet::new();

		apply_oauth_parameters(&mut query, "my_big_key");

		assert_eq!(query.get("oauth_consumer_key"), Some("my_big_key"));
		assert_eq!(query.get("oauth_signature_method"), Some("HMAC-SHA1"));
		assert_eq!(query.get("oauth_version"), Some("1.0"));

		let timestamp = query
			.get("oauth_timestamp")
			.expect("A timestamp should be stamped onto the query.");

		assert!(timestamp.parse::<i64>().is_ok(), "Timestamp must be integral unix seconds.");

		let nonce = query.get("oauth_nonce").expect("A nonce should be stamped onto the query.");

		assert!(nonce.parse::<u64>().is_ok(), "Nonce must be a decimal integer.");
	}

	#[test]
	fn consecutive_nonces_differ() {
		let mut first = QuerySet::new();
		let mut second = QuerySet::new();

		apply_oauth_parameters(&mut first, "key");
		apply_oauth_parameters(&mut second, "key");

		assert_ne!(first.get("oauth_nonce"), second.get("oauth_nonce"));
	}
}
