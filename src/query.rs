//! Canonical query-parameter packaging for signable requests.
//!
//! [`QuerySet`] keeps one value per key, percent-encodes values on entry using
//! the RFC 3986 unreserved allowlist, and always serializes keys in ascending
//! byte order so the same parameter set produces the same canonical string no
//! matter the insertion order.

// self
use crate::_prelude::*;

/// Query key carrying the computed signature; excluded from base-string serialization.
pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";

/// Percent-encodes a value with the strict OAuth 1.0 allowlist.
///
/// Letters, digits, and `-._~` pass through; every other byte becomes `%XX`
/// (uppercase hex), including the space character.
pub fn percent_encode(value: &str) -> String {
	let mut encoded = String::with_capacity(value.len());

	for byte in value.as_bytes() {
		match byte {
			b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' =>
				encoded.push(*byte as char),
			other => {
				encoded.push('%');
				encoded.push_str(&format!("{other:02X}"));
			},
		}
	}

	encoded
}

/// Ordered, escaping key/value store used to build canonical query strings.
///
/// Values are stored already percent-encoded; keys are taken verbatim. Not safe
/// for concurrent mutation from multiple callers sharing one instance; build a
/// fresh set per outbound request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuerySet(BTreeMap<String, String>);
impl QuerySet {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a single parameter, percent-encoding the value.
	///
	/// An existing entry under the same key is replaced.
	pub fn insert(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
		self.0.insert(key.into(), percent_encode(value.as_ref()));
	}

	/// Merges a batch of parameters, percent-encoding each value.
	pub fn extend<I, K, V>(&mut self, pairs: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: AsRef<str>,
	{
		for (key, value) in pairs {
			self.insert(key, value);
		}
	}

	/// Returns the already-encoded value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Returns `true` when the set holds an entry for `key`.
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Returns `true` when no parameters are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Number of stored parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Serializes the set as `key1=val1&key2=val2...` with keys ascending byte-wise.
	///
	/// When `with_signature` is false the literal [`OAUTH_SIGNATURE_KEY`] entry
	/// is omitted; no other key is ever excluded. An empty set serializes to
	/// the empty string, and re-serializing an unmutated set is byte-stable.
	pub fn serialize(&self, with_signature: bool) -> String {
		let mut parts = Vec::with_capacity(self.0.len());

		for (key, value) in &self.0 {
			if !with_signature && key == OAUTH_SIGNATURE_KEY {
				continue;
			}

			parts.push(format!("{key}={value}"));
		}

		parts.join("&")
	}
}
impl<K, V> FromIterator<(K, V)> for QuerySet
where
	K: Into<String>,
	V: AsRef<str>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut set = Self::new();

		set.extend(iter);

		set
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn serialization_sorts_keys_regardless_of_insertion_order() {
		let mut query = QuerySet::new();

		query.insert("pizza", "good");
		query.insert("beer", "plenty");
		query.insert("apples", "crisp");

		assert_eq!(query.serialize(true), "apples=crisp&beer=plenty&pizza=good");
	}

	#[test]
	fn signature_key_can_be_excluded() {
		let mut query = QuerySet::new();

		query.insert("pizza", "good");
		query.insert(OAUTH_SIGNATURE_KEY, "yup_im_signed!");

		assert!(query.serialize(true).contains("oauth_signature="));
		assert!(!query.serialize(false).contains("oauth_signature="));
		assert_eq!(query.serialize(false), "pizza=good");
	}

	#[test]
	fn values_are_percent_encoded_on_entry() {
		let mut query = QuerySet::new();

		query.insert("term", "Blue Velvet");

		assert_eq!(query.get("term"), Some("Blue%20Velvet"));
		assert_eq!(query.serialize(true), "term=Blue%20Velvet");
	}

	#[test]
	fn unreserved_characters_survive_encoding_unchanged() {
		let unreserved = "AZaz09-._~";

		assert_eq!(percent_encode(unreserved), unreserved);
		assert_eq!(percent_encode("a b&c=d"), "a%20b%26c%3Dd");
		assert_eq!(percent_encode("http://api.netflix.com"), "http%3A%2F%2Fapi.netflix.com");
	}

	#[test]
	fn empty_set_serializes_to_empty_string() {
		let query = QuerySet::new();

		assert!(query.is_empty());
		assert_eq!(query.serialize(true), "");
	}

	#[test]
	fn reserialization_of_unmutated_set_is_stable() {
		let query: QuerySet = [("max_result", "2"), ("term", "sneakers")].into_iter().collect();
		let first = query.serialize(true);
		let second = query.serialize(true);

		assert_eq!(first, second);
		assert_eq!(query.len(), 2);
	}

	#[test]
	fn insert_replaces_existing_entries() {
		let mut query = QuerySet::new();

		query.insert("term", "sneakers");
		query.insert("term", "boots");

		assert_eq!(query.serialize(true), "term=boots");
	}
}
