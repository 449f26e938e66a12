//! Token models: redacted secrets, request/access tokens, and endpoint
//! response parsing.

// self
use crate::_prelude::*;

const OAUTH_TOKEN_KEY: &str = "oauth_token";
const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when the secret is the empty string.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// The two token kinds produced by the three-legged handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
	/// Short-lived pre-authorization credential.
	Request,
	/// Long-lived post-authorization credential.
	Access,
}
impl TokenKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenKind::Request => "request",
			TokenKind::Access => "access",
		}
	}
}
impl Display for TokenKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Credential pair issued by a token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
	/// Whether this is a request or an access token.
	pub kind: TokenKind,
	/// Public token value.
	pub token: String,
	/// Matching token secret; feeds the signing key, never the query string.
	pub secret: TokenSecret,
	/// Extra parameters returned alongside the token (e.g. a user identifier).
	pub params: BTreeMap<String, String>,
}
impl Token {
	/// Creates a token with no extra parameters.
	pub fn new(kind: TokenKind, token: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { kind, token: token.into(), secret: TokenSecret::new(secret), params: BTreeMap::new() }
	}

	/// Rebuilds a token from persisted fields.
	///
	/// Returns `None` unless both the token and the secret are present and
	/// non-empty. Called each time handshake state is evaluated instead of
	/// being cached, so stale fields can never shadow the stored record.
	pub fn from_stored(kind: TokenKind, token: Option<&str>, secret: Option<&str>) -> Option<Self> {
		match (token, secret) {
			(Some(token), Some(secret)) if !token.is_empty() && !secret.is_empty() =>
				Some(Self::new(kind, token, secret)),
			_ => None,
		}
	}

	/// Returns an extra exchange parameter, if the endpoint supplied it.
	pub fn param(&self, key: &str) -> Option<&str> {
		self.params.get(key).map(String::as_str)
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("kind", &self.kind)
			.field("token", &self.token)
			.field("secret", &"<redacted>")
			.field("params", &self.params)
			.finish()
	}
}

/// Errors raised while parsing a token endpoint response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TokenResponseError {
	/// A mandatory form field was absent from the body.
	#[error("Token endpoint response is missing `{field}`.")]
	MissingField {
		/// Name of the absent field.
		field: &'static str,
	},
}

/// Parsed `application/x-www-form-urlencoded` token endpoint body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenResponse {
	/// The `oauth_token` value.
	pub token: String,
	/// The `oauth_token_secret` value.
	pub secret: TokenSecret,
	/// Remaining parameters (e.g. `user_id` on access-token exchanges).
	pub extra: BTreeMap<String, String>,
}
impl TokenResponse {
	/// Splits a form-encoded body on `&`/`=` and extracts the token pair.
	pub fn parse(body: &str) -> Result<Self, TokenResponseError> {
		let mut fields: BTreeMap<String, String> = body
			.split('&')
			.filter(|pair| !pair.is_empty())
			.map(|pair| {
				let mut halves = pair.splitn(2, '=');

				(
					halves.next().unwrap_or_default().to_owned(),
					halves.next().unwrap_or_default().to_owned(),
				)
			})
			.collect();
		let token = fields
			.remove(OAUTH_TOKEN_KEY)
			.ok_or(TokenResponseError::MissingField { field: OAUTH_TOKEN_KEY })?;
		let secret = fields
			.remove(OAUTH_TOKEN_SECRET_KEY)
			.ok_or(TokenResponseError::MissingField { field: OAUTH_TOKEN_SECRET_KEY })?;

		Ok(Self { token, secret: TokenSecret::new(secret), extra: fields })
	}

	/// Converts the response into a [`Token`] of the given kind.
	pub fn into_token(self, kind: TokenKind) -> Token {
		Token { kind, token: self.token, secret: self.secret, params: self.extra }
	}
}
