//! Storage contract for user token state and built-in store implementations.
//!
//! The handshake depends only on the narrow [`TokenStore`] capability: load a
//! [`UserTokens`] snapshot, save a replacement. Mutations happen on the local
//! snapshot and are saved only after a remote exchange succeeds, so a failed
//! exchange can never leave partially written token state behind.

pub mod file;
pub mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

// self
use crate::{
	_prelude::*,
	token::{Token, TokenKind, TokenSecret},
};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence capability for one user's token fields.
///
/// Any user-record type can implement this; the handshake never sees the
/// concrete record, only the token snapshot.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Loads the current token snapshot.
	fn load(&self) -> StoreFuture<'_, UserTokens>;

	/// Persists a replacement snapshot.
	fn save(&self, tokens: UserTokens) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Handshake progression derived from stored token state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandshakeState {
	/// Neither a request nor an access token is present.
	NoToken,
	/// A request token awaits end-user authorization.
	HasRequestToken,
	/// An access token is present; authenticated calls go straight out.
	HasAccessToken,
}
impl HandshakeState {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandshakeState::NoToken => "no_token",
			HandshakeState::HasRequestToken => "has_request_token",
			HandshakeState::HasAccessToken => "has_access_token",
		}
	}
}
impl Display for HandshakeState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Snapshot of the token fields persisted on a user record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTokens {
	/// Stored request token, pre-authorization.
	pub request_token: Option<String>,
	/// Secret paired with the request token.
	pub request_secret: Option<TokenSecret>,
	/// Stored access token, post-authorization.
	pub access_token: Option<String>,
	/// Secret paired with the access token.
	pub access_secret: Option<TokenSecret>,
	/// Remote user identifier reported by the access-token exchange.
	pub remote_user_id: Option<String>,
}
impl UserTokens {
	/// Derives the handshake state; an access token always wins over a
	/// lingering request token.
	pub fn state(&self) -> HandshakeState {
		if self.access_token().is_some() {
			HandshakeState::HasAccessToken
		} else if self.request_token().is_some() {
			HandshakeState::HasRequestToken
		} else {
			HandshakeState::NoToken
		}
	}

	/// Rebuilds the request token when both stored halves are present.
	pub fn request_token(&self) -> Option<Token> {
		Token::from_stored(
			TokenKind::Request,
			self.request_token.as_deref(),
			self.request_secret.as_ref().map(TokenSecret::expose),
		)
	}

	/// Rebuilds the access token when both stored halves are present.
	pub fn access_token(&self) -> Option<Token> {
		Token::from_stored(
			TokenKind::Access,
			self.access_token.as_deref(),
			self.access_secret.as_ref().map(TokenSecret::expose),
		)
	}

	/// Records a freshly issued request token.
	pub fn grant_request(&mut self, token: &Token) {
		self.request_token = Some(token.token.clone());
		self.request_secret = Some(token.secret.clone());
	}

	/// Records a freshly issued access token and clears the consumed request
	/// token fields.
	pub fn grant_access(&mut self, token: &Token, remote_user_id: Option<String>) {
		self.access_token = Some(token.token.clone());
		self.access_secret = Some(token.secret.clone());
		self.remote_user_id = remote_user_id;
		self.request_token = None;
		self.request_secret = None;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn state_follows_the_stored_fields() {
		let mut tokens = UserTokens::default();

		assert_eq!(tokens.state(), HandshakeState::NoToken);

		tokens.grant_request(&Token::new(TokenKind::Request, "req", "req-sec"));

		assert_eq!(tokens.state(), HandshakeState::HasRequestToken);

		tokens.grant_access(&Token::new(TokenKind::Access, "acc", "acc-sec"), Some("uid-7".into()));

		assert_eq!(tokens.state(), HandshakeState::HasAccessToken);
	}

	#[test]
	fn granting_access_clears_the_request_fields() {
		let mut tokens = UserTokens::default();

		tokens.grant_request(&Token::new(TokenKind::Request, "req", "req-sec"));
		tokens.grant_access(&Token::new(TokenKind::Access, "acc", "acc-sec"), Some("uid-7".into()));

		assert!(tokens.request_token.is_none());
		assert!(tokens.request_secret.is_none());
		assert_eq!(tokens.remote_user_id.as_deref(), Some("uid-7"));

		let access =
			tokens.access_token().expect("Access token should rebuild from stored fields.");

		assert_eq!(access.token, "acc");
		assert_eq!(access.secret.expose(), "acc-sec");
	}

	#[test]
	fn half_written_token_fields_do_not_count() {
		let tokens = UserTokens { request_token: Some("req".into()), ..UserTokens::default() };

		assert_eq!(tokens.state(), HandshakeState::NoToken);
		assert!(tokens.request_token().is_none());
	}

	#[test]
	fn access_token_wins_over_a_lingering_request_token() {
		let tokens = UserTokens {
			request_token: Some("req".into()),
			request_secret: Some(TokenSecret::new("req-sec")),
			access_token: Some("acc".into()),
			access_secret: Some(TokenSecret::new("acc-sec")),
			remote_user_id: None,
		};

		assert_eq!(tokens.state(), HandshakeState::HasAccessToken);
	}

	#[test]
	fn store_error_serializes_for_diagnostics() {
		let payload = serde_json::to_string(&StoreError::Backend { message: "down".into() })
			.expect("Store errors should serialize to JSON.");

		assert!(payload.contains("down"));
	}
}
