//! Thread-safe in-memory [`TokenStore`] implementation for local development
//! and tests.

// self
use crate::{
	_prelude::*,
	store::{StoreFuture, TokenStore, UserTokens},
};

/// Keeps one user's token snapshot in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore(Arc<RwLock<UserTokens>>);
impl MemoryTokenStore {
	/// Creates a store preloaded with the provided snapshot.
	pub fn with_tokens(tokens: UserTokens) -> Self {
		Self(Arc::new(RwLock::new(tokens)))
	}

	/// Returns a copy of the current snapshot without going through the trait.
	pub fn snapshot(&self) -> UserTokens {
		self.0.read().clone()
	}
}
impl TokenStore for MemoryTokenStore {
	fn load(&self) -> StoreFuture<'_, UserTokens> {
		let state = self.0.clone();

		Box::pin(async move { Ok(state.read().clone()) })
	}

	fn save(&self, tokens: UserTokens) -> StoreFuture<'_, ()> {
		let state = self.0.clone();

		Box::pin(async move {
			*state.write() = tokens;

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;
	use crate::token::{Token, TokenKind};

	#[test]
	fn save_then_load_round_trips() {
		let store = MemoryTokenStore::default();
		let rt = Runtime::new().expect("Failed to build Tokio runtime for memory store test.");
		let mut tokens = rt
			.block_on(store.load())
			.expect("Loading a fresh store should yield the default snapshot.");

		assert_eq!(tokens, UserTokens::default());

		tokens.grant_request(&Token::new(TokenKind::Request, "req", "req-sec"));
		rt.block_on(store.save(tokens.clone())).expect("Saving the snapshot should succeed.");

		assert_eq!(store.snapshot(), tokens);
		assert_eq!(
			rt.block_on(store.load()).expect("Reloading the snapshot should succeed."),
			tokens
		);
	}
}
