//! OAuth 1.0 request signing and token relay for media-catalog web APIs: HMAC-SHA1 signatures,
//! the three-legged handshake, and pluggable token storage in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod credentials;
pub mod error;
pub mod http;
pub mod obs;
pub mod provider;
pub mod query;
pub mod relay;
pub mod request;
pub mod sign;
pub mod store;
pub mod token;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		credentials::{CredentialProvider, StaticCredentials},
		http::ReqwestTransport,
		provider::CatalogDescriptor,
		relay::Relay,
		store::{MemoryTokenStore, TokenStore},
	};

	/// Relay type alias used by reqwest-backed integration tests.
	pub type ReqwestTestRelay = Relay<ReqwestTransport>;

	/// Builds the plain-HTTP reqwest transport used against `httpmock` servers.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		ReqwestTransport::default()
	}

	/// Constructs a [`Relay`] backed by an in-memory token store, static consumer credentials,
	/// and the reqwest transport used across integration tests.
	pub fn build_reqwest_test_relay(
		descriptor: CatalogDescriptor,
		consumer_key: &str,
		consumer_secret: &str,
	) -> (ReqwestTestRelay, Arc<MemoryTokenStore>) {
		let store_backend = Arc::new(MemoryTokenStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let credentials = Arc::new(CredentialProvider::new(StaticCredentials::new(
			consumer_key,
			consumer_secret,
			"Clerkdogs",
			"http://clerkdogs.com/netflix/access_token",
		)));
		let relay = Relay::with_transport(credentials, descriptor, test_reqwest_transport())
			.with_store(store);

		(relay, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, oauth1_relay as _};
