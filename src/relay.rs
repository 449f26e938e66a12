//! High-level relay orchestration: dispatch plus the token handshake.

pub mod handshake;
pub mod unauth;

// self
use crate::{
	_prelude::*,
	credentials::CredentialProvider,
	http::{HttpResponse, Method, Transport},
	provider::CatalogDescriptor,
	query::QuerySet,
	store::{HandshakeState, TokenStore},
	token::Token,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Which of the relay's two dispatch paths a call takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallScope {
	/// Public catalog data; signed with consumer credentials only.
	Catalog,
	/// Protected user data; driven through the token handshake.
	User,
}

/// Result of a dispatched call.
///
/// The user path can resolve three ways depending on handshake progress, so
/// the dispatcher hands back an enum instead of forcing callers to inspect
/// stored state themselves.
#[derive(Clone, Debug)]
pub enum Outcome {
	/// The remote endpoint was called; here is its raw response.
	Response(HttpResponse),
	/// A request token was obtained; redirect the end user to this URL.
	AuthorizePending {
		/// Fully-formed authorize URL for the end-user redirect.
		redirect_url: String,
	},
	/// The access-token exchange completed without a follow-up call.
	AccessGranted(Token),
}

/// Coordinates signing and the OAuth 1.0 handshake against a single catalog
/// descriptor.
///
/// The relay owns the transport, credential provider, and descriptor so the
/// handshake and dispatch code can focus on protocol steps. Binding a
/// [`TokenStore`] enables the user path; without one every authenticated
/// operation fails with an authentication error.
#[derive(Clone)]
pub struct Relay<C>
where
	C: ?Sized + Transport,
{
	/// Transport used for every outbound call.
	pub transport: Arc<C>,
	/// Consumer credential provider.
	pub credentials: Arc<CredentialProvider>,
	/// Endpoint descriptor for the catalog deployment.
	pub descriptor: CatalogDescriptor,
	/// Token store bound to the current user, when present.
	pub store: Option<Arc<dyn TokenStore>>,
	handshake_guard: Arc<AsyncMutex<()>>,
}
impl<C> Relay<C>
where
	C: ?Sized + Transport,
{
	/// Creates a relay that reuses the caller-provided transport.
	pub fn with_transport(
		credentials: Arc<CredentialProvider>,
		descriptor: CatalogDescriptor,
		transport: impl Into<Arc<C>>,
	) -> Self {
		Self {
			transport: transport.into(),
			credentials,
			descriptor,
			store: None,
			handshake_guard: Default::default(),
		}
	}

	/// Binds the token store holding the current user's token state.
	pub fn with_store(mut self, store: Arc<dyn TokenStore>) -> Self {
		self.store = Some(store);

		self
	}

	/// Top-level dispatcher.
	///
	/// [`CallScope::Catalog`] takes the unauthenticated path and requires a
	/// path. [`CallScope::User`] advances the handshake one step based on the
	/// stored token state: with an access token the authenticated call goes
	/// straight out (no token-endpoint round trip), with a request token the
	/// access-token exchange runs (persisting its result), and with nothing
	/// stored a request token is fetched and the authorize URL returned.
	pub async fn go(
		&self,
		scope: CallScope,
		path: Option<&str>,
		query: QuerySet,
	) -> Result<Outcome> {
		match scope {
			CallScope::Catalog => {
				let path = require_path(path)?;

				Ok(Outcome::Response(self.send_unauthenticated(path, query).await?))
			},
			CallScope::User => {
				let _serialized = self.handshake_guard.lock().await;
				let tokens = self.bound_store()?.load().await.map_err(Error::from)?;

				match tokens.state() {
					HandshakeState::HasAccessToken => Ok(Outcome::Response(
						self.perform_request_inner(path, Method::Get, query).await?,
					)),
					HandshakeState::HasRequestToken =>
						self.complete_authorization_inner(true, path).await,
					HandshakeState::NoToken => Ok(Outcome::AuthorizePending {
						redirect_url: self.request_authorization_inner(true).await?,
					}),
				}
			},
		}
	}

	pub(crate) fn bound_store(&self) -> Result<&Arc<dyn TokenStore>> {
		self.store.as_ref().ok_or_else(|| Error::Authentication {
			reason: "no user record is bound to the relay".into(),
		})
	}

	pub(crate) async fn serialize_handshake(&self) -> async_lock::MutexGuard<'_, ()> {
		self.handshake_guard.lock().await
	}
}
#[cfg(feature = "reqwest")]
impl Relay<ReqwestTransport> {
	/// Creates a relay with a default reqwest-backed transport.
	pub fn new(credentials: Arc<CredentialProvider>, descriptor: CatalogDescriptor) -> Self {
		Self::with_transport(credentials, descriptor, ReqwestTransport::default())
	}
}
impl<C> Debug for Relay<C>
where
	C: ?Sized + Transport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Relay")
			.field("descriptor", &self.descriptor)
			.field("store_bound", &self.store.is_some())
			.finish()
	}
}

pub(crate) fn require_path(path: Option<&str>) -> Result<&str> {
	match path {
		Some(path) if !path.is_empty() => Ok(path),
		_ => Err(Error::Argument { reason: "no request path specified".into() }),
	}
}
