//! Three-legged handshake steps and authenticated request execution.
//!
//! Each public step acquires the relay's handshake guard, so concurrent
//! callers advance the stored token state one step at a time. Store writes
//! happen only after the matching remote exchange succeeds.

// self
use crate::{
	_prelude::*,
	http::{HttpResponse, Method, Transport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::CatalogDescriptor,
	query::QuerySet,
	relay::{Outcome, Relay, require_path},
	request::{RequestContext, apply_oauth_parameters, sign_url},
	sign,
	token::{Token, TokenKind, TokenResponse},
};

const OAUTH_TOKEN_KEY: &str = "oauth_token";
const REMOTE_USER_ID_KEY: &str = "user_id";

impl<C> Relay<C>
where
	C: ?Sized + Transport,
{
	/// Fetches a request token and returns the authorize redirect URL.
	///
	/// With `persist`, the issued token pair is written to the bound store so
	/// a later [`Self::complete_authorization`] can pick it up; without a
	/// bound store persistence fails with an authentication error before any
	/// network traffic happens.
	pub async fn request_authorization(&self, persist: bool) -> Result<String> {
		let _serialized = self.serialize_handshake().await;

		self.request_authorization_inner(persist).await
	}

	/// Exchanges the stored request token for an access token.
	///
	/// On success the access token pair and the remote user identifier are
	/// persisted and the consumed request-token fields cleared. A failed
	/// exchange leaves the store byte-for-byte unmodified. When `follow_path`
	/// is set, the freshly granted token is used for an immediate
	/// authenticated GET and that response is returned instead of the token.
	pub async fn complete_authorization(
		&self,
		persist: bool,
		follow_path: Option<&str>,
	) -> Result<Outcome> {
		let _serialized = self.serialize_handshake().await;

		self.complete_authorization_inner(persist, follow_path).await
	}

	/// Performs an authenticated signed call using the stored access token.
	pub async fn perform_request(
		&self,
		path: Option<&str>,
		method: Method,
		query: QuerySet,
	) -> Result<HttpResponse> {
		let _serialized = self.serialize_handshake().await;

		self.perform_request_inner(path, method, query).await
	}

	pub(crate) async fn request_authorization_inner(&self, persist: bool) -> Result<String> {
		let span = FlowSpan::new(FlowKind::RequestToken, "request_authorization");

		obs::record_flow_outcome(FlowKind::RequestToken, FlowOutcome::Attempt);

		let result = span.instrument(self.request_authorization_flow(persist)).await;

		obs::record_flow_outcome(FlowKind::RequestToken, outcome_of(&result));

		result
	}

	pub(crate) async fn complete_authorization_inner(
		&self,
		persist: bool,
		follow_path: Option<&str>,
	) -> Result<Outcome> {
		let span = FlowSpan::new(FlowKind::AccessToken, "complete_authorization");

		obs::record_flow_outcome(FlowKind::AccessToken, FlowOutcome::Attempt);

		let result = span.instrument(self.complete_authorization_flow(persist)).await;

		obs::record_flow_outcome(FlowKind::AccessToken, outcome_of(&result));

		let token = result?;

		if let Some(path) = follow_path {
			let response =
				self.authenticated_call(path, Method::Get, QuerySet::new(), &token).await?;

			Ok(Outcome::Response(response))
		} else {
			Ok(Outcome::AccessGranted(token))
		}
	}

	pub(crate) async fn perform_request_inner(
		&self,
		path: Option<&str>,
		method: Method,
		query: QuerySet,
	) -> Result<HttpResponse> {
		let path = require_path(path)?;
		let tokens = self.bound_store()?.load().await.map_err(Error::from)?;
		let token = tokens.access_token().ok_or_else(|| Error::Authentication {
			reason: "no access token is stored for this user".into(),
		})?;

		self.authenticated_call(path, method, query, &token).await
	}

	async fn request_authorization_flow(&self, persist: bool) -> Result<String> {
		if persist {
			// Fail before the token endpoint is hit, not after.
			self.bound_store()?;
		}

		let credentials = self.credentials.get().map_err(Error::from)?;
		let mut query = QuerySet::new();

		apply_oauth_parameters(&mut query, &credentials.key);
		query.insert("oauth_callback", &credentials.authorize_callback_url);

		let key = sign::signing_key(credentials.secret.expose(), None);
		let signed =
			sign_url(self.descriptor.request_token_url.as_str(), Method::Post, &query, &key);
		let body = token_endpoint_body(
			self.transport.post_form(&signed.url).await.map_err(Error::from)?,
		)?;
		let token = TokenResponse::parse(&body)
			.map_err(Error::from)?
			.into_token(TokenKind::Request);

		if persist {
			let store = self.bound_store()?;
			let mut tokens = store.load().await.map_err(Error::from)?;

			tokens.grant_request(&token);
			store.save(tokens).await.map_err(Error::from)?;
		}

		Ok(authorize_redirect_url(
			&self.descriptor,
			&token,
			&credentials.key,
			&credentials.application_name,
			&credentials.authorize_callback_url,
		))
	}

	async fn complete_authorization_flow(&self, persist: bool) -> Result<Token> {
		let store = self.bound_store()?;
		let mut tokens = store.load().await.map_err(Error::from)?;
		let request_token = tokens.request_token().ok_or_else(|| Error::Authentication {
			reason: "no request token is stored for this user".into(),
		})?;
		let credentials = self.credentials.get().map_err(Error::from)?;
		let mut query = QuerySet::new();

		apply_oauth_parameters(&mut query, &credentials.key);
		query.insert(OAUTH_TOKEN_KEY, &request_token.token);

		let key =
			sign::signing_key(credentials.secret.expose(), Some(request_token.secret.expose()));
		let signed =
			sign_url(self.descriptor.access_token_url.as_str(), Method::Post, &query, &key);
		let body = token_endpoint_body(
			self.transport.post_form(&signed.url).await.map_err(Error::from)?,
		)?;
		let token =
			TokenResponse::parse(&body).map_err(Error::from)?.into_token(TokenKind::Access);

		if persist {
			tokens.grant_access(&token, token.param(REMOTE_USER_ID_KEY).map(str::to_owned));
			store.save(tokens).await.map_err(Error::from)?;
		}

		Ok(token)
	}

	async fn authenticated_call(
		&self,
		path: &str,
		method: Method,
		query: QuerySet,
		token: &Token,
	) -> Result<HttpResponse> {
		let span = FlowSpan::new(FlowKind::SignedCall, "authenticated_call");

		obs::record_flow_outcome(FlowKind::SignedCall, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let credentials = self.credentials.get().map_err(Error::from)?;
				let mut query = query;

				apply_oauth_parameters(&mut query, &credentials.key);
				query.insert(OAUTH_TOKEN_KEY, &token.token);

				let key = sign::signing_key(
					credentials.secret.expose(),
					Some(token.secret.expose()),
				);
				let signed = RequestContext::new(path, method)
					.with_query(query)
					.sign(&self.descriptor, &key);

				match method {
					Method::Get => self.transport.get(&signed.url).await.map_err(Error::from),
					Method::Post =>
						self.transport.post_form(&signed.url).await.map_err(Error::from),
				}
			})
			.await;

		obs::record_flow_outcome(FlowKind::SignedCall, outcome_of(&result));

		result
	}
}

pub(crate) fn outcome_of<T>(result: &Result<T>) -> FlowOutcome {
	if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure }
}

/// Builds the end-user redirect for the authorize endpoint.
///
/// Beyond the mandated `oauth_token`, the redirect carries the consumer key,
/// the application's display name, and the callback URL so the provider can
/// label the consent page and send the user back.
fn authorize_redirect_url(
	descriptor: &CatalogDescriptor,
	token: &Token,
	consumer_key: &str,
	application_name: &str,
	callback_url: &str,
) -> String {
	let mut query = QuerySet::new();

	query.extend([
		(OAUTH_TOKEN_KEY, token.token.as_str()),
		("oauth_consumer_key", consumer_key),
		("application_name", application_name),
		("oauth_callback", callback_url),
	]);

	format!("{}?{}", descriptor.authorize_url, query.serialize(true))
}

fn token_endpoint_body(response: HttpResponse) -> Result<String> {
	if response.is_success() {
		Ok(response.body)
	} else {
		Err(Error::TokenEndpoint {
			message: preview(&response.body),
			status: Some(response.status),
		})
	}
}

const PREVIEW_LIMIT: usize = 256;

fn preview(body: &str) -> String {
	if body.len() <= PREVIEW_LIMIT {
		body.to_owned()
	} else {
		let mut cut = PREVIEW_LIMIT;

		while !body.is_char_boundary(cut) {
			cut -= 1;
		}

		format!("{}...", &body[..cut])
	}
}
