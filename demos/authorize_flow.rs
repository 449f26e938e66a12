//! Walks the three-legged handshake end to end against a local httpmock provider: request
//! token, authorize redirect, access-token exchange, and a final authenticated call.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use oauth1_relay::{
	credentials::{CredentialProvider, StaticCredentials},
	provider::CatalogDescriptor,
	query::QuerySet,
	relay::{CallScope, Outcome, Relay},
	store::{MemoryTokenStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/request_token");
			then.status(200).body("oauth_token=demo-req&oauth_token_secret=demo-req-sec");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(200).body("oauth_token=demo-acc&oauth_token_secret=demo-acc-sec&user_id=demo-user");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/users/current");
			then.status(200).body("<user><id>demo-user</id></user>");
		})
		.await;

	let descriptor = CatalogDescriptor::builder()
		.api_base(server.base_url())
		.request_token_url(server.url("/oauth/request_token"))
		.access_token_url(server.url("/oauth/access_token"))
		.authorize_url(server.url("/oauth/login"))
		.build()?;
	let credentials = Arc::new(CredentialProvider::new(StaticCredentials::new(
		"demo-key",
		"demo-secret",
		"Demo App",
		"http://localhost/callback",
	)));
	let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::default());
	let relay = Relay::new(credentials, descriptor).with_store(store);

	// Step 1: nothing stored yet, so dispatch fetches a request token.
	match relay.go(CallScope::User, None, QuerySet::new()).await? {
		Outcome::AuthorizePending { redirect_url } =>
			println!("Send the end user to: {redirect_url}."),
		outcome => println!("Unexpected outcome: {outcome:?}."),
	}

	// Step 2: the user has signed in upstream; dispatch exchanges the request token.
	match relay.go(CallScope::User, None, QuerySet::new()).await? {
		Outcome::AccessGranted(token) => println!("Access granted for token `{}`.", token.token),
		outcome => println!("Unexpected outcome: {outcome:?}."),
	}

	// Step 3: with an access token stored, dispatch performs the call directly.
	match relay.go(CallScope::User, Some("users/current"), QuerySet::new()).await? {
		Outcome::Response(response) =>
			println!("Authenticated response ({}): {}.", response.status, response.body),
		outcome => println!("Unexpected outcome: {outcome:?}."),
	}

	Ok(())
}
