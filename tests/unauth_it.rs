#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use oauth1_relay::{
	_preludet::*,
	provider::CatalogDescriptor,
	query::QuerySet,
	relay::{CallScope, Outcome},
};

const CONSUMER_KEY: &str = "my_big_key";
const CONSUMER_SECRET: &str = "uber_secret";

fn build_descriptor(server: &MockServer) -> CatalogDescriptor {
	CatalogDescriptor::builder()
		.api_base(server.base_url())
		.build()
		.expect("Mock descriptor should build successfully.")
}

#[tokio::test]
async fn catalog_call_is_signed_with_consumer_credentials_only() {
	let server = MockServer::start_async().await;
	let descriptor = build_descriptor(&server);
	let (relay, store) = build_reqwest_test_relay(descriptor, CONSUMER_KEY, CONSUMER_SECRET);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/catalog/titles")
				.query_param("term", "Blue Velvet")
				.query_param("max_results", "2")
				.query_param("oauth_consumer_key", CONSUMER_KEY)
				.query_param("oauth_signature_method", "HMAC-SHA1")
				.query_param("oauth_version", "1.0")
				.query_param_exists("oauth_signature")
				.query_param_exists("oauth_nonce")
				.query_param_exists("oauth_timestamp");
			then.status(200).body("<catalog_titles/>");
		})
		.await;
	let query: QuerySet = [("term", "Blue Velvet"), ("max_results", "2")].into_iter().collect();
	let response = relay
		.send_unauthenticated("catalog/titles", query)
		.await
		.expect("Signed catalog call should succeed against the mock.");

	mock.assert_async().await;
	assert_eq!(response.status, 200);
	assert_eq!(response.body, "<catalog_titles/>");
	// The unauthenticated path never touches token state.
	assert_eq!(store.snapshot(), Default::default());
}

#[tokio::test]
async fn non_2xx_catalog_responses_are_returned_not_raised() {
	let server = MockServer::start_async().await;
	let descriptor = build_descriptor(&server);
	let (relay, _store) = build_reqwest_test_relay(descriptor, CONSUMER_KEY, CONSUMER_SECRET);

	server
		.mock_async(|when, then| {
			when.method(GET).path("/catalog/titles/nope");
			then.status(404).body("<error>not found</error>");
		})
		.await;

	let response = relay
		.send_unauthenticated("catalog/titles/nope", QuerySet::new())
		.await
		.expect("The relay hands non-2xx catalog responses back to the caller.");

	assert_eq!(response.status, 404);
	assert_eq!(response.body, "<error>not found</error>");
}

#[tokio::test]
async fn catalog_dispatch_goes_through_the_unauthenticated_path() {
	let server = MockServer::start_async().await;
	let descriptor = build_descriptor(&server);
	let (relay, _store) = build_reqwest_test_relay(descriptor, CONSUMER_KEY, CONSUMER_SECRET);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/catalog/titles").query_param("term", "sneakers");
			then.status(200).body("<catalog_titles/>");
		})
		.await;
	let query: QuerySet = [("term", "sneakers")].into_iter().collect();
	let outcome = relay
		.go(CallScope::Catalog, Some("catalog/titles"), query)
		.await
		.expect("Catalog dispatch should call the resource endpoint.");
	let Outcome::Response(response) = outcome else {
		panic!("Catalog dispatch should return a response outcome, got {outcome:?}.");
	};

	mock.assert_async().await;
	assert_eq!(response.body, "<catalog_titles/>");
}
