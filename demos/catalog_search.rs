//! Demonstrates an unauthenticated signed catalog search with the default reqwest transport,
//! served by a local httpmock catalog.

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
	relay::Relay,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let catalog_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/catalog/titles").query_param("term", "sneakers");
			then.status(200).body("<catalog_titles><total_results>2</total_results></catalog_titles>");
		})
		.await;
	let descriptor = CatalogDescriptor::builder().api_base(server.base_url()).build()?;
	let credentials = Arc::new(CredentialProvider::new(StaticCredentials::new(
		"demo-key",
		"demo-secret",
		"Demo App",
		"http://localhost/callback",
	)));
	let relay = Relay::new(credentials, descriptor);
	let query: QuerySet = [("term", "sneakers"), ("max_results", "2")].into_iter().collect();
	let response = relay.send_unauthenticated("catalog/titles", query).await?;

	println!("Catalog response ({}): {}.", response.status, response.body);

	catalog_mock.assert_async().await;

	Ok(())
}
