//! Demonstrates configuring a [`RestClient`] for OAuth 2.0 client credentials and reusing the
//! cached access token across several calls against a mock API.

// std
use std::collections::HashMap;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use rest_ease::{AuthOptions, RestClient, client::DEFAULT_TIMEOUT_KEY};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let list_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/orders").header("authorization", "Bearer demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"id\":1,\"status\":\"open\"}]");
		})
		.await;
	let create_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/orders").header("authorization", "Bearer demo-access");
			then.status(201).header("content-type", "application/json").body("{\"id\":2}");
		})
		.await;
	let mut client = RestClient::new();

	client.initialize(&HashMap::from([(DEFAULT_TIMEOUT_KEY.to_owned(), json!(30))]));
	client.set_base_url(&server.url("/api"))?;
	client.set_authentication(
		"OAuth2",
		Some(AuthOptions::oauth2(
			server.url("/oauth/token"),
			"demo-client",
			"super-secret",
			"orders.read orders.write",
		)),
	)?;

	let orders = client.get("orders").await?;

	println!("GET /orders -> {} {}.", orders.status_code, orders.body);

	let created = client.post("orders", &json!({ "item": "coffee", "quantity": 2 })).await?;

	println!("POST /orders -> {} {}.", created.status_code, created.body);

	token_mock.assert_calls_async(1).await;
	list_mock.assert_async().await;
	create_mock.assert_async().await;

	Ok(())
}
