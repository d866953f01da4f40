// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use rest_ease::{
	AuthOptions, AuthenticatorRegistry, RestClient,
	auth::{Authenticator, OAuth2Authenticator},
	error::{AuthenticationError, Error},
	reqwest::{Method, Request},
	url::Url,
};

const CLIENT_ID: &str = "svc-client";
const CLIENT_SECRET: &str = "svc-secret";
const SCOPE: &str = "api.read";

fn build_authenticator(server: &MockServer) -> OAuth2Authenticator {
	OAuth2Authenticator::new(&server.url("/oauth/token"), CLIENT_ID, CLIENT_SECRET, SCOPE)
		.expect("OAuth2 authenticator should build against the mock token endpoint.")
}

fn api_request(server: &MockServer) -> Request {
	Request::new(
		Method::GET,
		Url::parse(&server.url("/v1/items")).expect("Mock API URL should parse successfully."),
	)
}

fn authorization_of(request: &Request) -> Option<&str> {
	request.headers().get("authorization").and_then(|value| value.to_str().ok())
}

#[tokio::test]
async fn token_is_fetched_once_and_reused() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"cached-token\",\"token_type\":\"bearer\",\"expires_in\":1800}",
			);
		})
		.await;
	let authenticator = build_authenticator(&server);
	let mut first = api_request(&server);
	let mut second = api_request(&server);

	authenticator.authenticate(&mut first).await.expect("First authentication should succeed.");
	authenticator.authenticate(&mut second).await.expect("Second authentication should succeed.");

	assert_eq!(authorization_of(&first), Some("Bearer cached-token"));
	assert_eq!(authorization_of(&second), Some("Bearer cached-token"));

	token.assert_calls_async(1).await;

	let cached = authenticator.cached_token().await.expect("Token should remain cached.");

	assert_eq!(cached.access_token.expose(), "cached-token");
	assert!(cached.expires_at.is_some());
}

#[tokio::test]
async fn concurrent_callers_share_one_exchange() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.delay(std::time::Duration::from_millis(200))
				.body("{\"access_token\":\"shared-token\",\"token_type\":\"bearer\"}");
		})
		.await;
	let authenticator = build_authenticator(&server);
	let mut first = api_request(&server);
	let mut second = api_request(&server);
	let (a, b) = tokio::join!(
		authenticator.authenticate(&mut first),
		authenticator.authenticate(&mut second)
	);

	a.expect("First concurrent authentication should succeed.");
	b.expect("Second concurrent authentication should succeed.");

	assert_eq!(authorization_of(&first), Some("Bearer shared-token"));
	assert_eq!(authorization_of(&second), Some("Bearer shared-token"));

	token.assert_calls_async(1).await;
}

#[tokio::test]
async fn invalidate_forces_a_fresh_exchange() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"rotating-token\",\"token_type\":\"bearer\"}");
		})
		.await;
	let authenticator = build_authenticator(&server);

	authenticator.access_token().await.expect("Initial exchange should succeed.");
	authenticator.invalidate().await;

	assert!(authenticator.cached_token().await.is_none());

	authenticator.access_token().await.expect("Exchange after invalidation should succeed.");

	token.assert_calls_async(2).await;
}

#[tokio::test]
async fn tokens_inside_the_expiry_leeway_are_refetched() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"short-lived\",\"token_type\":\"bearer\",\"expires_in\":10}");
		})
		.await;
	let authenticator = build_authenticator(&server);

	authenticator.access_token().await.expect("First exchange should succeed.");
	authenticator.access_token().await.expect("Second exchange should succeed.");

	token.assert_calls_async(2).await;
}

#[tokio::test]
async fn token_endpoint_errors_abort_the_request() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(401).header("content-type", "application/json").body(
				"{\"error\":\"invalid_client\",\"error_description\":\"Client authentication failed\"}",
			);
		})
		.await;
	let api = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/items");
			then.status(200);
		})
		.await;
	let mut client = RestClient::with_registry(Arc::new(AuthenticatorRegistry::new()));

	client.set_base_url(&server.url("/v1")).expect("Mock server URL should be accepted.");
	client
		.set_authentication(
			"OAuth2",
			Some(AuthOptions::oauth2(&server.url("/oauth/token"), CLIENT_ID, CLIENT_SECRET, SCOPE)),
		)
		.expect("OAuth2 options should be accepted.");

	let err = client.get("items").await.expect_err("Token endpoint failure should surface.");

	match err {
		Error::Authentication(AuthenticationError::TokenEndpoint { detail, status }) => {
			assert_eq!(status, 401);
			assert!(detail.contains("invalid_client"), "Detail should name the error: {detail}.");
			assert!(detail.contains("Client authentication failed"));
		},
		other => panic!("Expected a token endpoint error, got {other:?}."),
	}

	token.assert_calls_async(1).await;
	api.assert_calls_async(0).await;
}

#[tokio::test]
async fn empty_access_tokens_are_rejected() {
	let server = MockServer::start_async().await;
	let _token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"\",\"token_type\":\"bearer\"}");
		})
		.await;
	let authenticator = build_authenticator(&server);
	let mut request = api_request(&server);

	assert!(matches!(
		authenticator.authenticate(&mut request).await,
		Err(Error::Authentication(AuthenticationError::EmptyAccessToken))
	));
	assert!(authorization_of(&request).is_none());
	assert!(authenticator.cached_token().await.is_none());
}

#[tokio::test]
async fn rest_calls_carry_the_exchanged_token() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"api-token\",\"token_type\":\"bearer\",\"expires_in\":\"3600\"}");
		})
		.await;
	let api = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/items").header("authorization", "Bearer api-token");
			then.status(200).body("[]");
		})
		.await;
	let mut client = RestClient::with_registry(Arc::new(AuthenticatorRegistry::new()));

	client.set_base_url(&server.url("/v1")).expect("Mock server URL should be accepted.");
	client
		.set_authentication(
			"oauth2",
			Some(AuthOptions::oauth2(&server.url("/oauth/token"), CLIENT_ID, CLIENT_SECRET, SCOPE)),
		)
		.expect("OAuth2 options should be accepted.");

	for _ in 0..3 {
		let envelope = client.get("items").await.expect("Authenticated GET should succeed.");

		assert_eq!(envelope.body, "[]");
	}

	token.assert_calls_async(1).await;
	api.assert_calls_async(3).await;
}

#[tokio::test]
async fn unreachable_token_endpoint_is_an_authentication_failure() {
	let server = MockServer::start_async().await;
	let api = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/items");
			then.status(200);
		})
		.await;
	let mut client = RestClient::with_registry(Arc::new(AuthenticatorRegistry::new()));

	client.set_base_url(&server.url("/v1")).expect("Mock server URL should be accepted.");
	client
		.set_authentication(
			"oauth2",
			Some(AuthOptions::oauth2("http://127.0.0.1:9/token", CLIENT_ID, CLIENT_SECRET, SCOPE)),
		)
		.expect("OAuth2 options should be accepted.");

	let err = client.get("items").await.expect_err("An unreachable token endpoint should fail.");

	assert!(
		matches!(err, Error::Authentication(AuthenticationError::TokenRequest(_))),
		"Token exchange transport failures should be authentication errors, got {err:?}."
	);

	api.assert_calls_async(0).await;
}
