//! Transport primitives for signed catalog requests and token exchanges.
//!
//! The relay depends only on the [`Transport`] capability: issue a GET or a
//! form POST against a fully signed URL and hand back the status and raw body.
//! Timeout, TLS, and proxy policy all belong to the implementation. The
//! `reqwest` feature ships [`ReqwestTransport`], the default implementation
//! used by the integration tests.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// Status and raw body returned by a transport call.
///
/// Non-2xx responses are returned, not converted into errors; the relay
/// decides per call site whether a status is fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body, unparsed.
	pub body: String,
}
impl HttpResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Boxed future returned by [`Transport`] calls.
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing signed catalog calls.
///
/// Each call is synchronous from the caller's perspective: the returned future
/// resolves only once the remote endpoint responds or the transport times out.
/// Implementations must be `Send + Sync` so one transport can serve concurrent
/// relay calls.
pub trait Transport
where
	Self: Send + Sync,
{
	/// Issues a GET against the provided (already signed) URL.
	fn get<'a>(&'a self, url: &'a str) -> TransportFuture<'a>;

	/// Issues a form POST against the provided (already signed) URL.
	///
	/// The signed parameters travel in the URL, so the request body is empty;
	/// the `application/x-www-form-urlencoded` content type matches what
	/// OAuth 1.0 token endpoints expect.
	fn post_form<'a>(&'a self, url: &'a str) -> TransportFuture<'a>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token and catalog requests should not follow redirects; configure any
/// custom [`ReqwestClient`] accordingly before wrapping it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	async fn collect(
		response: Result<reqwest::Response, ReqwestError>,
	) -> Result<HttpResponse, TransportError> {
		let response = response?;
		let status = response.status().as_u16();
		let body = response.text().await?;

		Ok(HttpResponse { status, body })
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Transport for ReqwestTransport {
	fn get<'a>(&'a self, url: &'a str) -> TransportFuture<'a> {
		Box::pin(async move { Self::collect(self.0.get(url).send().await).await })
	}

	fn post_form<'a>(&'a self, url: &'a str) -> TransportFuture<'a> {
		Box::pin(async move {
			let request = self
				.0
				.post(url)
				.header("content-type", "application/x-www-form-urlencoded")
				.body(Vec::new());

			Self::collect(request.send().await).await
		})
	}
}

/// HTTP methods supported by signed catalog requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
	#[default]
	/// HTTP GET.
	Get,
	/// HTTP POST.
	Post,
}
impl Method {
	/// Returns the uppercase wire label used in base strings.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn success_covers_the_2xx_range() {
		assert!(HttpResponse { status: 200, body: String::new() }.is_success());
		assert!(HttpResponse { status: 299, body: String::new() }.is_success());
		assert!(!HttpResponse { status: 301, body: String::new() }.is_success());
		assert!(!HttpResponse { status: 500, body: String::new() }.is_success());
	}

	#[test]
	fn method_labels_are_uppercase() {
		assert_eq!(Method::Get.as_str(), "GET");
		assert_eq!(Method::Post.to_string(), "POST");
	}
}
