//! Catalog descriptor data structures and validation.

// self
use crate::_prelude::*;

/// Signature method label advertised in every signed request.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

const DEFAULT_API_BASE: &str = "http://api.netflix.com";
const DEFAULT_REQUEST_TOKEN_URL: &str = "http://api.netflix.com/oauth/request_token";
const DEFAULT_ACCESS_TOKEN_URL: &str = "http://api.netflix.com/oauth/access_token";
const DEFAULT_AUTHORIZE_URL: &str = "https://api-user.netflix.com/oauth/login";

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum DescriptorError {
	/// An endpoint string could not be parsed as a URL.
	#[error("The {endpoint} endpoint is not a valid URL: {raw}.")]
	UnparseableEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Raw value that failed to parse.
		raw: String,
	},
	/// Endpoints must be plain HTTP(S).
	#[error("The {endpoint} endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The API base must not carry a query or fragment; paths are appended to it.
	#[error("The API base URL must not carry a query or fragment: {url}.")]
	ApiBaseNotPlain {
		/// Offending URL.
		url: String,
	},
}

/// Immutable endpoint set for one catalog deployment.
///
/// Fixed per deployment; clone freely, never mutated after `build`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDescriptor {
	/// Base URL that resource paths are appended to.
	pub api_base: Url,
	/// OAuth 1.0 request-token endpoint.
	pub request_token_url: Url,
	/// OAuth 1.0 access-token endpoint.
	pub access_token_url: Url,
	/// End-user authorization (sign-in) endpoint.
	pub authorize_url: Url,
}
impl CatalogDescriptor {
	/// Creates a builder seeded with the upstream catalog's deployment values.
	pub fn builder() -> CatalogDescriptorBuilder {
		CatalogDescriptorBuilder::default()
	}

	/// Fully qualified resource URL for a path, without any query string.
	///
	/// Built by string concatenation so the byte format stays exactly
	/// `{api_base}/{path}`; [`Url`] prints a bare authority with a trailing
	/// slash, which is trimmed here.
	pub fn resource_url(&self, path: &str) -> String {
		format!("{}/{}", self.api_base.as_str().trim_end_matches('/'), path)
	}

	fn validate(self) -> Result<Self, DescriptorError> {
		validate_scheme("API base", &self.api_base)?;
		validate_scheme("request-token", &self.request_token_url)?;
		validate_scheme("access-token", &self.access_token_url)?;
		validate_scheme("authorize", &self.authorize_url)?;

		if self.api_base.query().is_some() || self.api_base.fragment().is_some() {
			return Err(DescriptorError::ApiBaseNotPlain { url: self.api_base.to_string() });
		}

		Ok(self)
	}
}

/// Builder for [`CatalogDescriptor`] values.
///
/// Every field starts at the upstream default, so `build()` with no overrides
/// yields the production deployment and tests only override what they mock.
#[derive(Clone, Debug)]
pub struct CatalogDescriptorBuilder {
	api_base: String,
	request_token_url: String,
	access_token_url: String,
	authorize_url: String,
}
impl CatalogDescriptorBuilder {
	/// Overrides the API base URL.
	pub fn api_base(mut self, url: impl Into<String>) -> Self {
		self.api_base = url.into();

		self
	}

	/// Overrides the request-token endpoint.
	pub fn request_token_url(mut self, url: impl Into<String>) -> Self {
		self.request_token_url = url.into();

		self
	}

	/// Overrides the access-token endpoint.
	pub fn access_token_url(mut self, url: impl Into<String>) -> Self {
		self.access_token_url = url.into();

		self
	}

	/// Overrides the authorize endpoint.
	pub fn authorize_url(mut self, url: impl Into<String>) -> Self {
		self.authorize_url = url.into();

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<CatalogDescriptor, DescriptorError> {
		let descriptor = CatalogDescriptor {
			api_base: parse_endpoint("API base", &self.api_base)?,
			request_token_url: parse_endpoint("request-token", &self.request_token_url)?,
			access_token_url: parse_endpoint("access-token", &self.access_token_url)?,
			authorize_url: parse_endpoint("authorize", &self.authorize_url)?,
		};

		descriptor.validate()
	}
}
impl Default for CatalogDescriptorBuilder {
	fn default() -> Self {
		Self {
			api_base: DEFAULT_API_BASE.into(),
			request_token_url: DEFAULT_REQUEST_TOKEN_URL.into(),
			access_token_url: DEFAULT_ACCESS_TOKEN_URL.into(),
			authorize_url: DEFAULT_AUTHORIZE_URL.into(),
		}
	}
}

fn parse_endpoint(name: &'static str, raw: &str) -> Result<Url, DescriptorError> {
	Url::parse(raw)
		.map_err(|_| DescriptorError::UnparseableEndpoint { endpoint: name, raw: raw.to_owned() })
}

fn validate_scheme(name: &'static str, url: &Url) -> Result<(), DescriptorError> {
	if matches!(url.scheme(), "http" | "https") {
		Ok(())
	} else {
		Err(DescriptorError::UnsupportedScheme { endpoint: name, url: url.to_string() })
	}
}
