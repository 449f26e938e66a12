//! Consumer credential loading with exactly-once lazy semantics.
//!
//! The application's consumer key/secret (plus the display name and callback
//! URL used during authorization) come from a [`CredentialSource`]. The
//! [`CredentialProvider`] loads them on first access, caches the result, and
//! blocks concurrent first callers so the source is only ever read once per
//! generation. `reload` clears the cache; `relocate` swaps the source and
//! reloads. Both are explicit calls, so credential changes never happen behind
//! a caller's back.

// std
use std::{
	fs,
	path::{Path, PathBuf},
};
// self
use crate::{_prelude::*, error::ConfigError, token::TokenSecret};

/// Immutable consumer credential set resolved from a configuration source.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialSet {
	/// Consumer key identifying the application.
	pub key: String,
	/// Consumer secret; feeds the signing key, never the wire.
	pub secret: TokenSecret,
	/// Application display name forwarded on the authorize redirect.
	pub application_name: String,
	/// Callback URL the provider redirects end users to after sign-in.
	pub authorize_callback_url: String,
}
impl CredentialSet {
	fn validate(self) -> Result<Self, ConfigError> {
		if self.key.is_empty() {
			return Err(ConfigError::MissingCredential { field: "key" });
		}
		if self.secret.is_empty() {
			return Err(ConfigError::MissingCredential { field: "secret" });
		}

		Ok(self)
	}
}
impl Debug for CredentialSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialSet")
			.field("key", &self.key)
			.field("secret", &"<redacted>")
			.field("application_name", &self.application_name)
			.field("authorize_callback_url", &self.authorize_callback_url)
			.finish()
	}
}

/// Source of consumer credentials (file, environment, test fixture).
pub trait CredentialSource
where
	Self: Send + Sync,
{
	/// Reads and validates a credential set.
	fn load(&self) -> Result<CredentialSet, ConfigError>;
}

/// Reads credentials from a JSON file.
///
/// Expected shape:
/// `{"key": "...", "secret": "...", "application_name": "...", "authorize_callback_url": "..."}`.
#[derive(Clone, Debug)]
pub struct FileCredentialSource {
	path: PathBuf,
}
impl FileCredentialSource {
	/// Points the source at the provided path; nothing is read until `load`.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Path the source reads from.
	pub fn path(&self) -> &Path {
		&self.path
	}
}
impl CredentialSource for FileCredentialSource {
	fn load(&self) -> Result<CredentialSet, ConfigError> {
		let location = self.path.display().to_string();
		let raw = fs::read_to_string(&self.path)
			.map_err(|e| ConfigError::SourceUnreadable { location: location.clone(), source: e })?;
		let mut deserializer = serde_json::Deserializer::from_str(&raw);
		let parsed: CredentialSet = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|e| ConfigError::SourceParse { location, source: e })?;

		parsed.validate()
	}
}

/// In-memory credential source for tests and embedded configuration.
#[derive(Clone, Debug)]
pub struct StaticCredentials(CredentialSet);
impl StaticCredentials {
	/// Builds a static source from the four consumer fields.
	pub fn new(
		key: impl Into<String>,
		secret: impl Into<String>,
		application_name: impl Into<String>,
		authorize_callback_url: impl Into<String>,
	) -> Self {
		Self(CredentialSet {
			key: key.into(),
			secret: TokenSecret::new(secret),
			application_name: application_name.into(),
			authorize_callback_url: authorize_callback_url.into(),
		})
	}
}
impl CredentialSource for StaticCredentials {
	fn load(&self) -> Result<CredentialSet, ConfigError> {
		self.0.clone().validate()
	}
}

/// Caching front door for consumer credentials.
///
/// The cache lock is held across the load so concurrent first callers either
/// perform the single load or block until it finishes and read the cached
/// result.
pub struct CredentialProvider {
	source: RwLock<Arc<dyn CredentialSource>>,
	cached: Mutex<Option<CredentialSet>>,
}
impl CredentialProvider {
	/// Creates a provider over the given source; nothing is loaded yet.
	pub fn new(source: impl CredentialSource + 'static) -> Self {
		Self { source: RwLock::new(Arc::new(source)), cached: Mutex::new(None) }
	}

	/// Returns the credential set, loading it on first access.
	pub fn get(&self) -> Result<CredentialSet, ConfigError> {
		let mut cached = self.cached.lock();

		if let Some(set) = cached.as_ref() {
			return Ok(set.clone());
		}

		let source = self.source.read().clone();
		let set = source.load()?;

		*cached = Some(set.clone());

		Ok(set)
	}

	/// Consumer key accessor.
	pub fn consumer_key(&self) -> Result<String, ConfigError> {
		Ok(self.get()?.key)
	}

	/// Consumer secret accessor.
	pub fn consumer_secret(&self) -> Result<TokenSecret, ConfigError> {
		Ok(self.get()?.secret)
	}

	/// Clears the cache and loads fresh values from the current source.
	pub fn reload(&self) -> Result<CredentialSet, ConfigError> {
		*self.cached.lock() = None;

		self.get()
	}

	/// Swaps the credential source, clears cached values, and reloads.
	pub fn relocate(
		&self,
		source: impl CredentialSource + 'static,
	) -> Result<CredentialSet, ConfigError> {
		*self.source.write() = Arc::new(source);

		self.reload()
	}
}
impl Debug for CredentialProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialProvider")
			.field("loaded", &self.cached.lock().is_some())
			.finish()
	}
}
