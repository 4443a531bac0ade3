//! Configuration types for the topology builder client.
//!
//! # Overview
//!
//! - [`ClientConfig`]: immutable settings shared by every request a client makes
//! - [`ClientConfigBuilder`]: fluent builder for [`ClientConfig`]
//! - [`AuthToken`]: bearer token with masked debug output
//! - [`DEFAULT_HOST_URL`]: the host used when none is supplied
//!
//! Constructing a configuration never fails and performs no I/O.
//!
//! # Example
//!
//! ```rust
//! use tbclient::ClientConfig;
//!
//! let config = ClientConfig::builder("my-token")
//!     .host("https://tbv3.example.com/api")
//!     .user_agent("my-tool/1.0")
//!     .disable_gzip(true)
//!     .build();
//!
//! assert_eq!(config.host_url(), "https://tbv3.example.com/api");
//! assert!(config.disable_gzip());
//! ```

mod newtypes;

pub use newtypes::AuthToken;

/// Host used when a configuration is created without an explicit host.
pub const DEFAULT_HOST_URL: &str = "http://localhost:8080";

/// Configuration for the topology builder client.
///
/// Holds the base host URL, the bearer token and the transport toggles
/// (debug logging, user agent, compression). Every request builds its own
/// transport from these values; the configuration itself is never mutated.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`. Wrap it in an `Arc` to share
/// it between services, which is what [`Client`](crate::Client) does.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    host_url: String,
    token: AuthToken,
    debug: bool,
    user_agent: Option<String>,
    disable_gzip: bool,
}

impl ClientConfig {
    /// Creates a configuration from an optional host and a token.
    ///
    /// When `host` is `None` the client talks to [`DEFAULT_HOST_URL`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use tbclient::{ClientConfig, DEFAULT_HOST_URL};
    ///
    /// let config = ClientConfig::new(None, "token");
    /// assert_eq!(config.host_url(), DEFAULT_HOST_URL);
    ///
    /// let config = ClientConfig::new(Some("https://example.com/"), "token");
    /// assert_eq!(config.host_url(), "https://example.com");
    /// ```
    #[must_use]
    pub fn new(host: Option<&str>, token: impl Into<AuthToken>) -> Self {
        let mut builder = Self::builder(token);
        if let Some(host) = host {
            builder = builder.host(host);
        }
        builder.build()
    }

    /// Creates a builder. The token is the only required value.
    #[must_use]
    pub fn builder(token: impl Into<AuthToken>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(token.into())
    }

    /// Returns the base host URL, without a trailing slash.
    #[must_use]
    pub fn host_url(&self) -> &str {
        &self.host_url
    }

    /// Returns the bearer token.
    #[must_use]
    pub const fn token(&self) -> &AuthToken {
        &self.token
    }

    /// Returns whether request and response bodies are logged.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Returns the user agent override, if configured.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Returns whether response compression is disabled.
    #[must_use]
    pub const fn disable_gzip(&self) -> bool {
        self.disable_gzip
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// # Defaults
///
/// - `host`: [`DEFAULT_HOST_URL`]
/// - `debug`: `false`
/// - `user_agent`: `None` (the transport sends the crate's own user agent)
/// - `disable_gzip`: `false`
#[derive(Debug)]
pub struct ClientConfigBuilder {
    host: Option<String>,
    token: AuthToken,
    debug: bool,
    user_agent: Option<String>,
    disable_gzip: bool,
}

impl ClientConfigBuilder {
    fn new(token: AuthToken) -> Self {
        Self {
            host: None,
            token,
            debug: false,
            user_agent: None,
            disable_gzip: false,
        }
    }

    /// Sets the base host URL (e.g. `https://tbv3.example.com/api`).
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Enables debug logging of request and response bodies.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the `User-Agent` header sent with every request.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Asks the server not to compress responses.
    #[must_use]
    pub const fn disable_gzip(mut self, disable: bool) -> Self {
        self.disable_gzip = disable;
        self
    }

    /// Builds the [`ClientConfig`].
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let host_url = self
            .host
            .as_deref()
            .unwrap_or(DEFAULT_HOST_URL)
            .trim_end_matches('/')
            .to_string();

        ClientConfig {
            host_url,
            token: self.token,
            debug: self.debug,
            user_agent: self.user_agent.filter(|ua| !ua.is_empty()),
            disable_gzip: self.disable_gzip,
        }
    }
}
