//! Connection settings for a Parse Server deployment

use {
    crate::{ClientError, ClientResult},
    derive_getters::Getters,
    parse_query_builder::prelude::ServerVersion,
    std::env,
};

pub const ENV_APPLICATION_ID: &str = "PARSE_APPLICATION_ID";
pub const ENV_MASTER_KEY: &str = "PARSE_MASTER_KEY";
pub const ENV_REST_API_KEY: &str = "PARSE_REST_API_KEY";
pub const ENV_SERVER_URL: &str = "PARSE_SERVER_URL";
pub const ENV_SERVER_VERSION: &str = "PARSE_SERVER_VERSION";
pub const ENV_MOUNT_PATH: &str = "PARSE_MOUNT_PATH";

pub const DEFAULT_MOUNT_PATH: &str = "/parse";

#[derive(Getters, Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// sent as `X-Parse-Application-Id`
    application_id: String,
    /// sent as `X-Parse-Master-Key` when present
    master_key: Option<String>,
    /// sent as `X-Parse-REST-API-Key`
    rest_api_key: String,
    /// scheme, host and port, e.g. `https://api.example.com`
    server_url: String,
    /// gates version-dependent features and encodings
    server_version: ServerVersion,
    /// prefix Parse Server is mounted under
    mount_path: String,
}

impl ClientConfig {
    pub fn new(
        application_id: impl Into<String>,
        rest_api_key: impl Into<String>,
        server_url: impl Into<String>,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            master_key: None,
            rest_api_key: rest_api_key.into(),
            server_url: server_url.into(),
            server_version: ServerVersion::default(),
            mount_path: DEFAULT_MOUNT_PATH.to_string(),
        }
    }

    /// Reads the configuration from `PARSE_*` environment variables.
    ///
    /// Missing connection values are left empty and rejected when a request is
    /// executed. `PARSE_SERVER_VERSION` defaults to the builder's default version.
    pub fn from_env() -> ClientResult<Self> {
        let var = |name: &str| env::var(name).ok().filter(|value| !value.is_empty());

        let server_version = match var(ENV_SERVER_VERSION) {
            Some(raw) => ServerVersion::parse(&raw)?,
            None => ServerVersion::default(),
        };

        Ok(Self {
            application_id: var(ENV_APPLICATION_ID).unwrap_or_default(),
            master_key: var(ENV_MASTER_KEY),
            rest_api_key: var(ENV_REST_API_KEY).unwrap_or_default(),
            server_url: var(ENV_SERVER_URL).unwrap_or_default(),
            server_version,
            mount_path: var(ENV_MOUNT_PATH).unwrap_or_else(|| DEFAULT_MOUNT_PATH.to_string()),
        })
    }

    pub fn with_master_key(mut self, master_key: impl Into<String>) -> Self {
        self.master_key = Some(master_key.into());
        self
    }

    pub fn with_server_version(mut self, version: ServerVersion) -> Self {
        self.server_version = version;
        self
    }

    pub fn with_mount_path(mut self, mount_path: impl Into<String>) -> Self {
        self.mount_path = mount_path.into();
        self
    }

    /// Fails with [`ClientError::Configuration`] naming every missing parameter.
    pub fn validate(&self) -> ClientResult<()> {
        let missing: Vec<&str> = [
            ("server_url", &self.server_url),
            ("application_id", &self.application_id),
            ("rest_api_key", &self.rest_api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ClientError::Configuration(missing.join(", ")))
        }
    }

    /// Mount path with exactly one leading slash and no trailing slash; empty
    /// when the server is mounted at the root.
    pub fn normalized_mount_path(&self) -> String {
        let trimmed = self.mount_path.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}
