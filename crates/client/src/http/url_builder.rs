//! URL building utilities for Parse Server endpoints

use {
    crate::{ClientConfig, ClientResult},
    serde_json::{Map, Value},
    url::Url,
};

/// Joins server URL, mount path and endpoint path, and appends encoded query params.
#[derive(Debug)]
pub struct UrlBuilder<'a> {
    server_url: &'a str,
    mount_path: String,
    path: String,
    query_params: Vec<(String, String)>,
}

impl<'a> UrlBuilder<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self {
            server_url: config.server_url().trim_end_matches('/'),
            mount_path: config.normalized_mount_path(),
            path: String::new(),
            query_params: Vec::new(),
        }
    }

    /// Endpoint path below the mount point, e.g. `/classes/GameScore` or `/batch`.
    /// Each segment is percent-encoded.
    pub fn path(mut self, path: &str) -> Self {
        self.path = encode_path(path);
        self
    }

    /// Add a query parameter. Strings are sent verbatim, other JSON values as JSON text.
    pub fn param(mut self, key: &str, value: &Value) -> Self {
        let raw = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        self.query_params.push((
            urlencoding::encode(key).into_owned(),
            urlencoding::encode(&raw).into_owned(),
        ));
        self
    }

    pub fn params(self, params: Option<&Map<String, Value>>) -> Self {
        params
            .into_iter()
            .flatten()
            .fold(self, |builder, (key, value)| builder.param(key, value))
    }

    /// Build the final URL
    pub fn build(self) -> ClientResult<Url> {
        let mut url = format!("{}{}{}", self.server_url, self.mount_path, self.path);

        if !self.query_params.is_empty() {
            let query_string = self
                .query_params
                .into_iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query_string);
        }

        Ok(Url::parse(&url)?)
    }
}

/// Percent-encodes every `/`-separated segment, so class names and object ids
/// such as `a#b` stay inside the path.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}
