//! The boundary between compiled requests and the network

use {
    super::{
        response::parse_response,
        url_builder::{encode_path, UrlBuilder},
    },
    crate::{ClientConfig, ClientResult},
    ::tracing::{debug, trace},
    async_trait::async_trait,
    parse_query_builder::prelude::{Method, Request, RequestDescriptor},
    reqwest::{header::CONTENT_TYPE, Client, RequestBuilder},
    serde_json::{json, Value},
    std::sync::Arc,
};

pub const APPLICATION_ID_HEADER: &str = "X-Parse-Application-Id";
pub const REST_API_KEY_HEADER: &str = "X-Parse-REST-API-Key";
pub const MASTER_KEY_HEADER: &str = "X-Parse-Master-Key";

/// Endpoint for [`Request::Batch`], below the mount path.
pub const BATCH_PATH: &str = "/batch";

/// Sends a compiled [`Request`] and returns the parsed JSON response.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, request: &Request) -> ClientResult<Value>;
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for Arc<E> {
    async fn execute(&self, request: &Request) -> ClientResult<Value> {
        (**self).execute(request).await
    }
}

/// [`Executor`] backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpExecutor {
    config: ClientConfig,
    http: Client,
}

impl HttpExecutor {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            config,
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
        })
    }

    /// Reuses an existing `reqwest::Client`.
    pub fn with_http_client(config: ClientConfig, http: Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn build_url(&self) -> UrlBuilder {
        UrlBuilder::new(&self.config)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder
            .header(APPLICATION_ID_HEADER, self.config.application_id())
            .header(REST_API_KEY_HEADER, self.config.rest_api_key())
            .header(CONTENT_TYPE, "application/json");

        match self.config.master_key() {
            Some(master_key) => builder.header(MASTER_KEY_HEADER, master_key),
            None => builder,
        }
    }

    async fn send_single(&self, descriptor: &RequestDescriptor) -> ClientResult<Value> {
        let uri = self
            .build_url()
            .path(descriptor.path())
            .params(descriptor.params().as_ref())
            .build()?;

        debug!("📡 {} {}", descriptor.method(), &uri);

        let mut builder = self
            .authorize(self.http.request(to_reqwest_method(*descriptor.method()), uri));
        if let Some(body) = descriptor.body() {
            trace!("payload: {}", body);
            builder = builder.json(body);
        }

        let res = builder.send().await?;
        parse_response(res).await
    }

    async fn send_batch(&self, descriptors: &[RequestDescriptor]) -> ClientResult<Value> {
        let uri = self.build_url().path(BATCH_PATH).build()?;
        let payload = batch_payload(descriptors, &self.config.normalized_mount_path());

        debug!("📡 POST {} ({} requests)", &uri, descriptors.len());
        trace!("payload: {}", &payload);

        let res = self
            .authorize(self.http.post(uri))
            .json(&payload)
            .send()
            .await?;
        parse_response(res).await
    }
}

#[async_trait]
impl Executor for HttpExecutor {
    async fn execute(&self, request: &Request) -> ClientResult<Value> {
        self.config.validate()?;

        match request {
            Request::Single(descriptor) => self.send_single(descriptor).await,
            Request::Batch(descriptors) => self.send_batch(descriptors).await,
        }
    }
}

/// Body of a `/batch` call. Sub-request paths must include the mount path.
pub fn batch_payload(descriptors: &[RequestDescriptor], mount_path: &str) -> Value {
    let requests: Vec<Value> = descriptors
        .iter()
        .map(|descriptor| {
            let mut request = json!({
                "method": descriptor.method(),
                "path": format!("{}{}", mount_path, encode_path(descriptor.path())),
            });
            if let Some(body) = descriptor.body() {
                request["body"] = body.clone();
            }
            request
        })
        .collect();

    json!({ "requests": requests })
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}
