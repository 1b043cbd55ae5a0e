//! Core client struct and constructors

use {
    super::executor::{Executor, HttpExecutor},
    crate::{ClientConfig, ClientResult},
    ::tracing::instrument,
    parse_query_builder::prelude::{Operation, QueryBuilder},
    serde_json::Value,
};

#[derive(Clone, Debug)]
pub struct ParseClient<E = HttpExecutor> {
    pub(crate) config: ClientConfig,
    pub(crate) executor: E,
}

impl ParseClient<HttpExecutor> {
    /// Creates a client that talks to the configured server over HTTP.
    ///
    /// # Example
    /// ```rust,no_run
    /// use parse_rest_client::{ClientConfig, ParseClient, ServerVersion};
    ///
    /// # async fn example() -> Result<(), parse_rest_client::ClientError> {
    /// let config = ClientConfig::new("my-app-id", "my-rest-key", "https://parse.example.com")
    ///     .with_server_version(ServerVersion::new(6, 2, 0));
    /// let client = ParseClient::new(config)?;
    ///
    /// let query = client.table("GameScore").where_op("score", ">=", 1000);
    /// let scores = client.get_all(query).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let executor = HttpExecutor::new(config.clone())?;
        Ok(Self { config, executor })
    }

    /// Creates a client from the `PARSE_*` environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Wraps a prebuilt [`HttpExecutor`], taking the configuration from it so
    /// the server version used by [`ParseClient::table`] matches the server
    /// requests are sent to.
    pub fn from_http_executor(executor: HttpExecutor) -> Self {
        Self {
            config: executor.config().clone(),
            executor,
        }
    }
}

impl<E: Executor> ParseClient<E> {
    /// Creates a client with a custom [`Executor`], e.g. a different transport.
    ///
    /// `config` only drives [`ParseClient::table`] (the server version queries
    /// are compiled for); the executor sends requests with its own settings.
    /// Use [`ParseClient::from_http_executor`] to keep both in sync for an
    /// [`HttpExecutor`].
    pub fn with_executor(config: ClientConfig, executor: E) -> Self {
        Self { config, executor }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Starts a query against `class_name`, bound to the configured server version.
    pub fn table(&self, class_name: impl Into<String>) -> QueryBuilder {
        QueryBuilder::new(class_name).server_version(self.config.server_version().clone())
    }

    /// Compiles `query` for `operation` and sends it.
    ///
    /// The executor's response is returned unmodified.
    #[instrument(
        name = "parse.execute",
        skip(self, query, operation),
        fields(
            table = query.table_name(),
            operation = operation.name()
        ),
        err
    )]
    pub async fn execute(&self, query: QueryBuilder, operation: Operation) -> ClientResult<Value> {
        let request = query.compile(&operation)?;
        self.executor.execute(&request).await
    }
}
