//! Read operations: listing, lookup by id, counting and aggregation

use {
    super::executor::Executor,
    crate::ClientResult,
    parse_query_builder::prelude::{Operation, QueryBuilder},
    serde_json::Value,
};

/// Query execution methods for the Parse client
impl<E: Executor> super::client::ParseClient<E> {
    /// Fetches every object matching the query, honouring ordering, pagination,
    /// projection and includes.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use parse_rest_client::*;
    /// # async fn example(client: ParseClient) -> ClientResult<()> {
    /// let query = client
    ///     .table("GameScore")
    ///     .where_op("score", ">=", 1000)
    ///     .where_op("score", "<=", 3000)
    ///     .order_by("score", Direction::Desc)
    ///     .limit(10);
    /// let page = client.get_all(query).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_all(&self, query: QueryBuilder) -> ClientResult<Value> {
        self.execute(query, Operation::GetAll).await
    }

    /// The most recently created matching object.
    pub async fn first(&self, query: QueryBuilder) -> ClientResult<Value> {
        self.execute(query, Operation::First).await
    }

    pub async fn find(&self, query: QueryBuilder, object_id: impl Into<String>) -> ClientResult<Value> {
        self.execute(query, Operation::Find(object_id.into())).await
    }

    /// Response shape: `{"results": [], "count": n}`.
    pub async fn count(&self, query: QueryBuilder) -> ClientResult<Value> {
        self.execute(query, Operation::Count).await
    }

    /// Distinct values of the given fields. Needs Parse Server 2.7.0.
    pub async fn distinct<S: Into<String>>(
        &self,
        query: QueryBuilder,
        fields: impl IntoIterator<Item = S>,
    ) -> ClientResult<Value> {
        let fields = fields.into_iter().map(Into::into).collect();
        self.execute(query, Operation::Distinct(fields)).await
    }

    /// Runs an aggregation pipeline given as a JSON object of stages. Needs
    /// Parse Server 2.7.0.
    pub async fn aggregate(&self, query: QueryBuilder, pipeline: Value) -> ClientResult<Value> {
        self.execute(query, Operation::Aggregate(pipeline)).await
    }
}
