//! Write operations: create, update, field operators and delete

use {
    super::executor::Executor,
    crate::ClientResult,
    parse_query_builder::prelude::{ArrayOperation, Operation, QueryBuilder},
    serde_json::Value,
};

/// Document write methods for the Parse client
impl<E: Executor> super::client::ParseClient<E> {
    /// Creates one object. Inserts always go through the `/batch` endpoint.
    #[pseudonym::alias(insert)]
    pub async fn create(&self, query: QueryBuilder, data: Value) -> ClientResult<Value> {
        self.create_many(query, vec![data]).await
    }

    /// Creates every object in `items` with a single batch call.
    pub async fn create_many(&self, query: QueryBuilder, items: Vec<Value>) -> ClientResult<Value> {
        self.execute(query, Operation::Create(items)).await
    }

    /// Applies a partial document to an existing object.
    pub async fn update(
        &self,
        query: QueryBuilder,
        object_id: impl Into<String>,
        data: Value,
    ) -> ClientResult<Value> {
        let operation = Operation::Update {
            id: object_id.into(),
            data,
        };
        self.execute(query, operation).await
    }

    pub async fn increment(
        &self,
        query: QueryBuilder,
        object_id: impl Into<String>,
        field: impl Into<String>,
    ) -> ClientResult<Value> {
        self.increment_by(query, object_id, field, 1).await
    }

    pub async fn increment_by(
        &self,
        query: QueryBuilder,
        object_id: impl Into<String>,
        field: impl Into<String>,
        amount: i64,
    ) -> ClientResult<Value> {
        let operation = Operation::Increment {
            id: object_id.into(),
            field: field.into(),
            amount,
        };
        self.execute(query, operation).await
    }

    pub async fn decrement(
        &self,
        query: QueryBuilder,
        object_id: impl Into<String>,
        field: impl Into<String>,
    ) -> ClientResult<Value> {
        self.increment_by(query, object_id, field, -1).await
    }

    pub async fn decrement_by(
        &self,
        query: QueryBuilder,
        object_id: impl Into<String>,
        field: impl Into<String>,
        amount: i64,
    ) -> ClientResult<Value> {
        self.increment_by(query, object_id, field, -amount).await
    }

    /// Removes `field` from the object.
    pub async fn delete_field(
        &self,
        query: QueryBuilder,
        object_id: impl Into<String>,
        field: impl Into<String>,
    ) -> ClientResult<Value> {
        let operation = Operation::DeleteField {
            id: object_id.into(),
            field: field.into(),
        };
        self.execute(query, operation).await
    }

    pub async fn add_to_array(
        &self,
        query: QueryBuilder,
        object_id: impl Into<String>,
        field: impl Into<String>,
        objects: Vec<Value>,
    ) -> ClientResult<Value> {
        self.update_array(query, object_id, field, ArrayOperation::Add, objects)
            .await
    }

    /// Adds only the objects not already present in the array.
    pub async fn add_unique_to_array(
        &self,
        query: QueryBuilder,
        object_id: impl Into<String>,
        field: impl Into<String>,
        objects: Vec<Value>,
    ) -> ClientResult<Value> {
        self.update_array(query, object_id, field, ArrayOperation::AddUnique, objects)
            .await
    }

    pub async fn remove_from_array(
        &self,
        query: QueryBuilder,
        object_id: impl Into<String>,
        field: impl Into<String>,
        objects: Vec<Value>,
    ) -> ClientResult<Value> {
        self.update_array(query, object_id, field, ArrayOperation::Remove, objects)
            .await
    }

    pub async fn update_array(
        &self,
        query: QueryBuilder,
        object_id: impl Into<String>,
        field: impl Into<String>,
        operation: ArrayOperation,
        objects: Vec<Value>,
    ) -> ClientResult<Value> {
        let operation = Operation::ArrayUpdate {
            id: object_id.into(),
            field: field.into(),
            operation,
            objects,
        };
        self.execute(query, operation).await
    }

    pub async fn delete(&self, query: QueryBuilder, object_id: impl Into<String>) -> ClientResult<Value> {
        self.execute(query, Operation::Delete(object_id.into())).await
    }
}
