//! Turns a [`QueryBuilder`] plus a terminal [`Operation`] into a [`Request`].

use crate::builder::QueryBuilder;
use crate::request::{Method, Request, RequestDescriptor};
use crate::version::ServerVersion;
use crate::{QueryError, QueryResult};
use serde_json::{json, Map, Value};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayOperation {
    Add,
    AddUnique,
    Remove,
}

impl ArrayOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrayOperation::Add => "Add",
            ArrayOperation::AddUnique => "AddUnique",
            ArrayOperation::Remove => "Remove",
        }
    }
}

/// The terminal call that decides what gets compiled.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    GetAll,
    /// Newest object only: `order=-createdAt`, `limit=1`.
    First,
    Find(String),
    Count,
    Distinct(Vec<String>),
    /// Pipeline stages, spread into the query params.
    Aggregate(Value),
    /// One object per entry, always sent as a batch.
    Create(Vec<Value>),
    Update {
        id: String,
        data: Value,
    },
    /// Negative amounts decrement.
    Increment {
        id: String,
        field: String,
        amount: i64,
    },
    DeleteField {
        id: String,
        field: String,
    },
    ArrayUpdate {
        id: String,
        field: String,
        operation: ArrayOperation,
        objects: Vec<Value>,
    },
    Delete(String),
}

impl Operation {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::GetAll => "get_all",
            Operation::First => "first",
            Operation::Find(_) => "find",
            Operation::Count => "count",
            Operation::Distinct(_) => "distinct",
            Operation::Aggregate(_) => "aggregate",
            Operation::Create(_) => "create",
            Operation::Update { .. } => "update",
            Operation::Increment { .. } => "increment",
            Operation::DeleteField { .. } => "delete_field",
            Operation::ArrayUpdate { .. } => "array_update",
            Operation::Delete(_) => "delete",
        }
    }
}

pub fn compile(query: &QueryBuilder, operation: &Operation) -> QueryResult<Request> {
    let request = match operation {
        Operation::GetAll => Request::Single(list(query)),
        Operation::First => Request::Single(list(&query.clone().newest_only())),
        Operation::Find(id) => {
            let mut params = Map::new();
            projection_params(query, &mut params);
            include_param(query, &mut params);
            Request::Single(RequestDescriptor::new(Method::Get, object_path(query, id)).with_params(params))
        }
        Operation::Count => {
            let mut params = Map::new();
            params.insert("limit".to_string(), json!(0));
            params.insert("count".to_string(), json!(1));
            where_param(query, &mut params);
            Request::Single(RequestDescriptor::new(Method::Get, class_path(query)).with_params(params))
        }
        Operation::Distinct(fields) => {
            query.version().require("Distinct", &ServerVersion::AGGREGATE)?;
            let mut params = Map::new();
            where_param(query, &mut params);
            params.insert("distinct".to_string(), Value::String(fields.join(",")));
            Request::Single(RequestDescriptor::new(Method::Get, aggregate_path(query)).with_params(params))
        }
        Operation::Aggregate(pipeline) => {
            query.version().require("Aggregate", &ServerVersion::AGGREGATE)?;
            let Value::Object(stages) = pipeline else {
                return Err(QueryError::InvalidArgument(
                    "aggregate pipeline must be a JSON object".to_string(),
                ));
            };
            Request::Single(
                RequestDescriptor::new(Method::Get, aggregate_path(query)).with_params(stages.clone()),
            )
        }
        Operation::Create(items) => {
            if items.is_empty() {
                return Err(QueryError::InvalidArgument("nothing to create".to_string()));
            }
            Request::Batch(
                items
                    .iter()
                    .map(|item| RequestDescriptor::new(Method::Post, class_path(query)).with_body(item.clone()))
                    .collect(),
            )
        }
        Operation::Update { id, data } => write(query, id, data.clone()),
        Operation::Increment { id, field, amount } => write(
            query,
            id,
            field_op(field, json!({ "__op": "Increment", "amount": amount })),
        ),
        Operation::DeleteField { id, field } => {
            write(query, id, field_op(field, json!({ "__op": "Delete" })))
        }
        Operation::ArrayUpdate {
            id,
            field,
            operation,
            objects,
        } => write(
            query,
            id,
            field_op(field, json!({ "__op": operation.as_str(), "objects": objects })),
        ),
        Operation::Delete(id) => Request::Single(RequestDescriptor::new(Method::Delete, object_path(query, id))),
    };

    trace!(operation = operation.name(), ?request, "compiled request");
    Ok(request)
}

fn list(query: &QueryBuilder) -> RequestDescriptor {
    let mut params = Map::new();
    if let Some(order) = query.ordering() {
        params.insert("order".to_string(), Value::String(order.to_string()));
    }
    if let Some(limit) = query.limit_value() {
        params.insert("limit".to_string(), json!(limit));
    }
    if let Some(skip) = query.skip_value() {
        params.insert("skip".to_string(), json!(skip));
    }
    projection_params(query, &mut params);
    where_param(query, &mut params);
    include_param(query, &mut params);

    RequestDescriptor::new(Method::Get, class_path(query)).with_params(params)
}

fn write(query: &QueryBuilder, id: &str, body: Value) -> Request {
    Request::Single(RequestDescriptor::new(Method::Put, object_path(query, id)).with_body(body))
}

fn field_op(field: &str, op: Value) -> Value {
    let mut body = Map::new();
    body.insert(field.to_string(), op);
    Value::Object(body)
}

fn where_param(query: &QueryBuilder, params: &mut Map<String, Value>) {
    if !query.conditions().is_empty() {
        params.insert(
            "where".to_string(),
            Value::String(query.conditions().to_value().to_string()),
        );
    }
}

fn projection_params(query: &QueryBuilder, params: &mut Map<String, Value>) {
    if !query.selected_fields().is_empty() {
        params.insert("keys".to_string(), projection(query.selected_fields(), query.version()));
    }
    if !query.excluded_fields().is_empty() {
        params.insert(
            "excludeKeys".to_string(),
            projection(query.excluded_fields(), query.version()),
        );
    }
}

/// Arrays from 5.0.0 on, comma-joined strings before.
fn projection(fields: &[String], version: &ServerVersion) -> Value {
    if version.at_least(&ServerVersion::ARRAY_PROJECTION) {
        json!(fields)
    } else {
        Value::String(fields.join(","))
    }
}

fn include_param(query: &QueryBuilder, params: &mut Map<String, Value>) {
    if !query.included_fields().is_empty() {
        params.insert(
            "include".to_string(),
            Value::String(query.included_fields().join(",")),
        );
    }
}

fn class_path(query: &QueryBuilder) -> String {
    format!("/classes/{}", query.table_name())
}

fn object_path(query: &QueryBuilder, id: &str) -> String {
    format!("/classes/{}/{}", query.table_name(), id)
}

fn aggregate_path(query: &QueryBuilder) -> String {
    format!("/aggregate/{}", query.table_name())
}
