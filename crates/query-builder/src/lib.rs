//! Fluent query builder for the Parse Server REST API.
//!
//! A [`QueryBuilder`](builder::QueryBuilder) accumulates filters, projections,
//! ordering and pagination. Handing it an [`Operation`](compiler::Operation)
//! compiles the state into a [`Request`](request::Request) that an executor can
//! send over HTTP. Nothing in this crate performs I/O.

pub mod builder;
pub mod compiler;
pub mod condition;
mod error;
pub mod operator;
pub mod request;
pub mod version;

pub use error::{QueryError, QueryResult};

pub mod prelude {
    pub use crate::builder::{Direction, QueryBuilder};
    pub use crate::compiler::{compile, ArrayOperation, Operation};
    pub use crate::condition::{Clause, Conditions, FieldCondition, Pointer, RelationCondition};
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::operator::Operator;
    pub use crate::request::{Method, Request, RequestDescriptor};
    pub use crate::version::ServerVersion;
}

#[cfg(test)]
mod tests;
