//! Parse Server HTTP client module
//!
//! ## Module Organization
//!
//! - `client`: `ParseClient` struct and constructors
//! - `executor`: the `Executor` boundary and its reqwest implementation
//! - `query`: read operations (find, count, distinct, aggregate)
//! - `document`: write operations (create, update, field and array ops, delete)
//! - `response`: response parsing
//! - `url_builder`: URL construction

pub mod client;
pub mod document;
pub mod executor;
pub mod query;
mod response;
pub mod url_builder;

pub use client::ParseClient;
pub use executor::{
    batch_payload, Executor, HttpExecutor, APPLICATION_ID_HEADER, BATCH_PATH, MASTER_KEY_HEADER,
    REST_API_KEY_HEADER,
};
pub use url_builder::{encode_path, UrlBuilder};
