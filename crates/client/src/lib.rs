//! Async REST client for Parse Server.
//!
//! Queries are composed with [`QueryBuilder`] (re-exported from
//! `parse-query-builder`), compiled for a terminal operation and sent through an
//! [`Executor`]. [`HttpExecutor`] talks to a real server over `reqwest`.

pub use {config::*, err::*, http::*};

pub use parse_query_builder::prelude::*;

mod config;
pub mod err;
mod http;
