use derive_getters::Getters;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single compiled call: method, path relative to the server mount point,
/// query params and JSON body.
#[derive(Getters, Debug, Clone, PartialEq, Serialize)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Value>,
}

impl RequestDescriptor {
    pub(crate) fn new(method: Method, path: String) -> Self {
        Self {
            method,
            path,
            params: None,
            body: None,
        }
    }

    /// Empty param sets are dropped.
    pub(crate) fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = (!params.is_empty()).then_some(params);
        self
    }

    pub(crate) fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref().and_then(|params| params.get(name))
    }
}

/// Output of compilation: one call, or several writes sent through `/batch`.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Single(RequestDescriptor),
    Batch(Vec<RequestDescriptor>),
}

impl Request {
    pub fn descriptors(&self) -> &[RequestDescriptor] {
        match self {
            Request::Single(descriptor) => std::slice::from_ref(descriptor),
            Request::Batch(descriptors) => descriptors,
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, Request::Batch(_))
    }

    pub fn as_single(&self) -> Option<&RequestDescriptor> {
        match self {
            Request::Single(descriptor) => Some(descriptor),
            Request::Batch(_) => None,
        }
    }
}
