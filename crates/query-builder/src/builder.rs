use crate::compiler::{self, Operation};
use crate::condition::{Clause, Conditions, FieldCondition, Pointer, RelationCondition};
use crate::operator::Operator;
use crate::request::Request;
use crate::version::ServerVersion;
use crate::{QueryError, QueryResult};
use itertools::Itertools;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    fn apply(self, field: &str) -> String {
        match self {
            Direction::Asc => field.to_string(),
            Direction::Desc => format!("-{field}"),
        }
    }
}

/// Builds a query against one Parse class using a fluent interface.
///
/// Every call consumes the builder and returns the updated one. Calls that can
/// reject their input return a [`QueryResult`] instead.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    table: String,
    version: ServerVersion,
    conditions: Conditions,
    select: Vec<String>,
    except: Vec<String>,
    include: Vec<String>,
    order: Option<String>,
    limit: Option<i64>,
    skip: Option<i64>,
}

impl QueryBuilder {
    /// Creates a builder for `table`, targeting the default server version.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Switches the class the query runs against.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Sets the server version that gates features and param encodings.
    pub fn server_version(mut self, version: ServerVersion) -> Self {
        self.version = version;
        self
    }

    // --- Filters ---

    /// Filters `field` with an operator, e.g. `where_op("score", ">=", 10)`.
    ///
    /// Several operators on one field are combined, which is how ranges are built.
    pub fn where_op(
        self,
        field: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<Value>,
    ) -> Self {
        self.where_clause(Clause::new(field, operator, value))
    }

    /// Plain equality. Ignored when `field` already has a condition.
    pub fn where_eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_clause(Clause::eq(field, value))
    }

    pub fn where_clause(mut self, clause: Clause) -> Self {
        self.conditions.merge_clause(&clause);
        self
    }

    /// Applies a list of triples in order.
    pub fn where_clauses<C: Into<Clause>>(mut self, clauses: impl IntoIterator<Item = C>) -> Self {
        for clause in clauses {
            self.conditions.merge_clause(&clause.into());
        }
        self
    }

    /// Merges a pre-built condition object.
    pub fn where_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions.merge(conditions);
        self
    }

    pub fn where_in<V: Into<Value>>(
        self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.where_op(field, Operator::In, collect_array(values))
    }

    pub fn where_not_in<V: Into<Value>>(
        self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.where_op(field, Operator::NotIn, collect_array(values))
    }

    pub fn where_exists(self, field: impl Into<String>) -> Self {
        self.where_op(field, Operator::Exists, true)
    }

    pub fn where_not_exists(self, field: impl Into<String>) -> Self {
        self.where_op(field, Operator::Exists, false)
    }

    pub fn where_contains_all<V: Into<Value>>(
        self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.where_op(field, Operator::ContainsAll, collect_array(values))
    }

    /// Array field holds `value`.
    pub fn where_contains(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_op(field, Operator::Contains, value)
    }

    /// Regular expression match.
    pub fn where_like(self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.where_op(field, Operator::Like, pattern.into())
    }

    /// Full-text search on `field`. Needs Parse Server 2.5.0.
    ///
    /// A blank `field` or `term` (empty or whitespace only) is rejected with
    /// [`QueryError::InvalidArgument`]. Replaces any condition already set on
    /// `field`.
    pub fn where_full_text(mut self, field: &str, term: &str) -> QueryResult<Self> {
        self.version
            .require("Full-text search", &ServerVersion::FULL_TEXT_SEARCH)?;

        if field.trim().is_empty() {
            return Err(QueryError::InvalidArgument(
                "full-text search field must be a non-empty string".to_string(),
            ));
        }
        if term.trim().is_empty() {
            return Err(QueryError::InvalidArgument(
                "full-text search term must be a non-empty string".to_string(),
            ));
        }

        self.conditions.set(
            field,
            FieldCondition::operator("$text", json!({ "$search": { "$term": term } })),
        );
        Ok(self)
    }

    /// Foreign-key equality: `field` points at `class_name/object_id`.
    ///
    /// Replaces any condition already set on `field`.
    pub fn where_join_key(
        mut self,
        field: &str,
        class_name: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Self {
        let pointer = Pointer::new(class_name, object_id);
        self.conditions
            .set(field, FieldCondition::Literal(pointer.to_value()));
        self
    }

    /// `field` matches an object of `class_name` satisfying every clause.
    pub fn where_join_in_query<C: Into<Clause>>(
        self,
        field: &str,
        clauses: impl IntoIterator<Item = C>,
        class_name: impl Into<String>,
    ) -> Self {
        self.join_query(field, "$inQuery", clauses, class_name.into())
    }

    /// `field` matches no object of `class_name` satisfying the clauses.
    pub fn where_join_not_in_query<C: Into<Clause>>(
        self,
        field: &str,
        clauses: impl IntoIterator<Item = C>,
        class_name: impl Into<String>,
    ) -> Self {
        self.join_query(field, "$notInQuery", clauses, class_name.into())
    }

    fn join_query<C: Into<Clause>>(
        mut self,
        field: &str,
        keyword: &str,
        clauses: impl IntoIterator<Item = C>,
        class_name: String,
    ) -> Self {
        // each clause stays its own object, they are not merged
        let sub_query: Vec<Value> = clauses
            .into_iter()
            .map(|clause| clause.into().to_value())
            .collect();

        self.conditions.merge_operator(
            field,
            keyword,
            json!({ "where": sub_query, "className": class_name }),
        );
        self
    }

    /// Objects that are members of the relation `key` on the given parent.
    pub fn where_related_to(
        mut self,
        parent_class: impl Into<String>,
        parent_id: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        self.conditions.relate(RelationCondition {
            parent: Pointer::new(parent_class, parent_id),
            key: key.into(),
        });
        self
    }

    // --- Includes and projection ---

    /// Includes the objects behind the given pointer fields in the response.
    pub fn with<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.include.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Only return the given fields. Conflicts with [`QueryBuilder::except`].
    pub fn select<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> QueryResult<Self> {
        if !self.except.is_empty() {
            return Err(conflicting_projection());
        }
        self.select = fields.into_iter().map(Into::into).collect();
        Ok(self)
    }

    /// Return everything but the given fields. Conflicts with [`QueryBuilder::select`].
    pub fn except<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> QueryResult<Self> {
        if !self.select.is_empty() {
            return Err(conflicting_projection());
        }
        self.except = fields.into_iter().map(Into::into).collect();
        Ok(self)
    }

    // --- Ordering and pagination ---

    /// Appends a sort key. Earlier keys take precedence.
    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        let key = direction.apply(field);
        self.order = Some(match self.order.take() {
            Some(existing) => format!("{existing},{key}"),
            None => key,
        });
        self
    }

    /// Replaces the ordering with the given fields, ascending.
    pub fn order_by_asc<S: AsRef<str>>(self, fields: impl IntoIterator<Item = S>) -> Self {
        self.replace_order(fields, Direction::Asc)
    }

    /// Replaces the ordering with the given fields, descending.
    pub fn order_by_desc<S: AsRef<str>>(self, fields: impl IntoIterator<Item = S>) -> Self {
        self.replace_order(fields, Direction::Desc)
    }

    fn replace_order<S: AsRef<str>>(mut self, fields: impl IntoIterator<Item = S>, direction: Direction) -> Self {
        self.order = Some(
            fields
                .into_iter()
                .map(|field| direction.apply(field.as_ref()))
                .join(","),
        );
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: i64) -> Self {
        self.skip = Some(skip);
        self
    }

    // --- Compilation ---

    /// Freezes the current state into the request for `operation`.
    pub fn compile(&self, operation: &Operation) -> QueryResult<Request> {
        compiler::compile(self, operation)
    }

    // --- Accessors ---

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn version(&self) -> &ServerVersion {
        &self.version
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    pub fn selected_fields(&self) -> &[String] {
        &self.select
    }

    pub fn excluded_fields(&self) -> &[String] {
        &self.except
    }

    pub fn included_fields(&self) -> &[String] {
        &self.include
    }

    pub fn ordering(&self) -> Option<&str> {
        self.order.as_deref()
    }

    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    pub fn skip_value(&self) -> Option<i64> {
        self.skip
    }

    /// Forces the newest-first single-row window used by `first`.
    pub(crate) fn newest_only(mut self) -> Self {
        self.order = Some("-createdAt".to_string());
        self.limit = Some(1);
        self
    }
}

fn collect_array<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Value {
    Value::Array(values.into_iter().map(Into::into).collect())
}

fn conflicting_projection() -> QueryError {
    QueryError::ConflictingOptions("cannot use both select and except on the same query".to_string())
}
