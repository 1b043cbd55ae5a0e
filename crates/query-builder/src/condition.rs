//! The `where` document and the rules for merging filters into it.

use crate::operator::Operator;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Key of the top-level relation constraint in a `where` document.
pub const RELATED_TO: &str = "$relatedTo";

/// Filter on a single field: either a literal (implicit equality) or a set of
/// wire keywords with their operands.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldCondition {
    Literal(Value),
    Operators(Map<String, Value>),
}

impl FieldCondition {
    pub fn operator(keyword: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut operators = Map::new();
        operators.insert(keyword.into(), value.into());
        Self::Operators(operators)
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Operators(operators) => Value::Object(operators.clone()),
        }
    }
}

/// One `(field, operator, value)` triple. Without an operator the value is a
/// plain equality.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    field: String,
    operator: Option<Operator>,
    value: Value,
}

impl Clause {
    pub fn new(field: impl Into<String>, operator: impl Into<Operator>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: Some(operator.into()),
            value: value.into(),
        }
    }

    /// A bare-value clause (`field == value`).
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: None,
            value: value.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> Option<&Operator> {
        self.operator.as_ref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn to_condition(&self) -> FieldCondition {
        match self.operator.as_ref().and_then(Operator::wire_keyword) {
            Some(keyword) => FieldCondition::operator(keyword, self.value.clone()),
            None => FieldCondition::Literal(self.value.clone()),
        }
    }

    /// The clause as a standalone single-key object, the shape sub-queries use.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(self.field.clone(), self.to_condition().to_value());
        Value::Object(object)
    }
}

impl<F, O, V> From<(F, O, V)> for Clause
where
    F: Into<String>,
    O: Into<Operator>,
    V: Into<Value>,
{
    fn from((field, operator, value): (F, O, V)) -> Self {
        Self::new(field, operator, value)
    }
}

/// Reference to a single object of another class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    pub class_name: String,
    pub object_id: String,
}

impl Pointer {
    pub fn new(class_name: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            object_id: object_id.into(),
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "__type": "Pointer",
            "className": self.class_name,
            "objectId": self.object_id,
        })
    }
}

/// Objects reachable through the relation `key` of the `parent` object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationCondition {
    pub parent: Pointer,
    pub key: String,
}

impl RelationCondition {
    pub fn to_value(&self) -> Value {
        json!({
            "object": self.parent.to_value(),
            "key": self.key,
        })
    }
}

/// Accumulated `where` document.
///
/// Field order follows the order in which fields were first filtered on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    fields: Vec<(String, FieldCondition)>,
    related_to: Option<RelationCondition>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.related_to.is_none()
    }

    pub fn get(&self, field: &str) -> Option<&FieldCondition> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, condition)| condition)
    }

    pub fn related_to(&self) -> Option<&RelationCondition> {
        self.related_to.as_ref()
    }

    fn get_mut(&mut self, field: &str) -> Option<&mut FieldCondition> {
        self.fields
            .iter_mut()
            .find(|(name, _)| name == field)
            .map(|(_, condition)| condition)
    }

    /// Adds `keyword: value` to the field's operator map, creating it if needed.
    ///
    /// A field that currently holds a literal keeps it as `$eq` next to the new keyword.
    pub fn merge_operator(&mut self, field: &str, keyword: &str, value: Value) {
        match self.get_mut(field) {
            None => self
                .fields
                .push((field.to_string(), FieldCondition::operator(keyword, value))),
            Some(existing) => {
                if let FieldCondition::Literal(literal) = existing {
                    let literal = literal.take();
                    *existing = FieldCondition::operator("$eq", literal);
                }
                if let FieldCondition::Operators(operators) = existing {
                    operators.insert(keyword.to_string(), value);
                }
            }
        }
    }

    /// Sets a literal on a field with no condition yet; otherwise does nothing.
    pub fn merge_literal(&mut self, field: &str, value: Value) {
        if self.get(field).is_none() {
            self.fields
                .push((field.to_string(), FieldCondition::Literal(value)));
        }
    }

    pub fn merge_clause(&mut self, clause: &Clause) {
        match clause.operator().and_then(Operator::wire_keyword) {
            Some(keyword) => self.merge_operator(clause.field(), keyword, clause.value().clone()),
            None => self.merge_literal(clause.field(), clause.value().clone()),
        }
    }

    pub fn merge_field(&mut self, field: &str, condition: FieldCondition) {
        match condition {
            FieldCondition::Literal(value) => self.merge_literal(field, value),
            FieldCondition::Operators(operators) => {
                for (keyword, value) in operators {
                    self.merge_operator(field, &keyword, value);
                }
            }
        }
    }

    /// Merges every entry of `other` with the same rules as individual calls.
    pub fn merge(&mut self, other: Conditions) {
        for (field, condition) in other.fields {
            self.merge_field(&field, condition);
        }
        if let Some(relation) = other.related_to {
            self.related_to = Some(relation);
        }
    }

    /// Replaces whatever is stored for `field`, bypassing the merge rules.
    pub fn set(&mut self, field: &str, condition: FieldCondition) {
        match self.get_mut(field) {
            Some(existing) => *existing = condition,
            None => self.fields.push((field.to_string(), condition)),
        }
    }

    pub fn relate(&mut self, relation: RelationCondition) {
        self.related_to = Some(relation);
    }

    pub fn to_value(&self) -> Value {
        let mut object: Map<String, Value> = self
            .fields
            .iter()
            .map(|(field, condition)| (field.clone(), condition.to_value()))
            .collect();

        if let Some(relation) = &self.related_to {
            object.insert(RELATED_TO.to_string(), relation.to_value());
        }

        Value::Object(object)
    }
}

impl FromIterator<Clause> for Conditions {
    fn from_iter<T: IntoIterator<Item = Clause>>(iter: T) -> Self {
        let mut conditions = Conditions::new();
        for clause in iter {
            conditions.merge_clause(&clause);
        }
        conditions
    }
}

impl Serialize for Conditions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
