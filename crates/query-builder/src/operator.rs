use std::fmt::{Display, Formatter};

/// Comparison, membership and existence operators accepted by `where` clauses.
///
/// Every operator maps to exactly one wire keyword, except [`Operator::Contains`]
/// whose value is sent as-is (Parse treats equality on an array field as
/// membership).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
    Exists,
    ContainsAll,
    Contains,
    Like,
    /// A keyword the builder does not know about, passed through verbatim.
    Raw(String),
}

impl Operator {
    /// Resolves a symbol such as `">="` or `"notIn"`. Unknown symbols never fail,
    /// they become [`Operator::Raw`].
    pub fn parse(symbol: &str) -> Self {
        match symbol {
            "=" => Self::Eq,
            "!=" => Self::Ne,
            "<" => Self::Lt,
            "<=" => Self::Lte,
            ">" => Self::Gt,
            ">=" => Self::Gte,
            "in" => Self::In,
            "notIn" => Self::NotIn,
            "exists" => Self::Exists,
            "containsAll" => Self::ContainsAll,
            "contains" => Self::Contains,
            "like" => Self::Like,
            other => Self::Raw(other.to_string()),
        }
    }

    /// The keyword the backend expects, `None` for [`Operator::Contains`].
    pub fn wire_keyword(&self) -> Option<&str> {
        let keyword = match self {
            Self::Eq => "$eq",
            Self::Ne => "$ne",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::In => "$in",
            Self::NotIn => "$nin",
            Self::Exists => "$exists",
            Self::ContainsAll => "$all",
            Self::Like => "$regex",
            Self::Contains => return None,
            Self::Raw(keyword) => keyword.as_str(),
        };
        Some(keyword)
    }

    pub fn symbol(&self) -> &str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Exists => "exists",
            Self::ContainsAll => "containsAll",
            Self::Contains => "contains",
            Self::Like => "like",
            Self::Raw(keyword) => keyword.as_str(),
        }
    }
}

impl From<&str> for Operator {
    fn from(symbol: &str) -> Self {
        Self::parse(symbol)
    }
}

impl From<String> for Operator {
    fn from(symbol: String) -> Self {
        Self::parse(&symbol)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
