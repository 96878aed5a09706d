use sea_orm::{ColumnTrait, Condition, Value, sea_query::SimpleExpr};

use super::resolve_column;
use crate::errors::RepoResult;

/// Right-hand side of an equality or membership predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// `column = value`
    One(Value),
    /// `column IN (values)`
    Many(Vec<Value>),
    /// `column IS NULL`
    Null,
}

impl FilterValue {
    pub fn one(value: impl Into<Value>) -> Self {
        Self::One(value.into())
    }

    pub fn many<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Many(values.into_iter().map(Into::into).collect())
    }

    pub(crate) fn to_expr<C: ColumnTrait>(&self, column: C) -> SimpleExpr {
        match self {
            Self::One(value) => column.eq(value.clone()),
            Self::Many(values) => column.is_in(values.iter().cloned()),
            Self::Null => column.is_null(),
        }
    }

    /// Whether no row can match, so the query can be skipped.
    pub(crate) fn is_empty_set(&self) -> bool {
        matches!(self, Self::Many(values) if values.is_empty())
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        Self::One(value)
    }
}

impl From<Vec<Value>> for FilterValue {
    fn from(values: Vec<Value>) -> Self {
        Self::Many(values)
    }
}

macro_rules! filter_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    Self::One(value.into())
                }
            }

            impl From<Vec<$ty>> for FilterValue {
                fn from(values: Vec<$ty>) -> Self {
                    Self::many(values)
                }
            }
        )*
    };
}

filter_value_from!(
    bool,
    i16,
    i32,
    i64,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    &str,
    sea_orm::prelude::Uuid,
);

/// Predicates joined with AND, named by column.
///
/// ```rust
/// use crudrepo::Filters;
///
/// let filters = Filters::new()
///     .eq("status", "open")
///     .is_in("owner_id", vec![1i32, 2, 3])
///     .is_null("deleted_at");
/// assert_eq!(filters.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    predicates: Vec<(String, FilterValue)>,
}

impl Filters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.predicates.push((column.into(), value.into()));
        self
    }

    #[must_use]
    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(column, FilterValue::one(value))
    }

    #[must_use]
    pub fn is_in<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.with(column, FilterValue::many(values))
    }

    #[must_use]
    pub fn is_null(self, column: impl Into<String>) -> Self {
        self.with(column, FilterValue::Null)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.predicates
            .iter()
            .map(|(column, value)| (column.as_str(), value))
    }

    /// Resolves every column against the entity and builds the condition.
    pub(crate) fn to_condition<C: ColumnTrait>(&self, resource: &str) -> RepoResult<Condition> {
        let mut condition = Condition::all();
        for (column, value) in &self.predicates {
            let column = resolve_column::<C>(resource, column)?;
            condition = condition.add(value.to_expr(column));
        }
        Ok(condition)
    }
}

/// Renders a filter or identity value for error messages.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::Bool(Some(v)) => v.to_string(),
        Value::SmallInt(Some(v)) => v.to_string(),
        Value::Int(Some(v)) => v.to_string(),
        Value::BigInt(Some(v)) => v.to_string(),
        Value::SmallUnsigned(Some(v)) => v.to_string(),
        Value::Unsigned(Some(v)) => v.to_string(),
        Value::BigUnsigned(Some(v)) => v.to_string(),
        Value::String(Some(v)) => v.to_string(),
        Value::Uuid(Some(v)) => v.to_string(),
        other => format!("{other:?}"),
    }
}
