use sea_orm::{ColumnTrait, Order};

use super::resolve_column;
use crate::errors::RepoResult;

/// Ordering column and direction for list reads.
///
/// Without an `OrderBy` no ORDER BY clause is emitted and row order is
/// whatever the database returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub desc: bool,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            desc: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            desc: true,
        }
    }

    #[must_use]
    pub fn direction(&self) -> Order {
        if self.desc { Order::Desc } else { Order::Asc }
    }

    pub(crate) fn resolve<C: ColumnTrait>(&self, resource: &str) -> RepoResult<(C, Order)> {
        Ok((resolve_column::<C>(resource, &self.column)?, self.direction()))
    }
}

impl From<&str> for OrderBy {
    fn from(column: &str) -> Self {
        Self::asc(column)
    }
}

impl From<String> for OrderBy {
    fn from(column: String) -> Self {
        Self::asc(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction() {
        assert!(matches!(OrderBy::asc("name").direction(), Order::Asc));
        assert!(matches!(OrderBy::desc("name").direction(), Order::Desc));
    }

    #[test]
    fn test_from_str_is_ascending() {
        let order: OrderBy = "created_at".into();
        assert_eq!(order, OrderBy::asc("created_at"));
        assert!(!order.desc);
    }
}
