//! Equality/ordering filters understood by every store backend.

/// Sort direction for a [`Filter`] order clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

/// A conjunction of field equality conditions plus an optional order
/// clause. Field values are compared against the document's string
/// representation, which covers the id and timestamp fields this service
/// filters on.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<(String, String)>,
    order: Option<Order>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.conditions.push((field.into(), value.to_string()));
        self
    }

    pub fn order_desc(mut self, field: impl Into<String>) -> Self {
        self.order = Some(Order {
            field: field.into(),
            direction: Direction::Descending,
        });
        self
    }

    pub fn order_asc(mut self, field: impl Into<String>) -> Self {
        self.order = Some(Order {
            field: field.into(),
            direction: Direction::Ascending,
        });
        self
    }

    pub fn conditions(&self) -> &[(String, String)] {
        &self.conditions
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }
}
