//! Collection envelope

use serde::Serialize;

/// `{"items": [...], "item_count": N}`
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub item_count: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        let item_count = items.len();
        Self { items, item_count }
    }
}
