//! Paging and ordering parameters shared by every `select_all`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CqcError;

pub const DEFAULT_LIMIT: u32 = 100;
pub const DEFAULT_ORDER_BY: &str = "id";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = CqcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(CqcError::InvalidSortOrder {
                value: s.to_string(),
            })
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// `LIMIT`/`OFFSET`/`ORDER BY` for a listing
///
/// `order_by` is free text until checked against a table's columns with
/// [`Page::order_column`]; only a checked name is ever placed into SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
    pub order_by: String,
    pub order: SortOrder,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            order_by: DEFAULT_ORDER_BY.to_string(),
            order: SortOrder::Asc,
        }
    }
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = column.into();
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Resolve `order_by` against `columns`, returning the canonical
    /// column name
    ///
    /// # Errors
    ///
    /// `CqcError::UnknownColumn` if `order_by` is not one of `columns`.
    pub fn order_column(
        &self,
        table: &'static str,
        columns: &[&'static str],
    ) -> Result<&'static str, CqcError> {
        columns
            .iter()
            .copied()
            .find(|c| *c == self.order_by)
            .ok_or_else(|| CqcError::UnknownColumn {
                table,
                column: self.order_by.clone(),
            })
    }
}
