use crate::error::model_error::ModelError;
use crate::list_options::{ListOptions, SortOrder};

use common::ErrorLocation;

use std::collections::BTreeMap;
use std::panic::Location;

pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Builder for validated [`ListOptions`].
#[derive(Debug, Default)]
pub struct ListOptionsBuilder {
    page: Option<u32>,
    limit: Option<u32>,
    sort: Option<String>,
    order: Option<String>,
    search: Option<String>,
    filters: BTreeMap<String, String>,
}

impl ListOptionsBuilder {
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(field.into());
        self
    }

    /// Sort direction: a [`SortOrder`], or `"asc"`/`"desc"` in any case.
    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Build the options with validation.
    #[track_caller]
    pub fn build(self) -> Result<ListOptions, ModelError> {
        if self.page == Some(0) {
            return Err(ModelError::Validation {
                message: String::from("Page must be at least 1"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Some(limit) = self.limit {
            if limit == 0 || limit > MAX_PAGE_LIMIT {
                return Err(ModelError::Validation {
                    message: format!("Limit must be between 1 and {MAX_PAGE_LIMIT}, got {limit}"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        let order = match self.order.as_deref().map(str::to_ascii_lowercase) {
            None => None,
            Some(order) if order == "asc" => Some(SortOrder::Asc),
            Some(order) if order == "desc" => Some(SortOrder::Desc),
            Some(order) => {
                return Err(ModelError::Validation {
                    message: format!("Invalid sort order: {order}"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        if self.sort.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(ModelError::Validation {
                message: String::from("Sort field cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.filters.keys().any(|k| k.trim().is_empty()) {
            return Err(ModelError::Validation {
                message: String::from("Filter keys cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(ListOptions {
            page: self.page,
            limit: self.limit,
            sort: self.sort,
            order,
            search: self.search,
            filters: self.filters,
        })
    }
}
