//! Query options shared by list endpoints.

pub mod builder;

use std::collections::BTreeMap;

const PAGE_PARAM: &str = "page";
const LIMIT_PARAM: &str = "limit";
const SORT_PARAM: &str = "sort";
const ORDER_PARAM: &str = "order";
const SEARCH_PARAM: &str = "search";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl From<SortOrder> for String {
    fn from(order: SortOrder) -> Self {
        order.as_str().to_string()
    }
}

/// Validated list query options. Build with [`builder::ListOptionsBuilder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub search: Option<String>,
    pub filters: BTreeMap<String, String>,
}

impl ListOptions {
    pub fn builder() -> builder::ListOptionsBuilder {
        builder::ListOptionsBuilder::default()
    }

    /// Render as query parameters. Unset options are omitted.
    ///
    /// Filters are written first so a filter can never shadow one of the
    /// named paging parameters.
    pub fn to_query(&self) -> BTreeMap<String, String> {
        let mut query = self.filters.clone();

        if let Some(page) = self.page {
            query.insert(PAGE_PARAM.to_string(), page.to_string());
        }
        if let Some(limit) = self.limit {
            query.insert(LIMIT_PARAM.to_string(), limit.to_string());
        }
        if let Some(sort) = &self.sort {
            query.insert(SORT_PARAM.to_string(), sort.clone());
        }
        if let Some(order) = self.order {
            query.insert(ORDER_PARAM.to_string(), order.as_str().to_string());
        }
        if let Some(search) = &self.search {
            query.insert(SEARCH_PARAM.to_string(), search.clone());
        }

        query
    }
}
