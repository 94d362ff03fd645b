//! Query construction for list and search operations.
//!
//! [`QueryBuilder`] maps caller parameters onto a backend-neutral
//! [`QueryDescriptor`]. The same code serves all three entity kinds; only the
//! names in the kind's [`EntityDescriptor`] differ.
//!
//! ```
//! use catalog_kit::entity::CatalogEntity;
//! use catalog_kit::models::Film;
//! use catalog_kit::query::{Page, QueryBuilder, SortOrder};
//!
//! let query = QueryBuilder::build_list(
//!     Film::descriptor(),
//!     Some("-imdb_rating"),
//!     None,
//!     Page::new(10, 2),
//! )
//! .unwrap();
//!
//! assert_eq!(query.offset, 10);
//! assert_eq!(query.limit, 10);
//! assert_eq!(query.sort.unwrap().order, SortOrder::Desc);
//! ```

pub mod dsl;

use crate::entity::EntityDescriptor;
use crate::error::{Error, Result};
use std::fmt;

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
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

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single sort key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        SortSpec {
            field: field.into(),
            order,
        }
    }

    /// Parse a caller sort parameter.
    ///
    /// A leading `-` selects descending order; the rest is the field name.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSort` when the field name is empty (`"-"`).
    pub fn parse(raw: &str) -> Result<Self> {
        let (order, field) = match raw.strip_prefix('-') {
            Some(rest) => (SortOrder::Desc, rest),
            None => (SortOrder::Asc, raw),
        };

        let field = field.trim();
        if field.is_empty() {
            return Err(Error::InvalidSort(format!(
                "no field name in sort parameter {:?}",
                raw
            )));
        }

        Ok(SortSpec::new(field, order))
    }
}

/// A searchable field and its relative weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedField {
    pub field: &'static str,
    pub boost: f32,
}

impl WeightedField {
    /// Field with the default weight of 1.
    pub const fn new(field: &'static str) -> Self {
        WeightedField { field, boost: 1.0 }
    }

    /// Field with an explicit weight.
    pub const fn boosted(field: &'static str, boost: f32) -> Self {
        WeightedField { field, boost }
    }
}

impl fmt::Display for WeightedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.boost == 1.0 {
            f.write_str(self.field)
        } else {
            write!(f, "{}^{}", self.field, self.boost)
        }
    }
}

/// Exact-match constraint on one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermFilter {
    pub field: String,
    pub value: String,
}

/// Fuzzy multi-field match. Order of results is left to the backend's relevance score.
#[derive(Clone, Debug, PartialEq)]
pub struct FreeText {
    pub query: String,
    pub fields: Vec<WeightedField>,
}

/// Pagination parameters as supplied by the caller.
///
/// Bounds (`number >= 1`, `1 <= size <= 100`) are validated upstream; offset
/// arithmetic saturates so out-of-range values never panic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub size: usize,
    pub number: usize,
}

impl Page {
    pub fn new(size: usize, number: usize) -> Self {
        Page { size, number }
    }

    /// `(number - 1) * size`
    pub fn offset(&self) -> usize {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> usize {
        self.size
    }
}

impl Default for Page {
    fn default() -> Self {
        Page { size: 50, number: 1 }
    }
}

/// Backend-neutral description of a list or search query.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryDescriptor {
    /// Exact-match constraints, ANDed together
    pub filters: Vec<TermFilter>,
    /// Explicit ordering; `None` leaves ordering to the backend
    pub sort: Option<SortSpec>,
    /// Fuzzy free-text match
    pub text: Option<FreeText>,
    pub offset: usize,
    pub limit: usize,
}

impl QueryDescriptor {
    /// True when the query constrains nothing.
    pub fn is_match_all(&self) -> bool {
        self.filters.is_empty() && self.text.is_none()
    }
}

/// Builds query descriptors from service-level parameters.
pub struct QueryBuilder;

impl QueryBuilder {
    /// Build a list query.
    ///
    /// - `sort`: `None` (or empty) applies the kind's default ordering, if any.
    /// - `filter`: exact match on the kind's filter field. Kinds without a filter
    ///   field ignore it.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSort` for a sort parameter without a field name.
    pub fn build_list(
        descriptor: &EntityDescriptor,
        sort: Option<&str>,
        filter: Option<&str>,
        page: Page,
    ) -> Result<QueryDescriptor> {
        let sort = match sort.filter(|s| !s.is_empty()) {
            Some(raw) => Some(SortSpec::parse(raw)?),
            None => descriptor
                .default_sort
                .map(|(field, order)| SortSpec::new(field, order)),
        };

        let mut filters = Vec::new();
        if let Some(value) = filter.filter(|f| !f.is_empty()) {
            match descriptor.filter_field {
                Some(field) => filters.push(TermFilter {
                    field: field.to_string(),
                    value: value.to_string(),
                }),
                None => warn!(
                    "Ignoring filter {:?}: {} has no filter field",
                    value, descriptor.kind
                ),
            }
        }

        let query = QueryDescriptor {
            filters,
            sort,
            text: None,
            offset: page.offset(),
            limit: page.limit(),
        };
        debug!("» List query for {}: {:?}", descriptor.kind, query);
        Ok(query)
    }

    /// Build a fuzzy search query over the kind's weighted field table.
    pub fn build_search(descriptor: &EntityDescriptor, query: &str, page: Page) -> QueryDescriptor {
        let query = QueryDescriptor {
            filters: Vec::new(),
            sort: None,
            text: Some(FreeText {
                query: query.to_string(),
                fields: descriptor.search_fields.to_vec(),
            }),
            offset: page.offset(),
            limit: page.limit(),
        };
        debug!("» Search query for {}: {:?}", descriptor.kind, query);
        query
    }
}
