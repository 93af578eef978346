//! Query Builder
//!
//! Converts a `FilterSet` into OData query parameters for the Bridge API.
//! Filter predicates are built as a small typed tree and rendered through
//! `Display`, which is the only place string literals get quoted.

use std::fmt;

use crate::search::filters::FilterSet;

/// Fields requested for search result pages.
pub const LIST_SELECT_FIELDS: &[&str] = &[
    "ListingKey",
    "ListingId",
    "ListPrice",
    "BedroomsTotal",
    "BathroomsTotalInteger",
    "LivingArea",
    "City",
    "StateOrProvince",
    "UnparsedAddress",
    "PublicRemarks",
    "PropertyType",
    "Media",
    "PhotosCount",
    "ModificationTimestamp",
    "ListingContractDate",
    "StandardStatus",
];

/// Fields requested for single-listing detail lookups.
pub const DETAIL_SELECT_FIELDS: &[&str] = &[
    "ListingKey",
    "ListingId",
    "ListPrice",
    "BedroomsTotal",
    "BathroomsTotalInteger",
    "LivingArea",
    "LotSizeArea",
    "YearBuilt",
    "City",
    "StateOrProvince",
    "PostalCode",
    "UnparsedAddress",
    "PublicRemarks",
    "PropertyType",
    "PropertySubType",
    "Media",
    "PhotosCount",
    "ModificationTimestamp",
    "ListingContractDate",
    "CloseDate",
    "CoolingYN",
    "HeatingYN",
    "FireplacesTotal",
    "StandardStatus",
];

/// Most recently modified listings first
pub const DEFAULT_ORDER_BY: &str = "ModificationTimestamp desc";

/// Provider resource holding listings
pub const PROPERTY_ENDPOINT: &str = "Property";

// == Predicate Tree ==

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Ge,
    Le,
}

impl CompareOp {
    fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Gt => "gt",
            CompareOp::Ge => "ge",
            CompareOp::Le => "le",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Str(String),
    Int(u64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "'{}'", escape_literal(s)),
            Literal::Int(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `Field op value`
    Compare {
        field: &'static str,
        op: CompareOp,
        value: Literal,
    },
    /// `contains(Field, 'value')`
    Contains { field: &'static str, value: String },
    /// Parenthesized disjunction
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    pub fn compare(field: &'static str, op: CompareOp, value: Literal) -> Self {
        Predicate::Compare { field, op, value }
    }

    pub fn eq_str(field: &'static str, value: impl Into<String>) -> Self {
        Self::compare(field, CompareOp::Eq, Literal::Str(value.into()))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { field, op, value } => {
                write!(f, "{} {} {}", field, op.as_str(), value)
            }
            Predicate::Contains { field, value } => {
                write!(f, "contains({}, {})", field, Literal::Str(value.clone()))
            }
            Predicate::AnyOf(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(" or "))
            }
        }
    }
}

/// Doubles embedded single quotes so a value cannot break out of its literal.
pub fn escape_literal(raw: &str) -> String {
    raw.replace('\'', "''")
}

/// Joins predicates with `and`, or returns None when there are none.
pub fn conjunction(predicates: &[Predicate]) -> Option<String> {
    if predicates.is_empty() {
        return None;
    }
    let parts: Vec<String> = predicates.iter().map(ToString::to_string).collect();
    Some(parts.join(" and "))
}

// == Provider Query ==
/// A fully-built request against the provider's OData endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderQuery {
    pub select_fields: Vec<String>,
    pub top: Option<u32>,
    pub order_by: Option<String>,
    pub filter_expression: Option<String>,
}

impl ProviderQuery {
    /// Creates a query selecting the given fields with no paging or filter.
    pub fn select(fields: &[&str]) -> Self {
        Self {
            select_fields: fields.iter().map(|f| f.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter_expression = Some(filter.into());
        self
    }

    /// Query string parameters in the provider's `$`-prefixed naming.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(4);
        if !self.select_fields.is_empty() {
            params.push(("$select", self.select_fields.join(",")));
        }
        if let Some(top) = self.top {
            params.push(("$top", top.to_string()));
        }
        if let Some(order_by) = &self.order_by {
            params.push(("$orderby", order_by.clone()));
        }
        if let Some(filter) = &self.filter_expression {
            params.push(("$filter", filter.clone()));
        }
        params
    }
}

// == Builders ==

/// Builds the filter predicates for a search, base predicates first.
pub fn search_predicates(filters: &FilterSet) -> Vec<Predicate> {
    let mut predicates = vec![
        Predicate::eq_str("StandardStatus", "Active"),
        Predicate::compare("PhotosCount", CompareOp::Gt, Literal::Int(0)),
    ];

    if !filters.cities.is_empty() {
        predicates.push(Predicate::AnyOf(
            filters
                .cities
                .iter()
                .map(|city| Predicate::eq_str("City", city.as_str()))
                .collect(),
        ));
    }

    if let Some(min) = filters.min_price {
        predicates.push(Predicate::compare("ListPrice", CompareOp::Ge, Literal::Int(min)));
    }
    if let Some(max) = filters.max_price {
        predicates.push(Predicate::compare("ListPrice", CompareOp::Le, Literal::Int(max)));
    }
    if let Some(beds) = filters.min_bedrooms {
        predicates.push(Predicate::compare(
            "BedroomsTotal",
            CompareOp::Ge,
            Literal::Int(u64::from(beds)),
        ));
    }
    if let Some(baths) = filters.min_bathrooms {
        predicates.push(Predicate::compare(
            "BathroomsTotalInteger",
            CompareOp::Ge,
            Literal::Int(u64::from(baths)),
        ));
    }
    if let Some(kind) = &filters.property_type {
        predicates.push(Predicate::eq_str("PropertyType", kind.as_str()));
    }
    if let Some(keywords) = &filters.keywords {
        predicates.push(Predicate::Contains {
            field: "PublicRemarks",
            value: keywords.clone(),
        });
    }

    predicates
}

/// Builds the paged, ordered list query for a search.
pub fn build_search_query(filters: &FilterSet) -> ProviderQuery {
    let query = ProviderQuery::select(LIST_SELECT_FIELDS)
        .with_top(filters.limit)
        .with_order_by(DEFAULT_ORDER_BY);

    match conjunction(&search_predicates(filters)) {
        Some(expr) => query.with_filter(expr),
        None => query,
    }
}

/// Builds a detail lookup by opaque `ListingKey`.
pub fn build_listing_key_query(listing_key: &str) -> ProviderQuery {
    ProviderQuery::select(DETAIL_SELECT_FIELDS)
        .with_filter(Predicate::eq_str("ListingKey", listing_key).to_string())
}

/// Builds a detail lookup by human-facing MLS number (`ListingId`).
pub fn build_listing_id_query(listing_id: &str) -> ProviderQuery {
    ProviderQuery::select(DETAIL_SELECT_FIELDS)
        .with_filter(Predicate::eq_str("ListingId", listing_id).to_string())
}
