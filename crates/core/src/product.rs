// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Product records extracted from a page

use serde::Serialize;
use std::fmt;

/// What the page loader found inside one product container.
///
/// Every field is `None` when its locator matched nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub name: Option<String>,
    /// Absolute link to the product
    pub url: Option<String>,
    /// Text of the out-of-stock indicator, if the element exists
    pub out_of_stock: Option<String>,
    pub price: Option<String>,
}

impl RawItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_out_of_stock(mut self, text: impl Into<String>) -> Self {
        self.out_of_stock = Some(text.into());
        self
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }
}

/// A problem with one field of a product, or with the page as a whole
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldError {
    ProductName,
    ProductUrl,
    OutOfStock,
    Price,
    CountMismatch { expected: usize, found: usize },
    PageLoad,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::ProductName => f.write_str("Product name"),
            FieldError::ProductUrl => f.write_str("Product URL"),
            FieldError::OutOfStock => f.write_str("Out of stock"),
            FieldError::Price => f.write_str("Price"),
            FieldError::CountMismatch { expected, found } => {
                write!(f, "Expected {} products, found {}", expected, found)
            }
            FieldError::PageLoad => f.write_str("page load failed for this target"),
        }
    }
}

/// One evaluated product
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductRecord {
    pub name: Option<String>,
    pub url: Option<String>,
    /// `None` when the flag could not be determined
    pub out_of_stock: Option<bool>,
    pub price: Option<f64>,
    pub errors: Vec<FieldError>,
}

impl ProductRecord {
    /// Stand-in record for a page that yielded no products at all
    pub fn page_load_failure() -> Self {
        Self {
            errors: vec![FieldError::PageLoad],
            ..Self::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_error(&self, error: &FieldError) -> bool {
        self.errors.contains(error)
    }

    /// Error tags joined for logging
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
