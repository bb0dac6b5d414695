// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result evaluation: turn raw page items into a classified check outcome

use crate::config::{GlobalConfig, TargetConfig};
use crate::product::{FieldError, ProductRecord, RawItem};

/// How a check went, which decides the next backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckClass {
    /// At least one record carries an error
    Failed,
    /// Clean page, nothing qualifying
    Empty,
    /// At least one qualifying item and no errors
    InStock,
}

impl CheckClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckClass::Failed => "failed",
            CheckClass::Empty => "empty",
            CheckClass::InStock => "in-stock",
        }
    }
}

/// Records partitioned by what they mean for the watch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckOutcome {
    /// Records with at least one error, including synthetic ones
    pub errors: Vec<ProductRecord>,
    /// Error-free, available records priced under the ceiling
    pub in_stock: Vec<ProductRecord>,
    /// Number of records evaluated
    pub evaluated: usize,
}

impl CheckOutcome {
    /// Outcome for a page that never became ready
    pub fn load_failure() -> Self {
        Self {
            errors: vec![ProductRecord::page_load_failure()],
            in_stock: Vec::new(),
            evaluated: 0,
        }
    }

    pub fn class(&self) -> CheckClass {
        if !self.errors.is_empty() {
            CheckClass::Failed
        } else if self.in_stock.is_empty() {
            CheckClass::Empty
        } else {
            CheckClass::InStock
        }
    }
}

/// Evaluate every item found on a target's page
pub fn evaluate(target: &TargetConfig, global: &GlobalConfig, items: Vec<RawItem>) -> CheckOutcome {
    let found = items.len();
    let mut records: Vec<ProductRecord> = items
        .into_iter()
        .map(|item| resolve_item(target, item))
        .collect();

    if records.is_empty() {
        records.push(ProductRecord::page_load_failure());
    } else if found != target.expected_product_count {
        if let Some(last) = records.last_mut() {
            last.errors.push(FieldError::CountMismatch {
                expected: target.expected_product_count,
                found,
            });
        }
    }

    let ceiling = target.price_ceiling(global);
    let evaluated = records.len();
    let mut outcome = CheckOutcome {
        evaluated,
        ..CheckOutcome::default()
    };
    for record in records {
        if record.has_errors() {
            outcome.errors.push(record);
        } else if qualifies(&record, ceiling) {
            outcome.in_stock.push(record);
        }
    }
    outcome
}

/// A clean record qualifies if it is not out of stock and strictly under the ceiling
pub fn qualifies(record: &ProductRecord, ceiling: f64) -> bool {
    !record.has_errors()
        && record.out_of_stock != Some(true)
        && record.price.is_some_and(|price| price < ceiling)
}

/// Resolve the four fields independently; a bad field never stops the others
fn resolve_item(target: &TargetConfig, item: RawItem) -> ProductRecord {
    let mut record = ProductRecord::default();

    match non_blank(item.name) {
        Some(name) => record.name = Some(name),
        None => record.errors.push(FieldError::ProductName),
    }

    match non_blank(item.url) {
        Some(url) => record.url = Some(url),
        None => record.errors.push(FieldError::ProductUrl),
    }

    match (&target.out_of_stock, item.out_of_stock) {
        (Some(matcher), Some(text)) => record.out_of_stock = Some(matcher.matches(&text)),
        (Some(_), None) => record.errors.push(FieldError::OutOfStock),
        (None, indicator) => record.out_of_stock = Some(indicator.is_some()),
    }

    match item.price.as_deref().and_then(parse_price) {
        Some(price) => record.price = Some(price),
        None => record.errors.push(FieldError::Price),
    }

    record
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a displayed price by keeping only ASCII digits and decimal points.
///
/// Returns `None` when nothing numeric is left or the remainder is malformed
/// (for example two decimal points).
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|p| p.is_finite())
}

#[cfg(test)]
#[path = "evaluate_tests.rs"]
mod tests;
