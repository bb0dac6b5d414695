// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::OutOfStockMatcher;
use crate::test_support::{acme_config, acme_target};
use proptest::prelude::*;
use yare::parameterized;

fn acme_item(price: &str) -> RawItem {
    RawItem::new()
        .with_name("GPU")
        .with_url("https://acme.example/gpu/1")
        .with_price(price)
}

fn run(target: &TargetConfig, items: Vec<RawItem>) -> CheckOutcome {
    evaluate(target, &acme_config().global, items)
}

#[parameterized(
    plain = { "499.99", Some(499.99) },
    currency = { "$1,299.00", Some(1299.0) },
    surrounding_text = { "Now only 42.50 USD", Some(42.5) },
    integer = { "  15 ", Some(15.0) },
    empty = { "", None },
    no_digits = { "Call for price", None },
    two_points = { "1.2.3", None },
    lone_point = { ".", None },
)]
fn parse_price_cases(input: &str, expected: Option<f64>) {
    assert_eq!(parse_price(input), expected);
}

#[test]
fn just_under_ceiling_is_in_stock() {
    let outcome = run(&acme_target(), vec![acme_item("499.99")]);

    assert_eq!(outcome.class(), CheckClass::InStock);
    assert_eq!(outcome.in_stock.len(), 1);
    assert_eq!(
        outcome.in_stock[0].url.as_deref(),
        Some("https://acme.example/gpu/1")
    );
}

#[test]
fn price_equal_to_ceiling_does_not_qualify() {
    let outcome = run(&acme_target(), vec![acme_item("500.00")]);

    assert_eq!(outcome.class(), CheckClass::Empty);
    assert!(outcome.in_stock.is_empty());
    assert!(outcome.errors.is_empty());
}

#[test]
fn missing_max_price_falls_back_to_global_default() {
    let mut target = acme_target();
    target.max_price = None;
    let mut global = acme_config().global;
    global.default_max_price = 100.0;

    let outcome = evaluate(&target, &global, vec![acme_item("150")]);
    assert_eq!(outcome.class(), CheckClass::Empty);

    let outcome = evaluate(&target, &global, vec![acme_item("99")]);
    assert_eq!(outcome.class(), CheckClass::InStock);
}

#[test]
fn unparsable_price_is_an_error_and_never_in_stock() {
    let outcome = run(&acme_target(), vec![acme_item("Call us")]);

    assert_eq!(outcome.class(), CheckClass::Failed);
    assert!(outcome.in_stock.is_empty());
    assert!(outcome.errors[0].has_error(&FieldError::Price));
}

#[test]
fn missing_fields_are_tagged_independently() {
    let item = RawItem::new().with_price("12.00");

    let outcome = run(&acme_target(), vec![item]);

    let record = &outcome.errors[0];
    assert_eq!(
        record.errors,
        vec![FieldError::ProductName, FieldError::ProductUrl]
    );
    // The price still resolved even though other fields failed.
    assert_eq!(record.price, Some(12.0));
}

#[test]
fn blank_name_counts_as_missing() {
    let item = acme_item("10").with_name("   ");

    let outcome = run(&acme_target(), vec![item]);

    assert!(outcome.errors[0].has_error(&FieldError::ProductName));
}

#[test]
fn no_items_yields_one_page_load_record() {
    let mut target = acme_target();
    target.expected_product_count = 2;

    let outcome = run(&target, Vec::new());

    assert_eq!(outcome.evaluated, 1);
    assert_eq!(outcome.errors, vec![ProductRecord::page_load_failure()]);
    assert_eq!(outcome.class(), CheckClass::Failed);
}

#[test]
fn count_mismatch_is_appended_to_last_record() {
    let mut target = acme_target();
    target.expected_product_count = 2;

    let outcome = run(&target, vec![acme_item("10")]);

    assert_eq!(outcome.evaluated, 1);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(
        outcome.errors[0].errors,
        vec![FieldError::CountMismatch {
            expected: 2,
            found: 1
        }]
    );
    assert!(outcome.in_stock.is_empty());
}

#[test]
fn matching_count_adds_no_error() {
    let mut target = acme_target();
    target.expected_product_count = 2;

    let outcome = run(&target, vec![acme_item("10"), acme_item("20")]);

    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.in_stock.len(), 2);
}

#[test]
fn indicator_presence_means_out_of_stock_without_pattern() {
    let outcome = run(
        &acme_target(),
        vec![acme_item("10").with_out_of_stock("anything")],
    );

    assert_eq!(outcome.class(), CheckClass::Empty);
}

#[parameterized(
    sold_out = { "SOLD OUT", CheckClass::Empty },
    in_stock_text = { "In stock, ships today", CheckClass::InStock },
)]
fn pattern_decides_from_indicator_text(text: &str, expected: CheckClass) {
    let mut target = acme_target();
    target.out_of_stock = Some(OutOfStockMatcher::new("sold out").unwrap());

    let outcome = run(&target, vec![acme_item("10").with_out_of_stock(text)]);

    assert_eq!(outcome.class(), expected);
}

#[test]
fn pattern_with_missing_indicator_is_an_error() {
    let mut target = acme_target();
    target.out_of_stock = Some(OutOfStockMatcher::new("sold out").unwrap());

    let outcome = run(&target, vec![acme_item("10")]);

    assert!(outcome.errors[0].has_error(&FieldError::OutOfStock));
}

#[test]
fn errors_win_over_in_stock_items() {
    let mut target = acme_target();
    target.expected_product_count = 2;

    let outcome = run(&target, vec![acme_item("10"), acme_item("oops")]);

    assert_eq!(outcome.in_stock.len(), 1);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.class(), CheckClass::Failed);
}

#[test]
fn qualifies_rejects_unknown_price() {
    let record = ProductRecord {
        name: Some("GPU".to_string()),
        url: Some("https://acme.example".to_string()),
        out_of_stock: Some(false),
        price: None,
        errors: Vec::new(),
    };
    assert!(!qualifies(&record, f64::INFINITY));
}

fn arb_item() -> impl Strategy<Value = RawItem> {
    (
        proptest::option::of("[a-z ]{0,6}"),
        proptest::option::of("[a-z:/.]{0,10}"),
        proptest::option::of(prop_oneof![Just("sold out"), Just("in stock")]),
        proptest::option::of("[0-9$.,a-z]{0,8}"),
    )
        .prop_map(|(name, url, out_of_stock, price)| RawItem {
            name,
            url,
            out_of_stock: out_of_stock.map(str::to_string),
            price,
        })
}

proptest! {
    #[test]
    fn errors_and_in_stock_are_disjoint(
        items in proptest::collection::vec(arb_item(), 0..6),
        expected in 1usize..4,
        with_pattern in any::<bool>(),
    ) {
        let mut target = acme_target();
        target.expected_product_count = expected;
        if with_pattern {
            target.out_of_stock = Some(OutOfStockMatcher::new("sold out").unwrap());
        }

        let outcome = run(&target, items);

        prop_assert!(outcome.in_stock.iter().all(|r| !r.has_errors()));
        prop_assert!(outcome.errors.iter().all(|r| r.has_errors()));
        prop_assert!(outcome.in_stock.iter().all(|r| r.price.is_some_and(|p| p < 500.0)));
        prop_assert!(outcome.errors.len() + outcome.in_stock.len() <= outcome.evaluated);
        prop_assert!(outcome.evaluated >= 1);
    }
}
