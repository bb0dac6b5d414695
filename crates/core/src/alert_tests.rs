// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn item(name: &str, url: &str, price: f64) -> ProductRecord {
    ProductRecord {
        name: Some(name.to_string()),
        url: Some(url.to_string()),
        out_of_stock: Some(false),
        price: Some(price),
        errors: Vec::new(),
    }
}

fn two_item_alert() -> Alert {
    Alert::new(
        "Acme",
        vec!["me@example.com".to_string()],
        vec![
            item("GPU", "https://acme.example/gpu", 499.99),
            item("CPU", "https://acme.example/cpu", 199.0),
        ],
    )
}

#[test]
fn subject_names_the_store() {
    assert_eq!(two_item_alert().subject(), "In stock at Acme");
}

#[test]
fn body_lists_one_url_per_line() {
    assert_eq!(
        two_item_alert().body(),
        "https://acme.example/gpu\nhttps://acme.example/cpu\n"
    );
}

#[test]
fn items_without_url_are_left_out_of_the_body() {
    let mut alert = two_item_alert();
    alert.items[0].url = None;
    assert_eq!(alert.body(), "https://acme.example/cpu\n");
}

#[test]
fn summary_shows_name_and_price() {
    let alert = Alert::new(
        "Acme",
        Vec::new(),
        vec![item("GPU", "https://acme.example/gpu", 499.99)],
    );
    assert_eq!(alert.summary(), "GPU (499.99) https://acme.example/gpu");
}
