// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Naming for diagnostic page captures

use crate::watch::ShotKind;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Base path (without extension) for a capture.
///
/// `{dir}/{kind}-{store}-{timestamp}`; the loader adds an extension that fits
/// what it writes.
pub fn screenshot_path(dir: &Path, kind: ShotKind, store: &str, at: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "{}-{}-{}",
        kind.as_str(),
        slugify(store),
        at.format("%Y%m%d-%H%M%S-%3f")
    ))
}

/// Lowercase, with runs of anything but ASCII alphanumerics collapsed to `-`
pub fn slugify(store: &str) -> String {
    let mut slug = String::with_capacity(store.len());
    let mut pending_dash = false;
    for c in store.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("store");
    }
    slug
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
