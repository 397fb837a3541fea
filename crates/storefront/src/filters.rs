//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Image shown when a product has no image or its URL fails to load.
pub const PLACEHOLDER_IMAGE: &str = "/static/img/placeholder.svg";

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the image URL, or the placeholder when it is blank.
///
/// Usage in templates: `{{ product.image|or_placeholder }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn or_placeholder(url: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let url = url.to_string();
    if url.trim().is_empty() {
        Ok(PLACEHOLDER_IMAGE.to_string())
    } else {
        Ok(url)
    }
}
