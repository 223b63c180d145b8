//! Compiled regex patterns.
//!
//! All patterns are compiled once on first use via `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Static assets a crawler does not follow: images, stylesheets and fonts.
///
/// Matches on the path suffix, ignoring case and any trailing query string or
/// fragment (`/logo.PNG?v=3`).
pub static ASSET_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(?:png|jpe?g|css|svg|ico|gif|webp|ttf|otf)(?:[?#].*)?$")
        .expect("ASSET_SUFFIX regex")
});

/// `charset=` parameter inside a `content` attribute such as
/// `text/html; charset=ISO-8859-1`.
pub static CONTENT_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).expect("CONTENT_CHARSET regex")
});
