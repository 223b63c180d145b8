//! Crawler-style cleanup of extracted lines.
//!
//! A crawler that diffs successive snapshots of a page wants a stable,
//! comparable list: no asset URLs, no blank lines, sorted and unique. Every
//! step is opt-in through [`Options`]; with the defaults the lines pass
//! through untouched.

use crate::options::Options;
use crate::patterns::ASSET_SUFFIX;

/// Is `line` a reference to a static asset (image, stylesheet, font)?
#[must_use]
pub fn is_asset(line: &str) -> bool {
    ASSET_SUFFIX.is_match(line.trim_end())
}

/// Apply the cleanup steps enabled in `options`, in order: drop empty lines,
/// drop assets, then sort and remove duplicates.
#[must_use]
pub fn apply(mut lines: Vec<String>, options: &Options) -> Vec<String> {
    let before = lines.len();

    if options.skip_empty {
        lines.retain(|line| !line.trim().is_empty());
    }
    if options.filter_assets {
        lines.retain(|line| !is_asset(line));
    }
    if options.sort_unique {
        lines.sort_unstable();
        lines.dedup();
    }

    if lines.len() != before {
        tracing::debug!(before, after = lines.len(), "post-processed lines");
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn defaults_leave_lines_untouched() {
        let input = lines(&["b", "", "a.png", "a", "b"]);
        assert_eq!(apply(input.clone(), &Options::default()), input);
    }

    #[test]
    fn filters_assets() {
        let options = Options {
            filter_assets: true,
            ..Options::default()
        };
        assert_eq!(
            apply(lines(&["/app.js", "/logo.png", "/page", "/font.woff2", "/f.ttf"]), &options),
            lines(&["/app.js", "/page", "/font.woff2"])
        );
    }

    #[test]
    fn sorts_and_deduplicates() {
        let options = Options {
            sort_unique: true,
            ..Options::default()
        };
        assert_eq!(
            apply(lines(&["b.com", "a.com", "b.com", "B.com"]), &options),
            lines(&["B.com", "a.com", "b.com"])
        );
    }

    #[test]
    fn skips_blank_lines() {
        let options = Options {
            skip_empty: true,
            ..Options::default()
        };
        assert_eq!(apply(lines(&["a", "", " \n", "b"]), &options), lines(&["a", "b"]));
    }

    #[test]
    fn crawler_preset_applies_everything() {
        let options = Options::crawler(crate::ExtractMode::Links);
        assert_eq!(
            apply(lines(&["/z", "", "/a.css", "/a", "/z"]), &options),
            lines(&["/a", "/z"])
        );
    }
}
