//! Styling helpers for report text.
//!
//! Theme:
//!   - Record ids:      cyan
//!   - Distances:       green
//!   - Warnings:        yellow
//!   - Unreachable:     red
//!   - Field labels:    dimmed
//!   - Section headers: bold

use colored::Colorize;

use super::ReportOptions;

/// Record id in cyan, as `[id]`.
pub(crate) fn record_id(id: impl std::fmt::Display, options: &ReportOptions) -> String {
    let text = format!("[{id}]");
    if !options.use_colors {
        return text;
    }
    text.cyan().to_string()
}

/// Distance or weight in green.
pub(crate) fn distance(value: f64, options: &ReportOptions) -> String {
    let text = format!("{value:.4}");
    if !options.use_colors {
        return text;
    }
    text.green().to_string()
}

/// Warning text in yellow.
pub(crate) fn warning(text: &str, options: &ReportOptions) -> String {
    if !options.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Failure text in red.
pub(crate) fn failure(text: &str, options: &ReportOptions) -> String {
    if !options.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Muted text for labels and connectors.
pub(crate) fn dimmed(text: &str, options: &ReportOptions) -> String {
    if !options.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Section header in bold.
pub(crate) fn bold(text: &str, options: &ReportOptions) -> String {
    if !options.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> ReportOptions {
        ReportOptions {
            use_colors: false,
            ..ReportOptions::default()
        }
    }

    #[test]
    fn helpers_return_plain_text_without_colors() {
        let options = plain();
        assert_eq!(record_id(7, &options), "[7]");
        assert_eq!(distance(0.5, &options), "0.5000");
        assert_eq!(warning("careful", &options), "careful");
        assert_eq!(failure("no path", &options), "no path");
        assert_eq!(dimmed("label", &options), "label");
        assert_eq!(bold("Header", &options), "Header");
    }

    #[test]
    fn helpers_add_escape_codes_with_colors() {
        colored::control::set_override(true);
        let options = ReportOptions {
            use_colors: true,
            ..ReportOptions::default()
        };
        assert!(record_id(7, &options).contains("\x1b["));
        assert!(bold("Header", &options).contains("\x1b["));
        colored::control::unset_override();
    }
}
