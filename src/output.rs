//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ## srcset
//!
//! ```text
//!  400w  https://cdn.example.com/w-400,f-webp/products/abc.jpg
//!  800w  https://cdn.example.com/w-800,f-webp/products/abc.jpg
//!
//! srcset: https://cdn.example.com/w-400,f-webp/products/abc.jpg 400w, ...
//! ```
//!
//! ## placeholder
//!
//! ```text
//! Placeholder: https://cdn.example.com/w-50,q-20,bl-10/products/abc.jpg
//! Full:        https://cdn.example.com/w-800,q-80/products/abc.jpg
//! ```

use crate::config::ImageConfig;
use crate::preset::Preset;
use crate::responsive::{ProgressivePair, ResponsiveSet};
use crate::transform::{Convention, encode};

/// Right-align widths so URLs line up.
fn width_column(set: &ResponsiveSet) -> usize {
    set.entries
        .iter()
        .map(|e| e.width.to_string().len() + 1)
        .max()
        .unwrap_or(0)
}

pub fn format_srcset(set: &ResponsiveSet) -> Vec<String> {
    if set.is_empty() {
        return vec!["(empty reference, no srcset)".to_string()];
    }
    let col = width_column(set);
    let mut lines: Vec<String> = set
        .entries
        .iter()
        .map(|e| format!("{:>col$}  {}", format!("{}w", e.width), e.url))
        .collect();
    lines.push(String::new());
    lines.push(format!("srcset: {}", set.descriptor()));
    lines
}

pub fn print_srcset(set: &ResponsiveSet) {
    for line in format_srcset(set) {
        println!("{}", line);
    }
}

pub fn format_pair(pair: &ProgressivePair) -> Vec<String> {
    if pair.is_empty() {
        return vec!["(empty reference, no urls)".to_string()];
    }
    vec![
        format!("Placeholder: {}", pair.placeholder),
        format!("Full:        {}", pair.full),
    ]
}

pub fn print_pair(pair: &ProgressivePair) {
    for line in format_pair(pair) {
        println!("{}", line);
    }
}

/// One line per preset: name, loading mode, encoded segment.
pub fn format_presets(convention: Convention, default_quality: u32) -> Vec<String> {
    let name_col = Preset::ALL
        .iter()
        .map(|p| p.name().len())
        .max()
        .unwrap_or(0);
    Preset::ALL
        .iter()
        .map(|p| {
            let mode = if p.lazy() { "lazy" } else { "eager" };
            format!(
                "{:<name_col$}  {:<5}  {}",
                p.name(),
                mode,
                encode(&p.request(default_quality), convention)
            )
        })
        .collect()
}

pub fn print_presets(convention: Convention, default_quality: u32) {
    for line in format_presets(convention, default_quality) {
        println!("{}", line);
    }
}

/// Summary of a resolved config for `check-config`.
pub fn format_config_summary(config: &ImageConfig) -> Vec<String> {
    let origin = config.origin.resolve();
    let widths = config
        .responsive
        .widths
        .iter()
        .map(|w| w.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let proxy = if config.delivery.proxy_prefix.trim().is_empty() {
        "(disabled)".to_string()
    } else {
        config.delivery.proxy_prefix.clone()
    };
    vec![
        format!(
            "Origin:      {}",
            if origin.is_empty() { "(unset, urls will be relative)" } else { origin.as_str() }
        ),
        format!("Convention:  {}", convention_name(config.delivery.convention)),
        format!("Proxy:       {}", proxy),
        format!("Widths:      {}", widths),
        format!(
            "Placeholder: {}px q{} blur {}",
            config.placeholder.width, config.placeholder.quality, config.placeholder.blur
        ),
        format!(
            "Loader:      margin {}px, threshold {}",
            config.loader.root_margin_px, config.loader.threshold
        ),
    ]
}

pub fn print_config_summary(config: &ImageConfig) {
    for line in format_config_summary(config) {
        println!("{}", line);
    }
}

fn convention_name(convention: Convention) -> &'static str {
    match convention {
        Convention::PathSegment => "path-segment",
        Convention::QueryString => "query-string",
        Convention::ProxyOptions => "proxy-options",
    }
}
