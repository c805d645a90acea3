//! Plain-text rendering of the site navigation

use std::fmt::Write;
use tint_config::{walk_all, NavEntry, SiteConfig};

/// Render the site title, nav bar and sidebar as an indented outline
pub fn render_nav(site: &SiteConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", site.site_title, site.theme);
    render_section(&mut out, "nav", &site.nav);
    render_section(&mut out, "sidebar", &site.sidebar);
    out
}

fn render_section(out: &mut String, label: &str, entries: &[NavEntry]) {
    if entries.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}:", label);
    for (depth, entry) in walk_all(entries) {
        let indent = "  ".repeat(depth + 1);
        let marker = if entry.collapsible { "+ " } else { "" };
        match &entry.link {
            Some(link) => {
                let _ = writeln!(out, "{}{}{} -> {}", indent, marker, entry.text, link);
            }
            None => {
                let _ = writeln!(out, "{}{}{}", indent, marker, entry.text);
            }
        }
    }
}
