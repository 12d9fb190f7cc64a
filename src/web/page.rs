//! HTML stats page.
//!
//! Templates use `{{folders}}`, `{{files}}` and `{{size}}` placeholders.
//! Substituted values are HTML-escaped.

use std::path::Path;

use crate::storage::StatsSnapshot;
use crate::Result;

/// Template shipped with the binary.
pub const DEFAULT_STATS_TEMPLATE: &str = include_str!("../../templates/stats.html");

/// Renders the stats page from a template.
#[derive(Debug, Clone)]
pub struct StatsPage {
    template: String,
}

impl StatsPage {
    /// Create a page from template text.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Load the template at `path`, or use the built-in one when `None`.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => {
                let template = std::fs::read_to_string(Path::new(path))?;
                tracing::info!("Loaded stats page template from {}", path);
                Ok(Self::new(template))
            }
            None => Ok(Self::default()),
        }
    }

    /// Render the page for a snapshot.
    pub fn render(&self, stats: &StatsSnapshot) -> String {
        self.template
            .replace("{{folders}}", &stats.folders.to_string())
            .replace("{{files}}", &stats.files.to_string())
            .replace("{{size}}", &escape_html(&stats.formatted_size()))
    }
}

impl Default for StatsPage {
    fn default() -> Self {
        Self::new(DEFAULT_STATS_TEMPLATE)
    }
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> StatsSnapshot {
        StatsSnapshot {
            folders: 3,
            files: 7,
            total_size: 1536,
        }
    }

    #[test]
    fn test_render_default_template() {
        let html = StatsPage::default().render(&snapshot());

        assert!(html.contains("<td id=\"folders\">3</td>"));
        assert!(html.contains("<td id=\"files\">7</td>"));
        assert!(html.contains("<td id=\"size\">1.50 KB</td>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_render_custom_template() {
        let page = StatsPage::new("{{folders}}/{{files}}/{{size}}");
        assert_eq!(page.render(&snapshot()), "3/7/1.50 KB");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("stats.html");
        std::fs::write(&path, "<p>{{files}}</p>").unwrap();

        let page = StatsPage::load(path.to_str()).unwrap();
        assert_eq!(page.render(&snapshot()), "<p>7</p>");
    }

    #[test]
    fn test_load_missing_file() {
        assert!(StatsPage::load(Some("does/not/exist.html")).is_err());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"a\" & 'b'</b>"), "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;");
    }
}
