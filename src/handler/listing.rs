//! Directory listing module
//!
//! Renders an HTML index page for a directory without an index file,
//! enumerating each direct child with its name, kind, and size.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters that must be escaped inside a path segment of an href
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\'')
    .add(b'`');

/// One direct child of the listed directory
#[derive(Debug, Clone)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

/// Render a directory listing page
///
/// `url_path` is the request path the listing was generated for; entry links
/// are built relative to it. Entries are expected pre-sorted by name.
pub fn render_listing(url_path: &str, entries: &[ListingEntry]) -> String {
    let base = if url_path.ends_with('/') {
        url_path.to_string()
    } else {
        format!("{url_path}/")
    };

    let mut rows = String::new();
    if !url_path.trim_matches('/').is_empty() {
        rows.push_str("<tr><td><a href=\"../\">../</a></td><td>dir</td><td></td></tr>\n");
    }
    for entry in entries {
        let display = escape_html(&entry.name);
        let href = format!("{base}{}", utf8_percent_encode(&entry.name, SEGMENT));
        if entry.is_dir {
            rows.push_str(&format!(
                "<tr><td><a href=\"{href}/\">{display}/</a></td><td>dir</td><td></td></tr>\n"
            ));
        } else {
            rows.push_str(&format!(
                "<tr><td><a href=\"{href}\">{display}</a></td><td>file</td><td>{}</td></tr>\n",
                format_size(entry.size)
            ));
        }
    }

    let title = escape_html(&base);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Index of {title}</title>\n\
         <style>body{{font-family:monospace;margin:2em}}td{{padding:0 1.5em 0 0}}</style>\n\
         </head>\n<body>\n<h1>Index of {title}</h1>\n<table>\n\
         <tr><th>Name</th><th>Type</th><th>Size</th></tr>\n{rows}</table>\n</body>\n</html>\n"
    )
}

/// Escape text for safe embedding in HTML
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Format a byte count for display (B/KB/MB/GB)
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    #[allow(clippy::cast_precision_loss)]
    match size {
        s if s < KB => format!("{s} B"),
        s if s < MB => format!("{:.1} KB", s as f64 / KB as f64),
        s if s < GB => format!("{:.1} MB", s as f64 / MB as f64),
        s => format!("{:.1} GB", s as f64 / GB as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entries() -> Vec<ListingEntry> {
        vec![
            ListingEntry {
                name: "app.js".to_string(),
                is_dir: false,
                size: 2048,
            },
            ListingEntry {
                name: "assets".to_string(),
                is_dir: true,
                size: 0,
            },
            ListingEntry {
                name: "index.css".to_string(),
                is_dir: false,
                size: 100,
            },
        ]
    }

    #[test]
    fn test_every_entry_listed_once() {
        let html = render_listing("/", &sample_entries());
        assert_eq!(html.matches("app.js").count(), 2); // href + display
        assert_eq!(html.matches(">assets/<").count(), 1);
        assert_eq!(html.matches(">index.css<").count(), 1);
    }

    #[test]
    fn test_directory_links_have_trailing_slash() {
        let html = render_listing("/sub", &sample_entries());
        assert!(html.contains("href=\"/sub/assets/\""));
        assert!(html.contains("href=\"/sub/app.js\""));
    }

    #[test]
    fn test_root_listing_has_no_parent_link() {
        let html = render_listing("/", &sample_entries());
        assert!(!html.contains("href=\"../\""));
        let html = render_listing("/sub/", &sample_entries());
        assert!(html.contains("href=\"../\""));
    }

    #[test]
    fn test_names_are_html_escaped() {
        let entries = vec![ListingEntry {
            name: "<script>.txt".to_string(),
            is_dir: false,
            size: 1,
        }];
        let html = render_listing("/", &entries);
        assert!(html.contains("&lt;script&gt;.txt"));
        assert!(!html.contains("><script>"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(100), "100 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
