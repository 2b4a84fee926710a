//! Source-list loading: a plain-text file, one URL per line.

use std::path::Path;

use tracing::info;

use listforge_shared::{ListforgeError, Result};

/// Read and filter the source list, preserving line order.
pub fn read_sources(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| ListforgeError::io(path, e))?;
    let urls = parse_sources(&content);
    info!(path = %path.display(), count = urls.len(), "loaded source list");
    Ok(urls)
}

/// Filter raw source-list text: trim, drop blanks and `#` comments.
pub fn parse_sources(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blanks_and_comments() {
        let content = "\
# AdGuard sources
https://a.example/list.txt

  https://b.example/list.txt
# trailing comment
";
        let urls = parse_sources(content);
        assert_eq!(
            urls,
            vec![
                "https://a.example/list.txt".to_string(),
                "https://b.example/list.txt".to_string(),
            ]
        );
    }

    #[test]
    fn preserves_order() {
        let content = "https://z.example/1\nhttps://a.example/2\nhttps://m.example/3\n";
        let urls = parse_sources(content);
        assert_eq!(urls[0], "https://z.example/1");
        assert_eq!(urls[2], "https://m.example/3");
    }

    #[test]
    fn empty_file_yields_no_sources() {
        assert!(parse_sources("").is_empty());
        assert!(parse_sources("\n\n# only comments\n").is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_sources(Path::new("/nonexistent/setting/rules.txt")).unwrap_err();
        assert!(matches!(err, ListforgeError::Io { .. }));
    }
}
