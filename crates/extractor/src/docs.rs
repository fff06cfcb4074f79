//! Documentation extraction from comment blocks above declarations.

/// How far above a declaration the scan is willing to look.
const MAX_SCAN_LINES: usize = 10;

/// Collect the comment block immediately preceding `decl_line`
/// (0-indexed). Blank lines and lone comment delimiters are skipped; the
/// scan stops at the first code line.
pub fn doc_comment_above(lines: &[&str], decl_line: usize) -> Option<String> {
    if decl_line == 0 || decl_line > lines.len() {
        return None;
    }

    let mut collected: Vec<String> = Vec::new();
    let floor = decl_line.saturating_sub(MAX_SCAN_LINES);

    for idx in (floor..decl_line).rev() {
        let line = lines[idx].trim();
        if line.is_empty() {
            continue;
        }
        if is_lone_delimiter(line) {
            continue;
        }
        if let Some(text) = comment_text(line) {
            if !text.is_empty() {
                collected.push(text.to_string());
            }
        } else {
            break;
        }
    }

    if collected.is_empty() {
        return None;
    }
    collected.reverse();
    Some(collected.join("\n").trim().to_string())
}

fn is_lone_delimiter(line: &str) -> bool {
    matches!(line, "/*" | "/**" | "*/" | "//")
}

/// The text of a comment line with its markers stripped, or `None` for a
/// code line.
fn comment_text(line: &str) -> Option<&str> {
    let stripped = if let Some(rest) = line.strip_prefix("///") {
        rest
    } else if let Some(rest) = line.strip_prefix("//") {
        rest
    } else if let Some(rest) = line.strip_prefix("/**") {
        rest
    } else if let Some(rest) = line.strip_prefix("/*") {
        rest
    } else if let Some(rest) = line.strip_prefix('*') {
        rest
    } else {
        return None;
    };
    Some(stripped.trim_end_matches("*/").trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comments() {
        let lines: Vec<&str> = vec!["// Adds two numbers", "// and returns the sum.", "function add(a, b) {}"];
        let doc = doc_comment_above(&lines, 2).unwrap();
        assert_eq!(doc, "Adds two numbers\nand returns the sum.");
    }

    #[test]
    fn test_block_comment_with_stars() {
        let lines: Vec<&str> = vec!["/**", " * Runs the job.", " */", "async function run() {}"];
        let doc = doc_comment_above(&lines, 3).unwrap();
        assert_eq!(doc, "Runs the job.");
    }

    #[test]
    fn test_blank_line_between_comment_and_decl() {
        let lines: Vec<&str> = vec!["// Header.", "", "function f() {}"];
        assert_eq!(doc_comment_above(&lines, 2).as_deref(), Some("Header."));
    }

    #[test]
    fn test_stops_at_code() {
        let lines: Vec<&str> = vec!["// unrelated", "const x = 1;", "function f() {}"];
        assert_eq!(doc_comment_above(&lines, 2), None);
    }

    #[test]
    fn test_scan_window_is_bounded() {
        let mut lines: Vec<&str> = vec!["// far away comment"];
        for _ in 0..12 {
            lines.push("");
        }
        lines.push("function f() {}");
        assert_eq!(doc_comment_above(&lines, 13), None);
    }

    #[test]
    fn test_no_comment() {
        let lines: Vec<&str> = vec!["function f() {}"];
        assert_eq!(doc_comment_above(&lines, 0), None);
    }
}
