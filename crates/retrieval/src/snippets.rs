//! Bounded snippet extraction around matched symbols.

use crate::bundle::Snippet;

/// Lines of context kept before and after a matched symbol.
pub const CONTEXT_LINES: usize = 5;
/// Matched symbols considered per file.
pub const MATCHES_PER_FILE: usize = 5;

/// Build snippets for the top matched symbols of one file. Overlapping or
/// adjacent line ranges merge into a single snippet that lists every
/// symbol it covers.
pub fn extract_snippets(content: &str, matches: &[(usize, String)]) -> Vec<Snippet> {
    let lines: Vec<&str> = content.lines().collect();
    if lines.is_empty() {
        return Vec::new();
    }

    let mut ranges: Vec<(usize, usize, Vec<String>)> = matches
        .iter()
        .take(MATCHES_PER_FILE)
        .filter(|(line, _)| *line >= 1 && *line <= lines.len())
        .map(|(line, name)| {
            let start = line.saturating_sub(CONTEXT_LINES).max(1);
            let end = (line + CONTEXT_LINES).min(lines.len());
            (start, end, vec![name.clone()])
        })
        .collect();

    ranges.sort_by_key(|&(start, _, _)| start);

    let mut merged: Vec<(usize, usize, Vec<String>)> = Vec::new();
    for (start, end, symbols) in ranges {
        match merged.last_mut() {
            Some((_, prev_end, prev_symbols)) if start <= *prev_end + 1 => {
                *prev_end = (*prev_end).max(end);
                for symbol in symbols {
                    if !prev_symbols.contains(&symbol) {
                        prev_symbols.push(symbol);
                    }
                }
            }
            _ => merged.push((start, end, symbols)),
        }
    }

    merged
        .into_iter()
        .map(|(start, end, symbols)| Snippet {
            start_line: start,
            end_line: end,
            text: lines[start - 1..end].join("\n"),
            symbols,
        })
        .collect()
}
