//! Ordered pipeline of structural syntax repairs.
//!
//! Each rule is a pure function over the scanned source: a precondition
//! check followed by an edit, returning `None` when it has nothing to do.
//! Rules run in a fixed order because later rules depend on the counts the
//! earlier ones change: bracket balancing runs after terminator and
//! separator insertion, and trailing-separator cleanup runs last.
//!
//! Re-running the pipeline on its own output is a guaranteed no-op.

use crate::scan::{BraceCtx, Scan};
use crate::types::{FixDescriptor, FixKind, RepairOutcome};
use once_cell::sync::Lazy;
use regex::Regex;

type RuleEdit = (String, Vec<FixDescriptor>);

struct Step {
    run: fn(&Scan, &str) -> Option<RuleEdit>,
}

const STEPS: &[Step] = &[
    Step {
        run: incomplete_object_literal,
    },
    Step {
        run: missing_terminator,
    },
    Step {
        run: missing_member_separator,
    },
    Step {
        run: balance_brackets,
    },
    Step {
        run: orphan_trailing_separator,
    },
];

/// Repair common malformed-source patterns so a parser can succeed.
///
/// Total: never errors, and returns the input unchanged when no rule
/// applies. Calling it on its own output reports `fixed == false`.
pub fn repair_syntax(content: &str, file_path: &str) -> RepairOutcome {
    let mut current = content.to_string();
    let mut fixes: Vec<FixDescriptor> = Vec::new();

    for step in STEPS {
        let scan = Scan::new(&current);
        if let Some((next, step_fixes)) = (step.run)(&scan, &current) {
            if next != current {
                current = next;
                fixes.extend(step_fixes);
            }
        }
    }

    if fixes.is_empty() {
        return RepairOutcome::unchanged(content);
    }
    log::debug!("{file_path}: applied {} syntax fix(es)", fixes.len());
    RepairOutcome::from_edit(content, current, fixes)
}

static ASYNC_AFTER_ASSIGN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"=[ \t]*\r?\n[ \t]*async[ \t]+([A-Za-z_$][\w$]*)[ \t]*\(")
        .expect("valid regex")
});

/// Rule: an assignment directly followed by an async method start is an
/// object-literal declaration missing its opening brace.
fn incomplete_object_literal(scan: &Scan, content: &str) -> Option<RuleEdit> {
    let masked = scan.masked_str();
    let mut inserts = Vec::new();
    let mut fixes = Vec::new();

    for caps in ASYNC_AFTER_ASSIGN.captures_iter(masked) {
        let name = caps.get(1).map_or("", |m| m.as_str());
        if name == "function" {
            continue;
        }
        let eq_offset = caps.get(0).map_or(0, |m| m.start());
        inserts.push((eq_offset + 1, " {"));
        fixes.push(FixDescriptor::new(
            FixKind::IncompleteObjectLiteral,
            Some(scan.line_of(eq_offset)),
            format!("opened object literal before method '{name}'"),
        ));
    }

    if inserts.is_empty() {
        return None;
    }
    Some((apply_inserts(content, &inserts), fixes))
}

static STMT_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:return|throw|break|continue)\b|^(?:const|let|var)\s+[A-Za-z_$]")
        .expect("valid regex")
});

const NO_TERMINATOR_TAILS: &[u8] = b";,{}([.:&|+*/%<>=?!-";
const CONTINUATION_STARTS: &[u8] = b".?:+-*/&|=,";

/// Rule: statements recognizable by leading keyword that are complete on
/// their line but not closed get a `;` appended.
fn missing_terminator(scan: &Scan, content: &str) -> Option<RuleEdit> {
    if scan.unterminated.is_some() {
        return None;
    }
    let mut inserts = Vec::new();
    let mut fixes = Vec::new();

    for idx in 0..scan.lines.len() {
        if scan.line_ctx[idx] == BraceCtx::Object {
            continue;
        }
        let trimmed = scan.line_trimmed(idx);
        if trimmed.is_empty() || !STMT_KEYWORD.is_match(trimmed) {
            continue;
        }
        let last = trimmed.as_bytes()[trimmed.len() - 1];
        if NO_TERMINATOR_TAILS.contains(&last) {
            continue;
        }
        if !line_brackets_balanced(trimmed) || !line_quotes_balanced(trimmed) {
            continue;
        }
        if let Some(next) = next_nonempty_line(scan, idx) {
            let first = next.as_bytes()[0];
            if CONTINUATION_STARTS.contains(&first) {
                continue;
            }
        }
        if let Some(offset) = scan.line_content_end(idx) {
            inserts.push((offset, ";"));
            fixes.push(FixDescriptor::new(
                FixKind::MissingTerminator,
                Some(idx + 1),
                format!("inserted ';' after '{}'", truncate(trimmed, 40)),
            ));
        }
    }

    if inserts.is_empty() {
        return None;
    }
    Some((apply_inserts(content, &inserts), fixes))
}

static MEMBER_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:async\s+)?(?:static\s+)?(?:get\s+|set\s+)?([A-Za-z_$][\w$]*)\s*[:(]")
        .expect("valid regex")
});

const STATEMENT_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "do", "else", "return", "const", "let", "var", "function",
    "class", "new", "case", "default", "try", "catch", "finally", "throw", "typeof", "await",
    "yield", "import", "export", "delete", "void", "in", "of", "instanceof",
];

/// Rule: adjacent object-literal members with no separator between them.
fn missing_member_separator(scan: &Scan, content: &str) -> Option<RuleEdit> {
    let mut inserts = Vec::new();
    let mut fixes = Vec::new();

    for idx in 0..scan.lines.len() {
        let trimmed = scan.line_trimmed(idx);
        if trimmed.is_empty() {
            continue;
        }
        let last = trimmed.as_bytes()[trimmed.len() - 1];
        if !is_value_end(last) || !line_quotes_balanced(trimmed) {
            continue;
        }
        let Some(next_idx) = next_nonempty_index(scan, idx) else {
            continue;
        };
        if scan.line_ctx[next_idx] != BraceCtx::Object {
            continue;
        }
        let next = scan.line_trimmed(next_idx);
        let Some(caps) = MEMBER_START.captures(next) else {
            continue;
        };
        let name = caps.get(1).map_or("", |m| m.as_str());
        if STATEMENT_KEYWORDS.contains(&name) {
            continue;
        }
        if let Some(offset) = scan.line_content_end(idx) {
            inserts.push((offset, ","));
            fixes.push(FixDescriptor::new(
                FixKind::MissingMemberSeparator,
                Some(idx + 1),
                format!("inserted ',' before member '{name}'"),
            ));
        }
    }

    if inserts.is_empty() {
        return None;
    }
    Some((apply_inserts(content, &inserts), fixes))
}

/// Rule: balance unmatched brackets. Orphan closers are removed, an
/// unterminated string/template literal is closed, and the deficit of
/// closing tokens is appended innermost-first. An object literal opened
/// from an assignment closes with `};` so the trailing declaration stays a
/// statement.
fn balance_brackets(scan: &Scan, content: &str) -> Option<RuleEdit> {
    if scan.open_stack.is_empty() && scan.orphan_closers.is_empty() && scan.unterminated.is_none() {
        return None;
    }

    let mut fixes = Vec::new();
    let mut out = content.to_string();

    for &offset in scan.orphan_closers.iter().rev() {
        let ch = out.as_bytes()[offset] as char;
        out.remove(offset);
        fixes.push(FixDescriptor::new(
            FixKind::UnbalancedBrackets,
            Some(scan.line_of(offset)),
            format!("removed orphan '{ch}'"),
        ));
    }

    if let Some(delim) = scan.unterminated {
        out.push(delim as char);
        fixes.push(FixDescriptor::new(
            FixKind::UnbalancedBrackets,
            None,
            "closed unterminated string literal".to_string(),
        ));
    }

    if !scan.open_stack.is_empty() {
        for open in scan.open_stack.iter().rev() {
            out.push('\n');
            match open.ch {
                b'{' if open.from_assignment => out.push_str("};"),
                b'{' => out.push('}'),
                b'(' => out.push(')'),
                _ => out.push(']'),
            }
        }
        fixes.push(FixDescriptor::new(
            FixKind::UnbalancedBrackets,
            None,
            format!("appended {} missing closing token(s)", scan.open_stack.len()),
        ));
    }

    Some((out, fixes))
}

static TRAILING_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",[\s,]*[}\)\]]").expect("valid regex"));

/// Rule: strip separators left dangling directly before a closing token.
/// A run of commas counts as one orphaned separator group.
fn orphan_trailing_separator(scan: &Scan, content: &str) -> Option<RuleEdit> {
    let masked = scan.masked_str();
    let mut removals: Vec<usize> = Vec::new();
    for m in TRAILING_SEPARATOR.find_iter(masked) {
        for (i, byte) in masked[m.range()].bytes().enumerate() {
            if byte == b',' {
                removals.push(m.start() + i);
            }
        }
    }

    if removals.is_empty() {
        return None;
    }

    let mut out = content.to_string();
    let mut fixes = Vec::new();
    for &offset in removals.iter().rev() {
        out.remove(offset);
        fixes.push(FixDescriptor::new(
            FixKind::OrphanTrailingSeparator,
            Some(scan.line_of(offset)),
            "removed trailing ',' before closing token".to_string(),
        ));
    }

    Some((out, fixes))
}

/// Splice insertions into `content`; offsets are ascending byte positions
/// in the original text.
fn apply_inserts(content: &str, inserts: &[(usize, &str)]) -> String {
    let mut out = String::with_capacity(content.len() + inserts.len() * 2);
    let mut prev = 0;
    for &(offset, text) in inserts {
        out.push_str(&content[prev..offset]);
        out.push_str(text);
        prev = offset;
    }
    out.push_str(&content[prev..]);
    out
}

/// An odd quote count means the line opens a literal that continues past
/// its end; a terminator inserted there would land inside the literal.
fn line_quotes_balanced(line: &str) -> bool {
    [b'\'', b'"', b'`']
        .iter()
        .all(|&q| line.bytes().filter(|&b| b == q).count() % 2 == 0)
}

fn line_brackets_balanced(line: &str) -> bool {
    let (mut parens, mut brackets, mut braces) = (0i32, 0i32, 0i32);
    for b in line.bytes() {
        match b {
            b'(' => parens += 1,
            b')' => parens -= 1,
            b'[' => brackets += 1,
            b']' => brackets -= 1,
            b'{' => braces += 1,
            b'}' => braces -= 1,
            _ => {}
        }
        if parens < 0 || brackets < 0 || braces < 0 {
            return false;
        }
    }
    parens == 0 && brackets == 0 && braces == 0
}

fn next_nonempty_index(scan: &Scan, idx: usize) -> Option<usize> {
    (idx + 1..scan.lines.len()).find(|&i| !scan.line_trimmed(i).is_empty())
}

fn next_nonempty_line(scan: &Scan, idx: usize) -> Option<&str> {
    next_nonempty_index(scan, idx).map(|i| scan.line_trimmed(i))
}

const fn is_value_end(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(b, b'_' | b'$' | b'}' | b')' | b']' | b'"' | b'\'' | b'`')
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}
