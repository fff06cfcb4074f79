//! Lexical pre-scan backing the syntax rules.
//!
//! Repair rules must never fire on bracket or keyword lookalikes inside
//! string literals or comments, so every rule works against a same-length
//! masked copy of the source where those regions are blanked out. The scan
//! also tracks brace nesting so rules can tell object-literal positions
//! from statement blocks.

/// Innermost brace context at a given point in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BraceCtx {
    Top,
    /// Inside an object literal (`= {`, `({`, `[{`, `: {`, `, {`, `return {`)
    Object,
    /// Inside a statement/function/class body or a paren/bracket group
    Block,
}

/// An opening bracket with no matching closer by end of input.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpenBracket {
    pub offset: usize,
    pub ch: u8,
    /// Only meaningful for `{`
    pub from_assignment: bool,
}

pub(crate) struct Scan {
    pub masked: Vec<u8>,
    /// Byte span (start, end) of each line, newline excluded
    pub lines: Vec<(usize, usize)>,
    /// Brace context at the start of each line
    pub line_ctx: Vec<BraceCtx>,
    /// Unmatched opening brackets, outermost first
    pub open_stack: Vec<OpenBracket>,
    /// Offsets of closing brackets with no matching opener
    pub orphan_closers: Vec<usize>,
    /// Delimiter of a string/template literal still open at end of input
    pub unterminated: Option<u8>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    Str(u8),
    Template,
    LineComment,
    BlockComment,
}

impl Scan {
    pub(crate) fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut masked = bytes.to_vec();
        let mut state = State::Code;
        let mut stack: Vec<OpenBracket> = Vec::new();
        let mut orphan_closers = Vec::new();

        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            match state {
                State::Code => match b {
                    b'\'' | b'"' => state = State::Str(b),
                    b'`' => state = State::Template,
                    b'/' if bytes.get(i + 1) == Some(&b'/') => {
                        masked[i] = b' ';
                        masked[i + 1] = b' ';
                        state = State::LineComment;
                        i += 1;
                    }
                    b'/' if bytes.get(i + 1) == Some(&b'*') => {
                        masked[i] = b' ';
                        masked[i + 1] = b' ';
                        state = State::BlockComment;
                        i += 1;
                    }
                    b'{' | b'(' | b'[' => {
                        let from_assignment = b == b'{' && prev_code_char(&masked, i) == Some(b'=');
                        stack.push(OpenBracket {
                            offset: i,
                            ch: b,
                            from_assignment,
                        });
                    }
                    b'}' | b')' | b']' => {
                        let open = matching_open(b);
                        if stack.last().map(|o| o.ch) == Some(open) {
                            stack.pop();
                        } else {
                            orphan_closers.push(i);
                        }
                    }
                    _ => {}
                },
                State::Str(quote) => {
                    if b == b'\\' && i + 1 < bytes.len() {
                        masked[i] = b' ';
                        masked[i + 1] = b' ';
                        i += 1;
                    } else if b == quote {
                        state = State::Code;
                    } else if b == b'\n' {
                        // lenient: an unterminated plain string ends at the line break
                        state = State::Code;
                    } else {
                        masked[i] = b' ';
                    }
                }
                State::Template => {
                    if b == b'\\' && i + 1 < bytes.len() {
                        masked[i] = b' ';
                        masked[i + 1] = b' ';
                        i += 1;
                    } else if b == b'`' {
                        state = State::Code;
                    } else if b != b'\n' {
                        masked[i] = b' ';
                    }
                }
                State::LineComment => {
                    if b == b'\n' {
                        state = State::Code;
                    } else {
                        masked[i] = b' ';
                    }
                }
                State::BlockComment => {
                    if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                        masked[i] = b' ';
                        masked[i + 1] = b' ';
                        state = State::Code;
                        i += 1;
                    } else if b != b'\n' {
                        masked[i] = b' ';
                    }
                }
            }
            i += 1;
        }

        let unterminated = match state {
            State::Str(q) => Some(q),
            State::Template => Some(b'`'),
            _ => None,
        };

        // Line spans and per-line context from the masked text
        let mut lines = Vec::new();
        let mut start = 0;
        for (idx, &b) in masked.iter().enumerate() {
            if b == b'\n' {
                lines.push((start, idx));
                start = idx + 1;
            }
        }
        lines.push((start, masked.len()));

        let mut ctx_scan = ContextScan::new(&masked);
        let line_ctx = lines
            .iter()
            .map(|&(line_start, _)| ctx_scan.context_at(line_start))
            .collect();

        Self {
            masked,
            lines,
            line_ctx,
            open_stack: stack,
            orphan_closers,
            unterminated,
        }
    }

    /// 1-indexed line containing the byte offset.
    pub(crate) fn line_of(&self, offset: usize) -> usize {
        self.lines
            .iter()
            .position(|&(s, e)| offset >= s && offset <= e)
            .map_or(self.lines.len(), |i| i + 1)
    }

    /// Masked text of a line, trimmed.
    pub(crate) fn line_trimmed(&self, idx: usize) -> &str {
        let (s, e) = self.lines[idx];
        std::str::from_utf8(&self.masked[s..e])
            .unwrap_or("")
            .trim()
    }

    /// Byte offset just past the last non-whitespace byte of a line, if any.
    pub(crate) fn line_content_end(&self, idx: usize) -> Option<usize> {
        let (s, e) = self.lines[idx];
        self.masked[s..e]
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .map(|p| s + p + 1)
    }

    pub(crate) fn masked_str(&self) -> &str {
        std::str::from_utf8(&self.masked).unwrap_or("")
    }
}

/// Incremental bracket-context tracker over masked bytes.
struct ContextScan<'a> {
    masked: &'a [u8],
    pos: usize,
    stack: Vec<BraceCtx>,
}

impl<'a> ContextScan<'a> {
    fn new(masked: &'a [u8]) -> Self {
        Self {
            masked,
            pos: 0,
            stack: Vec::new(),
        }
    }

    fn context_at(&mut self, offset: usize) -> BraceCtx {
        self.advance_to(offset);
        self.stack.last().copied().unwrap_or(BraceCtx::Top)
    }

    fn advance_to(&mut self, offset: usize) {
        while self.pos < offset && self.pos < self.masked.len() {
            let b = self.masked[self.pos];
            match b {
                b'{' => {
                    let ctx = if is_object_opener(self.masked, self.pos) {
                        BraceCtx::Object
                    } else {
                        BraceCtx::Block
                    };
                    self.stack.push(ctx);
                }
                b'(' | b'[' => self.stack.push(BraceCtx::Block),
                b'}' | b')' | b']' => {
                    self.stack.pop();
                }
                _ => {}
            }
            self.pos += 1;
        }
    }
}

/// Whether the `{` at `offset` opens an object literal rather than a
/// statement or function body.
fn is_object_opener(masked: &[u8], offset: usize) -> bool {
    // `=> {` ends in '>', so a bare '=' before the brace is an assignment
    match prev_code_char(masked, offset) {
        Some(b'=') => true,
        Some(b'(') | Some(b'[') | Some(b',') | Some(b':') => true,
        Some(c) if c.is_ascii_alphanumeric() || c == b'_' || c == b'$' => {
            word_before(masked, offset) == Some("return")
        }
        _ => false,
    }
}

/// Last non-whitespace masked byte strictly before `offset`.
fn prev_code_char(masked: &[u8], offset: usize) -> Option<u8> {
    masked[..offset]
        .iter()
        .rev()
        .copied()
        .find(|b| !b.is_ascii_whitespace())
}

/// The identifier word ending at the last non-whitespace byte before `offset`.
fn word_before(masked: &[u8], offset: usize) -> Option<&str> {
    let mut end = offset;
    while end > 0 && masked[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    let mut start = end;
    while start > 0 && (masked[start - 1].is_ascii_alphanumeric() || masked[start - 1] == b'_') {
        start -= 1;
    }
    if start == end {
        return None;
    }
    std::str::from_utf8(&masked[start..end]).ok()
}

const fn matching_open(closer: u8) -> u8 {
    match closer {
        b'}' => b'{',
        b')' => b'(',
        _ => b'[',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_strings_and_comments() {
        let scan = Scan::new("const x = \"{ not a brace }\"; // { neither }");
        assert!(scan.open_stack.is_empty());
        assert!(scan.orphan_closers.is_empty());
        assert!(!scan.masked_str().contains("not a brace"));
        assert!(!scan.masked_str().contains("neither"));
    }

    #[test]
    fn test_tracks_unmatched_opens() {
        let scan = Scan::new("function f() {\n  if (x) {\n");
        assert_eq!(scan.open_stack.len(), 2);
        assert!(scan.open_stack.iter().all(|o| o.ch == b'{'));
    }

    #[test]
    fn test_orphan_closer() {
        let scan = Scan::new("}\nlet a = 1;\n");
        assert_eq!(scan.orphan_closers, vec![0]);
    }

    #[test]
    fn test_object_context() {
        let scan = Scan::new("const o = {\n  a: 1,\n  b: 2\n};\nfunction f() {\n  return 1;\n}\n");
        // line 2 ("a: 1,") starts inside the object literal
        assert_eq!(scan.line_ctx[1], BraceCtx::Object);
        // line 6 ("return 1;") is inside a function body
        assert_eq!(scan.line_ctx[5], BraceCtx::Block);
    }

    #[test]
    fn test_arrow_body_is_block() {
        let scan = Scan::new("const f = () => {\n  x();\n};\n");
        assert_eq!(scan.line_ctx[1], BraceCtx::Block);
    }

    #[test]
    fn test_return_object_is_object() {
        let scan = Scan::new("function f() {\n  return {\n    a: 1\n  };\n}\n");
        assert_eq!(scan.line_ctx[2], BraceCtx::Object);
    }

    #[test]
    fn test_unterminated_template() {
        let scan = Scan::new("const t = `hello\nworld");
        assert_eq!(scan.unterminated, Some(b'`'));
    }
}
