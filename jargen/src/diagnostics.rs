use std::fmt::Write;

use crate::error::LexError;

/// Renders a lex error the way a compiler would: a header with the file
/// position, the offending source line and a caret under the column.
///
/// ```text
/// error: unclosed string literal
///   --> demo.jg:1:7
///    |
///  1 | spill("hello)
///    |       ^
/// ```
pub fn render_lex_error(file_name: &str, source: &str, error: &LexError) -> String {
    let line = error.span.line;
    let column = error.span.column;
    let src_line = source.lines().nth(line.saturating_sub(1)).unwrap_or("");
    let underline = "^".repeat(error.span.len.max(1));

    let mut out = String::new();
    let _ = writeln!(out, "error: {}", error.kind);
    let _ = writeln!(out, "  --> {file_name}:{line}:{column}");
    let _ = writeln!(out, "   |");
    let _ = writeln!(out, "{line:>3} | {src_line}");
    let _ = writeln!(
        out,
        "   | {:pad$}{underline}",
        "",
        pad = column.saturating_sub(1)
    );
    out
}
