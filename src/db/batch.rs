//! Statement-batch splitting
//!
//! The schema document holds many statements separated by semicolons.
//! The driver executes one statement per round trip, so the batch is split
//! at top-level semicolons before execution. The splitter tracks quoted
//! strings, backtick identifiers, and comments; it deliberately does not
//! understand `DELIMITER` changes — documents that need those (stored
//! procedure bodies) go through the external importer instead.

/// Split a SQL document into individual statements.
///
/// Semicolons inside `'...'`, `"..."`, `` `...` ``, `-- ` / `#` line
/// comments, and `/* ... */` block comments do not terminate a statement.
/// Empty statements are dropped; comments are preserved as part of the
/// statement they precede.
pub fn split_statements(document: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = document.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == '\\' && q != '`' {
                    // Escaped character inside a string literal
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    current.push(c);
                }
                '#' => {
                    current.push(c);
                    consume_line(&mut chars, &mut current);
                }
                '-' if chars.peek() == Some(&'-') => {
                    current.push(c);
                    current.push(chars.next().unwrap_or('-'));
                    consume_line(&mut chars, &mut current);
                }
                '/' if chars.peek() == Some(&'*') => {
                    current.push(c);
                    current.push(chars.next().unwrap_or('*'));
                    let mut prev = '\0';
                    for inner in chars.by_ref() {
                        current.push(inner);
                        if prev == '*' && inner == '/' {
                            break;
                        }
                        prev = inner;
                    }
                }
                ';' => {
                    push_statement(&mut statements, &mut current);
                }
                c => current.push(c),
            },
        }
    }
    push_statement(&mut statements, &mut current);
    statements
}

fn consume_line<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>, current: &mut String) {
    for c in chars.by_ref() {
        current.push(c);
        if c == '\n' {
            break;
        }
    }
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let stmt = current.trim();
    if !stmt.is_empty() && !is_comment_only(stmt) {
        statements.push(stmt.to_string());
    }
    current.clear();
}

/// A trailing fragment of nothing but comments is not a statement.
fn is_comment_only(stmt: &str) -> bool {
    stmt.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with("--") || line.starts_with('#')
    })
}
