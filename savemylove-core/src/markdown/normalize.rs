//! Markdown repair for text that may have been cut off mid-token.
//!
//! Runs over the whole accumulated text on every update. The output is a
//! fixed point: normalizing already normalized text returns it unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([ \t]*)[•●▪◦‣·\-][ \t]+").expect("bullet pattern"));
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(#+)([^\s#])").expect("heading pattern"));
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("blank run pattern"));

const CENTERED_COLUMN: &str = " :---: |";

/// Normalize the full accumulated response text for display.
///
/// Bullet glyphs become `- `, headings get a space after their `#` run, runs
/// of blank lines collapse to one, pipe tables are rebuilt with a consistent
/// column count and a leading heading is pushed onto its own line.
pub fn normalize_markdown(text: &str) -> String {
    let text = BULLET_RE.replace_all(text, "${1}- ");
    let text = HEADING_RE.replace_all(&text, "${1} ${2}");
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    let mut text = rebuild_tables(&text);

    if text.starts_with('#') && !text.starts_with("#\n") {
        text.insert(0, '\n');
    }
    text
}

fn is_table_row(trimmed: &str) -> bool {
    trimmed.starts_with('|') && trimmed.ends_with('|')
}

/// Alignment rows carry no content; the header row gets a fresh one.
fn is_separator_row(trimmed: &str) -> bool {
    trimmed
        .chars()
        .all(|c| c == '|' || c == '-' || c == ':' || c.is_whitespace())
}

fn row_cells(trimmed: &str, columns: usize) -> String {
    let inner = trimmed
        .strip_prefix('|')
        .and_then(|rest| rest.strip_suffix('|'))
        .unwrap_or_default();
    let mut cells: Vec<&str> = inner.split('|').map(str::trim).collect();
    cells.resize(columns, "");
    format!("| {} |", cells.join(" | "))
}

fn rebuild_tables(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut columns: Option<usize> = None;

    for line in text.split('\n') {
        let trimmed = line.trim();
        if is_table_row(trimmed) {
            if is_separator_row(trimmed) {
                continue;
            }
            match columns {
                Some(count) => out.push(row_cells(trimmed, count)),
                None => {
                    let count = trimmed.matches('|').count() - 1;
                    out.push(row_cells(trimmed, count));
                    out.push(format!("|{}", CENTERED_COLUMN.repeat(count)));
                    columns = Some(count);
                }
            }
            continue;
        }

        if columns.take().is_some() && !trimmed.is_empty() {
            out.push(String::new());
        }
        out.push(line.to_string());
    }

    out.join("\n")
}
