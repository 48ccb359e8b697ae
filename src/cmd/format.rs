/*!
format.rs

Human output helpers for `scylla-cli`.

  - StyleOptions::detect() : NO_COLOR / COLUMNS aware defaults
  - StyleOptions::plain()  : no ANSI, fixed width (JSON mode, tests)
  - color(role, text, &style)
  - table(headers, rows, &style)

Functions return strings; callers decide where to write them. JSON output
paths do not go through here.
*/

use std::borrow::Cow;

/* -------------------------------------------------------------------------- */
/* Style Options                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub term_width: usize,
}

impl StyleOptions {
    pub fn detect() -> Self {
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);

        StyleOptions {
            use_color: std::env::var_os("NO_COLOR").is_none(),
            term_width: width,
        }
    }

    pub fn plain() -> Self {
        StyleOptions {
            use_color: false,
            term_width: 100,
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Color                                                                      */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Primary,
    Accent,
    Success,
    Error,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Primary => "94", // bright blue
        Role::Accent => "35",  // magenta
        Role::Success => "34", // blue
        Role::Error => "31",   // red
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/* -------------------------------------------------------------------------- */
/* Table Rendering                                                            */
/* -------------------------------------------------------------------------- */

const MIN_COL_WIDTH: usize = 4;

/// Two-space separated columns. Widest columns shrink first (with an
/// ellipsis) when the table would exceed `style.term_width`.
pub fn table(headers: &[&str], rows: &[Vec<String>], style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let cols = headers.len();

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let total: usize = widths.iter().sum::<usize>() + (cols - 1) * 2;
    if total > style.term_width {
        let mut overflow = total - style.term_width;
        let mut order: Vec<usize> = (0..cols).collect();
        order.sort_by(|a, b| widths[*b].cmp(&widths[*a]));
        for idx in order {
            if overflow == 0 {
                break;
            }
            if widths[idx] > MIN_COL_WIDTH {
                let shrink = (widths[idx] - MIN_COL_WIDTH).min(overflow);
                widths[idx] -= shrink;
                overflow -= shrink;
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    let header: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| color(Role::Accent, fit(h, *w), style))
        .collect();
    lines.push(header.join("  "));
    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(color(Role::Dim, sep.join("  "), style));

    for row in rows {
        let cells: Vec<String> = (0..cols)
            .map(|c| fit(row.get(c).map(String::as_str).unwrap_or(""), widths[c]))
            .collect();
        lines.push(cells.join("  ").trim_end().to_string());
    }
    lines.join("\n")
}

/// Pad to `width`, or cut with a trailing ellipsis.
fn fit(s: &str, width: usize) -> String {
    let len = display_width(s);
    if len <= width {
        return format!("{s}{}", " ".repeat(width - len));
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = strip_ansi(s).chars().take(width - 1).collect();
    out.push('…');
    out
}

/* -------------------------------------------------------------------------- */
/* ANSI / Width Utilities                                                     */
/* -------------------------------------------------------------------------- */

fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // CSI runs until the final alphabetic byte
            for t in chars.by_ref() {
                if t.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    Cow::Owned(out)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */
