//! Positional `{}` message templates.
//!
//! [`interpolate`] is the checked counterpart of `format!` for templates only
//! known at runtime. A template whose placeholders do not line up with the
//! supplied arguments is rendered literally instead of guessing.
use std::fmt::{self, Display, Write as _};

/// A parsed template piece.
#[derive(Debug, PartialEq, Eq)]
enum Piece<'a> {
    Literal(&'a str),
    Brace(char),
    Placeholder,
}

/// Split `template` into pieces, or `None` on an unmatched brace.
fn parse(template: &str) -> Option<Vec<Piece<'_>>> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut chars = template.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '{' && c != '}' {
            continue;
        }
        if start < i {
            pieces.push(Piece::Literal(template.get(start..i)?));
        }
        match (c, chars.peek().map(|&(_, n)| n)) {
            ('{', Some('{')) => pieces.push(Piece::Brace('{')),
            ('}', Some('}')) => pieces.push(Piece::Brace('}')),
            ('{', Some('}')) => pieces.push(Piece::Placeholder),
            _ => return None,
        }
        chars.next();
        start = i + 2;
    }
    if start < template.len() {
        pieces.push(Piece::Literal(template.get(start..)?));
    }
    Some(pieces)
}

/// Number of `{}` placeholders in `template`, or `None` if it is malformed.
#[must_use]
pub fn placeholder_count(template: &str) -> Option<usize> {
    parse(template).map(|p| p.iter().filter(|p| **p == Piece::Placeholder).count())
}

/// Fill `{}` placeholders in `template` with `args`, in order.
///
/// `{{` and `}}` produce literal braces. If the template is malformed or the
/// placeholder count differs from `args.len()`, the template is returned
/// unchanged.
#[must_use]
pub fn interpolate(template: &str, args: &[&dyn Display]) -> String {
    let Some(pieces) = parse(template) else {
        return template.to_string();
    };
    let placeholders = pieces.iter().filter(|p| **p == Piece::Placeholder).count();
    if placeholders != args.len() {
        return template.to_string();
    }
    render(&pieces, args).unwrap_or_else(|_| template.to_string())
}

fn render(pieces: &[Piece<'_>], args: &[&dyn Display]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let mut args = args.iter();
    for piece in pieces {
        match piece {
            Piece::Literal(s) => out.push_str(s),
            Piece::Brace(c) => out.push(*c),
            Piece::Placeholder => {
                if let Some(arg) = args.next() {
                    write!(out, "{arg}")?;
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_placeholders_in_order() {
        assert_eq!(
            interpolate("{} connected from {}", &[&"alice", &"10.0.0.1"]),
            "alice connected from 10.0.0.1"
        );
    }

    #[test]
    fn no_placeholders_no_args() {
        assert_eq!(interpolate("plain text", &[]), "plain text");
        assert_eq!(interpolate("", &[]), "");
    }

    #[test]
    fn escaped_braces_are_literal() {
        assert_eq!(interpolate("{{}} = {}", &[&1]), "{} = 1");
    }

    #[test]
    fn too_few_args_renders_literally() {
        assert_eq!(interpolate("{} and {}", &[&1]), "{} and {}");
    }

    #[test]
    fn too_many_args_renders_literally() {
        assert_eq!(interpolate("only {}", &[&1, &2]), "only {}");
    }

    #[test]
    fn unmatched_brace_renders_literally() {
        assert_eq!(interpolate("broken { here", &[&1]), "broken { here");
        assert_eq!(interpolate("named {x}", &[&1]), "named {x}");
        assert_eq!(interpolate("tail }", &[]), "tail }");
    }

    #[test]
    fn multibyte_text_is_preserved() {
        assert_eq!(interpolate("héllo {} ✓", &[&"wörld"]), "héllo wörld ✓");
    }

    #[test]
    fn counts_placeholders() {
        assert_eq!(placeholder_count("{} {{}} {}"), Some(2));
        assert_eq!(placeholder_count("{oops}"), None);
    }
}
