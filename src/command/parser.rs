//! Slash-command line parser.
//!
//! Grammar: `/name key=value key=value ... free text`. A value is either
//! double-quoted (`\"` and `\\` escape) or bare. A bare value ends at the
//! first whitespace outside `{}`/`[]`, so JSON bodies with spaces need no
//! quoting. The first token that is not `key=value` starts the free text.

use crate::command::handler::{CommandError, NamedArgs};

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub named: NamedArgs,
    pub unnamed: String,
}

pub fn parse_invocation(line: &str) -> Result<Invocation, CommandError> {
    let line = line.trim();
    let body = line
        .strip_prefix('/')
        .ok_or_else(|| CommandError::parse("Expected a command starting with '/'"))?;

    let name_end = body.find(char::is_whitespace).unwrap_or(body.len());
    let name = &body[..name_end];
    if name.is_empty() {
        return Err(CommandError::parse("Missing command name"));
    }

    let mut named = NamedArgs::new();
    let mut rest = body[name_end..].trim_start();
    while let Some((key, after)) = split_key(rest) {
        let (value, remaining) = read_value(key, after)?;
        named.insert(key.to_string(), value);
        rest = remaining.trim_start();
    }

    Ok(Invocation {
        name: name.to_string(),
        named,
        unnamed: rest.trim_end().to_string(),
    })
}

/// Split `key=...` off the front of `input`.
fn split_key(input: &str) -> Option<(&str, &str)> {
    let end = input.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))?;
    if end == 0 || !input[end..].starts_with('=') {
        return None;
    }
    Some((&input[..end], &input[end + 1..]))
}

fn read_value<'a>(key: &str, input: &'a str) -> Result<(String, &'a str), CommandError> {
    match input.strip_prefix('"') {
        Some(quoted) => read_quoted(key, quoted),
        None => read_bare(key, input),
    }
}

fn read_quoted<'a>(key: &str, input: &'a str) -> Result<(String, &'a str), CommandError> {
    let mut value = String::new();
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((value, &input[i + 1..])),
            '\\' => match chars.next() {
                Some((_, next @ ('"' | '\\'))) => value.push(next),
                Some((_, next)) => {
                    value.push('\\');
                    value.push(next);
                }
                None => break,
            },
            c => value.push(c),
        }
    }
    Err(CommandError::parse(format!(
        "Unterminated quoted value for '{key}'"
    )))
}

fn read_bare<'a>(key: &str, input: &'a str) -> Result<(String, &'a str), CommandError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' if depth > 0 => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                return Ok((input[..i].to_string(), &input[i..]));
            }
            _ => {}
        }
    }

    if depth > 0 || in_string {
        return Err(CommandError::parse(format!(
            "Unbalanced brackets in value for '{key}'"
        )));
    }
    Ok((input.to_string(), ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(inv: &Invocation, key: &str) -> Option<String> {
        inv.named.get(key).cloned()
    }

    #[test]
    fn parses_basic_invocation() {
        let inv =
            parse_invocation("/theItGirlyFetch mode=basic url=https://api.github.com/users/octocat")
                .unwrap();
        assert_eq!(inv.name, "theItGirlyFetch");
        assert_eq!(named(&inv, "mode").as_deref(), Some("basic"));
        assert_eq!(
            named(&inv, "url").as_deref(),
            Some("https://api.github.com/users/octocat")
        );
        assert_eq!(inv.unnamed, "");
    }

    #[test]
    fn bare_json_may_contain_spaces() {
        let line =
            r#"/itgfetch mode=extras path=/api/test body={"msg": "Hello there", "n": [1, 2]}"#;
        let inv = parse_invocation(line).unwrap();
        assert_eq!(
            named(&inv, "body").as_deref(),
            Some(r#"{"msg": "Hello there", "n": [1, 2]}"#)
        );
        assert_eq!(named(&inv, "path").as_deref(), Some("/api/test"));
    }

    #[test]
    fn braces_inside_json_strings_do_not_count() {
        let inv = parse_invocation(r#"/x body={"s": "}} \" {"} tail"#).unwrap();
        assert_eq!(named(&inv, "body").as_deref(), Some(r#"{"s": "}} \" {"}"#));
        assert_eq!(inv.unnamed, "tail");
    }

    #[test]
    fn quoted_values_unescape() {
        let inv = parse_invocation(r#"/x note="say \"hi\" \\ ok" mode=basic"#).unwrap();
        assert_eq!(named(&inv, "note").as_deref(), Some(r#"say "hi" \ ok"#));
        assert_eq!(named(&inv, "mode").as_deref(), Some("basic"));
    }

    #[test]
    fn free_text_starts_at_first_plain_token() {
        let inv = parse_invocation("/x a=1 hello world b=2").unwrap();
        assert_eq!(named(&inv, "a").as_deref(), Some("1"));
        assert!(inv.named.get("b").is_none());
        assert_eq!(inv.unnamed, "hello world b=2");
    }

    #[test]
    fn empty_value_is_kept() {
        let inv = parse_invocation("/x url= mode=basic").unwrap();
        assert_eq!(named(&inv, "url").as_deref(), Some(""));
        assert_eq!(named(&inv, "mode").as_deref(), Some("basic"));
    }

    #[test]
    fn later_duplicates_win() {
        let inv = parse_invocation("/x mode=basic mode=extras").unwrap();
        assert_eq!(named(&inv, "mode").as_deref(), Some("extras"));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(matches!(parse_invocation(""), Err(CommandError::Parse(_))));
        assert!(matches!(parse_invocation("hello"), Err(CommandError::Parse(_))));
        assert!(matches!(parse_invocation("/ a=1"), Err(CommandError::Parse(_))));
        assert!(matches!(
            parse_invocation(r#"/x note="open"#),
            Err(CommandError::Parse(_))
        ));
        assert!(matches!(
            parse_invocation(r#"/x body={"a": 1"#),
            Err(CommandError::Parse(_))
        ));
    }
}
