use crate::Error;
use regex::Regex;
use std::iter::Peekable;
use std::str::Chars;

const DEFAULT_SEGMENT: &str = "[^/]+";
const WILDCARD: &str = ".*";

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(String),
    Param {
        name: String,
        regex: Option<String>,
        optional: bool,
    },
    Wildcard,
    Group {
        tokens: Vec<Token>,
        optional: bool,
    },
}

/// Compiles a route path pattern into an anchored regex.
///
/// Returns the regex together with the names of its capture groups, in the order they appear. The n-th name
/// is captured by the regex group `p{n}`, so user supplied expressions are free to contain their own groups.
pub(crate) fn generate_exact_match_regex(pattern: &str) -> crate::Result<(Regex, Vec<String>)> {
    let tokens = Parser::new(pattern).parse()?;

    let mut names = Vec::new();
    let mut re_str = String::with_capacity(pattern.len() * 2);
    re_str.push('^');
    emit(&tokens, &mut re_str, &mut names);
    re_str.push('$');

    let re = Regex::new(re_str.as_str()).map_err(|e| Error::invalid_pattern(pattern, e.to_string()))?;

    Ok((re, names))
}

/// The regex group that captures the parameter at `idx`.
pub(crate) fn group_name(idx: usize) -> String {
    format!("p{}", idx)
}

/// Returns the literal prefix a pattern is bucketed under.
///
/// It is the text before the first dynamic token, cut back to a `/` boundary, so that truncating a concrete
/// request path at its `/` characters is guaranteed to reach it.
pub(crate) fn pattern_shorthand(pattern: &str) -> &str {
    let (prefix, rest) = match pattern.find(|c| matches!(c, '*' | ':' | '{' | '(')) {
        Some(idx) => pattern.split_at(idx),
        None => (pattern, ""),
    };

    if let Some(stripped) = prefix.strip_suffix('/') {
        return stripped;
    }

    // `/books{/archive}?` still ends a whole segment before the group.
    if rest.starts_with("{/") {
        return prefix;
    }

    match prefix.rfind('/') {
        Some(idx) => &prefix[..idx],
        None => "",
    }
}

fn emit(tokens: &[Token], out: &mut String, names: &mut Vec<String>) {
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        match token {
            Token::Literal(text) => {
                let next_is_optional_param = matches!(iter.peek(), Some(Token::Param { optional: true, .. }));
                match text.strip_suffix('/') {
                    // The separator in front of an optional segment is optional as well.
                    Some(head) if next_is_optional_param => {
                        out.push_str(&regex::escape(head));
                        if let Some(Token::Param { name, regex, .. }) = iter.next() {
                            out.push_str("(?:/");
                            push_group(out, names, name, regex.as_deref());
                            out.push_str(")?");
                        }
                    }
                    _ => out.push_str(&regex::escape(text)),
                }
            }
            Token::Param { name, regex, optional } => {
                if *optional {
                    out.push_str("(?:");
                    push_group(out, names, name, regex.as_deref());
                    out.push_str(")?");
                } else {
                    push_group(out, names, name, regex.as_deref());
                }
            }
            Token::Wildcard => out.push_str(WILDCARD),
            Token::Group { tokens, optional } => {
                out.push_str("(?:");
                emit(tokens, out, names);
                out.push(')');
                if *optional {
                    out.push('?');
                }
            }
        }
    }
}

fn push_group(out: &mut String, names: &mut Vec<String>, name: &str, regex: Option<&str>) {
    out.push_str("(?P<");
    out.push_str(&group_name(names.len()));
    out.push('>');
    out.push_str(regex.unwrap_or(DEFAULT_SEGMENT));
    out.push(')');
    names.push(name.to_owned());
}

struct Parser<'a> {
    pattern: &'a str,
    chars: Peekable<Chars<'a>>,
    names: Vec<String>,
    positional: usize,
}

impl<'a> Parser<'a> {
    fn new(pattern: &'a str) -> Parser<'a> {
        Parser {
            pattern,
            chars: pattern.chars().peekable(),
            names: Vec::new(),
            positional: 0,
        }
    }

    fn parse(mut self) -> crate::Result<Vec<Token>> {
        self.parse_sequence(false)
    }

    fn parse_sequence(&mut self, in_group: bool) -> crate::Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut closed = false;

        while let Some(c) = self.chars.next() {
            match c {
                '\\' => {
                    let escaped = self.chars.next().ok_or_else(|| self.error("trailing escape character"))?;
                    literal.push(escaped);
                }
                ':' => {
                    flush(&mut literal, &mut tokens);
                    let name = self.read_name()?;
                    let regex = if self.eat('(') { Some(self.read_regex()?) } else { None };
                    let optional = self.eat('?');
                    self.register(&name)?;
                    tokens.push(Token::Param { name, regex, optional });
                }
                '(' => {
                    flush(&mut literal, &mut tokens);
                    let regex = self.read_regex()?;
                    let optional = self.eat('?');
                    let name = self.positional.to_string();
                    self.positional += 1;
                    self.register(&name)?;
                    tokens.push(Token::Param {
                        name,
                        regex: Some(regex),
                        optional,
                    });
                }
                '*' => {
                    flush(&mut literal, &mut tokens);
                    // `*?` still matches the empty remainder, nothing extra to do.
                    self.eat('?');
                    tokens.push(Token::Wildcard);
                }
                '{' => {
                    if in_group {
                        return Err(self.error("groups can not be nested"));
                    }
                    flush(&mut literal, &mut tokens);
                    let inner = self.parse_sequence(true)?;
                    let optional = self.eat('?');
                    tokens.push(Token::Group { tokens: inner, optional });
                }
                '}' => {
                    if !in_group {
                        return Err(self.error("unmatched `}`"));
                    }
                    closed = true;
                    break;
                }
                '?' => return Err(self.error("`?` must follow a parameter, a regex or a group")),
                ')' => return Err(self.error("unmatched `)`")),
                _ => literal.push(c),
            }
        }

        if in_group && !closed {
            return Err(self.error("unclosed `{`"));
        }

        flush(&mut literal, &mut tokens);
        Ok(tokens)
    }

    fn read_name(&mut self) -> crate::Result<String> {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.chars.next();
            } else {
                break;
            }
        }

        if name.is_empty() {
            return Err(self.error("missing parameter name after `:`"));
        }
        Ok(name)
    }

    // Called right after the opening `(`.
    fn read_regex(&mut self) -> crate::Result<String> {
        let mut regex = String::new();
        let mut depth = 1;
        let mut in_class = false;

        loop {
            let c = self.chars.next().ok_or_else(|| self.error("unclosed `(`"))?;
            match c {
                '\\' => {
                    regex.push(c);
                    let escaped = self.chars.next().ok_or_else(|| self.error("unclosed `(`"))?;
                    regex.push(escaped);
                    continue;
                }
                '[' if !in_class => in_class = true,
                ']' if in_class => in_class = false,
                '(' if !in_class => depth += 1,
                ')' if !in_class => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            regex.push(c);
        }

        if regex.is_empty() {
            return Err(self.error("empty regex group"));
        }
        Ok(regex)
    }

    fn register(&mut self, name: &str) -> crate::Result<()> {
        if self.names.iter().any(|n| n == name) {
            return Err(self.error(format!("duplicate parameter name `{}`", name)));
        }
        self.names.push(name.to_owned());
        Ok(())
    }

    fn eat(&mut self, expected: char) -> bool {
        self.chars.next_if_eq(&expected).is_some()
    }

    fn error<R: Into<String>>(&self, reason: R) -> Error {
        Error::invalid_pattern(self.pattern, reason)
    }
}

fn flush(literal: &mut String, tokens: &mut Vec<Token>) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}
