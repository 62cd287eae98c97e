//! A tolerant path query lexer.
//!
//! Only a missing root `$` is an error. Anything else the scanner does not
//! recognize is skipped: unknown characters between segments, unterminated
//! bracket groups and bracket bodies that fit no selector form produce no
//! token at all, so callers must not assume every character of the input is
//! consumed into a token.
use crate::{
    errors::QueryError,
    filter::FilterExpr,
    token::{PathToken, EOQ},
};

use std::str::CharIndices;

enum State {
    EndOfQuery,
    LexSegment,
    LexDescendantSegment,
    LexShorthandSegment,
    LexBracketedSegment,
}

struct Lexer<'q> {
    query: &'q str,
    tokens: Vec<PathToken>,

    chars: CharIndices<'q>,
    start: usize,
    pos: usize,
}

impl<'q> Lexer<'q> {
    fn new(query: &'q str) -> Self {
        Self {
            query,
            tokens: Vec::new(),
            chars: query.char_indices(),
            start: 0,
            pos: 0,
        }
    }

    fn run(&mut self) {
        let mut state = State::LexSegment;
        loop {
            match state {
                State::EndOfQuery => break,
                State::LexSegment => state = lex_segment(self),
                State::LexDescendantSegment => state = lex_descendant_segment(self),
                State::LexShorthandSegment => state = lex_shorthand_property(self),
                State::LexBracketedSegment => state = lex_bracketed_segment(self),
            }
        }
    }

    fn emit(&mut self, t: PathToken) {
        self.tokens.push(t);
        self.start = self.pos;
    }

    fn value(&self) -> &str {
        self.query
            .get(self.start..self.pos)
            .expect("lexer error: slice out of bounds or not on codepoint boundary")
    }

    fn next(&mut self) -> Option<char> {
        if let Some((pos, ch)) = self.chars.next() {
            self.pos = pos + ch.len_utf8();
            Some(ch)
        } else {
            None
        }
    }

    fn ignore(&mut self) {
        self.start = self.pos;
    }

    fn peek(&mut self) -> char {
        if let Some((_, ch)) = self.chars.clone().next() {
            ch
        } else {
            EOQ
        }
    }

    fn accept(&mut self, ch: char) -> bool {
        if self.peek() == ch {
            self.next();
            true
        } else {
            false
        }
    }

    fn accept_run(&mut self, pred: impl Fn(char) -> bool) -> bool {
        let mut accepted = false;
        while pred(self.peek()) {
            self.next();
            accepted = true;
        }
        accepted
    }
}

/// Turn a path query into a flat vector of tokens.
///
/// The query must start with `$`. That is the only rejected input; see the
/// module docs for how everything else degrades.
pub fn tokenize(query: &str) -> Result<Vec<PathToken>, QueryError> {
    let mut lexer = Lexer::new(query);

    if !lexer.accept('$') {
        let msg = format!("expected '$', found '{}'", lexer.next().unwrap_or(EOQ));
        return Err(QueryError::syntax(msg, 0));
    }
    lexer.emit(PathToken::Root);

    lexer.run();
    Ok(lexer.tokens)
}

fn lex_segment(l: &mut Lexer) -> State {
    match l.peek() {
        EOQ => State::EndOfQuery,
        '.' => {
            l.next();
            if l.accept('.') {
                l.emit(PathToken::RecursiveDescent);
                State::LexDescendantSegment
            } else {
                State::LexShorthandSegment
            }
        }
        '[' => {
            l.next();
            State::LexBracketedSegment
        }
        _ => {
            // skip characters that start no segment
            l.next();
            l.ignore();
            State::LexSegment
        }
    }
}

/// A `..` may be followed directly by a shorthand, as in `$..name`,
/// `$..*` or `$..[0]`. A `..` followed by anything else emits nothing
/// here and rescans as a regular segment.
fn lex_descendant_segment(l: &mut Lexer) -> State {
    if l.accept('*') {
        l.emit(PathToken::Wildcard);
        State::LexSegment
    } else if l.accept('[') {
        State::LexBracketedSegment
    } else if l.accept_run(is_property_char) {
        l.emit(PathToken::Property(l.value().to_string()));
        State::LexSegment
    } else {
        State::LexSegment
    }
}

fn lex_shorthand_property(l: &mut Lexer) -> State {
    l.ignore(); // ignore dot

    if l.accept('*') {
        l.emit(PathToken::Wildcard);
        return State::LexSegment;
    }

    // a property name runs to the next '.' or '[';
    // an empty name produces no token
    if l.accept_run(is_property_char) {
        l.emit(PathToken::Property(l.value().to_string()));
    }
    State::LexSegment
}

/// Scan to the matching `]`, counting nested brackets, then classify the
/// body as one of wildcard, filter, slice, index or quoted property.
fn lex_bracketed_segment(l: &mut Lexer) -> State {
    l.ignore(); // ignore the opening bracket

    let mut depth = 1u32;
    loop {
        match l.peek() {
            // unterminated group, drop it
            EOQ => return State::EndOfQuery,
            '[' => {
                l.next();
                depth += 1;
            }
            ']' => {
                l.next();
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {
                l.next();
            }
        }
    }

    let body = l
        .value()
        .strip_suffix(']')
        .unwrap_or(l.value())
        .to_string();

    match classify_bracket_body(&body) {
        Some(token) => l.emit(token),
        None => l.ignore(),
    }
    State::LexSegment
}

fn classify_bracket_body(body: &str) -> Option<PathToken> {
    let body = body.trim();

    if body == "*" {
        return Some(PathToken::Wildcard);
    }

    if body.contains('?') {
        return Some(PathToken::Filter(FilterExpr::parse(body)));
    }

    if body.contains(':') {
        let mut parts = body.splitn(3, ':');
        return Some(PathToken::Slice {
            start: parts.next().and_then(parse_bound),
            end: parts.next().and_then(parse_bound),
            step: parts.next().and_then(parse_bound),
        });
    }

    if !body.is_empty() && body.chars().all(is_digit) {
        return body.parse::<usize>().ok().map(PathToken::Index);
    }

    unquote(body).map(|name| PathToken::Property(name.to_string()))
}

fn parse_bound(part: &str) -> Option<isize> {
    part.trim().parse::<isize>().ok()
}

fn unquote(body: &str) -> Option<&str> {
    let bytes = body.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'\'' || bytes[0] == b'"')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        Some(&body[1..body.len() - 1])
    } else {
        None
    }
}

fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

fn is_property_char(ch: char) -> bool {
    !matches!(ch, '.' | '[' | EOQ)
}
