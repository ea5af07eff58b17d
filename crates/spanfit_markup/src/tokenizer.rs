//! Lenient tokenizer for minimal tagged text
//!
//! Recognises `<name attr="v">`, `</name>` and `<name/>`. Anything that
//! starts with `<` but is not a complete, well-formed tag is handed back as
//! literal text so malformed input never aborts production.

use indexmap::IndexMap;

/// A lexical piece of tagged text
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    /// Literal text, entities still encoded
    Text(&'a str),
    Open {
        /// Lowercased tag name
        name: String,
        attributes: IndexMap<String, String>,
        self_closing: bool,
        raw: &'a str,
    },
    Close {
        name: String,
        raw: &'a str,
    },
}

/// Split `source` into text and tag tokens
///
/// Adjacent literal fragments are merged into one `Text` token.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(offset) = source[pos..].find('<') {
        let lt = pos + offset;
        match parse_tag(&source[lt..]) {
            Some((token, consumed)) => {
                if text_start < lt {
                    tokens.push(Token::Text(&source[text_start..lt]));
                }
                tokens.push(token);
                pos = lt + consumed;
                text_start = pos;
            }
            None => {
                // Keep the '<' as literal text and continue scanning after it
                pos = lt + 1;
            }
        }
    }

    if text_start < source.len() {
        tokens.push(Token::Text(&source[text_start..]));
    }
    tokens
}

/// Byte cursor over a tag candidate
struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.src[start..self.pos]
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':'
}

/// Parse one tag at the start of `src` (which begins with `<`)
///
/// Returns the token and the number of bytes consumed, or `None` when the
/// fragment is not a complete tag.
fn parse_tag(src: &str) -> Option<(Token<'_>, usize)> {
    let mut cur = Cursor { src, pos: 0 };
    if !cur.eat('<') {
        return None;
    }

    let closing = cur.eat('/');
    if !cur.peek().is_some_and(is_name_start) {
        return None;
    }
    let name = cur.take_while(is_name_char).to_ascii_lowercase();

    if closing {
        cur.skip_whitespace();
        if !cur.eat('>') {
            return None;
        }
        let raw = &src[..cur.pos];
        return Some((Token::Close { name, raw }, cur.pos));
    }

    let mut attributes = IndexMap::new();
    loop {
        let had_space = cur.peek().is_some_and(char::is_whitespace);
        cur.skip_whitespace();
        match cur.peek()? {
            '>' => {
                cur.bump();
                let raw = &src[..cur.pos];
                let token = Token::Open {
                    name,
                    attributes,
                    self_closing: false,
                    raw,
                };
                return Some((token, cur.pos));
            }
            '/' => {
                cur.bump();
                if !cur.eat('>') {
                    return None;
                }
                let raw = &src[..cur.pos];
                let token = Token::Open {
                    name,
                    attributes,
                    self_closing: true,
                    raw,
                };
                return Some((token, cur.pos));
            }
            c if is_name_start(c) && had_space => {
                let key = cur.take_while(is_name_char).to_ascii_lowercase();
                cur.skip_whitespace();
                let value = if cur.eat('=') {
                    cur.skip_whitespace();
                    parse_value(&mut cur)?
                } else {
                    String::new()
                };
                attributes.insert(key, value);
            }
            _ => return None,
        }
    }
}

fn parse_value(cur: &mut Cursor<'_>) -> Option<String> {
    let raw = match cur.peek()? {
        quote @ ('"' | '\'') => {
            cur.bump();
            let value = cur.take_while(|c| c != quote);
            if !cur.eat(quote) {
                return None;
            }
            value
        }
        _ => {
            let value = cur.take_while(|c| !c.is_whitespace() && c != '>');
            if value.is_empty() {
                return None;
            }
            value
        }
    };
    Some(html_escape::decode_html_entities(raw).into_owned())
}
