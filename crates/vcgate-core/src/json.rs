//! # Targeted JSON Field Extraction
//!
//! A narrow scanner over canonical JSON text. It answers "what is the value
//! of field `a.b`?" without building a parse tree: the scanner walks one
//! object's members, compares keys, and skips every value that is not on the
//! requested path as a balanced region.
//!
//! ## Scanner States
//!
//! - **seeking key**: between members of the object being searched.
//! - **in string**: inside a quoted key or value; only `\"` ends early.
//! - **in array**: collecting string elements of a requested array.
//! - **skipping nested structure**: an iterative bracket stack over a value
//!   that is not being extracted.
//!
//! ## Security Invariant
//!
//! [`JsonDocument::new()`] validates the whole document once: one root
//! object, balanced quoting and nesting (depth capped at [`MAX_DEPTH`]),
//! legal escapes, and nothing but whitespace after the root. Later lookups
//! therefore never observe unbalanced input. The scanner is iterative, so
//! adversarial nesting cannot exhaust the stack.

use std::borrow::Cow;

use crate::error::ExtractError;

/// Maximum container nesting accepted in a document.
pub const MAX_DEPTH: usize = 64;

/// The raw value of a located field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonField<'a> {
    /// String content with escapes resolved. Borrowed when no escapes occur.
    String(Cow<'a, str>),
    /// Raw array text, brackets included.
    Array(&'a str),
    /// Raw object text, braces included.
    Object(&'a str),
    /// A number, `true`, `false` or `null` literal.
    Scalar(&'a str),
}

impl JsonField<'_> {
    /// JSON type name, used in mismatch errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            JsonField::String(_) => "a string",
            JsonField::Array(_) => "an array",
            JsonField::Object(_) => "an object",
            JsonField::Scalar(_) => "a scalar",
        }
    }
}

/// A validated JSON object supporting dotted-path field lookups.
#[derive(Debug, Clone, Copy)]
pub struct JsonDocument<'a> {
    text: &'a str,
}

impl<'a> JsonDocument<'a> {
    /// Validate `text` as a single JSON object.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::MalformedJson` on unbalanced quoting or
    /// nesting, illegal escapes, a non-object root, or trailing content.
    pub fn new(text: &'a str) -> Result<Self, ExtractError> {
        let mut sc = Scanner::new(text);
        sc.skip_ws();
        if sc.peek() != Some(b'{') {
            return Err(sc.malformed("expected object at document root"));
        }
        sc.skip_value()?;
        sc.skip_ws();
        if !sc.at_end() {
            return Err(sc.malformed("trailing characters after document"));
        }
        Ok(Self { text })
    }

    /// The document text as given.
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Locate the field at a dot-separated path.
    ///
    /// Returns `Ok(None)` when any segment is absent. When a key occurs more
    /// than once in an object, the first occurrence wins.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::TypeMismatch` when an intermediate segment is
    /// present but is not an object.
    pub fn get(&self, path: &str) -> Result<Option<JsonField<'a>>, ExtractError> {
        let mut region = self.text;
        let mut segments = path.split('.').enumerate().peekable();
        while let Some((idx, segment)) = segments.next() {
            let Some(field) = find_member(region, segment)? else {
                return Ok(None);
            };
            if segments.peek().is_none() {
                return Ok(Some(field));
            }
            match field {
                JsonField::Object(obj) => region = obj,
                _ => {
                    let prefix: Vec<&str> = path.split('.').take(idx + 1).collect();
                    return Err(ExtractError::TypeMismatch {
                        path: prefix.join("."),
                        expected: "an object",
                    });
                }
            }
        }
        Ok(None)
    }

    /// Look up a string field.
    pub fn string(&self, path: &str) -> Result<Option<Cow<'a, str>>, ExtractError> {
        match self.get(path)? {
            None => Ok(None),
            Some(JsonField::String(s)) => Ok(Some(s)),
            Some(_) => Err(mismatch(path, "a string")),
        }
    }

    /// Look up an array-of-strings field, preserving document order and
    /// duplicates.
    pub fn string_array(&self, path: &str) -> Result<Option<Vec<Cow<'a, str>>>, ExtractError> {
        match self.get(path)? {
            None => Ok(None),
            Some(JsonField::Array(raw)) => parse_string_array(raw, path).map(Some),
            Some(_) => Err(mismatch(path, "an array of strings")),
        }
    }

    /// Look up a field that may be either a single string or an array of
    /// strings, normalizing to a list.
    pub fn strings(&self, path: &str) -> Result<Option<Vec<Cow<'a, str>>>, ExtractError> {
        match self.get(path)? {
            None => Ok(None),
            Some(JsonField::String(s)) => Ok(Some(vec![s])),
            Some(JsonField::Array(raw)) => parse_string_array(raw, path).map(Some),
            Some(_) => Err(mismatch(path, "a string or an array of strings")),
        }
    }
}

fn mismatch(path: &str, expected: &'static str) -> ExtractError {
    ExtractError::TypeMismatch {
        path: path.to_string(),
        expected,
    }
}

/// Search the members of one object for `key`.
fn find_member<'a>(obj: &'a str, key: &str) -> Result<Option<JsonField<'a>>, ExtractError> {
    let mut sc = Scanner::new(obj);
    sc.skip_ws();
    sc.expect(b'{', "expected object")?;
    sc.skip_ws();
    if sc.peek() == Some(b'}') {
        return Ok(None);
    }
    loop {
        sc.skip_ws();
        let (start, end, escaped) = sc.scan_string()?;
        sc.skip_ws();
        sc.expect(b':', "expected ':' after key")?;
        sc.skip_ws();

        let raw_key = &obj[start..end];
        let hit = if escaped {
            unescape(raw_key, start)? == key
        } else {
            raw_key == key
        };
        if hit {
            return sc.take_field().map(Some);
        }

        sc.skip_value()?;
        sc.skip_ws();
        match sc.peek() {
            Some(b',') => sc.pos += 1,
            Some(b'}') => return Ok(None),
            _ => return Err(sc.malformed("expected ',' or '}' after member")),
        }
    }
}

fn parse_string_array<'a>(raw: &'a str, path: &str) -> Result<Vec<Cow<'a, str>>, ExtractError> {
    let mut sc = Scanner::new(raw);
    let mut out = Vec::new();
    sc.skip_ws();
    sc.expect(b'[', "expected array")?;
    sc.skip_ws();
    if sc.peek() == Some(b']') {
        return Ok(out);
    }
    loop {
        sc.skip_ws();
        if sc.peek() != Some(b'"') {
            return Err(mismatch(path, "an array of strings"));
        }
        let (start, end, escaped) = sc.scan_string()?;
        let element = &raw[start..end];
        out.push(if escaped {
            unescape(element, start)?
        } else {
            Cow::Borrowed(element)
        });
        sc.skip_ws();
        match sc.peek() {
            Some(b',') => sc.pos += 1,
            Some(b']') => return Ok(out),
            _ => return Err(sc.malformed("expected ',' or ']' in array")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    Object,
    Array,
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn malformed(&self, reason: &'static str) -> ExtractError {
        ExtractError::MalformedJson {
            offset: self.pos,
            reason,
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8, reason: &'static str) -> Result<(), ExtractError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.malformed(reason))
        }
    }

    /// Consume a quoted string. Returns the content span and whether any
    /// escape sequence occurred.
    fn scan_string(&mut self) -> Result<(usize, usize, bool), ExtractError> {
        self.expect(b'"', "expected string")?;
        let start = self.pos;
        let mut escaped = false;
        loop {
            match self.peek() {
                None => return Err(self.malformed("unterminated string")),
                Some(b'"') => {
                    let end = self.pos;
                    self.pos += 1;
                    return Ok((start, end, escaped));
                }
                Some(b'\\') => {
                    escaped = true;
                    self.pos += 1;
                    match self.peek() {
                        Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => {
                            self.pos += 1;
                        }
                        Some(b'u') => {
                            self.pos += 1;
                            for _ in 0..4 {
                                match self.peek() {
                                    Some(c) if c.is_ascii_hexdigit() => self.pos += 1,
                                    _ => return Err(self.malformed("invalid unicode escape")),
                                }
                            }
                        }
                        _ => return Err(self.malformed("invalid escape sequence")),
                    }
                }
                Some(c) if c < 0x20 => return Err(self.malformed("control character in string")),
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Consume a number or `true`/`false`/`null` literal.
    fn scan_literal(&mut self) -> Result<&'a str, ExtractError> {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'+' | b'-' | b'.')
        ) {
            self.pos += 1;
        }
        let text = self.text;
        let lexeme = &text[start..self.pos];
        if lexeme.is_empty() {
            return Err(self.malformed("unexpected character"));
        }
        if matches!(lexeme, "true" | "false" | "null") || is_json_number(lexeme) {
            Ok(lexeme)
        } else {
            Err(ExtractError::MalformedJson {
                offset: start,
                reason: "invalid literal",
            })
        }
    }

    /// Skip one complete value as a balanced region.
    fn skip_value(&mut self) -> Result<(), ExtractError> {
        let mut stack: Vec<Frame> = Vec::new();
        'value: loop {
            self.skip_ws();
            match self.peek() {
                Some(open @ (b'{' | b'[')) => {
                    if stack.len() >= MAX_DEPTH {
                        return Err(self.malformed("nesting too deep"));
                    }
                    self.pos += 1;
                    self.skip_ws();
                    let (frame, close) = if open == b'{' {
                        (Frame::Object, b'}')
                    } else {
                        (Frame::Array, b']')
                    };
                    if self.peek() == Some(close) {
                        self.pos += 1;
                    } else {
                        stack.push(frame);
                        if let Frame::Object = frame {
                            self.member_key()?;
                        }
                        continue 'value;
                    }
                }
                Some(b'"') => {
                    self.scan_string()?;
                }
                Some(_) => {
                    self.scan_literal()?;
                }
                None => return Err(self.malformed("expected value")),
            }

            // A complete value was consumed: close any finished containers.
            loop {
                let Some(&frame) = stack.last() else {
                    return Ok(());
                };
                self.skip_ws();
                match (frame, self.peek()) {
                    (_, Some(b',')) => {
                        self.pos += 1;
                        if let Frame::Object = frame {
                            self.member_key()?;
                        }
                        continue 'value;
                    }
                    (Frame::Object, Some(b'}')) | (Frame::Array, Some(b']')) => {
                        self.pos += 1;
                        stack.pop();
                    }
                    (_, None) => return Err(self.malformed("unbalanced brackets")),
                    _ => return Err(self.malformed("expected ',' or closing bracket")),
                }
            }
        }
    }

    fn member_key(&mut self) -> Result<(), ExtractError> {
        self.skip_ws();
        self.scan_string()?;
        self.skip_ws();
        self.expect(b':', "expected ':' after key")
    }

    /// Extract the value starting at the current position.
    fn take_field(&mut self) -> Result<JsonField<'a>, ExtractError> {
        match self.peek() {
            Some(b'"') => {
                let text = self.text;
                let (start, end, escaped) = self.scan_string()?;
                let raw = &text[start..end];
                Ok(JsonField::String(if escaped {
                    unescape(raw, start)?
                } else {
                    Cow::Borrowed(raw)
                }))
            }
            Some(b'{') => {
                let start = self.pos;
                self.skip_value()?;
                let text = self.text;
                Ok(JsonField::Object(&text[start..self.pos]))
            }
            Some(b'[') => {
                let start = self.pos;
                self.skip_value()?;
                let text = self.text;
                Ok(JsonField::Array(&text[start..self.pos]))
            }
            _ => self.scan_literal().map(JsonField::Scalar),
        }
    }
}

fn is_json_number(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    if b.get(i) == Some(&b'-') {
        i += 1;
    }
    match b.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while matches!(b.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        _ => return false,
    }
    if b.get(i) == Some(&b'.') {
        i += 1;
        let digits = i;
        while matches!(b.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if i == digits {
            return false;
        }
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let digits = i;
        while matches!(b.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if i == digits {
            return false;
        }
    }
    i == b.len()
}

/// Resolve escape sequences in string content already validated by
/// `scan_string`. `base` is the content offset, used for error positions.
fn unescape(raw: &str, base: usize) -> Result<Cow<'_, str>, ExtractError> {
    let bad = |offset: usize, reason: &'static str| ExtractError::MalformedJson {
        offset: base + offset,
        reason,
    };
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((_, esc)) = chars.next() else {
            return Err(bad(i, "invalid escape sequence"));
        };
        match esc {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '/' => out.push('/'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let hi = read_hex4(&mut chars).ok_or_else(|| bad(i, "invalid unicode escape"))?;
                let code = if (0xD800..0xDC00).contains(&hi) {
                    // High surrogate: a low surrogate escape must follow.
                    let follows = matches!(chars.next(), Some((_, '\\')))
                        && matches!(chars.next(), Some((_, 'u')));
                    let lo = if follows { read_hex4(&mut chars) } else { None };
                    match lo {
                        Some(lo) if (0xDC00..0xE000).contains(&lo) => {
                            0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00)
                        }
                        _ => return Err(bad(i, "unpaired surrogate")),
                    }
                } else if (0xDC00..0xE000).contains(&hi) {
                    return Err(bad(i, "unpaired surrogate"));
                } else {
                    hi
                };
                let ch = char::from_u32(code).ok_or_else(|| bad(i, "invalid unicode escape"))?;
                out.push(ch);
            }
            _ => return Err(bad(i, "invalid escape sequence")),
        }
    }
    Ok(Cow::Owned(out))
}

fn read_hex4(chars: &mut std::str::CharIndices<'_>) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..4 {
        let (_, c) = chars.next()?;
        value = (value << 4) | c.to_digit(16)?;
    }
    Some(value)
}
