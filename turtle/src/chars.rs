//! Terminal character classes and escape resolution for the Turtle grammar
//! family.
//!
//! Everything here is a pure function: no shared state, safe to call from any
//! thread. The `is_*` functions return `true` iff the input matches the named
//! production exactly, never on a prefix match.

use crate::error::ParseErrorKind;
use std::char;
use std::str::Chars;

// [163s] PN_CHARS_BASE ::= [A-Z] | [a-z] | [#x00C0-#x00D6] | [#x00D8-#x00F6] | [#x00F8-#x02FF] | [#x0370-#x037D] | [#x037F-#x1FFF] | [#x200C-#x200D] | [#x2070-#x218F] | [#x2C00-#x2FEF] | [#x3001-#xD7FF] | [#xF900-#xFDCF] | [#xFDF0-#xFFFD] | [#x10000-#xEFFFF]
pub fn is_pn_chars_base(c: char) -> bool {
    match c {
        'A'..='Z'
        | 'a'..='z'
        | '\u{00C0}'..='\u{00D6}'
        | '\u{00D8}'..='\u{00F6}'
        | '\u{00F8}'..='\u{02FF}'
        | '\u{0370}'..='\u{037D}'
        | '\u{037F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}' => true,
        _ => false,
    }
}

// [164s] PN_CHARS_U ::= PN_CHARS_BASE | '_'
pub fn is_pn_chars_u(c: char) -> bool {
    c == '_' || is_pn_chars_base(c)
}

// [166s] PN_CHARS ::= PN_CHARS_U | '-' | [0-9] | #x00B7 | [#x0300-#x036F] | [#x203F-#x2040]
pub fn is_pn_chars(c: char) -> bool {
    match c {
        '-' | '0'..='9' | '\u{00B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}' => true,
        c => is_pn_chars_u(c),
    }
}

// The pre-W3C Turtle name productions, used by the original and
// member-submission syntax variants.
//
// nameStartChar ::= [A-Z] | '_' | [a-z] | the PN_CHARS_BASE ranges
pub fn is_name_start_char(c: char) -> bool {
    c == '_' || is_pn_chars_base(c)
}

// nameChar ::= nameStartChar | '-' | [0-9] | #x00B7 | [#x0300-#x036F] | [#x203F-#x2040]
pub fn is_name_char(c: char) -> bool {
    match c {
        '-' | '0'..='9' | '\u{00B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}' => true,
        c => is_name_start_char(c),
    }
}

pub fn is_hex_digit(c: char) -> bool {
    match c {
        '0'..='9' | 'a'..='f' | 'A'..='F' => true,
        _ => false,
    }
}

// [167s] PN_PREFIX ::= PN_CHARS_BASE ((PN_CHARS | '.')* PN_CHARS)?
pub fn is_pn_prefix(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if is_pn_chars_base(c) => (),
        _ => return false,
    }
    let mut last = ' ';
    for c in chars {
        if c != '.' && !is_pn_chars(c) {
            return false;
        }
        last = c;
    }
    last != '.'
}

// [169s] PLX ::= PERCENT | PN_LOCAL_ESC
// [170s] PERCENT ::= '%' HEX HEX
// [172s] PN_LOCAL_ESC ::= '\' ('_' | '~' | '.' | '-' | '!' | '$' | '&' | "'" | '(' | ')' | '*' | '+' | ',' | ';' | '=' | '/' | '?' | '#' | '@' | '%')
pub fn is_pn_local_esc_char(c: char) -> bool {
    match c {
        '_' | '~' | '.' | '-' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';'
        | '=' | '/' | '?' | '#' | '@' | '%' => true,
        _ => false,
    }
}

/// Consumes one PLX at the head of `chars`, returning `false` when the head is
/// not a PLX.
fn eat_plx(chars: &mut std::iter::Peekable<Chars<'_>>) -> bool {
    match chars.peek() {
        Some('%') => {
            chars.next();
            chars.next().map_or(false, is_hex_digit) && chars.next().map_or(false, is_hex_digit)
        }
        Some('\\') => {
            chars.next();
            chars.next().map_or(false, is_pn_local_esc_char)
        }
        _ => false,
    }
}

// [168s] PN_LOCAL ::= (PN_CHARS_U | ':' | [0-9] | PLX) ((PN_CHARS | '.' | ':' | PLX)* (PN_CHARS | ':' | PLX))?
pub fn is_pn_local(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    let mut chars = value.chars().peekable();
    match chars.peek() {
        Some(&c) if c == ':' || ('0'..='9').contains(&c) || is_pn_chars_u(c) => {
            chars.next();
        }
        Some('%') | Some('\\') => {
            if !eat_plx(&mut chars) {
                return false;
            }
        }
        _ => return false,
    }
    let mut trailing_dot = false;
    while let Some(&c) = chars.peek() {
        match c {
            '.' => {
                chars.next();
                trailing_dot = true;
            }
            ':' => {
                chars.next();
                trailing_dot = false;
            }
            '%' | '\\' => {
                if !eat_plx(&mut chars) {
                    return false;
                }
                trailing_dot = false;
            }
            c if is_pn_chars(c) => {
                chars.next();
                trailing_dot = false;
            }
            _ => return false,
        }
    }
    !trailing_dot
}

/// Checks a blank node label.
///
/// The RDF 1.1 grammars use
/// [141s] BLANK_NODE_LABEL ::= '_:' (PN_CHARS_U | [0-9]) ((PN_CHARS | '.')* PN_CHARS)?
/// while the original N-Triples grammar only allowed `[A-Za-z][A-Za-z0-9]*`.
/// `label` is the text after the `_:`.
pub fn is_valid_blank_node_label(label: &str, rdf11: bool) -> bool {
    if rdf11 {
        let mut chars = label.chars();
        match chars.next() {
            Some(c) if is_pn_chars_u(c) || ('0'..='9').contains(&c) => (),
            _ => return false,
        }
        let mut last = ' ';
        for c in chars {
            if c != '.' && !is_pn_chars(c) {
                return false;
            }
            last = c;
        }
        last != '.'
    } else {
        let mut chars = label.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => (),
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric())
    }
}

// [19] INTEGER ::= [+-]? [0-9]+
pub fn is_valid_integer(value: &str) -> bool {
    let digits = value.strip_prefix(|c| c == '+' || c == '-').unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

// [20] DECIMAL ::= [+-]? [0-9]* '.' [0-9]+
pub fn is_valid_decimal(value: &str) -> bool {
    let value = value.strip_prefix(|c| c == '+' || c == '-').unwrap_or(value);
    let mut parts = value.splitn(2, '.');
    let integral = parts.next().unwrap_or("");
    let fractional = match parts.next() {
        Some(f) => f,
        None => return false,
    };
    integral.chars().all(|c| c.is_ascii_digit())
        && !fractional.is_empty()
        && fractional.chars().all(|c| c.is_ascii_digit())
}

// [21] DOUBLE ::= [+-]? ([0-9]+ '.' [0-9]* EXPONENT | '.' [0-9]+ EXPONENT | [0-9]+ EXPONENT)
pub fn is_valid_double(value: &str) -> bool {
    let value = value.strip_prefix(|c| c == '+' || c == '-').unwrap_or(value);
    let (mantissa, exponent) = match value.find(|c| c == 'e' || c == 'E') {
        Some(i) => (&value[..i], &value[i + 1..]),
        None => return false,
    };
    let exponent = exponent
        .strip_prefix(|c| c == '+' || c == '-')
        .unwrap_or(exponent);
    if exponent.is_empty() || !exponent.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let mut parts = mantissa.splitn(2, '.');
    let integral = parts.next().unwrap_or("");
    let fractional = parts.next().unwrap_or("");
    if !integral.chars().all(|c| c.is_ascii_digit())
        || !fractional.chars().all(|c| c.is_ascii_digit())
    {
        return false;
    }
    !integral.is_empty() || !fractional.is_empty()
}

pub fn is_valid_boolean(value: &str) -> bool {
    value == "true" || value == "false"
}

/// Combines an UTF-16 surrogate pair into the character it encodes.
///
/// Four-digit `\u` escapes can only name code points up to U+FFFF, so
/// characters beyond the Basic Multilingual Plane arrive as two consecutive
/// escapes forming a surrogate pair. Returns `None` unless `high` is a high
/// surrogate and `low` a low surrogate.
pub fn combine_surrogates(high: u32, low: u32) -> Option<char> {
    if (0xD800..=0xDBFF).contains(&high) && (0xDC00..=0xDFFF).contains(&low) {
        char::from_u32(0x1_0000 + ((high - 0xD800) << 10) + (low - 0xDC00))
    } else {
        None
    }
}

pub fn is_high_surrogate(point: u32) -> bool {
    (0xD800..=0xDBFF).contains(&point)
}

fn read_hex_escape(chars: &mut std::iter::Peekable<Chars<'_>>, len: u32) -> Result<u32, ParseErrorKind> {
    let mut point = 0;
    for _ in 0..len {
        match chars.next().and_then(|c| c.to_digit(16)) {
            Some(d) => point = point * 16 + d,
            None => {
                return Err(ParseErrorKind::InvalidEscape(format!(
                    "\\{} with fewer than {} hex digits",
                    if len == 4 { "u" } else { "U" },
                    len
                )))
            }
        }
    }
    Ok(point)
}

/// Decodes a `\uXXXX` or `\UXXXXXXXX` escape whose `u`/`U` is the next
/// character of `chars`, pairing surrogate halves when needed.
fn decode_uchar(chars: &mut std::iter::Peekable<Chars<'_>>) -> Result<char, ParseErrorKind> {
    let len = match chars.next() {
        Some('u') => 4,
        Some('U') => 8,
        _ => return Err(ParseErrorKind::InvalidEscape("\\".to_owned())),
    };
    let point = read_hex_escape(chars, len)?;
    if len == 4 && is_high_surrogate(point) {
        // The pair arrives as two consecutive \u escapes.
        if chars.next() != Some('\\') || chars.next() != Some('u') {
            return Err(ParseErrorKind::InvalidUnicodeCodePoint(point));
        }
        let low = read_hex_escape(chars, 4)?;
        return combine_surrogates(point, low)
            .ok_or(ParseErrorKind::InvalidUnicodeCodePoint(point));
    }
    char::from_u32(point).ok_or(ParseErrorKind::InvalidUnicodeCodePoint(point))
}

/// Resolves the escapes of a quoted literal body.
///
/// RDF 1.1 allows `\t \b \n \r \f \" \' \\` plus `\u`/`\U`; the original
/// N-Triples and Turtle grammars did not have `\b`, `\f` and `\'`.
pub fn unescape_literal(raw: &str, rdf11: bool) -> Result<String, ParseErrorKind> {
    let mut output = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            output.push(c);
            continue;
        }
        match chars.peek() {
            Some('t') => {
                chars.next();
                output.push('\t');
            }
            Some('n') => {
                chars.next();
                output.push('\n');
            }
            Some('r') => {
                chars.next();
                output.push('\r');
            }
            Some('"') => {
                chars.next();
                output.push('"');
            }
            Some('\\') => {
                chars.next();
                output.push('\\');
            }
            Some('b') if rdf11 => {
                chars.next();
                output.push('\u{0008}');
            }
            Some('f') if rdf11 => {
                chars.next();
                output.push('\u{000C}');
            }
            Some('\'') if rdf11 => {
                chars.next();
                output.push('\'');
            }
            Some('u') | Some('U') => output.push(decode_uchar(&mut chars)?),
            Some(&c) => return Err(ParseErrorKind::InvalidEscape(format!("\\{}", c))),
            None => return Err(ParseErrorKind::InvalidEscape("\\".to_owned())),
        }
    }
    Ok(output)
}

/// Resolves the escapes of an IRI body: only `\u`/`\U` are meaningful there,
/// and the escaped character must itself be legal in an IRIREF.
pub fn unescape_iri(raw: &str) -> Result<String, ParseErrorKind> {
    let mut output = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            output.push(c);
            continue;
        }
        match chars.peek() {
            Some('u') | Some('U') => {
                let c = decode_uchar(&mut chars)?;
                match c {
                    '\u{0}'..=' ' | '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                        return Err(ParseErrorKind::InvalidEscape(format!(
                            "escape resolving to '{}' inside an IRI",
                            c.escape_debug()
                        )))
                    }
                    c => output.push(c),
                }
            }
            Some(&c) => return Err(ParseErrorKind::InvalidEscape(format!("\\{}", c))),
            None => return Err(ParseErrorKind::InvalidEscape("\\".to_owned())),
        }
    }
    Ok(output)
}

/// Resolves the PN_LOCAL_ESC escapes of a prefixed-name local part. Percent
/// triples are data, not escapes, and pass through untouched.
pub fn unescape_local_name(raw: &str) -> Result<String, ParseErrorKind> {
    let mut output = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            output.push(c);
            continue;
        }
        match chars.next() {
            Some(c) if is_pn_local_esc_char(c) => output.push(c),
            Some(c) => return Err(ParseErrorKind::InvalidEscape(format!("\\{}", c))),
            None => return Err(ParseErrorKind::InvalidEscape("\\".to_owned())),
        }
    }
    Ok(output)
}
