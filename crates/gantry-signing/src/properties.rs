//! Java `.properties` documents
//!
//! Implements the subset of `java.util.Properties` syntax that Gradle build
//! scripts rely on when they load `key.properties` or `local.properties`:
//! comments, the three separator styles, line continuations and escapes.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SigningError};

/// An ordered set of string key/value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a properties document. Later duplicates replace earlier keys.
    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let mut lines = content.lines().enumerate();

        while let Some((index, raw)) = lines.next() {
            let line_no = index + 1;
            let mut logical = raw.trim_start_matches(is_blank).to_string();

            if logical.is_empty() || logical.starts_with('#') || logical.starts_with('!') {
                continue;
            }

            while ends_with_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            entries.insert(unescape(key, line_no)?, unescape(value, line_no)?);
        }

        Ok(Self { entries })
    }

    /// Read and parse a properties file.
    ///
    /// UTF-8 content is taken as is; anything else is decoded as ISO-8859-1,
    /// the encoding `Properties.load(InputStream)` assumes.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
        };

        let properties = Self::parse(&content)?;
        debug!(path = %path.display(), entries = properties.len(), "loaded properties");
        Ok(properties)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as `key=value` lines that [`Properties::parse`] reads back
    /// unchanged. Non-ASCII characters are written as `\uXXXX` so that
    /// ISO-8859-1 readers see the same values.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            out.push_str(&escape(key, true));
            out.push('=');
            out.push_str(&escape(value, false));
            out.push('\n');
        }
        out
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{c}')
}

/// An odd number of trailing backslashes continues the logical line
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split a logical line into its raw (still escaped) key and value
fn split_entry(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut blank_separator = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                value_start = i + 1;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                value_start = i + c.len_utf8();
                blank_separator = true;
                break;
            }
            _ => {}
        }
    }

    let mut value = line[value_start..].trim_start_matches(is_blank);
    if blank_separator {
        if let Some(rest) = value.strip_prefix(|c| c == '=' || c == ':') {
            value = rest.trim_start_matches(is_blank);
        }
    }

    (&line[..key_end], value)
}

fn unescape(raw: &str, line: usize) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let unit = read_unicode_unit(&mut chars, line)?;
                let decoded = if (0xD800..0xDC00).contains(&unit) {
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err(invalid(line, "unpaired high surrogate in \\u escape"));
                    }
                    let low = read_unicode_unit(&mut chars, line)?;
                    char::decode_utf16([unit, low]).next().and_then(|r| r.ok())
                } else {
                    char::from_u32(u32::from(unit))
                };
                out.push(decoded.ok_or_else(|| invalid(line, "invalid \\u escape"))?);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn read_unicode_unit(chars: &mut std::str::Chars<'_>, line: usize) -> Result<u16> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.chars().count() != 4 {
        return Err(invalid(line, "truncated \\u escape"));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid(line, &format!("bad \\u escape '{}'", hex)));
    }
    u16::from_str_radix(&hex, 16).map_err(|_| invalid(line, &format!("bad \\u escape '{}'", hex)))
}

fn invalid(line: usize, reason: &str) -> SigningError {
    SigningError::InvalidSyntax {
        line,
        reason: reason.to_string(),
    }
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{c}' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            c if (c as u32) < 0x20 || (c as u32) > 0x7e => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_key_properties() {
        let props = Properties::parse(
            "storePassword=hunter22\nkeyPassword=hunter23\nkeyAlias=upload\nstoreFile=/keys/upload.jks\n",
        )
        .unwrap();

        assert_eq!(props.len(), 4);
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.get("storeFile"), Some("/keys/upload.jks"));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let props = Properties::parse("# comment\n\n   ! also a comment\nkey=value\n").unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("key"), Some("value"));
    }

    #[test]
    fn test_separator_styles() {
        let props = Properties::parse("a=1\nb: 2\nc 3\nd  =  4\ne\n").unwrap();
        assert_eq!(props.get("a"), Some("1"));
        assert_eq!(props.get("b"), Some("2"));
        assert_eq!(props.get("c"), Some("3"));
        assert_eq!(props.get("d"), Some("4"));
        assert_eq!(props.get("e"), Some(""));
    }

    #[test]
    fn test_value_keeps_trailing_whitespace_and_separators() {
        let props = Properties::parse("url=https://example.com:8080/a=b  \n").unwrap();
        assert_eq!(props.get("url"), Some("https://example.com:8080/a=b  "));
    }

    #[test]
    fn test_line_continuation() {
        let props = Properties::parse("path=/first/\\\n    second\nnext=1\n").unwrap();
        assert_eq!(props.get("path"), Some("/first/second"));
        assert_eq!(props.get("next"), Some("1"));
    }

    #[test]
    fn test_escaped_backslash_is_not_continuation() {
        let props = Properties::parse("dir=C:\\\\keys\\\\\nother=x\n").unwrap();
        assert_eq!(props.get("dir"), Some("C:\\keys\\"));
        assert_eq!(props.get("other"), Some("x"));
    }

    #[test]
    fn test_escapes() {
        let props = Properties::parse("my\\ key=tab\\there\nsnow=\\u2603\nemoji=\\uD83D\\uDE80\n").unwrap();
        assert_eq!(props.get("my key"), Some("tab\there"));
        assert_eq!(props.get("snow"), Some("☃"));
        assert_eq!(props.get("emoji"), Some("🚀"));
    }

    #[test]
    fn test_bad_unicode_escape() {
        let err = Properties::parse("ok=1\nbad=\\u12G4\n").unwrap_err();
        assert!(matches!(err, SigningError::InvalidSyntax { line: 2, .. }));

        let err = Properties::parse("bad=\\u12").unwrap_err();
        assert!(matches!(err, SigningError::InvalidSyntax { line: 1, .. }));
    }

    #[test]
    fn test_signed_unicode_escape_rejected() {
        let err = Properties::parse("bad=\\u+123\n").unwrap_err();
        assert!(matches!(err, SigningError::InvalidSyntax { line: 1, .. }));

        let err = Properties::parse("bad=\\u-0FF\n").unwrap_err();
        assert!(matches!(err, SigningError::InvalidSyntax { line: 1, .. }));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let props = Properties::parse("keyAlias=old\nkeyAlias=new\n").unwrap();
        assert_eq!(props.get("keyAlias"), Some("new"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let props = Properties::parse("a=1\r\nb=2\r\n").unwrap();
        assert_eq!(props.get("a"), Some("1"));
        assert_eq!(props.get("b"), Some("2"));
    }

    #[test]
    fn test_render_reads_back() {
        let mut props = Properties::new();
        props.insert("keyAlias", "upload");
        props.insert("storePassword", " p@ss=word:#!ü");
        props.insert("storeFile", "C:\\keys\\upload.jks");

        let rendered = props.render();
        assert!(rendered.contains("keyAlias=upload\n"));
        assert!(rendered.contains("\\u00FC"));
        assert_eq!(Properties::parse(&rendered).unwrap(), props);
    }

    #[test]
    fn test_load_latin1_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("key.properties");
        std::fs::write(&path, b"keyPassword=caf\xe9\n").unwrap();

        let props = Properties::load(&path).unwrap();
        assert_eq!(props.get("keyPassword"), Some("café"));
    }
}
