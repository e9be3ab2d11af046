use ahash::RandomState;
use hashbrown::HashMap;

use crate::lua_value::LuaValue;

/// Field name to decoded scalar for a single entry body.
///
/// Duplicate names keep the later occurrence. Unknown names are retained but
/// never consulted by the normalizer.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FieldMap<'a>(HashMap<&'a str, LuaValue<'a>, RandomState>);

impl<'a> FieldMap<'a> {
    /// Scans an entry body into `name = value` pairs.
    ///
    /// The scan is flat: it does not track nesting, so the contents of an
    /// inner table are swept up as if they were fields of the outer entry.
    /// An identifier not followed by `=` is skipped, and a field whose value
    /// region is empty is dropped. Quoted values may contain commas, closing
    /// braces and escaped quotes; an unterminated quote downgrades the value
    /// to a plain character run ending at the next `,`, `}` or `]`.
    pub fn parse(body: &'a str) -> FieldMap<'a> {
        let bytes = body.as_bytes();
        let mut fields = HashMap::with_capacity_and_hasher(16, RandomState::new());
        let mut pos = 0;

        while pos < bytes.len() {
            if !is_ident_byte(bytes[pos]) {
                pos += 1;
                continue;
            }

            let name_start = pos;
            while pos < bytes.len() && is_ident_byte(bytes[pos]) {
                pos += 1;
            }
            let name = &body[name_start..pos];

            let mut cursor = pos;
            while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
                cursor += 1;
            }
            if cursor >= bytes.len() || bytes[cursor] != b'=' {
                // Not a field, rescan from the byte after the identifier.
                continue;
            }
            cursor += 1;

            let mut quote = cursor;
            while quote < bytes.len() && bytes[quote].is_ascii_whitespace() {
                quote += 1;
            }

            if quote < bytes.len() && bytes[quote] == b'"' {
                if let Some(close) = find_closing_quote(bytes, quote + 1) {
                    fields.insert(name, LuaValue::from_token(&body[quote..=close]));
                    pos = close + 1;
                    continue;
                }
            }

            let mut end = cursor;
            while end < bytes.len() && !matches!(bytes[end], b',' | b'}' | b']') {
                end += 1;
            }
            // A zero-character region is no field at all, but a blank one
            // still decodes (to an empty string).
            if end > cursor {
                fields.insert(name, LuaValue::from_token(body[cursor..end].trim()));
            }
            pos = end;
        }

        FieldMap(fields)
    }

    pub fn get(&self, name: &str) -> Option<&LuaValue<'a>> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The field's string content, or `""` when it is absent or not a string.
    pub fn str_or_default(&self, name: &str) -> String {
        match self.get(name) {
            Some(LuaValue::Str(s)) => s.clone().into_owned(),
            _ => String::new(),
        }
    }

    /// A detached copy of the field's value.
    pub fn scalar(&self, name: &str) -> Option<LuaValue<'static>> {
        self.get(name).cloned().map(LuaValue::into_owned)
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Position of the next unescaped `"`, scanning from `from`.
fn find_closing_quote(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}
