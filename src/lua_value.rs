use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;

/// A single scalar decoded from one field of a resource entry.
///
/// Values borrow from the source text wherever possible; quoted strings only
/// allocate when they contain an escaped quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LuaValue<'a> {
    Str(Cow<'a, str>),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl<'a> LuaValue<'a> {
    /// Decodes a single trimmed token into a typed scalar.
    ///
    /// Coercion never fails: a token wrapped in a pair of double quotes is a
    /// string (with `\"` unescaped), `true`/`false` are booleans, tokens
    /// containing a `.` are tried as floats and the rest as integers, and
    /// anything that parses as neither is kept verbatim as a string. A lone
    /// `"` is not a pair and stays verbatim.
    pub fn from_token(token: &'a str) -> LuaValue<'a> {
        if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
            return LuaValue::Str(unescape_quotes(&token[1..token.len() - 1]));
        }

        match token {
            "true" => return LuaValue::Bool(true),
            "false" => return LuaValue::Bool(false),
            _ => {}
        }

        if token.contains('.') {
            if let Ok(float) = token.parse::<f64>() {
                return LuaValue::Float(float);
            }
        } else if let Ok(int) = token.parse::<i64>() {
            return LuaValue::Int(int);
        }

        LuaValue::Str(Cow::Borrowed(token))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LuaValue::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            LuaValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Detaches the value from the source text it was decoded from.
    pub fn into_owned(self) -> LuaValue<'static> {
        match self {
            LuaValue::Str(s) => LuaValue::Str(Cow::Owned(s.into_owned())),
            LuaValue::Bool(b) => LuaValue::Bool(b),
            LuaValue::Int(i) => LuaValue::Int(i),
            LuaValue::Float(f) => LuaValue::Float(f),
        }
    }
}

impl From<LuaValue<'_>> for Value {
    fn from(value: LuaValue<'_>) -> Value {
        match value {
            LuaValue::Str(s) => Value::String(s.into_owned()),
            LuaValue::Bool(b) => Value::Bool(b),
            LuaValue::Int(i) => Value::from(i),
            LuaValue::Float(f) => Value::from(f),
        }
    }
}

/// Replaces every `\"` with `"`, left to right.
///
/// Other escape sequences pass through untouched; the resource format only
/// ever escapes the quote character.
fn unescape_quotes(raw: &str) -> Cow<'_, str> {
    if raw.contains("\\\"") {
        Cow::Owned(raw.replace("\\\"", "\""))
    } else {
        Cow::Borrowed(raw)
    }
}
