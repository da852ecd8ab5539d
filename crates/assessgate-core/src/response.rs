//! Candidate response values and the response map.
//!
//! Responses arrive loosely typed from the form layer. [`ResponseValue`] is
//! an untagged union over the shapes we accept, and the coercion helpers
//! below are the only place where one shape is read as another.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single response as stored in the response map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<ResponseValue>),
    File(FileDescriptor),
    Object(BTreeMap<String, serde_json::Value>),
}

/// Metadata for an uploaded file. The engine never sees file contents.
///
/// Browsers report `size` as an integer, but any JSON number is accepted so
/// that `2e6` or a fractional size still reads as a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    /// Bytes.
    #[serde(default)]
    pub size: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size: size as f64,
            mime_type: None,
        }
    }

    /// Extension after the last dot, lowercased. `None` when there is no dot.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
    }
}

impl From<&str> for ResponseValue {
    fn from(s: &str) -> Self {
        ResponseValue::Text(s.to_string())
    }
}

impl From<String> for ResponseValue {
    fn from(s: String) -> Self {
        ResponseValue::Text(s)
    }
}

impl From<f64> for ResponseValue {
    fn from(n: f64) -> Self {
        ResponseValue::Number(n)
    }
}

impl From<i64> for ResponseValue {
    fn from(n: i64) -> Self {
        ResponseValue::Number(n as f64)
    }
}

impl From<bool> for ResponseValue {
    fn from(b: bool) -> Self {
        ResponseValue::Bool(b)
    }
}

impl From<FileDescriptor> for ResponseValue {
    fn from(f: FileDescriptor) -> Self {
        ResponseValue::File(f)
    }
}

impl ResponseValue {
    /// Build a list of text values, the multi-choice shape.
    pub fn selections<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ResponseValue::List(
            items
                .into_iter()
                .map(|s| ResponseValue::Text(s.into()))
                .collect(),
        )
    }

    /// Short name of the shape, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ResponseValue::Null => "null",
            ResponseValue::Bool(_) => "boolean",
            ResponseValue::Number(_) => "number",
            ResponseValue::Text(_) => "text",
            ResponseValue::List(_) => "list",
            ResponseValue::File(_) => "file",
            ResponseValue::Object(_) => "object",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ResponseValue]> {
        match self {
            ResponseValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileDescriptor> {
        match self {
            ResponseValue::File(f) => Some(f),
            _ => None,
        }
    }

    /// Strict numeric reading: a finite number, or text that parses as one.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            ResponseValue::Number(n) => *n,
            ResponseValue::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }
}

/// Loose text form of a possibly missing value, used by `contains`.
///
/// Missing values read as `"undefined"` and nulls as `"null"`, lists join
/// their members with commas, and structured values read as
/// `"[object Object]"`. A `contains` rule expecting `"null"` therefore
/// matches an unanswered question; schemas should use `is_empty` instead.
pub fn to_text(value: Option<&ResponseValue>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(v) => text_of(v),
    }
}

fn text_of(value: &ResponseValue) -> String {
    match value {
        ResponseValue::Null => "null".to_string(),
        ResponseValue::Bool(b) => b.to_string(),
        ResponseValue::Number(n) => n.to_string(),
        ResponseValue::Text(s) => s.clone(),
        ResponseValue::List(items) => items
            .iter()
            .map(|item| match item {
                ResponseValue::Null => String::new(),
                other => text_of(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        ResponseValue::File(_) | ResponseValue::Object(_) => "[object Object]".to_string(),
    }
}

/// Loose numeric form of a possibly missing value, used by ordering
/// conditions.
///
/// Anything that does not read as a number becomes `NaN`, and every ordering
/// comparison against `NaN` is false. A `greater_than` rule on an unanswered
/// or non-numeric dependency therefore never fires, and neither does its
/// `less_equal` counterpart.
pub fn to_number(value: Option<&ResponseValue>) -> f64 {
    match value {
        None => f64::NAN,
        Some(ResponseValue::Null) => 0.0,
        Some(ResponseValue::Bool(b)) => f64::from(u8::from(*b)),
        Some(ResponseValue::Number(n)) => *n,
        Some(ResponseValue::Text(s)) => parse_loose(s),
        Some(ResponseValue::List(items)) => match items.as_slice() {
            [] => 0.0,
            [single] => parse_loose(&text_of(single)),
            _ => f64::NAN,
        },
        Some(ResponseValue::File(_)) | Some(ResponseValue::Object(_)) => f64::NAN,
    }
}

fn parse_loose(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => f64::NAN,
    }
}

/// Snapshot of candidate responses keyed by question id.
///
/// Every mutation bumps [`ResponseMap::version`]. The engine only ever
/// borrows the map immutably.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseMap {
    values: BTreeMap<String, ResponseValue>,
    #[serde(skip)]
    version: u64,
}

impl ResponseMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&ResponseValue> {
        self.values.get(question_id)
    }

    /// Store a response, returning the previous one.
    pub fn set(
        &mut self,
        question_id: impl Into<String>,
        value: impl Into<ResponseValue>,
    ) -> Option<ResponseValue> {
        self.version += 1;
        self.values.insert(question_id.into(), value.into())
    }

    pub fn remove(&mut self, question_id: &str) -> Option<ResponseValue> {
        self.version += 1;
        self.values.remove(question_id)
    }

    /// Number of mutations applied since creation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ResponseValue)> {
        self.values.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ResponseMap
where
    K: Into<String>,
    V: Into<ResponseValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = ResponseMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}
