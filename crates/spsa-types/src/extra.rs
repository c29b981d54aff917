//! Fixed auxiliary arguments forwarded verbatim to every objective call.

use serde::{Deserialize, Serialize};

/// A single auxiliary value. Extras may be heterogeneous.
///
/// JSON integers deserialize as `Int` when they fit in `i64` and as `UInt`
/// above that, so no integer is silently turned into a float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraArg {
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Json(serde_json::Value),
}

impl ExtraArg {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::UInt(v) => Some(*v as f64),
            Self::Json(v) => v.as_f64(),
            Self::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Json(v) => v.as_str(),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExtraArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for ExtraArg {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for ExtraArg {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for ExtraArg {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<&str> for ExtraArg {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ExtraArg {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<serde_json::Value> for ExtraArg {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

/// Ordered, read-only sequence of [`ExtraArg`]s. Empty means "no extras".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraArgs(Vec<ExtraArg>);

impl ExtraArgs {
    pub fn new(args: Vec<ExtraArg>) -> Self {
        Self(args)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ExtraArg> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExtraArg> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ExtraArg] {
        &self.0
    }
}

impl<T: Into<ExtraArg>> FromIterator<T> for ExtraArgs {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a ExtraArgs {
    type Item = &'a ExtraArg;
    type IntoIter = std::slice::Iter<'a, ExtraArg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
