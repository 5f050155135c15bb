//! Query predicates in the content service's native syntax
//!
//! A query is a bracketed list of predicates, each itself bracketed:
//! `[[at(document.type, "posts")][at(document.tags, "rust")]]`.

use std::fmt;

/// A single query predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Field equals value
    At { path: String, value: String },
}

impl Predicate {
    pub fn at(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::At {
            path: path.into(),
            value: value.into(),
        }
    }

    /// `[at(document.type, "<type>")]`
    pub fn document_type(document_type: impl Into<String>) -> Self {
        Self::at("document.type", document_type)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At { path, value } => write!(f, "[at({}, {})]", path, quote(value)),
        }
    }
}

/// Render the `q` parameter for a list of predicates
pub fn build_query(predicates: &[Predicate]) -> String {
    let mut query = String::from("[");
    for predicate in predicates {
        query.push_str(&predicate.to_string());
    }
    query.push(']');
    query
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
