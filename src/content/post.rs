//! List-view projections of post documents

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cms::{Document, DocumentData, SearchResponse, TextField};
use crate::helpers::DateFormatter;

/// Reading speed used when a post does not declare its read time
pub const WORDS_PER_MINUTE: usize = 200;

/// A post as shown on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Document uid, the slug of `/post/{uid}`
    pub uid: String,

    /// Publication date exactly as the content service sent it
    pub first_publication_date: Option<String>,

    /// Publication date formatted for display
    pub display_date: Option<String>,

    pub title: String,
    pub subtitle: String,
    pub author: String,

    /// Read time in minutes
    pub read_time: u32,
}

impl PostSummary {
    /// Project a raw document
    ///
    /// Used for the statically loaded page and for every appended page alike.
    /// Missing fields become empty strings rather than errors.
    pub fn from_document(document: &Document, formatter: &DateFormatter) -> Self {
        let data = &document.data;
        let display_date = document
            .first_publication_date
            .as_deref()
            .and_then(|raw| formatter.format(raw));

        Self {
            uid: document.uid.clone().unwrap_or_default(),
            first_publication_date: document.first_publication_date.clone(),
            display_date,
            title: text_of(&data.title),
            subtitle: text_of(&data.subtitle),
            author: text_of(&data.author),
            read_time: read_time_minutes(data),
        }
    }
}

/// A page of post summaries plus the cursor of the following page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPagination {
    pub next_page: Option<String>,
    pub page: u32,
    pub results: Vec<PostSummary>,
}

impl PostPagination {
    /// Map a search response, keeping result order
    pub fn from_response(response: &SearchResponse, formatter: &DateFormatter) -> Self {
        Self {
            next_page: response.next_page.clone(),
            page: response.page.unwrap_or(1).max(1),
            results: response
                .results
                .iter()
                .map(|doc| PostSummary::from_document(doc, formatter))
                .collect(),
        }
    }
}

/// Read time of a post in minutes
///
/// A declared `readTime` wins; otherwise every heading and body word is
/// counted at [`WORDS_PER_MINUTE`], rounded up.
pub fn read_time_minutes(data: &DocumentData) -> u32 {
    if let Some(minutes) = data.read_time.as_ref().and_then(declared_minutes) {
        return minutes;
    }

    let words: usize = data
        .content
        .iter()
        .map(|section| {
            let heading = section
                .heading
                .as_ref()
                .map(|h| count_words(&h.as_text()))
                .unwrap_or(0);
            let body: usize = section.body.iter().map(|b| count_words(&b.text)).sum();
            heading + body
        })
        .sum();

    words.div_ceil(WORDS_PER_MINUTE) as u32
}

fn declared_minutes(value: &Value) -> Option<u32> {
    let minutes = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if minutes.is_finite() && minutes >= 0.0 {
        Some(minutes.ceil() as u32)
    } else {
        None
    }
}

fn text_of(field: &Option<TextField>) -> String {
    field.as_ref().map(TextField::as_text).unwrap_or_default()
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_document_keeps_raw_date() {
        let doc = document(json!({
            "uid": "criando-um-app-cra-do-zero",
            "first_publication_date": "2023-03-10T00:00:00Z",
            "data": {
                "title": "Criando um app CRA do zero",
                "subtitle": "Tudo sobre como criar a sua primeira aplicação",
                "author": "Danilo Vieira",
                "readTime": 4
            }
        }));

        let post = PostSummary::from_document(&doc, &DateFormatter::default());
        assert_eq!(post.uid, "criando-um-app-cra-do-zero");
        assert_eq!(post.first_publication_date.as_deref(), Some("2023-03-10T00:00:00Z"));
        assert_eq!(post.display_date.as_deref(), Some("10 mar 2023"));
        assert_eq!(post.author, "Danilo Vieira");
        assert_eq!(post.read_time, 4);
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let post = PostSummary::from_document(&document(json!({})), &DateFormatter::default());
        assert_eq!(post.uid, "");
        assert_eq!(post.title, "");
        assert_eq!(post.first_publication_date, None);
        assert_eq!(post.display_date, None);
        assert_eq!(post.read_time, 0);
    }

    #[test]
    fn test_read_time_estimated_from_content() {
        let body = vec!["palavra"; 399].join(" ");
        let doc = document(json!({
            "data": {
                "content": [
                    { "heading": "Dois títulos", "body": [{ "type": "paragraph", "text": body }] }
                ]
            }
        }));
        // 401 words
        assert_eq!(read_time_minutes(&doc.data), 3);
    }

    #[test]
    fn test_read_time_declared_as_string_or_float() {
        let doc = document(json!({ "data": { "readTime": "5" } }));
        assert_eq!(read_time_minutes(&doc.data), 5);

        let doc = document(json!({ "data": { "readTime": 2.2 } }));
        assert_eq!(read_time_minutes(&doc.data), 3);

        let doc = document(json!({ "data": { "readTime": -1 } }));
        assert_eq!(read_time_minutes(&doc.data), 0);
    }

    #[test]
    fn test_pagination_from_response() {
        let response: SearchResponse = serde_json::from_value(json!({
            "next_page": "https://repo.cdn.prismic.io/api/v2/documents/search?page=2",
            "results": [{ "uid": "a" }, { "uid": "b" }]
        }))
        .unwrap();

        let page = PostPagination::from_response(&response, &DateFormatter::default());
        assert_eq!(page.page, 1);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].uid, "a");
        assert_eq!(page.results[1].uid, "b");
        assert!(page.next_page.is_some());
    }
}
