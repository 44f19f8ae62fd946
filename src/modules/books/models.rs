use serde::{Deserialize, Serialize};

/// A stored book. `id` is assigned by storage on insert and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Publication year
    pub published: i64,
    /// May be empty
    pub first_sentence: String,
}

/// Validated content fields for a create or full-replace update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published: i64,
    pub first_sentence: String,
}

impl NewBook {
    pub fn with_id(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            published: self.published,
            first_sentence: self.first_sentence,
        }
    }
}

/// Raw field set as submitted by a form. Nothing is checked yet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub first_sentence: Option<String>,
}

/// JSON body of a full-replace update. `published` may be a number or a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published: Option<serde_json::Value>,
    #[serde(default)]
    pub first_sentence: Option<String>,
}

impl From<BookPayload> for BookForm {
    fn from(payload: BookPayload) -> Self {
        let published = payload.published.and_then(|value| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(text),
            serde_json::Value::Number(number) => Some(year_text(&number)),
            other => Some(other.to_string()),
        });

        Self {
            title: payload.title,
            author: payload.author,
            published,
            first_sentence: payload.first_sentence,
        }
    }
}

/// Integral floats such as `1965.0` count as whole years.
fn year_text(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
            (value as i64).to_string()
        }
        _ => number.to_string(),
    }
}

/// Search form. Blank inputs arrive as empty strings and are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}
