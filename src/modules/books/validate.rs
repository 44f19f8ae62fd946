use super::error::{BookError, FieldError};
use super::models::{BookForm, NewBook};

/// Check and coerce a raw field set. Every problem is reported, not just the first.
///
/// `title`, `author` and `published` must be non-blank; `first_sentence` must be
/// present but may be empty. `published` must parse as an integer.
pub fn validate(form: BookForm) -> Result<NewBook, BookError> {
    let mut errors = Vec::new();

    let title = required("title", form.title, &mut errors);
    let author = required("author", form.author, &mut errors);
    let published = required("published", form.published, &mut errors)
        .and_then(|raw| parse_year(&raw, &mut errors));
    let first_sentence = match form.first_sentence {
        Some(text) => Some(text),
        None => {
            errors.push(FieldError {
                field: "first_sentence",
                message: "field required".to_string(),
            });
            None
        }
    };

    match (title, author, published, first_sentence) {
        (Some(title), Some(author), Some(published), Some(first_sentence)) => {
            Ok(NewBook {
                title,
                author,
                published,
                first_sentence,
            })
        }
        _ => Err(BookError::Validation(errors)),
    }
}

fn required(
    field: &'static str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Some(text),
        Some(_) => {
            errors.push(FieldError {
                field,
                message: "must not be empty".to_string(),
            });
            None
        }
        None => {
            errors.push(FieldError {
                field,
                message: "field required".to_string(),
            });
            None
        }
    }
}

fn parse_year(raw: &str, errors: &mut Vec<FieldError>) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(year) => Some(year),
        Err(_) => {
            errors.push(FieldError {
                field: "published",
                message: format!("'{raw}' is not an integer"),
            });
            None
        }
    }
}
