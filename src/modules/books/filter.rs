//! Search filter to parameterized `WHERE` clause.
//!
//! Clauses are always emitted in the fixed order `author, published, title`,
//! and each clause and its bound value are produced together so placeholder
//! `n` always binds value `n`. User input only ever reaches SQLite as a bound
//! parameter.

use super::models::SearchForm;

/// Searchable columns, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Author,
    Published,
    Title,
}

impl SearchField {
    pub const ORDER: [SearchField; 3] = [
        SearchField::Author,
        SearchField::Published,
        SearchField::Title,
    ];

    pub fn column(self) -> &'static str {
        match self {
            SearchField::Author => "author",
            SearchField::Published => "published",
            SearchField::Title => "title",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|field| field.column() == name)
    }
}

/// Optional substring per searchable field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    author: Option<String>,
    published: Option<String>,
    title: Option<String>,
}

/// Generated SQL and the values bound to its `?` placeholders, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub sql: String,
    pub params: Vec<String>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: SearchField, value: impl Into<String>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    pub fn set(&mut self, field: SearchField, value: Option<String>) {
        *self.slot(field) = value;
    }

    /// Build from `(name, value)` pairs in any order. Unknown names are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut filter = Self::new();
        for (name, value) in pairs {
            if let Some(field) = SearchField::from_name(name.as_ref()) {
                filter.set(field, Some(value.into()));
            }
        }
        filter
    }

    fn slot(&mut self, field: SearchField) -> &mut Option<String> {
        match field {
            SearchField::Author => &mut self.author,
            SearchField::Published => &mut self.published,
            SearchField::Title => &mut self.title,
        }
    }

    /// Value to filter on, or `None` when absent or empty.
    pub fn value(&self, field: SearchField) -> Option<&str> {
        let value = match field {
            SearchField::Author => &self.author,
            SearchField::Published => &self.published,
            SearchField::Title => &self.title,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Fields that will produce a clause, in clause order.
    pub fn active_fields(&self) -> Vec<SearchField> {
        SearchField::ORDER
            .into_iter()
            .filter(|field| self.value(*field).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active_fields().is_empty()
    }

    /// Append the filter to `base` (a `SELECT ... FROM ...` with no `WHERE`),
    /// ordered by `id`.
    pub fn to_query(&self, base: &str) -> FilterQuery {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        for field in SearchField::ORDER {
            if let Some(value) = self.value(field) {
                conditions.push(format!("{} LIKE ?", field.column()));
                params.push(format!("%{value}%"));
            }
        }

        let mut sql = base.trim_end().to_string();
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        FilterQuery { sql, params }
    }
}

impl From<SearchForm> for SearchFilter {
    fn from(form: SearchForm) -> Self {
        Self {
            author: form.author,
            published: form.published,
            title: form.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "SELECT * FROM books";

    #[test]
    fn no_filters_means_no_where_clause() {
        let query = SearchFilter::new().to_query(BASE);
        assert_eq!(query.sql, "SELECT * FROM books ORDER BY id");
        assert!(query.params.is_empty());
    }

    #[test]
    fn empty_values_are_skipped() {
        let filter = SearchFilter::new()
            .with(SearchField::Author, "")
            .with(SearchField::Title, "Dune");

        let query = filter.to_query(BASE);
        assert_eq!(query.sql, "SELECT * FROM books WHERE title LIKE ? ORDER BY id");
        assert_eq!(query.params, ["%Dune%"]);
        assert_eq!(filter.active_fields(), [SearchField::Title]);
    }

    #[test]
    fn clause_order_ignores_input_order() {
        let forward = SearchFilter::from_pairs([
            ("author", "Hera"),
            ("published", "1965"),
            ("title", "Dune"),
        ]);
        let backward = SearchFilter::from_pairs([
            ("title", "Dune"),
            ("published", "1965"),
            ("author", "Hera"),
        ]);

        let expected = FilterQuery {
            sql: "SELECT * FROM books WHERE author LIKE ? AND published LIKE ? AND title LIKE ? ORDER BY id"
                .to_string(),
            params: vec!["%Hera%".into(), "%1965%".into(), "%Dune%".into()],
        };
        assert_eq!(forward.to_query(BASE), expected);
        assert_eq!(backward.to_query(BASE), expected);
    }

    #[test]
    fn every_subset_binds_one_value_per_placeholder_in_field_order() {
        let values = ["Tolkien", "1954", "Rings"];

        for mask in 1u8..8 {
            let mut pairs = Vec::new();
            // Feed pairs in reverse so input order never matches clause order.
            for (idx, field) in SearchField::ORDER.iter().enumerate().rev() {
                if mask & (1 << idx) != 0 {
                    pairs.push((field.column(), values[idx]));
                }
            }

            let query = SearchFilter::from_pairs(pairs.clone()).to_query(BASE);

            assert_eq!(query.sql.matches('?').count(), pairs.len());
            assert_eq!(query.params.len(), pairs.len());

            let expected: Vec<String> = SearchField::ORDER
                .iter()
                .enumerate()
                .filter(|(idx, _)| mask & (1 << idx) != 0)
                .map(|(idx, _)| format!("%{}%", values[idx]))
                .collect();
            assert_eq!(query.params, expected, "mask {mask:03b}");

            let columns: Vec<&str> = query
                .sql
                .split(" LIKE ?")
                .filter_map(|chunk| chunk.rsplit(' ').next())
                .filter(|word| SearchField::from_name(word).is_some())
                .collect();
            let expected_columns: Vec<&str> = SearchField::ORDER
                .iter()
                .enumerate()
                .filter(|(idx, _)| mask & (1 << idx) != 0)
                .map(|(_, field)| field.column())
                .collect();
            assert_eq!(columns, expected_columns, "mask {mask:03b}");
        }
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let filter = SearchFilter::from_pairs([("first_sentence", "x"), ("id", "1")]);
        assert!(filter.is_empty());
    }

    #[test]
    fn values_are_never_interpolated() {
        let query = SearchFilter::new()
            .with(SearchField::Title, "'; DROP TABLE books; --")
            .to_query(BASE);

        assert!(!query.sql.contains("DROP"));
        assert_eq!(query.params, ["%'; DROP TABLE books; --%"]);
    }

    #[test]
    fn search_form_maps_onto_filter() {
        let form = SearchForm {
            author: Some("Herbert".into()),
            published: Some(String::new()),
            title: None,
        };
        let filter = SearchFilter::from(form);
        assert_eq!(filter.active_fields(), [SearchField::Author]);
        assert_eq!(filter.value(SearchField::Author), Some("Herbert"));
    }
}
