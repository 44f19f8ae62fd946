use rusqlite::{named_params, params_from_iter, Connection, OptionalExtension, Row};

use super::error::BookError;
use super::filter::SearchFilter;
use super::models::{Book, NewBook};

/// Bootstrap DDL for the `books` table.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    published INTEGER NOT NULL,
    author TEXT NOT NULL,
    title TEXT NOT NULL,
    first_sentence TEXT NOT NULL
);
"#;

const SELECT_BOOKS: &str = "SELECT id, published, author, title, first_sentence FROM books";

/// Book queries and mutations over one borrowed connection.
///
/// Each mutation is a single statement and relies on SQLite's implicit
/// transaction. Inputs are already validated [`NewBook`]s, so nothing here can
/// fail on malformed input.
pub struct BookStore<'c> {
    conn: &'c Connection,
}

impl<'c> BookStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Every book, ordered by id. Same result as an empty search.
    pub fn list(&self) -> Result<Vec<Book>, BookError> {
        self.search(&SearchFilter::new())
    }

    pub fn search(&self, filter: &SearchFilter) -> Result<Vec<Book>, BookError> {
        let query = filter.to_query(SELECT_BOOKS);
        tracing::debug!(sql = %query.sql, params = query.params.len(), "searching books");

        let mut stmt = self.conn.prepare(&query.sql)?;
        let books = stmt
            .query_map(params_from_iter(query.params.iter()), book_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    pub fn get(&self, id: i64) -> Result<Option<Book>, BookError> {
        let book = self
            .conn
            .query_row(
                &format!("{SELECT_BOOKS} WHERE id = :id"),
                named_params! { ":id": id },
                book_from_row,
            )
            .optional()?;
        Ok(book)
    }

    pub fn create(&self, book: &NewBook) -> Result<Book, BookError> {
        self.conn
            .execute(
                "INSERT INTO books (published, author, title, first_sentence)
                 VALUES (:published, :author, :title, :first_sentence)",
                named_params! {
                    ":published": book.published,
                    ":author": book.author,
                    ":title": book.title,
                    ":first_sentence": book.first_sentence,
                },
            )
            .map_err(BookError::conflict)?;

        let id = self.conn.last_insert_rowid();
        tracing::info!(book_id = id, "book created");
        Ok(book.clone().with_id(id))
    }

    /// Full replace. The record must exist.
    pub fn update(&self, id: i64, book: &NewBook) -> Result<Book, BookError> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM books WHERE id = :id",
                named_params! { ":id": id },
                |_| Ok(()),
            )
            .optional()
            .map_err(BookError::conflict)?
            .is_some();
        if !exists {
            return Err(BookError::NotFound(id));
        }

        self.conn
            .execute(
                "UPDATE books
                 SET published = :published, author = :author, title = :title,
                     first_sentence = :first_sentence
                 WHERE id = :id",
                named_params! {
                    ":published": book.published,
                    ":author": book.author,
                    ":title": book.title,
                    ":first_sentence": book.first_sentence,
                    ":id": id,
                },
            )
            .map_err(BookError::conflict)?;

        tracing::info!(book_id = id, "book updated");
        Ok(book.clone().with_id(id))
    }

    /// Unconditional delete; a missing id is not an error.
    pub fn delete(&self, id: i64) -> Result<(), BookError> {
        let removed = self
            .conn
            .execute("DELETE FROM books WHERE id = :id", named_params! { ":id": id })
            .map_err(BookError::conflict)?;

        tracing::info!(book_id = id, removed, "book deleted");
        Ok(())
    }
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        published: row.get("published")?,
        first_sentence: row.get("first_sentence")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::{filter::SearchField, models::BookForm, validate::validate};

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn
    }

    fn new_book(title: &str, author: &str, published: i64) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.to_string(),
            published,
            first_sentence: format!("The first line of {title}."),
        }
    }

    fn seed(store: &BookStore<'_>) -> Vec<Book> {
        [
            new_book("Dune", "Frank Herbert", 1965),
            new_book("Labours", "Herakles", 1965),
            new_book("The Hobbit", "J. R. R. Tolkien", 1937),
            new_book("Children of Dune", "Frank Herbert", 1976),
        ]
        .iter()
        .map(|book| store.create(book).unwrap())
        .collect()
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn create_then_get_round_trips() {
        let conn = conn();
        let store = BookStore::new(&conn);
        let input = NewBook {
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            published: 1965,
            first_sentence: "...".to_string(),
        };

        let created = store.create(&input).unwrap();
        assert!(created.id > 0);

        let fetched = store.get(created.id).unwrap().unwrap();
        assert_eq!(fetched, input.with_id(created.id));
    }

    #[test]
    fn ids_are_fresh_for_each_insert() {
        let conn = conn();
        let store = BookStore::new(&conn);
        let books = seed(&store);

        let ids: std::collections::BTreeSet<_> = books.iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), books.len());
        assert!(ids.iter().all(|id| *id > 0));
    }

    #[test]
    fn invalid_year_never_reaches_storage() {
        let conn = conn();
        let form = BookForm {
            title: Some("Dune".into()),
            author: Some("Herbert".into()),
            published: Some("not-a-number".into()),
            first_sentence: Some("...".into()),
        };

        assert!(matches!(validate(form), Err(BookError::Validation(_))));
        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn empty_search_equals_list() {
        let conn = conn();
        let store = BookStore::new(&conn);
        let seeded = seed(&store);

        assert_eq!(store.list().unwrap(), seeded);
        assert_eq!(store.search(&SearchFilter::new()).unwrap(), seeded);
    }

    #[test]
    fn author_substring_match() {
        let conn = conn();
        let store = BookStore::new(&conn);
        seed(&store);

        let filter = SearchFilter::new().with(SearchField::Author, "Hera");
        let authors: Vec<_> = store
            .search(&filter)
            .unwrap()
            .into_iter()
            .map(|b| b.author)
            .collect();

        assert_eq!(authors, ["Herakles"]);

        let filter = SearchFilter::new().with(SearchField::Author, "Her");
        let authors: Vec<_> = store
            .search(&filter)
            .unwrap()
            .into_iter()
            .map(|b| b.author)
            .collect();
        assert_eq!(authors, ["Frank Herbert", "Herakles", "Frank Herbert"]);
    }

    #[test]
    fn filters_are_and_combined() {
        let conn = conn();
        let store = BookStore::new(&conn);
        seed(&store);

        let filter = SearchFilter::from_pairs([("published", "1965"), ("author", "Her")]);
        let titles: Vec<_> = store
            .search(&filter)
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();

        assert_eq!(titles, ["Dune", "Labours"]);
    }

    #[test]
    fn search_treats_like_metacharacters_as_input_only() {
        let conn = conn();
        let store = BookStore::new(&conn);
        seed(&store);

        let filter = SearchFilter::new().with(SearchField::Title, "'; DROP TABLE books; --");
        assert!(store.search(&filter).unwrap().is_empty());
        assert_eq!(count(&conn), 4);
    }

    #[test]
    fn update_replaces_all_fields() {
        let conn = conn();
        let store = BookStore::new(&conn);
        let seeded = seed(&store);
        let target = seeded[2].id;

        let replacement = new_book("The Hobbit, or There and Back Again", "Tolkien", 1937);
        let updated = store.update(target, &replacement).unwrap();

        assert_eq!(updated, replacement.with_id(target));
        assert_eq!(store.get(target).unwrap().unwrap(), updated);
        assert_eq!(store.get(seeded[0].id).unwrap().unwrap(), seeded[0]);
    }

    #[test]
    fn update_of_missing_id_is_not_found_and_changes_nothing() {
        let conn = conn();
        let store = BookStore::new(&conn);

        let err = store
            .update(999999, &new_book("Dune", "Herbert", 1965))
            .unwrap_err();

        assert!(matches!(err, BookError::NotFound(999999)));
        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn delete_removes_exactly_one_row() {
        let conn = conn();
        let store = BookStore::new(&conn);
        let seeded = seed(&store);

        store.delete(seeded[1].id).unwrap();

        let remaining = store.list().unwrap();
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().all(|b| b.id != seeded[1].id));
    }

    #[test]
    fn delete_of_missing_id_is_a_no_op() {
        let conn = conn();
        let store = BookStore::new(&conn);
        seed(&store);

        store.delete(424242).unwrap();
        assert_eq!(count(&conn), 4);
    }

    #[test]
    fn storage_rejection_on_insert_is_conflict() {
        let conn = conn();
        conn.execute_batch(
            "CREATE TRIGGER no_inserts BEFORE INSERT ON books
             BEGIN SELECT RAISE(ABORT, 'shelf is full'); END;",
        )
        .unwrap();
        let store = BookStore::new(&conn);

        match store.create(&new_book("Dune", "Herbert", 1965)) {
            Err(BookError::Conflict(message)) => assert!(message.contains("shelf is full")),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn storage_rejection_on_delete_is_conflict() {
        let conn = conn();
        let store = BookStore::new(&conn);
        let seeded = seed(&store);
        conn.execute_batch(
            "CREATE TRIGGER keep_books BEFORE DELETE ON books
             BEGIN SELECT RAISE(ABORT, 'books are forever'); END;",
        )
        .unwrap();

        let err = store.delete(seeded[0].id).unwrap_err();
        assert!(matches!(err, BookError::Conflict(ref m) if m.contains("books are forever")));
        assert_eq!(count(&conn), 4);
    }
}
