//! Server-rendered pages and fragments for the books module.

use axum::response::Html;
use shelf_http::html::{escape, page};

use super::models::Book;

const TABLE_HEAD: &str =
    "<thead><tr><th>Title</th><th>Author</th><th>Published</th><th>First sentence</th></tr></thead>";

fn cells(book: &Book) -> String {
    format!(
        "<td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
        escape(&book.title),
        escape(&book.author),
        book.published,
        escape(&book.first_sentence),
    )
}

/// One table row, as returned after a successful create
pub fn book_row(book: &Book) -> Html<String> {
    Html(format!(r#"<tr id="book-{}">{}</tr>"#, book.id, cells(book)))
}

pub fn book_table(books: &[Book]) -> Html<String> {
    let rows: String = books.iter().map(|book| book_row(book).0).collect();
    Html(format!(
        r#"<table class="books">{TABLE_HEAD}<tbody id="books">{rows}</tbody></table>"#
    ))
}

/// Replacement `<tbody>` for the search page
pub fn search_results(books: &[Book]) -> Html<String> {
    let rows: String = if books.is_empty() {
        r#"<tr class="empty"><td colspan="4">No books found.</td></tr>"#.to_string()
    } else {
        books.iter().map(|book| book_row(book).0).collect()
    };
    Html(format!(r#"<tbody id="search-results">{rows}</tbody>"#))
}

/// Swapped in for a deleted row
pub fn empty_row() -> Html<&'static str> {
    Html("")
}

fn deletable_row(book: &Book) -> String {
    format!(
        r#"<tr id="book-{id}">{cells}<td><button hx-delete="/books/{id}" hx-target="closest tr" hx-swap="outerHTML" hx-confirm="Delete {title}?">Delete</button></td></tr>"#,
        id = book.id,
        cells = cells(book),
        title = escape(&book.title),
    )
}

pub fn index_page() -> Html<String> {
    Html(page(
        "Bookshelf",
        r#"<h1>Bookshelf</h1>
<div id="errors"></div>
<div hx-get="/books/" hx-trigger="load" hx-swap="innerHTML">Loading books...</div>"#,
    ))
}

pub fn search_page() -> Html<String> {
    Html(page(
        "Search books",
        r##"<h1>Search books</h1>
<div id="errors"></div>
<form hx-post="/search/" hx-target="#search-results" hx-swap="outerHTML">
<label>Author <input name="author"></label>
<label>Published <input name="published"></label>
<label>Title <input name="title"></label>
<button type="submit">Search</button>
</form>
<table class="books"><thead><tr><th>Title</th><th>Author</th><th>Published</th><th>First sentence</th></tr></thead>
<tbody id="search-results"></tbody></table>"##,
    ))
}

pub fn create_page() -> Html<String> {
    Html(page(
        "Add a book",
        r##"<h1>Add a book</h1>
<div id="errors"></div>
<form hx-post="/books/" hx-target="#created" hx-swap="beforeend" hx-on::after-request="if(event.detail.successful) this.reset()">
<label>Title <input name="title" required></label>
<label>Author <input name="author" required></label>
<label>Published <input name="published" inputmode="numeric" required></label>
<label>First sentence <textarea name="first_sentence"></textarea></label>
<button type="submit">Add</button>
</form>
<table class="books"><thead><tr><th>Title</th><th>Author</th><th>Published</th><th>First sentence</th></tr></thead>
<tbody id="created"></tbody></table>"##,
    ))
}

pub fn delete_page(books: &[Book]) -> Html<String> {
    let rows: String = books.iter().map(deletable_row).collect();
    Html(page(
        "Remove books",
        &format!(
            r#"<h1>Remove books</h1>
<div id="errors"></div>
<table class="books"><thead><tr><th>Title</th><th>Author</th><th>Published</th><th>First sentence</th><th></th></tr></thead>
<tbody>{rows}</tbody></table>"#
        ),
    ))
}
