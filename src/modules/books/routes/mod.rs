//! HTTP handlers for the books module.
//!
//! Each handler validates input first, then acquires a connection for the
//! duration of one `Database::run` call.

use axum::{extract::State, http::StatusCode, response::Html, routing::get, Json, Router};
use shelf_db::Database;
use shelf_http::error::{AppError, HtmlError};
use shelf_http::extract::{FormBody, JsonBody, PathParam};

use super::error::BookError;
use super::filter::SearchFilter;
use super::models::{Book, BookForm, BookPayload, SearchForm};
use super::store::BookStore;
use super::validate::validate;
use super::views;

#[derive(Clone)]
pub struct BooksState {
    db: Database,
}

pub fn router(db: Database) -> Router {
    Router::new()
        .route("/index/", get(index_page))
        .route("/books/", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/search/", get(search_page).post(search_books))
        .route("/create_books/", get(create_page))
        .route("/delete_books/", get(delete_page))
        .with_state(BooksState { db })
}

async fn index_page() -> Html<String> {
    views::index_page()
}

async fn search_page() -> Html<String> {
    views::search_page()
}

async fn create_page() -> Html<String> {
    views::create_page()
}

async fn delete_page(State(state): State<BooksState>) -> Result<Html<String>, HtmlError> {
    let books = all_books(&state.db).await?;
    Ok(views::delete_page(&books))
}

async fn list_books(State(state): State<BooksState>) -> Result<Html<String>, HtmlError> {
    let books = all_books(&state.db).await?;
    Ok(views::book_table(&books))
}

async fn all_books(db: &Database) -> Result<Vec<Book>, BookError> {
    db.run(|conn| BookStore::new(conn).list()).await
}

async fn search_books(
    State(state): State<BooksState>,
    form: Result<FormBody<SearchForm>, AppError>,
) -> Result<Html<String>, HtmlError> {
    let FormBody(form) = form?;
    let filter = SearchFilter::from(form);
    tracing::debug!(fields = ?filter.active_fields(), "book search");

    let books = state
        .db
        .run(move |conn| BookStore::new(conn).search(&filter))
        .await?;
    Ok(views::search_results(&books))
}

async fn create_book(
    State(state): State<BooksState>,
    form: Result<FormBody<BookForm>, AppError>,
) -> Result<(StatusCode, Html<String>), HtmlError> {
    let FormBody(form) = form?;
    let book = validate(form)?;

    let created = state
        .db
        .run(move |conn| BookStore::new(conn).create(&book))
        .await?;
    Ok((StatusCode::CREATED, views::book_row(&created)))
}

async fn get_book(
    State(state): State<BooksState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Book>, AppError> {
    state
        .db
        .run(move |conn| BookStore::new(conn).get(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Book with id: {id} not found.")))
}

async fn update_book(
    State(state): State<BooksState>,
    PathParam(id): PathParam<i64>,
    JsonBody(payload): JsonBody<BookPayload>,
) -> Result<Json<Book>, AppError> {
    let book = validate(payload.into())?;

    let updated = state
        .db
        .run(move |conn| BookStore::new(conn).update(id, &book))
        .await
        .map_err(BookError::into_update_error)?;
    Ok(Json(updated))
}

async fn delete_book(
    State(state): State<BooksState>,
    id: Result<PathParam<i64>, AppError>,
) -> Result<Html<&'static str>, HtmlError> {
    let PathParam(id) = id?;
    state
        .db
        .run(move |conn| BookStore::new(conn).delete(id))
        .await?;
    Ok(views::empty_row())
}
