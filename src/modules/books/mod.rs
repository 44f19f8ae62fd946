pub mod error;
pub mod filter;
pub mod models;
pub mod routes;
pub mod store;
pub mod validate;
pub mod views;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_db::Database;
use shelf_kernel::{InitCtx, Module, Schema};

/// The bookshelf: CRUD and search over the `books` table
pub struct BooksModule {
    db: Database,
}

impl BooksModule {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            database = %self.db.path().display(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.db.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let html = |description: &str| {
            json!({ "description": description, "content": { "text/html": { "schema": { "type": "string" } } } })
        };
        let error = |description: &str| {
            json!({ "description": description, "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } } } })
        };
        let id_param = json!({
            "name": "id", "in": "path", "required": true,
            "schema": { "type": "integer", "format": "int64" }
        });
        let form = |schema: &str| {
            json!({ "required": true, "content": { "application/x-www-form-urlencoded": { "schema": { "$ref": format!("#/components/schemas/{schema}") } } } })
        };

        Some(json!({
            "paths": {
                "/books/": {
                    "get": {
                        "summary": "List all books as an HTML table",
                        "tags": ["Books"],
                        "responses": { "200": html("Book table fragment") }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": form("BookInput"),
                        "responses": {
                            "201": html("Created book row fragment"),
                            "409": html("Storage rejected the insert"),
                            "422": html("Invalid input")
                        }
                    }
                },
                "/books/{id}": {
                    "get": {
                        "summary": "Fetch one book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Book" } } }
                            },
                            "404": error("No book with this id")
                        }
                    },
                    "put": {
                        "summary": "Replace every field of a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/BookInput" } } }
                        },
                        "responses": {
                            "200": {
                                "description": "The updated book",
                                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Book" } } }
                            },
                            "400": error("No book with this id, or storage rejected the update"),
                            "422": error("Invalid input")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book; missing ids succeed",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "200": html("Empty fragment"),
                            "409": html("Storage rejected the delete")
                        }
                    }
                },
                "/search/": {
                    "post": {
                        "summary": "Substring search, all supplied fields must match",
                        "tags": ["Books"],
                        "requestBody": form("BookSearch"),
                        "responses": { "200": html("Search results fragment") }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "published": { "type": "integer", "format": "int64" },
                            "first_sentence": { "type": "string" }
                        },
                        "required": ["id", "title", "author", "published", "first_sentence"]
                    },
                    "BookInput": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "minLength": 1 },
                            "author": { "type": "string", "minLength": 1 },
                            "published": { "type": ["integer", "string"], "description": "Year; must parse as an integer" },
                            "first_sentence": { "type": "string" }
                        },
                        "required": ["title", "author", "published", "first_sentence"]
                    },
                    "BookSearch": {
                        "type": "object",
                        "properties": {
                            "author": { "type": "string" },
                            "published": { "type": "string" },
                            "title": { "type": "string" }
                        }
                    }
                }
            }
        }))
    }

    fn schema(&self) -> Vec<Schema> {
        vec![Schema {
            id: "001_books",
            ddl: store::SCHEMA,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(db: Database) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(db))
}
