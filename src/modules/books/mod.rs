pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

use async_trait::async_trait;
use axum::{routing::get, Router};
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

use store::{BookStore, SharedBookStore};

/// Books module: CRUD over the in-memory shelf
pub struct BooksModule {
    store: SharedBookStore,
}

impl BooksModule {
    pub fn new() -> Self {
        Self::with_store(BookStore::shared())
    }

    /// Build the module around an existing store handle
    pub fn with_store(store: SharedBookStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SharedBookStore {
        &self.store
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
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
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(handlers::list_books).post(handlers::create_book))
            .route("/health", get(health_check))
            .route(
                "/{book_id}",
                get(handlers::get_book)
                    .put(handlers::update_book)
                    .delete(handlers::delete_book),
            )
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let remaining = self.store.read().await.len();
        tracing::info!(
            module = self.name(),
            books = remaining,
            "books module stopped, in-memory records discarded"
        );
        Ok(())
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

fn envelope_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "$ref": "#/components/schemas/Envelope"
                }
            }
        }
    })
}

fn book_id_param() -> serde_json::Value {
    json!({
        "name": "book_id",
        "in": "path",
        "required": true,
        "description": "Identifier returned when the book was added",
        "schema": {
            "type": "string"
        }
    })
}

fn payload_body() -> serde_json::Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": {
                    "$ref": "#/components/schemas/BookPayload"
                }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let flag_param = |name: &str, description: &str| {
        json!({
            "name": name,
            "in": "query",
            "required": false,
            "description": description,
            "schema": {
                "type": "string",
                "enum": ["0", "1"]
            }
        })
    };

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "description":
                        "At most one filter applies, checked in the order name, reading, finished.",
                    "tags": ["Books"],
                    "parameters": [
                        {
                            "name": "name",
                            "in": "query",
                            "required": false,
                            "description": "Case-insensitive substring of the book name",
                            "schema": {
                                "type": "string"
                            }
                        },
                        flag_param("reading", "1 for books being read, 0 otherwise"),
                        flag_param("finished", "1 for finished books, 0 otherwise")
                    ],
                    "responses": {
                        "200": envelope_response("List of {id, name, publisher} under data.books")
                    }
                },
                "post": {
                    "summary": "Add a book",
                    "tags": ["Books"],
                    "requestBody": payload_body(),
                    "responses": {
                        "201": envelope_response("Book added, id under data.bookId"),
                        "400": envelope_response("Missing name or readPage greater than pageCount"),
                        "500": envelope_response("Book could not be stored")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "text/plain": {
                                    "schema": {
                                        "type": "string"
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "/{book_id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [book_id_param()],
                    "responses": {
                        "200": envelope_response("Full record under data.book"),
                        "404": envelope_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Update a book",
                    "tags": ["Books"],
                    "parameters": [book_id_param()],
                    "requestBody": payload_body(),
                    "responses": {
                        "200": envelope_response("Book updated"),
                        "400": envelope_response("Missing name or readPage greater than pageCount"),
                        "404": envelope_response("Book not found")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [book_id_param()],
                    "responses": {
                        "200": envelope_response("Book deleted"),
                        "404": envelope_response("Book not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "year": { "type": "integer", "format": "int32" },
                        "author": { "type": "string" },
                        "summary": { "type": "string" },
                        "publisher": { "type": "string" },
                        "pageCount": { "type": "integer", "minimum": 0 },
                        "readPage": { "type": "integer", "minimum": 0 },
                        "finished": {
                            "type": "boolean",
                            "description": "pageCount == readPage"
                        },
                        "reading": { "type": "boolean" },
                        "insertedAt": { "type": "string", "format": "date-time" },
                        "updatedAt": { "type": "string", "format": "date-time" }
                    },
                    "required": [
                        "id", "name", "year", "author", "summary", "publisher",
                        "pageCount", "readPage", "finished", "reading",
                        "insertedAt", "updatedAt"
                    ]
                },
                "BookPayload": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "year": { "type": "integer", "format": "int32" },
                        "author": { "type": "string" },
                        "summary": { "type": "string" },
                        "publisher": { "type": "string" },
                        "pageCount": { "type": "integer", "minimum": 0 },
                        "readPage": {
                            "type": "integer",
                            "minimum": 0,
                            "description": "Must not exceed pageCount"
                        },
                        "reading": { "type": "boolean" }
                    },
                    "required": ["name"]
                },
                "BookSummary": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "publisher": { "type": "string" }
                    },
                    "required": ["id", "name", "publisher"]
                }
            }
        }
    })
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
