//! In-memory book store.
//!
//! Records live in an [`IndexMap`] keyed by id so lookups are direct while
//! listing still follows insertion order.

use std::sync::Arc;

use indexmap::{map::Entry, IndexMap};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::{Timestamp, Uuid};

use super::error::{BookError, Operation};
use super::models::{Book, BookFilter, BookPayload, BookSummary};

/// Store handle shared by every handler; one lock guards the whole collection.
pub type SharedBookStore = Arc<RwLock<BookStore>>;

#[derive(Debug, Default)]
pub struct BookStore {
    books: IndexMap<String, Book>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedBookStore {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Validate `payload` and append a new record.
    pub fn create(&mut self, payload: BookPayload) -> Result<Book, BookError> {
        let fields = payload.validate(Operation::Create)?;
        let id = next_id();
        let book = Book::new(id.clone(), fields, OffsetDateTime::now_utc());

        match self.books.entry(id) {
            Entry::Occupied(entry) => Err(BookError::Internal {
                operation: Operation::Create,
                reason: format!("generated id {} already exists", entry.key()),
            }),
            Entry::Vacant(entry) => Ok(entry.insert(book).clone()),
        }
    }

    /// Projection of every record accepted by `filter`, in insertion order.
    pub fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        self.books
            .values()
            .filter(|book| filter.matches(book))
            .map(Book::summary_view)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.books.get(id)
    }

    /// Validate `payload`, then overwrite the mutable fields of `id`.
    pub fn update(&mut self, id: &str, payload: BookPayload) -> Result<&Book, BookError> {
        let fields = payload.validate(Operation::Update)?;
        let book = self
            .books
            .get_mut(id)
            .ok_or(BookError::NotFound(Operation::Update))?;

        book.apply(fields, OffsetDateTime::now_utc());
        Ok(book)
    }

    /// Remove `id`, keeping the order of the remaining records.
    pub fn delete(&mut self, id: &str) -> Result<Book, BookError> {
        self.books
            .shift_remove(id)
            .ok_or(BookError::NotFound(Operation::Delete))
    }
}

fn next_id() -> String {
    Uuid::new_v7(Timestamp::now(uuid::NoContext))
        .simple()
        .to_string()
}
