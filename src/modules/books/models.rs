use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::error::{BookError, Operation};

/// A book record as owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, assigned on creation
    pub id: String,
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    /// Total number of pages
    pub page_count: u32,
    /// Pages read so far, never above `page_count`
    pub read_page: u32,
    /// Derived from the page counters on every write
    pub finished: bool,
    pub reading: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub inserted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    pub(crate) fn new(id: String, fields: BookFields, now: OffsetDateTime) -> Self {
        Self {
            id,
            finished: is_finished(fields.page_count, fields.read_page),
            name: fields.name,
            year: fields.year,
            author: fields.author,
            summary: fields.summary,
            publisher: fields.publisher,
            page_count: fields.page_count,
            read_page: fields.read_page,
            reading: fields.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Replace every mutable field; `id` and `inserted_at` stay put.
    pub(crate) fn apply(&mut self, fields: BookFields, now: OffsetDateTime) {
        self.finished = is_finished(fields.page_count, fields.read_page);
        self.name = fields.name;
        self.year = fields.year;
        self.author = fields.author;
        self.summary = fields.summary;
        self.publisher = fields.publisher;
        self.page_count = fields.page_count;
        self.read_page = fields.read_page;
        self.reading = fields.reading;
        self.updated_at = now;
    }

    pub fn summary_view(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// A book counts as finished once every page has been read.
pub fn is_finished(page_count: u32, read_page: u32) -> bool {
    page_count == read_page
}

/// Request body for both create and update.
///
/// Only `name` is mandatory; the rest default when omitted. A client-sent
/// `finished` is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

impl BookPayload {
    /// Check the payload before any mutation; `name` first, then the page counters.
    pub fn validate(self, operation: Operation) -> Result<BookFields, BookError> {
        let name = self.name.ok_or(BookError::MissingName(operation))?;

        if self.read_page > self.page_count {
            return Err(BookError::ReadPageExceedsPageCount(operation));
        }

        Ok(BookFields {
            name,
            year: self.year,
            author: self.author,
            summary: self.summary,
            publisher: self.publisher,
            page_count: self.page_count,
            read_page: self.read_page,
            reading: self.reading,
        })
    }
}

/// Payload that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

/// List projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: String,
}

/// Raw list query; values arrive as strings such as `"1"` or `"0"`.
#[derive(Debug, Clone, Default)]
pub struct ListBooksQuery {
    pub name: Option<String>,
    pub reading: Option<String>,
    pub finished: Option<String>,
}

impl ListBooksQuery {
    /// Build from raw query pairs; a repeated key keeps its first value and
    /// unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "reading" => &mut query.reading,
                "finished" => &mut query.finished,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// The single filter honored for a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    All,
    /// Lowercased needle matched against lowercased names
    NameContains(String),
    Reading(bool),
    Finished(bool),
}

impl BookFilter {
    /// First non-empty parameter wins, in the order name, reading, finished.
    pub fn from_query(query: &ListBooksQuery) -> Self {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.is_empty())
        }

        if let Some(name) = present(&query.name) {
            BookFilter::NameContains(name.to_lowercase())
        } else if let Some(reading) = present(&query.reading) {
            BookFilter::Reading(reading == "1")
        } else if let Some(finished) = present(&query.finished) {
            BookFilter::Finished(finished == "1")
        } else {
            BookFilter::All
        }
    }

    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::NameContains(needle) => book.name.to_lowercase().contains(needle.as_str()),
            BookFilter::Reading(reading) => book.reading == *reading,
            BookFilter::Finished(finished) => book.finished == *finished,
        }
    }
}

/// `data` of a successful create.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBook {
    pub book_id: String,
}

/// `data` of a list response.
#[derive(Debug, Clone, Serialize)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

/// `data` of a get response.
#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    pub book: Book,
}
