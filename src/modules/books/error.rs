use bookshelf_http::AppError;
use thiserror::Error;

/// Which book operation raised an error; picks the message prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Get,
    Update,
    Delete,
}

fn verb(operation: &Operation) -> &'static str {
    match operation {
        Operation::Create => "add",
        Operation::Get => "get",
        Operation::Update => "update",
        Operation::Delete => "delete",
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("failed to {} book: name is required", verb(.0))]
    MissingName(Operation),

    #[error("failed to {} book: readPage must not be greater than pageCount", verb(.0))]
    ReadPageExceedsPageCount(Operation),

    #[error("{}", not_found_message(.0))]
    NotFound(Operation),

    #[error("failed to {} book", verb(.operation))]
    Internal {
        operation: Operation,
        reason: String,
    },
}

fn not_found_message(operation: &Operation) -> String {
    match operation {
        Operation::Get => "book not found".to_string(),
        other => format!("failed to {} book: id not found", verb(other)),
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match &err {
            BookError::MissingName(_) | BookError::ReadPageExceedsPageCount(_) => {
                AppError::validation(err.to_string())
            }
            BookError::NotFound(_) => AppError::not_found(err.to_string()),
            BookError::Internal { reason, .. } => {
                tracing::error!(reason = %reason, "book store invariant violated");
                AppError::internal(err.to_string())
            }
        }
    }
}
