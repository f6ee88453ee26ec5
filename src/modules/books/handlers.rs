//! HTTP handlers for the books module.

use axum::extract::{Path, State};
use bookshelf_http::{ApiJson, ApiQuery, ApiResponse, AppResult};

use super::error::{BookError, Operation};
use super::models::{
    BookDetail, BookFilter, BookList, BookPayload, CreatedBook, ListBooksQuery,
};
use super::store::SharedBookStore;

/// `POST /`: add a book
pub async fn create_book(
    State(store): State<SharedBookStore>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<ApiResponse<CreatedBook>> {
    let book = store.write().await.create(payload)?;

    tracing::info!(book_id = %book.id, name = %book.name, "book added");
    Ok(ApiResponse::created(CreatedBook { book_id: book.id }).with_message("book added"))
}

/// `GET /`: list `{id, name, publisher}` for the books matching the query
pub async fn list_books(
    State(store): State<SharedBookStore>,
    ApiQuery(pairs): ApiQuery<Vec<(String, String)>>,
) -> AppResult<ApiResponse<BookList>> {
    let filter = BookFilter::from_query(&ListBooksQuery::from_pairs(pairs));
    let books = store.read().await.list(&filter);

    tracing::debug!(?filter, matched = books.len(), "listed books");
    Ok(ApiResponse::ok(BookList { books }))
}

/// `GET /{book_id}`
pub async fn get_book(
    State(store): State<SharedBookStore>,
    Path(book_id): Path<String>,
) -> AppResult<ApiResponse<BookDetail>> {
    let book = store
        .read()
        .await
        .get(&book_id)
        .cloned()
        .ok_or(BookError::NotFound(Operation::Get))?;

    Ok(ApiResponse::ok(BookDetail { book }))
}

/// `PUT /{book_id}`: replace every mutable field
pub async fn update_book(
    State(store): State<SharedBookStore>,
    Path(book_id): Path<String>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<ApiResponse<()>> {
    {
        let mut store = store.write().await;
        let book = store.update(&book_id, payload)?;
        tracing::info!(book_id = %book.id, finished = book.finished, "book updated");
    }

    Ok(ApiResponse::message("book updated"))
}

/// `DELETE /{book_id}`
pub async fn delete_book(
    State(store): State<SharedBookStore>,
    Path(book_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let removed = store.write().await.delete(&book_id)?;

    tracing::info!(book_id = %removed.id, "book deleted");
    Ok(ApiResponse::message("book deleted"))
}

#[cfg(test)]
mod tests {
    use super::super::BooksModule;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        Router,
    };
    use bookshelf_kernel::Module;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        BooksModule::new().routes()
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn book_json(name: &str, page_count: u32, read_page: u32, reading: bool) -> Value {
        json!({
            "name": name,
            "year": 2010,
            "author": "John Doe",
            "summary": "Lorem ipsum dolor sit amet",
            "publisher": "Dicoding Indonesia",
            "pageCount": page_count,
            "readPage": read_page,
            "reading": reading
        })
    }

    async fn create(app: &Router, body: Value) -> String {
        let (status, response) = send(app, Method::POST, "/", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        response["data"]["bookId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_returns_book_id() {
        let app = app();
        let payload = book_json("Dune", 100, 100, false);
        let (status, body) = send(&app, Method::POST, "/", Some(payload)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "book added");
        assert!(body["data"]["bookId"].is_string());
    }

    #[tokio::test]
    async fn test_create_fully_read_book_is_finished() {
        let app = app();
        let id = create(&app, book_json("Dune", 100, 100, false)).await;

        let (status, body) = send(&app, Method::GET, &format!("/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["book"]["finished"], true);
        assert_eq!(body["data"]["book"]["id"], id.as_str());
    }

    #[tokio::test]
    async fn test_create_rejects_read_page_over_page_count() {
        let app = app();
        let payload = book_json("Dune", 100, 150, false);
        let (status, body) = send(&app, Method::POST, "/", Some(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert_eq!(
            body["message"],
            "failed to add book: readPage must not be greater than pageCount"
        );
    }

    #[tokio::test]
    async fn test_create_rejects_missing_name() {
        let app = app();
        let mut payload = book_json("ignored", 100, 10, false);
        payload.as_object_mut().unwrap().remove("name");

        let (status, body) = send(&app, Method::POST, "/", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], "failed to add book: name is required");

        let (_, list) = send(&app, Method::GET, "/", None).await;
        assert_eq!(list["data"]["books"], json!([]));
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_body() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_projects_id_name_publisher() {
        let app = app();
        let id = create(&app, book_json("Dune", 100, 10, false)).await;

        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(
            body["data"]["books"],
            json!([{"id": id, "name": "Dune", "publisher": "Dicoding Indonesia"}])
        );
    }

    #[tokio::test]
    async fn test_list_filters_by_name_case_insensitively() {
        let app = app();
        let hit = create(&app, book_json("Learning ABC", 10, 1, false)).await;
        create(&app, book_json("Dune", 10, 1, false)).await;
        let other_hit = create(&app, book_json("xabcx", 10, 1, false)).await;

        let (_, body) = send(&app, Method::GET, "/?name=aBc", None).await;
        let ids: Vec<&str> = body["data"]["books"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec![hit.as_str(), other_hit.as_str()]);
    }

    #[tokio::test]
    async fn test_list_filters_by_reading_and_finished() {
        let app = app();
        let reading = create(&app, book_json("A", 10, 1, true)).await;
        let done = create(&app, book_json("B", 10, 10, false)).await;

        let (_, body) = send(&app, Method::GET, "/?reading=1", None).await;
        assert_eq!(body["data"]["books"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["books"][0]["id"], reading.as_str());

        let (_, body) = send(&app, Method::GET, "/?reading=0", None).await;
        assert_eq!(body["data"]["books"][0]["id"], done.as_str());

        let (_, body) = send(&app, Method::GET, "/?finished=1", None).await;
        assert_eq!(body["data"]["books"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["books"][0]["id"], done.as_str());

        let (_, body) = send(&app, Method::GET, "/?finished=0", None).await;
        assert_eq!(body["data"]["books"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["books"][0]["id"], reading.as_str());

        // any value other than "1" counts as false
        let (_, body) = send(&app, Method::GET, "/?finished=yes", None).await;
        assert_eq!(body["data"]["books"][0]["id"], reading.as_str());

        // name outranks reading
        let (_, body) = send(&app, Method::GET, "/?name=b&reading=1", None).await;
        assert_eq!(body["data"]["books"][0]["id"], done.as_str());
    }

    #[tokio::test]
    async fn test_list_with_repeated_key_still_succeeds() {
        let app = app();
        let reading = create(&app, book_json("A", 10, 1, true)).await;
        create(&app, book_json("B", 10, 10, false)).await;

        let (status, body) = send(&app, Method::GET, "/?reading=1&reading=0", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["books"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["books"][0]["id"], reading.as_str());
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/nope", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"status": "fail", "message": "book not found"}));
    }

    #[tokio::test]
    async fn test_update_recomputes_finished_and_keeps_identity() {
        let app = app();
        let id = create(&app, book_json("Dune", 100, 10, true)).await;
        let (_, before) = send(&app, Method::GET, &format!("/{}", id), None).await;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/{}", id),
            Some(book_json("Dune Messiah", 100, 100, false)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success", "message": "book updated"}));

        let (_, after) = send(&app, Method::GET, &format!("/{}", id), None).await;
        let before = &before["data"]["book"];
        let after = &after["data"]["book"];
        assert_eq!(after["id"], before["id"]);
        assert_eq!(after["insertedAt"], before["insertedAt"]);
        assert_ne!(after["updatedAt"], before["updatedAt"]);
        assert_eq!(after["name"], "Dune Messiah");
        assert_eq!(after["finished"], true);
        assert_eq!(after["reading"], false);
    }

    #[tokio::test]
    async fn test_update_validation_and_not_found() {
        let app = app();
        let id = create(&app, book_json("Dune", 100, 10, false)).await;

        let mut nameless = book_json("x", 10, 1, false);
        nameless.as_object_mut().unwrap().remove("name");
        let (status, body) = send(&app, Method::PUT, &format!("/{}", id), Some(nameless)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "failed to update book: name is required");

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/{}", id),
            Some(book_json("Dune", 10, 11, false)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "failed to update book: readPage must not be greater than pageCount"
        );

        let (status, body) =
            send(&app, Method::PUT, "/missing", Some(book_json("Dune", 10, 1, false))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], "failed to update book: id not found");
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let app = app();
        let id = create(&app, book_json("Dune", 100, 10, false)).await;

        let (status, body) = send(&app, Method::DELETE, &format!("/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success", "message": "book deleted"}));

        let (status, _) = send(&app, Method::GET, &format!("/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, Method::DELETE, &format!("/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "failed to delete book: id not found");
    }
}
