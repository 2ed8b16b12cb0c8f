mod common;

use reqwest::StatusCode;
use serde_json::{Value, json};

fn titles(books: &Value) -> Vec<&str> {
    books
        .as_array()
        .expect("array")
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn api_root_links_to_collections() {
    let server = common::start_server().await;
    let resp = server.get("/api/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["authors"], format!("{}/api/authors/", server.base));
    assert_eq!(body["books"], format!("{}/api/books/", server.base));
    server.stop().await;
}

#[tokio::test]
async fn api_root_prefers_configured_base_url() {
    let mut config = catalog_server::AppConfig::default();
    config.server.base_url = Some("https://catalog.example.com/library".into());
    let server = common::start_server_with(config).await;
    let body: Value = server.get("/api/").await.json().await.unwrap();
    assert_eq!(body["books"], "https://catalog.example.com/library/api/books/");
    server.stop().await;
}

#[tokio::test]
async fn book_list_and_detail() {
    let server = common::start_server().await;

    let books: Value = server.get("/api/books/").await.json().await.unwrap();
    assert_eq!(books.as_array().unwrap().len(), 9);

    let resp = server.get("/api/books/3/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let dune: Value = resp.json().await.unwrap();
    assert_eq!(
        dune,
        json!({
            "id": 3,
            "title": "Dune",
            "author": "Frank Herbert",
            "genre": "sci",
            "publication_date": "1965-08-01",
            "isbn": "9780441013593",
            "price": "12.99"
        })
    );
    server.stop().await;
}

#[tokio::test]
async fn book_filters_combine() {
    let server = common::start_server().await;

    let body: Value = server
        .get("/api/books/?genre=sci&max_price=11")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(titles(&body), vec!["Children of Dune", "The Left Hand of Darkness"]);

    let body: Value = server
        .get("/api/books/?author=le+guin&publication_date__year=1968")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(titles(&body), vec!["A Wizard of Earthsea"]);

    let body: Value = server
        .get("/api/books/?publication_date__range=1960-01-01,1969-12-31&title__icontains=DUNE")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(titles(&body), vec!["Dune"]);
    server.stop().await;
}

#[tokio::test]
async fn empty_parameters_are_ignored() {
    let server = common::start_server().await;
    let body: Value = server
        .get("/api/books/?genre=&min_price=&title__icontains=")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body.as_array().unwrap().len(), 9);
    server.stop().await;
}

#[tokio::test]
async fn invalid_filters_return_field_errors() {
    let server = common::start_server().await;
    let resp = server.get("/api/books/?min_price=cheap&genre=poetry").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["min_price"], json!(["Enter a number."]));
    assert_eq!(
        body["genre"],
        json!(["Select a valid choice. poetry is not one of the available choices."])
    );
    server.stop().await;
}

#[tokio::test]
async fn authors_include_published_books() {
    let server = common::start_server().await;

    let body: Value = server
        .get("/api/authors/?name__icontains=shelley")
        .await
        .json()
        .await
        .unwrap();
    let authors = body.as_array().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0]["name"], "Mary Shelley");
    assert_eq!(
        titles(&authors[0]["published_books"]),
        vec!["Frankenstein", "The Last Man"]
    );

    let resp = server.get("/api/authors/3/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let le_guin: Value = resp.json().await.unwrap();
    assert_eq!(le_guin["published_books"].as_array().unwrap().len(), 2);
    server.stop().await;
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let server = common::start_server().await;

    for (path, detail) in [
        ("/api/books/999/", "No Book matches the given query."),
        ("/api/books/abc/", "No Book matches the given query."),
        ("/api/authors/0/", "No Author matches the given query."),
    ] {
        let resp = server.get(path).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["detail"], detail);
    }
    server.stop().await;
}

#[tokio::test]
async fn healthz_reports_backend() {
    let server = common::start_server().await;
    let resp = server.get("/healthz").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"status": "ok", "backend": "memory"}));
    server.stop().await;
}
