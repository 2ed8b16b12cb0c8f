mod common;

use catalog_server::AppConfig;
use reqwest::StatusCode;
use serde_json::Value;

async fn server_with_page_size(list_per_page: usize) -> common::TestServer {
    let mut config = AppConfig::default();
    config.admin.list_per_page = list_per_page;
    common::start_server_with(config).await
}

#[tokio::test]
async fn advanced_search_filters_book_change_list() {
    let server = server_with_page_size(100).await;
    let resp = server
        .get("/admin/books/book/?genre=sci&author=herbert&min_price=10")
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains("<td>Dune</td>"));
    assert!(!html.contains("<td>Children of Dune</td>"));
    assert!(html.contains("1 result (9 total)"));
    assert!(html.contains(r#"id="advanced-search""#));
    assert!(html.contains(r#"name="min_price" id="id_min_price" value="10""#));
    server.stop().await;
}

#[tokio::test]
async fn unparseable_advanced_values_are_skipped() {
    let server = server_with_page_size(100).await;
    let resp = server.get("/admin/books/book/?min_price=abc").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains("9 results (9 total)"));
    server.stop().await;
}

#[tokio::test]
async fn decade_search_and_pagination() {
    let server = server_with_page_size(2).await;

    let html = server
        .get("/admin/books/book/?decade=1960")
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains("4 results (9 total)"));
    assert!(html.contains("<td>Dune</td>"));
    assert!(html.contains("<td>A Wizard of Earthsea</td>"));
    assert!(!html.contains("<td>Silent Spring</td>"));
    assert!(html.contains("Page 1 of 2"));
    assert!(html.contains(r#"href="?decade=1960&amp;p=2""#));

    let html = server
        .get("/admin/books/book/?decade=1960&p=99")
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains("Page 2 of 2"));
    assert!(html.contains("<td>Silent Spring</td>"));
    server.stop().await;
}

#[tokio::test]
async fn keyword_search_spans_search_fields() {
    let server = server_with_page_size(100).await;

    let html = server.get("/admin/books/book/?q=dune").await.text().await.unwrap();
    assert!(html.contains("2 results (9 total)"));

    let html = server
        .get("/admin/books/book/?q=le+guin")
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains("<td>The Left Hand of Darkness</td>"));
    assert!(html.contains("2 results (9 total)"));
    assert!(html.contains(r#"value="le guin""#));
    server.stop().await;
}

#[tokio::test]
async fn list_filter_narrows_results() {
    let server = server_with_page_size(100).await;
    let html = server
        .get("/admin/books/book/?genre__exact=fan")
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains("1 result (9 total)"));
    assert!(html.contains("<td>A Wizard of Earthsea</td>"));
    server.stop().await;
}

#[tokio::test]
async fn disallowed_lookups_are_rejected() {
    let server = server_with_page_size(100).await;
    let resp = server.get("/admin/books/book/?price__gt=5").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Filtering by price__gt not allowed");

    let resp = server.get("/admin/books/book/?genre__in=fan,poetry").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    server.stop().await;
}

#[tokio::test]
async fn author_change_list_searches_through_books() {
    let server = server_with_page_size(100).await;
    let html = server
        .get("/admin/books/author/?book_genre=sci")
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains("3 results (6 total)"));
    assert!(html.contains("<td>Frank Herbert</td>"));
    assert!(!html.contains("<td>Jane Austen</td>"));
    server.stop().await;
}

#[tokio::test]
async fn author_book_conditions_apply_to_one_book() {
    let server = server_with_page_size(100).await;

    // Mary Shelley wrote a horror novel and "The Last Man", which is not horror.
    let html = server
        .get("/admin/books/author/?book_title=last+man&book_genre=hor")
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains("0 results (6 total)"));

    let html = server
        .get("/admin/books/author/?book_title=frank&book_genre=hor")
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains("1 result (6 total)"));
    assert!(html.contains("<td>Mary Shelley</td>"));
    server.stop().await;
}

#[tokio::test]
async fn extreme_decades_list_everything() {
    let server = server_with_page_size(100).await;
    for decade in ["2147483647", "-2147483648"] {
        let resp = server.get(&format!("/admin/books/book/?decade={decade}")).await;
        assert_eq!(resp.status(), StatusCode::OK, "decade={decade}");
        let html = resp.text().await.unwrap();
        assert!(html.contains("9 results (9 total)"), "decade={decade}");
    }
    server.stop().await;
}

#[tokio::test]
async fn search_forms_keep_the_other_filters() {
    let server = server_with_page_size(100).await;
    let html = server
        .get("/admin/books/book/?q=dune&genre__exact=sci&min_price=5")
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains("Home &rsaquo; Books"));
    assert!(html.contains(r#"<input type="hidden" name="q" value="dune">"#));
    assert!(html.contains(r#"<input type="hidden" name="genre__exact" value="sci">"#));
    assert!(html.contains(r#"<input type="hidden" name="min_price" value="5">"#));
    server.stop().await;
}
