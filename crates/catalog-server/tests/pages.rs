mod common;

use reqwest::{StatusCode, header};

#[tokio::test]
async fn root_redirects_to_book_list() {
    let server = common::start_server().await;
    let resp = server.get("/").await;
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers()[header::LOCATION], "/books/");
    server.stop().await;
}

#[tokio::test]
async fn book_list_renders_filtered_rows() {
    let server = common::start_server().await;
    let resp = server.get("/books/?genre=hor").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let html = resp.text().await.unwrap();
    assert!(html.contains("<td>Frankenstein</td>"));
    assert!(html.contains("<td>Horror</td>"));
    assert!(!html.contains("Dune"));
    assert!(html.contains(r#"<option value="hor" selected>Horror</option>"#));
    server.stop().await;
}

#[tokio::test]
async fn invalid_input_rerenders_form_with_errors() {
    let server = common::start_server().await;
    let resp = server.get("/books/?max_price=lots").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Please correct the errors below."));
    assert!(html.contains(r#"<span class="errorlist">Enter a number.</span>"#));
    assert!(html.contains(r#"value="lots""#));
    assert!(html.contains("No books found."));
    server.stop().await;
}

#[tokio::test]
async fn author_list_filters_by_name() {
    let server = common::start_server().await;
    let html = server
        .get("/authors/?name__icontains=austen")
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains("Jane Austen"));
    assert!(!html.contains("Mary Shelley"));
    server.stop().await;
}
