//! Integration tests for the single-certificate form.

use cert_lookup_integration_tests::{TestContext, spawn_grading_site, unreachable_base_url};
use cert_lookup_web::services::MemorySink;
use reqwest::StatusCode;

async fn post_cert(ctx: &TestContext, cert: &str) -> reqwest::Response {
    ctx.client
        .post(ctx.url("/"))
        .form(&[("cert", cert)])
        .send()
        .await
        .expect("Failed to submit lookup form")
}

#[tokio::test]
async fn test_index_renders_both_forms() {
    let ctx = TestContext::new().await;

    let resp = ctx.client.get(ctx.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.unwrap();
    assert!(body.contains(r#"action="/batch-upload""#));
    assert!(body.contains(r#"name="cert""#));
    assert!(!body.contains("Result for Cert"));
    assert!(ctx.sink.rows().is_empty());
}

#[tokio::test]
async fn test_lookup_renders_and_appends_row() {
    let ctx = TestContext::new().await;

    let resp = post_cert(&ctx, "  12345678 ").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.unwrap();
    assert!(body.contains("Result for Cert #12345678"));
    assert!(body.contains("1998 Pokemon Base Set Charizard"));
    assert!(body.contains("GEM MT 10"));
    assert!(body.contains("<img"));

    let rows = ctx.sink.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].values(),
        &[
            "12345678",
            "1998 Pokemon Base Set Charizard",
            "GEM MT 10",
            "1998 Pokemon Base Set #4",
            "4",
            "312",
            "https://images.example/charizard.jpg",
        ]
    );
}

#[tokio::test]
async fn test_page_without_title_yields_error_record() {
    let ctx = TestContext::new().await;

    let resp = post_cert(&ctx, "00000000").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.unwrap();
    assert!(body.contains("Error fetching data"));
    assert!(!body.contains("<img"));

    let rows = ctx.sink.rows();
    assert_eq!(rows.len(), 1);
    let values = rows[0].values();
    assert_eq!(values[0], "00000000");
    assert_eq!(values[1], "Error fetching data");
    assert!(!values[2].is_empty());
    assert_eq!(&values[3..], &["-", "-", "-", ""]);
}

#[tokio::test]
async fn test_not_found_status_yields_error_record() {
    let ctx = TestContext::new().await;

    let resp = post_cert(&ctx, "99999999").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let rows = ctx.sink.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].values()[1], "Error fetching data");
}

#[tokio::test]
async fn test_unreachable_grading_site_yields_error_record() {
    let ctx = TestContext::with(&unreachable_base_url().await, MemorySink::new()).await;

    let resp = post_cert(&ctx, "12345678").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Error fetching data"));

    let rows = ctx.sink.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].values()[0], "12345678");
    assert_eq!(rows[0].values()[1], "Error fetching data");
}

#[tokio::test]
async fn test_blank_cert_is_rejected() {
    let ctx = TestContext::new().await;

    let resp = post_cert(&ctx, "   ").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(ctx.sink.rows().is_empty());
}

#[tokio::test]
async fn test_persistence_failure_returns_bad_gateway() {
    let grading_site = spawn_grading_site().await;
    let ctx = TestContext::with(&grading_site, MemorySink::failing_on(["12345678"])).await;

    let resp = post_cert(&ctx, "12345678").await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(resp.text().await.unwrap(), "Failed to save lookup result");
    assert!(ctx.sink.rows().is_empty());
}
