mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_test::TestServer;
use common::{ANDROID_UA, DESKTOP_UA, IOS_UA, IPAD_UA};
use tower::ServiceExt;

const IOS: &str = "https://apps.apple.com/app/id1";
const ANDROID: &str = "https://play.google.com/store/apps/details?id=x";
const WEB: &str = "https://example.com/landing";

#[tokio::test]
async fn test_redirect_per_device() {
    let ctx = common::create_test_context().await;
    common::create_test_link(&ctx.links, "allthree", Some(IOS), Some(ANDROID), Some(WEB)).await;

    let server = TestServer::new(common::test_router(ctx.state)).unwrap();

    for (ua, expected) in [
        (IOS_UA, IOS),
        (IPAD_UA, IOS),
        (ANDROID_UA, ANDROID),
        (DESKTOP_UA, WEB),
    ] {
        let response = server
            .get("/allthree")
            .add_header(header::USER_AGENT, ua)
            .await;

        assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.header("location"), expected);
    }
}

#[tokio::test]
async fn test_redirect_without_user_agent_goes_to_web() {
    let ctx = common::create_test_context().await;
    common::create_test_link(&ctx.links, "noua", Some(IOS), Some(ANDROID), Some(WEB)).await;

    let server = TestServer::new(common::test_router(ctx.state)).unwrap();

    let response = server.get("/noua").await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), WEB);
}

#[tokio::test]
async fn test_redirect_falls_through_to_web() {
    let ctx = common::create_test_context().await;
    let link = common::create_test_link(&ctx.links, "webonly", None, None, Some(WEB)).await;

    let server = TestServer::new(common::test_router(ctx.state)).unwrap();

    let response = server
        .get("/webonly")
        .add_header(header::USER_AGENT, ANDROID_UA)
        .await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), WEB);
    assert_eq!(common::click_count(&ctx.links, link.id).await, 1);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let ctx = common::create_test_context().await;
    let server = TestServer::new(common::test_router(ctx.state)).unwrap();

    let response = server
        .get("/nonexistent")
        .add_header(header::USER_AGENT, IOS_UA)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_redirect_no_destination_does_not_count() {
    let ctx = common::create_test_context().await;
    let link = common::create_test_link(&ctx.links, "iosonly", Some(IOS), None, None).await;

    let server = TestServer::new(common::test_router(ctx.state)).unwrap();

    let response = server
        .get("/iosonly")
        .add_header(header::USER_AGENT, DESKTOP_UA)
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "no_destination");

    assert_eq!(common::click_count(&ctx.links, link.id).await, 0);

    let response = server
        .get("/iosonly")
        .add_header(header::USER_AGENT, IOS_UA)
        .await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(common::click_count(&ctx.links, link.id).await, 1);
}

#[tokio::test]
async fn test_redirect_counts_each_visit() {
    let ctx = common::create_test_context().await;
    let link = common::create_test_link(&ctx.links, "counted", Some(IOS), Some(ANDROID), Some(WEB)).await;

    let server = TestServer::new(common::test_router(ctx.state)).unwrap();

    for ua in [IOS_UA, ANDROID_UA, DESKTOP_UA] {
        server.get("/counted").add_header(header::USER_AGENT, ua).await;
    }

    let response = server.get("/api/links/data/counted").await;
    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["clickCount"], 3);
    assert_eq!(common::click_count(&ctx.links, link.id).await, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redirects_count_every_click() {
    let ctx = common::create_test_context().await;
    let link = common::create_test_link(&ctx.links, "burst", Some(IOS), Some(ANDROID), Some(WEB)).await;

    let app = common::test_router(ctx.state);

    let handles: Vec<_> = (0..100)
        .map(|i| {
            let app = app.clone();
            let ua = if i % 2 == 0 { IOS_UA } else { DESKTOP_UA };
            tokio::spawn(async move {
                let request = Request::builder()
                    .uri("/burst")
                    .header(header::USER_AGENT, ua)
                    .body(Body::empty())
                    .unwrap();
                app.oneshot(request).await.unwrap().status()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::TEMPORARY_REDIRECT);
    }

    assert_eq!(common::click_count(&ctx.links, link.id).await, 100);
}

#[tokio::test]
async fn test_app_router_trims_trailing_slash() {
    let ctx = common::create_test_context().await;
    let link = common::create_test_link(&ctx.links, "slashed", Some(IOS), Some(ANDROID), Some(WEB)).await;

    let app = smart_link::routes::app_router(ctx.state);

    let request = Request::builder()
        .uri("/slashed/")
        .header(header::USER_AGENT, ANDROID_UA)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], ANDROID);

    let request = Request::builder()
        .uri("/api/links/data/slashed/")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::click_count(&ctx.links, link.id).await, 1);
}
