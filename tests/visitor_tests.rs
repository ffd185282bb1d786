mod test_utils;

use anonstreak::{
    db::postgres::Access,
    entities::visitor::VisitRecord,
    errors::AppError,
    repositories::visitor::VisitorRepository,
    use_cases::visitors::VisitorHandler,
};
use mockall::{mock, predicate::eq};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::atomic::Ordering;
use test_utils::*;

mock! {
    pub VisitorRepo {}

    #[async_trait::async_trait]
    impl VisitorRepository for VisitorRepo {
        async fn record_visit(&self, access: Access) -> Result<VisitRecord, AppError>;
        async fn count_visits(&self, access: Access) -> Result<i64, AppError>;
    }
}

#[actix_rt::test]
async fn every_home_render_is_one_visit() {
    let app = TestApp::spawn().await;

    for _ in 0..3 {
        let response = app.get("/").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(app.visitors.count(), 3);
}

#[actix_rt::test]
async fn public_listing_does_not_count_as_a_visit() {
    let app = TestApp::spawn().await;

    app.get("/api/v1/images/public").await;

    assert_eq!(app.visitors.count(), 0);
}

#[actix_rt::test]
async fn visits_are_written_with_the_elevated_role() {
    let mut repo = MockVisitorRepo::new();
    repo.expect_record_visit()
        .with(eq(Access::Privileged))
        .times(1)
        .returning(|_| Err(AppError::Persistence("down".into())));
    repo.expect_count_visits()
        .with(eq(Access::Privileged))
        .times(1)
        .returning(|_| Ok(41));

    let handler = VisitorHandler::new(repo);
    handler.record_visit().await;

    assert_eq!(handler.count_visits().await, 41);
}

#[actix_rt::test]
async fn unavailable_counter_reads_as_zero() {
    let mut repo = MockVisitorRepo::new();
    repo.expect_count_visits()
        .returning(|_| Err(AppError::Persistence("connection refused".into())));

    let handler = VisitorHandler::new(repo);

    assert_eq!(handler.count_visits().await, 0);
}

#[actix_rt::test]
async fn home_renders_while_the_store_is_down() {
    let app = TestApp::spawn().await;
    app.visitors.down.store(true, Ordering::SeqCst);

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "Ok");
    assert_eq!(app.visitors.count(), 0);
}

#[actix_rt::test]
async fn dashboard_survives_a_store_outage() {
    let app = TestApp::spawn().await;
    app.seed_image("unreachable", true);
    app.images.down.store(true, Ordering::SeqCst);
    app.visitors.down.store(true, Ordering::SeqCst);

    let response = app.admin_get("/admin/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["total_images"], 0);
    assert_eq!(body["data"]["visitor_count"], 0);
}
