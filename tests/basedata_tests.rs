use actix_web::{http::StatusCode, test, App};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use serial_test::serial;

use urlaubsverwaltung::routes;

mod common;

use common::{TestContext, OFFICE_ID, PERSON_ONE_ID, PERSON_TWO_ID};

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data($ctx.config_data())
                .app_data($ctx.state())
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
#[serial]
async fn test_get_basedata_unauthorized() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/api/v1/persons/3/basedata").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
#[serial]
async fn test_missing_basedata_is_blank() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/persons/3/basedata")
        .insert_header(ctx.bearer(PERSON_ONE_ID))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body["data"],
        json!({ "personId": 3, "personnelNumber": "", "additionalInformation": "" })
    );
}

#[actix_web::test]
#[serial]
async fn test_office_stores_trimmed_personnel_number() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::put()
        .uri("/api/v1/persons/3/basedata")
        .insert_header(ctx.bearer(OFFICE_ID))
        .set_json(json!({ "personnelNumber": "  4711 ", "additionalInformation": "part time" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/persons/3/basedata")
        .insert_header(ctx.bearer(OFFICE_ID))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["personnelNumber"], "4711");
    assert_eq!(body["data"]["additionalInformation"], "part time");
}

#[actix_web::test]
#[serial]
async fn test_overlong_personnel_number_is_rejected() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::put()
        .uri("/api/v1/persons/3/basedata")
        .insert_header(ctx.bearer(OFFICE_ID))
        .set_json(json!({ "personnelNumber": "1".repeat(21) }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
async fn test_employees_cannot_see_basedata_of_others() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/persons/3/basedata")
        .insert_header(ctx.bearer(PERSON_TWO_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
