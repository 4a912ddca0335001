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

macro_rules! test_unauthorized {
    ($test_name:ident, $method:ident, $uri:expr) => {
        #[actix_web::test]
        #[serial]
        async fn $test_name() {
            let ctx = TestContext::new().await;
            let app = init_app!(ctx);

            let req = test::TestRequest::$method().uri($uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    };
}

test_unauthorized!(test_get_working_times_unauthorized, get, "/api/v1/persons/3/workingtimes");
test_unauthorized!(test_get_federal_state_unauthorized, get, "/api/v1/persons/3/federal-state");

#[actix_web::test]
#[serial]
async fn test_health_is_public() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
#[serial]
async fn test_office_sets_working_days_and_reads_them_back() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/persons/3/workingtimes")
        .insert_header(ctx.bearer(OFFICE_ID))
        .set_json(json!({
            "validFrom": "2022-01-01",
            "workingDays": [1, 2, 3, 4],
            "federalState": "germany_bayern"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/v1/persons/3/workingtimes")
        .insert_header(ctx.bearer(PERSON_ONE_ID))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    let working_times = body["data"].as_array().unwrap();
    assert_eq!(working_times.len(), 1);
    assert_eq!(working_times[0]["validFrom"], "2022-01-01");
    assert_eq!(
        working_times[0]["days"],
        json!(["full", "full", "full", "full", "zero", "zero", "zero"])
    );
    assert_eq!(working_times[0]["federalStateOverride"], "germany_bayern");
}

#[actix_web::test]
#[serial]
async fn test_federal_state_falls_back_to_settings_before_first_working_time() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/persons/3/workingtimes")
        .insert_header(ctx.bearer(OFFICE_ID))
        .set_json(json!({
            "validFrom": "2022-03-01",
            "workingDays": [1, 2, 3, 4, 5],
            "federalState": "germany_berlin"
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/v1/persons/3/federal-state?date=2022-02-28")
        .insert_header(ctx.bearer(OFFICE_ID))
        .to_request();
    let before: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(before["data"]["federalState"], "germany_baden_wuerttemberg");

    let req = test::TestRequest::get()
        .uri("/api/v1/persons/3/federal-state")
        .insert_header(ctx.bearer(OFFICE_ID))
        .to_request();
    let today: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(today["data"]["date"], "2022-06-15");
    assert_eq!(today["data"]["federalState"], "germany_berlin");
}

#[actix_web::test]
#[serial]
async fn test_only_office_may_change_working_times() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/persons/3/workingtimes")
        .insert_header(ctx.bearer(PERSON_ONE_ID))
        .set_json(json!({ "validFrom": "2022-01-01", "workingDays": [1] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn test_employees_cannot_read_working_times_of_others() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/persons/3/workingtimes")
        .insert_header(ctx.bearer(PERSON_TWO_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn test_day_outside_week_is_rejected() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/persons/3/workingtimes")
        .insert_header(ctx.bearer(OFFICE_ID))
        .set_json(json!({ "validFrom": "2022-01-01", "workingDays": [1, 8] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
#[serial]
async fn test_unknown_person_is_not_found() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/persons/99/workingtimes")
        .insert_header(ctx.bearer(OFFICE_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
