use actix_web::{test, web, App};
use serde_json::json;

use sgpa_planner::api;
use sgpa_planner::config::CurriculumConfig;

macro_rules! planner_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(CurriculumConfig::default_table()))
                .configure(api::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn health_endpoint_responds() {
    let app = planner_app!();
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn config_endpoint_returns_the_curriculum() {
    let app = planner_app!();
    let req = test::TestRequest::get().uri("/config").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["subjects"].as_array().unwrap().len(), 5);
}

#[actix_web::test]
async fn required_endpoint_computes_the_allocation() {
    let app = planner_app!();
    let req = test::TestRequest::post()
        .uri("/required")
        .set_json(json!({ "target": 8.0 }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let cn_m1 = body["required"]["CN"]["M1"].as_f64().unwrap();
    assert!((cn_m1 - 19.2).abs() < 1e-9);
}

#[actix_web::test]
async fn plan_endpoint_overwrites_completed_marks_and_reports_feasibility() {
    let app = planner_app!();
    let req = test::TestRequest::post()
        .uri("/plan")
        .set_json(json!({
            "target": 8.0,
            "current_marks": { "CN": { "M1": 40.0 } },
            "completed": { "CN": ["M1"] }
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["adjusted"]["CN"]["M1"].as_f64().unwrap(), 40.0);
    assert!(body["feasible"].as_bool().unwrap());
    assert!(body["warnings"].as_array().unwrap().is_empty());
    assert!(body["summary"]["projected_sgpa"].as_f64().is_some());
    assert!(body["generated_at"].as_str().is_some());
}

#[actix_web::test]
async fn plan_endpoint_surfaces_range_warnings() {
    let app = planner_app!();
    let req = test::TestRequest::post()
        .uri("/plan")
        .set_json(json!({
            "target": 12.0,
            "current_marks": { "CN": { "M1": 55.0 } },
            "completed": {}
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["warnings"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn unknown_subject_is_unprocessable() {
    let app = planner_app!();
    let req = test::TestRequest::post()
        .uri("/plan")
        .set_json(json!({
            "target": 8.0,
            "current_marks": { "Astronomy": { "M1": 10.0 } }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 422);
}

#[actix_web::test]
async fn gradesheet_endpoint_returns_plain_text() {
    let app = planner_app!();
    let req = test::TestRequest::post()
        .uri("/gradesheet")
        .set_json(json!({
            "target": 8.0,
            "current_marks": { "CN": { "M1": 40.0 } },
            "completed": { "CN": ["M1"] }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with("Gradesheet"));
    assert!(text.contains("Target SGPA: 8.00"));
    assert!(text.contains("M1 marks: 40 | Required: 40.00"));
}
