use actix_web::{post, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::{dto::GeneratePlanRequestDto, PlanRequest, PlanResult},
};

#[post("/generate-study-plan")]
pub async fn generate_study_plan(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<GeneratePlanRequestDto>,
) -> Result<HttpResponse, AppError> {
    let dto = request.into_inner();
    dto.validate()?;

    let request_id = get_request_id(&req).unwrap_or_default();
    let plan_request = PlanRequest::from(dto);

    let success = state
        .orchestrator
        .try_run(&plan_request)
        .await
        .inspect_err(|e| {
            log::error!(
                "[{}] Study plan generation failed at {}: {}",
                request_id,
                e.stage(),
                e
            )
        })?;

    Ok(HttpResponse::Ok().json(PlanResult::Success(success)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::Config,
        middleware::RequestIdMiddleware,
        test_utils::{fixtures::StubFactory, test_helpers::*},
    };
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    fn state(fail_search: bool) -> AppState {
        AppState::with_factory(
            Arc::new(Config::test_config()),
            Arc::new(StubFactory { fail_search }),
        )
    }

    fn body() -> Value {
        json!({
            "topic": "Rust ownership",
            "level": "beginner",
            "search_api_key": "search-key",
            "llm_api_key": "llm-key"
        })
    }

    #[actix_web::test]
    async fn test_generate_study_plan_success() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(false)))
                .wrap(RequestIdMiddleware)
                .service(generate_study_plan),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate-study-plan")
            .set_json(body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_success_status(resp.status());

        let value: Value = test::read_body_json(resp).await;
        let links = value["StudyPlan"]["Chapter 1: Basics"]["ownership"]
            .as_array()
            .unwrap();
        assert_eq!(links.len(), 3);
        assert!(links.iter().all(|l| l.as_str().unwrap().starts_with("https://")));
        assert!(value["Quiz"].as_str().unwrap().contains("Answer key"));
    }

    #[actix_web::test]
    async fn test_generate_study_plan_upstream_failure_is_server_error() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(true)))
                .service(generate_study_plan),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate-study-plan")
            .set_json(body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let value: Value = test::read_body_json(resp).await;
        assert_eq!(value["status"], "failed");
        assert_eq!(value["retryable"], true);
        assert!(value["error"].as_str().unwrap().contains("connection refused"));
        assert!(value.get("StudyPlan").is_none());
    }

    #[actix_web::test]
    async fn test_generate_study_plan_rejects_missing_key() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(false)))
                .service(generate_study_plan),
        )
        .await;

        let mut payload = body();
        payload["llm_api_key"] = json!("");
        let req = test::TestRequest::post()
            .uri("/generate-study-plan")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_error_status(resp.status());
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
