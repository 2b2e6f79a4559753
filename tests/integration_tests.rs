// Integration tests for Plan Match

use actix_web::{test, web, App};
use plan_match::core::Matcher;
use plan_match::models::{ErrorResponse, ExplanationSource, PlanType, PlansResponse, Priority, RecommendResponse, UserProfile};
use plan_match::routes::{self, AppState};
use plan_match::services::{Catalog, CatalogQuery, Recommender, TextGenConfig, TextGenExplainer};
use std::sync::Arc;
use std::time::Duration;

fn health_profile() -> UserProfile {
    let mut profile = UserProfile::for_type(PlanType::Health);
    profile.coverage_level = 50.0;
    profile.budget = Some(800.0);
    profile.age = Some(35);
    profile.priorities = vec![Priority::Price];
    profile
}

fn text_gen_explainer(endpoint: String) -> TextGenExplainer {
    TextGenExplainer::new(TextGenConfig {
        endpoint,
        api_key: "test-key".to_string(),
        model: "test-model".to_string(),
        max_tokens: 512,
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn messages_body(text: &str) -> String {
    serde_json::json!({
        "content": [{ "type": "text", "text": text }],
        "usage": { "input_tokens": 10, "output_tokens": 20 }
    })
    .to_string()
}

#[::core::prelude::v1::test]
fn test_seed_health_scenario() {
    let catalog = Catalog::seed();
    let plans = catalog.query(&CatalogQuery::for_type(PlanType::Health));

    let result = Matcher::with_default_weights().match_plans(&plans, &health_profile());

    assert_eq!(result.matches.len(), 3);

    let by_price = |price: f64| {
        result
            .matches
            .iter()
            .find(|m| m.plan.price == price)
            .expect("plan present")
    };
    assert!(by_price(800.0).match_details.price_score >= by_price(1200.0).match_details.price_score);

    let scores: Vec<u8> = result.matches.iter().map(|m| m.match_score).collect();
    assert_eq!(scores, vec![63, 61, 21]);

    let ids: Vec<&str> = result.matches.iter().map(|m| m.plan.id.as_str()).collect();
    assert_eq!(ids, vec!["health-basic", "health-standard", "health-premium"]);
}

#[::core::prelude::v1::test]
fn test_matching_is_deterministic() {
    let catalog = Catalog::seed();
    let matcher = Matcher::with_default_weights();
    let profile = health_profile();

    let first = matcher.match_plans(catalog.plans(), &profile);
    let second = matcher.match_plans(catalog.plans(), &profile);

    assert_eq!(
        serde_json::to_string(&first.matches).unwrap(),
        serde_json::to_string(&second.matches).unwrap()
    );
}

#[::core::prelude::v1::test]
fn test_results_sorted_and_bounded_for_every_type() {
    let catalog = Catalog::seed();
    let matcher = Matcher::with_default_weights();

    for plan_type in ["health", "life", "auto", "home"] {
        let mut profile = UserProfile::for_type(PlanType::from(plan_type));
        profile.age = Some(58);
        profile.priorities = vec![Priority::Coverage, Priority::Reputation];

        let plans = catalog.query(&CatalogQuery::for_type(profile.plan_type.clone()));
        let result = matcher.match_plans(&plans, &profile);

        assert!(result.matches.len() <= 3);
        for pair in result.matches.windows(2) {
            assert!(pair[0].match_score >= pair[1].match_score);
        }
        for m in &result.matches {
            assert!(m.match_score <= 100);
            assert!((m.match_details.weights.sum() - 1.0).abs() < 1e-9);
        }
    }
}

#[tokio::test]
async fn test_generated_explanations_replace_templates() {
    let mut server = mockito::Server::new_async().await;
    let generated = serde_json::json!({
        "explanations": {
            "health-basic": "Basic fits your budget.",
            "health-standard": "Standard balances cost and coverage.",
            "health-premium": "Premium has the richest benefits."
        }
    })
    .to_string();
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(messages_body(&format!("```json\n{}\n```", generated)))
        .expect(1)
        .create_async()
        .await;

    let explainer = text_gen_explainer(format!("{}/v1/messages", server.url()));
    let recommender = Recommender::new(Catalog::seed(), Matcher::default(), Arc::new(explainer));
    let baseline = Recommender::with_template_explanations(Catalog::seed(), Matcher::default());

    let result = recommender.recommend(&health_profile()).await.unwrap();
    let expected = baseline.recommend(&health_profile()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.explanation_source, ExplanationSource::Generated);
    assert_eq!(result.recommendations[0].explanation, "Basic fits your budget.");
    for (got, want) in result.recommendations.iter().zip(&expected.recommendations) {
        assert_eq!(got.plan.id, want.plan.id);
        assert_eq!(got.match_score, want.match_score);
        assert_eq!(got.match_details, want.match_details);
    }
}

#[tokio::test]
async fn test_collaborator_error_falls_back_to_templates() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(500)
        .with_body("upstream exploded")
        .expect(1)
        .create_async()
        .await;

    let explainer = text_gen_explainer(format!("{}/v1/messages", server.url()));
    let recommender = Recommender::new(Catalog::seed(), Matcher::default(), Arc::new(explainer));
    let baseline = Recommender::with_template_explanations(Catalog::seed(), Matcher::default());

    let result = recommender.recommend(&health_profile()).await.unwrap();
    let expected = baseline.recommend(&health_profile()).await.unwrap();

    // Single attempt, no retries
    mock.assert_async().await;
    assert_eq!(result, expected);
}

#[tokio::test]
async fn test_malformed_collaborator_body_falls_back() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(messages_body("Sorry, I can't produce JSON today."))
        .create_async()
        .await;

    let explainer = text_gen_explainer(format!("{}/v1/messages", server.url()));
    let recommender = Recommender::new(Catalog::seed(), Matcher::default(), Arc::new(explainer));

    let result = recommender.recommend(&health_profile()).await.unwrap();

    assert_eq!(result.explanation_source, ExplanationSource::Template);
    assert!(result.recommendations[0].explanation.contains("Essential Health from Aetna"));
}

#[tokio::test]
async fn test_unreachable_collaborator_falls_back() {
    // Nothing listens on port 9 locally
    let explainer = text_gen_explainer("http://127.0.0.1:9/v1/messages".to_string());
    let recommender = Recommender::new(Catalog::seed(), Matcher::default(), Arc::new(explainer));

    let result = recommender.recommend(&health_profile()).await.unwrap();

    assert_eq!(result.explanation_source, ExplanationSource::Template);
    assert_eq!(result.recommendations.len(), 3);
}

fn app_state() -> AppState {
    AppState {
        recommender: Recommender::with_template_explanations(Catalog::seed(), Matcher::default()),
    }
}

#[actix_web::test]
async fn test_recommendations_endpoint() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations")
        .set_json(serde_json::json!({
            "type": "health",
            "coverageLevel": 50,
            "budget": 800,
            "age": 35,
            "priorities": ["price"]
        }))
        .to_request();
    let resp: RecommendResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.recommendations.len(), 3);
    assert_eq!(resp.total_candidates, 3);
    assert_eq!(resp.explanation_source, ExplanationSource::Template);
    assert_eq!(resp.recommendations[0].match_score, 63);
}

#[actix_web::test]
async fn test_missing_type_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations")
        .set_json(serde_json::json!({ "budget": 500 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "type_required");
    assert_eq!(body.message, "type required");
}

#[actix_web::test]
async fn test_plans_endpoint_filters() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/plans?type=auto&maxPrice=150")
        .to_request();
    let resp: PlansResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.total, 2);
    assert!(resp.plans.iter().all(|p| p.plan_type == PlanType::Auto && p.price <= 150.0));
}

#[actix_web::test]
async fn test_malformed_json_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations")
        .insert_header(actix_web::http::header::ContentType::json())
        .set_payload(r#"{"type": "health", "budget": "#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_json");
    assert_eq!(body.status_code, 400);
}

#[actix_web::test]
async fn test_unparsable_query_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/plans?maxPrice=cheap")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_query");
}
