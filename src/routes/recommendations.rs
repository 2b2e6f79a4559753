use actix_web::{web, HttpResponse, Responder};
use validator::{Validate, ValidationErrors};
use crate::models::{ErrorResponse, HealthResponse, ListPlansRequest, PlanType, PlansResponse, RecommendRequest, RecommendResponse};
use crate::services::{CatalogQuery, RecommendError, Recommender};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
}

/// Configure all recommendation-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/plans", web::get().to(list_plans))
        .route("/recommendations", web::post().to(recommend));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let catalog_size = state.recommender.catalog().len();
    let status = if catalog_size > 0 { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_size,
        timestamp: chrono::Utc::now(),
    })
}

fn is_type_error(errors: &ValidationErrors) -> bool {
    let fields = errors.field_errors();
    fields.contains_key("plan_type") || fields.contains_key("type")
}

fn type_required() -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "type_required".to_string(),
        message: "type required".to_string(),
        status_code: 400,
    })
}

/// List catalog plans
///
/// GET /api/v1/plans?type=health&minPrice=100&maxPrice=900&provider=Aetna
async fn list_plans(
    state: web::Data<AppState>,
    query: web::Query<ListPlansRequest>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let query = query.into_inner();
    let catalog_query = CatalogQuery {
        plan_type: query.plan_type.as_deref().map(PlanType::from).filter(|t| !t.is_blank()),
        min_price: query.min_price,
        max_price: query.max_price,
        provider: query.provider,
    };

    let plans = state.recommender.catalog().query(&catalog_query);
    let total = plans.len();

    HttpResponse::Ok().json(PlansResponse { plans, total })
}

/// Recommendations endpoint
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// {
///   "type": "health",
///   "coverageLevel": 50,
///   "budget": 800,
///   "age": 35,
///   "priorities": ["price"]
/// }
/// ```
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommendation request: {}", errors);
        if is_type_error(&errors) {
            return type_required();
        }
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let profile = req.into_inner().into_profile();

    match state.recommender.recommend(&profile).await {
        Ok(result) => HttpResponse::Ok().json(RecommendResponse {
            request_id: uuid::Uuid::new_v4().to_string(),
            recommendations: result.recommendations,
            total_candidates: result.total_candidates,
            explanation_source: result.explanation_source,
            generated_at: chrono::Utc::now(),
        }),
        Err(RecommendError::TypeRequired) => type_required(),
    }
}
