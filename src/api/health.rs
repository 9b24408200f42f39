use actix_web::{HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::database::{UserStore, UserStoreData};

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
    pub timestamp: i64,
}

/// Always `200`; a failed store ping only degrades the reported status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(store: UserStoreData) -> impl Responder {
    let (status, database) = match store.ping().await {
        Ok(()) => ("healthy", "up"),
        Err(e) => {
            log::warn!("⚠️ Health check: database ping failed: {}", e);
            ("degraded", "down")
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{memory::InMemoryUserStore, UnavailableUserStore};
    use actix_web::{http::StatusCode, test, web, App};
    use std::sync::Arc;

    async fn check(store: Arc<dyn UserStore>) -> HealthResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store))
                .route("/health", web::get().to(health_check)),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        test::read_body_json(resp).await
    }

    #[actix_web::test]
    async fn test_healthy_when_store_answers() {
        let health = check(Arc::new(InMemoryUserStore::default())).await;
        assert_eq!(health.status, "healthy");
        assert_eq!(health.database, "up");
        assert_eq!(health.service, "user-service");
    }

    #[actix_web::test]
    async fn test_degraded_when_store_is_down() {
        let health = check(Arc::new(UnavailableUserStore::new("offline"))).await;
        assert_eq!(health.status, "degraded");
        assert_eq!(health.database, "down");
    }
}
