use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Service API",
        version = "1.0.0",
        description = "CRUD over a single `users` collection.\n\nUpdate and delete answer `200` whether or not the id matched a user."
    ),
    paths(
        // Users
        crate::api::users::list_users,
        crate::api::users::create_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::UserResponse,
            crate::models::UserFields,
            crate::models::MessageResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "All the API routes related to User"),
        (name = "Health", description = "Health check and request counters."),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_every_user_route() {
        let doc = ApiDoc::openapi();

        for path in [
            "/users/",
            "/users/create",
            "/users/update/{id}",
            "/users/delete/{id}",
            "/health",
            "/metrics",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("UserResponse"));
        assert!(schemas.contains_key("UserFields"));
    }

    #[test]
    fn test_serializes_to_json() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("\"Users\""));
    }
}
