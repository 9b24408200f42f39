use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use crate::{
    database::UserStoreData,
    models::{MessageResponse, UserFields, UserResponse},
    services::user_service,
    utils::AppError,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("/", web::get().to(list_users))
            .route("/create", web::post().to(create_user))
            .route("/update/{id}", web::patch().to(update_user))
            .route("/delete/{id}", web::delete().to(delete_user)),
    );
}

#[utoipa::path(
    get,
    path = "/users/",
    tag = "Users",
    responses(
        (status = 200, description = "The list of all the users", body = [UserResponse]),
        (status = 500, description = "Database error")
    )
)]
pub async fn list_users(store: UserStoreData) -> Result<HttpResponse, AppError> {
    log::info!("👥 GET /users - Listing all users");

    match user_service::list_users(store.get_ref()).await {
        Ok(users) => {
            log::info!("✅ Users retrieved: {}", users.len());
            Ok(HttpResponse::Ok().json(users))
        }
        Err(e) => {
            log::error!("❌ Failed to list users: {}", e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/users/create",
    tag = "Users",
    request_body = UserFields,
    responses(
        (status = 200, description = "The user was successfully registered", body = MessageResponse),
        (status = 400, description = "Body is not a coercible user object"),
        (status = 500, description = "Database error")
    )
)]
pub async fn create_user(
    store: UserStoreData,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /users/create");

    let fields = UserFields::from_request(req.content_type(), &body)?;

    match user_service::create_user(store.get_ref(), &fields).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => {
            log::error!("❌ Failed to create user: {}", e);
            Err(e)
        }
    }
}

/// Responds `200` even when no user has the given id.
#[utoipa::path(
    patch,
    path = "/users/update/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "The user id")
    ),
    request_body = UserFields,
    responses(
        (status = 200, description = "The user details have been updated", body = MessageResponse),
        (status = 400, description = "Malformed id or body"),
        (status = 500, description = "Database error")
    )
)]
pub async fn update_user(
    store: UserStoreData,
    path: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    log::info!("🔧 PATCH /users/update/{}", user_id);

    let fields = UserFields::from_request(req.content_type(), &body)?;

    match user_service::update_user(store.get_ref(), &user_id, &fields).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => {
            log::error!("❌ Failed to update user {}: {}", user_id, e);
            Err(e)
        }
    }
}

/// Responds `200` even when no user has the given id.
#[utoipa::path(
    delete,
    path = "/users/delete/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "The user id")
    ),
    responses(
        (status = 200, description = "The user was deleted", body = MessageResponse),
        (status = 400, description = "Malformed id"),
        (status = 500, description = "Database error")
    )
)]
pub async fn delete_user(
    store: UserStoreData,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    log::info!("🗑️  DELETE /users/delete/{}", user_id);

    match user_service::delete_user(store.get_ref(), &user_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => {
            log::error!("❌ Failed to delete user {}: {}", user_id, e);
            Err(e)
        }
    }
}
