// ==================== USERS ====================
// Each operation is exactly one store call. Update and delete report success
// whether or not the id matched a document; misses are only logged.

use crate::{
    database::UserStore,
    models::{MessageResponse, UserFields, UserResponse},
    utils::AppError,
};
use mongodb::bson::oid::ObjectId;

pub const USER_CREATED: &str = "New User has been created";
pub const USER_UPDATED: &str = "User details have been updated";
pub const USER_DELETED: &str = "User has been deleted";

/// Ids must be 24-character hex ObjectIds.
pub fn parse_user_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::InvalidRequest(format!("'{}' is not a valid user id", raw)))
}

pub async fn list_users(store: &dyn UserStore) -> Result<Vec<UserResponse>, AppError> {
    let users = store.find_all().await?;
    Ok(users.into_iter().map(UserResponse::from).collect())
}

pub async fn create_user(
    store: &dyn UserStore,
    fields: &UserFields,
) -> Result<MessageResponse, AppError> {
    let id = store.insert(fields).await?;
    log::info!("✅ User created: {}", id);

    Ok(MessageResponse::new(USER_CREATED))
}

pub async fn update_user(
    store: &dyn UserStore,
    user_id: &str,
    fields: &UserFields,
) -> Result<MessageResponse, AppError> {
    let id = parse_user_id(user_id)?;

    if store.update_by_id(id, fields).await? {
        log::info!("✅ User updated: {}", id);
    } else {
        log::warn!("⚠️ No user matched {} on update", id);
    }

    Ok(MessageResponse::new(USER_UPDATED))
}

pub async fn delete_user(store: &dyn UserStore, user_id: &str) -> Result<MessageResponse, AppError> {
    let id = parse_user_id(user_id)?;

    if store.delete_by_id(id).await? {
        log::info!("✅ User deleted: {}", id);
    } else {
        log::warn!("⚠️ No user matched {} on delete", id);
    }

    Ok(MessageResponse::new(USER_DELETED))
}
