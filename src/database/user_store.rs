use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};

use super::MongoDB;
use crate::models::{UserDocument, UserFields};
use crate::utils::AppError;

pub const USERS_COLLECTION: &str = "users";

/// Store handle injected into handlers.
pub type UserStoreData = actix_web::web::Data<dyn UserStore>;

/// Persistence primitives behind the `/users` resource.
///
/// `update_by_id` and `delete_by_id` are best-effort: a missing id is not an
/// error, the returned flag only reports whether a document matched.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<UserDocument>, AppError>;

    async fn insert(&self, fields: &UserFields) -> Result<ObjectId, AppError>;

    async fn update_by_id(&self, id: ObjectId, fields: &UserFields) -> Result<bool, AppError>;

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct MongoUserStore {
    db: MongoDB,
}

impl MongoUserStore {
    pub fn new(db: MongoDB) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_all(&self) -> Result<Vec<UserDocument>, AppError> {
        // Raw documents: the collection has no enforced schema
        let cursor = self
            .db
            .collection::<Document>(USERS_COLLECTION)
            .find(doc! {})
            .await?;

        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs.iter().map(UserDocument::from).collect())
    }

    async fn insert(&self, fields: &UserFields) -> Result<ObjectId, AppError> {
        let result = self
            .db
            .collection::<Document>(USERS_COLLECTION)
            .insert_one(fields.to_document())
            .await?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::DatabaseError("Inserted id is not an ObjectId".to_string()))
    }

    async fn update_by_id(&self, id: ObjectId, fields: &UserFields) -> Result<bool, AppError> {
        let collection = self.db.collection::<Document>(USERS_COLLECTION);

        // An empty $set is rejected by the server
        if fields.is_empty() {
            let count = collection.count_documents(doc! { "_id": id }).await?;
            return Ok(count > 0);
        }

        let result = collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields.to_document() })
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self
            .db
            .collection::<Document>(USERS_COLLECTION)
            .delete_one(doc! { "_id": id })
            .await?;

        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.db.ping().await
    }
}

/// Stand-in used when no client could be built at startup, so the server
/// still comes up and every store call fails with `503`.
pub struct UnavailableUserStore {
    reason: String,
}

impl UnavailableUserStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    fn unavailable(&self) -> AppError {
        AppError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl UserStore for UnavailableUserStore {
    async fn find_all(&self) -> Result<Vec<UserDocument>, AppError> {
        Err(self.unavailable())
    }

    async fn insert(&self, _fields: &UserFields) -> Result<ObjectId, AppError> {
        Err(self.unavailable())
    }

    async fn update_by_id(&self, _id: ObjectId, _fields: &UserFields) -> Result<bool, AppError> {
        Err(self.unavailable())
    }

    async fn delete_by_id(&self, _id: ObjectId) -> Result<bool, AppError> {
        Err(self.unavailable())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(self.unavailable())
    }
}
