use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Mutex;

use super::UserStore;
use crate::models::{UserDocument, UserFields};
use crate::utils::AppError;

/// In-process store for handler and service tests.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<UserDocument>>,
}

impl InMemoryUserStore {
    pub fn snapshot(&self) -> Vec<UserDocument> {
        self.users.lock().unwrap().clone()
    }
}

fn apply(user: &mut UserDocument, fields: &UserFields) {
    if let Some(name) = &fields.name { user.name = Some(name.clone()); }
    if let Some(email) = &fields.email { user.email = Some(email.clone()); }
    if let Some(age) = fields.age { user.age = Some(age); }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_all(&self) -> Result<Vec<UserDocument>, AppError> {
        Ok(self.snapshot())
    }

    async fn insert(&self, fields: &UserFields) -> Result<ObjectId, AppError> {
        let id = ObjectId::new();
        let mut user = UserDocument { id: id.to_hex(), name: None, email: None, age: None };
        apply(&mut user, fields);
        self.users.lock().unwrap().push(user);
        Ok(id)
    }

    async fn update_by_id(&self, id: ObjectId, fields: &UserFields) -> Result<bool, AppError> {
        let id = id.to_hex();
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                apply(user, fields);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, AppError> {
        let id = id.to_hex();
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
