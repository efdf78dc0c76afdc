use super::{
    models::{User, UserCreateData, UserUpdateData},
    repository::UserRepository,
};
use crate::errors::ApiError;
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

#[derive(Default)]
struct Table {
    last_id: i32,
    rows: HashMap<i32, User>,
}

/// Hash-map backed stand-in for the MySQL repository, mirroring its
/// error contract (misses on write paths report the zero-affected-row
/// errors, not not-found).
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    table: Arc<Mutex<Table>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_all(&self) -> Result<Vec<User>, ApiError> {
        let lock = self.table.lock().await;

        if lock.rows.is_empty() {
            return Err(ApiError::UserNotFound);
        }

        let mut users: Vec<User> = lock.rows.values().cloned().collect();
        drop(lock);

        users.sort_by_key(|u| u.user_id);
        for user in &mut users {
            user.password = String::new();
        }

        Ok(users)
    }

    async fn get_by_id(&self, id: i32) -> Result<User, ApiError> {
        let lock = self.table.lock().await;

        match lock.rows.get(&id) {
            Some(user) => {
                let mut user = user.clone();
                user.password = String::new();
                Ok(user)
            }
            None => Err(ApiError::UserNotFound),
        }
    }

    async fn get_by_login(&self, email: String) -> Result<User, ApiError> {
        let lock = self.table.lock().await;

        let mut users: Vec<&User> = lock.rows.values().collect();
        users.sort_by_key(|u| u.user_id);

        users
            .into_iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(ApiError::InvalidCredentials)
    }

    async fn create(&self, data: UserCreateData) -> Result<i32, ApiError> {
        let mut lock = self.table.lock().await;

        lock.last_id += 1;
        let id = lock.last_id;

        let user = User {
            user_id: id,
            user_name: data.user_name,
            email: data.email,
            role: data.role,
            password: data.password,
        };

        lock.rows.insert(id, user);
        drop(lock);

        tracing::debug!(last_insert_id = id, "user insert result");

        Ok(id)
    }

    async fn update(&self, id: i32, data: UserUpdateData) -> Result<(), ApiError> {
        if data.is_empty() {
            return Err(ApiError::UserNotUpdated);
        }

        let mut lock = self.table.lock().await;

        let user = match lock.rows.get_mut(&id) {
            Some(u) => u,
            None => return Err(ApiError::UserNotUpdated),
        };

        if let Some(user_name) = data.user_name {
            user.user_name = user_name;
        }
        if let Some(email) = data.email {
            user.email = email;
        }
        if let Some(password) = data.password {
            user.password = password;
        }
        if let Some(role) = data.role {
            user.role = role;
        }

        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), ApiError> {
        let mut lock = self.table.lock().await;

        if lock.rows.remove(&id).is_none() {
            return Err(ApiError::UserNotDeleted);
        }
        drop(lock);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::user::models::UserRole;

    fn alice() -> UserCreateData {
        UserCreateData {
            user_name: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "h1".to_string(),
            role: UserRole::User,
        }
    }

    fn bob() -> UserCreateData {
        UserCreateData {
            user_name: "bob".to_string(),
            email: "b@x.com".to_string(),
            password: "h2".to_string(),
            role: UserRole::Admin,
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let repo = InMemoryUserRepository::new();

        let id = repo.create(alice()).await.unwrap();
        assert!(id > 0);

        let user = repo.get_by_id(id).await.unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.user_name, "alice");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.role, UserRole::User);
        assert!(user.password.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_id() {
        let repo = InMemoryUserRepository::new();
        repo.create(alice()).await.unwrap();

        let err = repo.get_by_id(999).await.err().unwrap();
        assert!(matches!(err, ApiError::UserNotFound));
    }

    #[tokio::test]
    async fn test_get_all_on_empty_table() {
        let repo = InMemoryUserRepository::new();

        let err = repo.get_all().await.err().unwrap();
        assert!(matches!(err, ApiError::UserNotFound));
    }

    #[tokio::test]
    async fn test_get_all_is_ordered_by_id() {
        let repo = InMemoryUserRepository::new();
        let first = repo.create(alice()).await.unwrap();
        let second = repo.create(bob()).await.unwrap();

        let users = repo.get_all().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].user_id, first);
        assert_eq!(users[1].user_id, second);
    }

    #[tokio::test]
    async fn test_partial_update_merges_fields() {
        let repo = InMemoryUserRepository::new();
        let id = repo.create(alice()).await.unwrap();

        repo.update(
            id,
            UserUpdateData {
                user_name: Some("alicia".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let user = repo.get_by_id(id).await.unwrap();
        assert_eq!(user.user_name, "alicia");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_update_missing_id() {
        let repo = InMemoryUserRepository::new();

        let err = repo
            .update(
                1,
                UserUpdateData {
                    user_name: Some("nobody".to_string()),
                    ..Default::default()
                },
            )
            .await
            .err()
            .unwrap();

        assert!(matches!(err, ApiError::UserNotUpdated));
    }

    #[tokio::test]
    async fn test_update_with_empty_payload() {
        let repo = InMemoryUserRepository::new();
        let id = repo.create(alice()).await.unwrap();

        let err = repo
            .update(id, UserUpdateData::default())
            .await
            .err()
            .unwrap();

        assert!(matches!(err, ApiError::UserNotUpdated));
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let repo = InMemoryUserRepository::new();
        let id = repo.create(alice()).await.unwrap();

        repo.delete(id).await.unwrap();

        let err = repo.get_by_id(id).await.err().unwrap();
        assert!(matches!(err, ApiError::UserNotFound));

        let err = repo.delete(id).await.err().unwrap();
        assert!(matches!(err, ApiError::UserNotDeleted));
    }

    #[tokio::test]
    async fn test_login_lookup() {
        let repo = InMemoryUserRepository::new();
        repo.create(alice()).await.unwrap();

        let user = repo.get_by_login("a@x.com".to_string()).await.unwrap();
        assert_eq!(user.user_name, "alice");
        assert_eq!(user.password, "h1");

        let err = repo
            .get_by_login("missing@x.com".to_string())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }
}
