use super::{
    models::{User, UserCreateData, UserUpdateData},
    repository::UserRepository,
};
use crate::{
    errors::ApiError,
    http::{ApiResponder, DataResponse},
};
use serde::{Deserialize, Serialize};
use tokio::task::spawn_blocking;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserIdPathParams {
    pub user_id: i32,
}

#[derive(Debug, Serialize)]
pub struct UserCreatedBody {
    pub user_id: i32,
}

impl ApiResponder for UserCreatedBody {
    fn unit() -> &'static str {
        "created user id"
    }
    fn article() -> &'static str {
        "A"
    }
}

#[derive(Debug, Serialize)]
pub struct UserMutatedBody {
    pub success: bool,
}

impl ApiResponder for UserMutatedBody {
    fn unit() -> &'static str {
        "mutation confirmation"
    }
    fn article() -> &'static str {
        "A"
    }
}

async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    spawn_blocking(move || {
        bcrypt::hash(password, cost).map_err(|e| {
            tracing::error!(error = e.to_string(), "Failed to hash password");
            ApiError::PasswordHashFailed
        })
    })
    .await
    .map_err(|e| {
        tracing::error!(error = e.to_string(), "Failed to spawn blocking");
        ApiError::PasswordHashFailed
    })?
}

pub struct UserHandlers<U: UserRepository> {
    user_repo: U,
    bcrypt_cost: u32,
}

impl<U: UserRepository> UserHandlers<U> {
    pub fn new(user_repo: U, bcrypt_cost: u32) -> Self {
        Self {
            user_repo,
            bcrypt_cost,
        }
    }

    pub async fn handle_get_all(&self) -> Result<DataResponse<Vec<User>>, ApiError> {
        let users = self.user_repo.get_all().await?;

        Ok(users.into())
    }

    pub async fn handle_get_one(
        &self,
        path: UserIdPathParams,
    ) -> Result<DataResponse<User>, ApiError> {
        let user = self.user_repo.get_by_id(path.user_id).await?;

        Ok(user.into())
    }

    pub async fn handle_create(
        &self,
        mut body: UserCreateData,
    ) -> Result<DataResponse<UserCreatedBody>, ApiError> {
        body.password = hash_password(body.password, self.bcrypt_cost).await?;

        let user_id = self.user_repo.create(body).await?;

        Ok(UserCreatedBody { user_id }.into())
    }

    pub async fn handle_update(
        &self,
        path: UserIdPathParams,
        mut body: UserUpdateData,
    ) -> Result<DataResponse<UserMutatedBody>, ApiError> {
        // Re-hash on password change so the login path keeps working.
        if let Some(password) = body.password.take() {
            body.password = Some(hash_password(password, self.bcrypt_cost).await?);
        }

        self.user_repo.update(path.user_id, body).await?;

        Ok(UserMutatedBody { success: true }.into())
    }

    pub async fn handle_delete(
        &self,
        path: UserIdPathParams,
    ) -> Result<DataResponse<UserMutatedBody>, ApiError> {
        self.user_repo.delete(path.user_id).await?;

        Ok(UserMutatedBody { success: true }.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::user::{memory_repository::InMemoryUserRepository, models::UserRole};

    const TEST_BCRYPT_COST: u32 = 4;

    fn handlers() -> UserHandlers<InMemoryUserRepository> {
        UserHandlers::new(InMemoryUserRepository::new(), TEST_BCRYPT_COST)
    }

    fn carol() -> UserCreateData {
        UserCreateData {
            user_name: "carol".to_string(),
            email: "c@x.com".to_string(),
            password: "hunter2".to_string(),
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let handlers = handlers();

        let res = handlers.handle_create(carol()).await.unwrap();
        let user_id = res.data.user_id;
        assert!(user_id > 0);

        let stored = handlers
            .user_repo
            .get_by_login("c@x.com".to_string())
            .await
            .unwrap();

        assert_ne!(stored.password, "hunter2");
        assert!(bcrypt::verify("hunter2", &stored.password).unwrap());
    }

    #[tokio::test]
    async fn test_update_rehashes_password() {
        let handlers = handlers();
        let user_id = handlers.handle_create(carol()).await.unwrap().data.user_id;

        handlers
            .handle_update(
                UserIdPathParams { user_id },
                UserUpdateData {
                    password: Some("correct horse".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = handlers
            .user_repo
            .get_by_login("c@x.com".to_string())
            .await
            .unwrap();

        assert!(bcrypt::verify("correct horse", &stored.password).unwrap());
    }

    #[tokio::test]
    async fn test_get_all_on_empty_table() {
        let handlers = handlers();

        let err = handlers.handle_get_all().await.err().unwrap();
        assert!(matches!(err, ApiError::UserNotFound));
    }

    #[tokio::test]
    async fn test_delete_confirmation() {
        let handlers = handlers();
        let user_id = handlers.handle_create(carol()).await.unwrap().data.user_id;

        let res = handlers
            .handle_delete(UserIdPathParams { user_id })
            .await
            .unwrap();
        assert!(res.data.success);

        let err = handlers
            .handle_get_one(UserIdPathParams { user_id })
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::UserNotFound));
    }
}
