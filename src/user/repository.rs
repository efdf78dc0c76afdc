use super::models::{User, UserCreateData, UserUpdateData};
use crate::errors::ApiError;
use async_trait::async_trait;

/// Data access contract for the `user` table.
///
/// Empty result sets and zero-affected-row writes surface as [`ApiError`]
/// values rather than empty collections or `false` flags; callers relying on
/// "no users yet" being distinguishable from a miss should be aware of that.
#[async_trait]
pub trait UserRepository: Sync + Send {
    async fn get_all(&self) -> Result<Vec<User>, ApiError>;
    async fn get_by_id(&self, id: i32) -> Result<User, ApiError>;

    /// Lookup by email for the login path. Unlike the other selects this
    /// returns the password column, and a miss maps to
    /// [`ApiError::InvalidCredentials`] instead of not-found.
    async fn get_by_login(&self, email: String) -> Result<User, ApiError>;

    /// Inserts a row and returns the store-assigned id.
    async fn create(&self, data: UserCreateData) -> Result<i32, ApiError>;

    /// Applies the fields present in `data` in a single UPDATE statement.
    /// An empty payload fails like a zero-affected-row write.
    async fn update(&self, id: i32, data: UserUpdateData) -> Result<(), ApiError>;

    async fn delete(&self, id: i32) -> Result<(), ApiError>;
}
