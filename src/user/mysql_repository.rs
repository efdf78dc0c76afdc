use super::{
    models::{User, UserCreateData, UserUpdateData},
    repository::UserRepository,
};
use crate::errors::ApiError;
use async_trait::async_trait;
use sqlx::{
    mysql::{MySql, MySqlRow},
    Pool, QueryBuilder, Row,
};

fn map_user(row: &MySqlRow) -> Result<User, sqlx::Error> {
    let role: String = row.try_get("role")?;
    let role = role.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: "role".to_string(),
        source: Box::new(e),
    })?;

    Ok(User {
        user_id: row.try_get("user_id")?,
        user_name: row.try_get("user_name")?,
        email: row.try_get("email")?,
        role,
        // only the login select fetches the password column
        password: row.try_get("password").unwrap_or_default(),
    })
}

#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: Pool<MySql>,
}

impl MySqlUserRepository {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn get_all(&self) -> Result<Vec<User>, ApiError> {
        let rows = sqlx::query("SELECT `user_id`, `user_name`, `email`, `role` FROM `user`")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = e.to_string(),
                    method = "get_all",
                    "MySqlUserRepository sqlx error"
                );

                ApiError::DatabaseError
            })?;

        if rows.is_empty() {
            return Err(ApiError::UserNotFound);
        }

        rows.iter()
            .map(|row| {
                map_user(row).map_err(|e| {
                    tracing::error!(
                        error = e.to_string(),
                        method = "get_all",
                        "MySqlUserRepository row decode error"
                    );

                    ApiError::DatabaseError
                })
            })
            .collect()
    }

    async fn get_by_id(&self, id: i32) -> Result<User, ApiError> {
        let res = sqlx::query(
            "SELECT `user_id`, `user_name`, `email`, `role` FROM `user` WHERE `user_id` = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(row) => map_user(&row).map_err(|e| {
                tracing::error!(
                    error = e.to_string(),
                    method = "get_by_id",
                    "MySqlUserRepository row decode error"
                );

                ApiError::DatabaseError
            }),
            Err(e) => {
                if matches!(e, sqlx::Error::RowNotFound) {
                    Err(ApiError::UserNotFound)
                } else {
                    tracing::error!(
                        error = e.to_string(),
                        method = "get_by_id",
                        "MySqlUserRepository sqlx error"
                    );

                    Err(ApiError::DatabaseError)
                }
            }
        }
    }

    async fn get_by_login(&self, email: String) -> Result<User, ApiError> {
        let res = sqlx::query("SELECT * FROM `user` WHERE `email` = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await;

        match res {
            Ok(row) => map_user(&row).map_err(|e| {
                tracing::error!(
                    error = e.to_string(),
                    method = "get_by_login",
                    "MySqlUserRepository row decode error"
                );

                ApiError::DatabaseError
            }),
            Err(e) => {
                if matches!(e, sqlx::Error::RowNotFound) {
                    Err(ApiError::InvalidCredentials)
                } else {
                    tracing::error!(
                        error = e.to_string(),
                        method = "get_by_login",
                        "MySqlUserRepository sqlx error"
                    );

                    Err(ApiError::DatabaseError)
                }
            }
        }
    }

    async fn create(&self, data: UserCreateData) -> Result<i32, ApiError> {
        let res = sqlx::query(
            "INSERT INTO `user` (`user_name`, `email`, `password`, `role`)
            VALUES (?, ?, ?, ?)",
        )
        .bind(data.user_name)
        .bind(data.email)
        .bind(data.password)
        .bind(data.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                error = e.to_string(),
                method = "create",
                "MySqlUserRepository sqlx error"
            );

            ApiError::DatabaseError
        })?;

        if res.rows_affected() == 0 {
            return Err(ApiError::UserNotCreated);
        }

        tracing::debug!(
            rows_affected = res.rows_affected(),
            last_insert_id = res.last_insert_id(),
            "user insert result"
        );

        Ok(res.last_insert_id() as i32)
    }

    async fn update(&self, id: i32, data: UserUpdateData) -> Result<(), ApiError> {
        // An empty SET clause is not valid SQL; treat it like a write that
        // touched nothing.
        if data.is_empty() {
            return Err(ApiError::UserNotUpdated);
        }

        let mut query = QueryBuilder::<MySql>::new("UPDATE `user` SET ");

        {
            let mut set = query.separated(", ");
            if let Some(user_name) = data.user_name {
                set.push("`user_name` = ").push_bind_unseparated(user_name);
            }
            if let Some(email) = data.email {
                set.push("`email` = ").push_bind_unseparated(email);
            }
            if let Some(password) = data.password {
                set.push("`password` = ").push_bind_unseparated(password);
            }
            if let Some(role) = data.role {
                set.push("`role` = ").push_bind_unseparated(role.as_str());
            }
        }

        query.push(" WHERE `user_id` = ").push_bind(id);

        let res = query.build().execute(&self.pool).await.map_err(|e| {
            tracing::error!(
                error = e.to_string(),
                method = "update",
                "MySqlUserRepository sqlx error"
            );

            ApiError::DatabaseError
        })?;

        if res.rows_affected() == 0 {
            Err(ApiError::UserNotUpdated)
        } else {
            Ok(())
        }
    }

    async fn delete(&self, id: i32) -> Result<(), ApiError> {
        let res = sqlx::query("DELETE FROM `user` WHERE `user_id` = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = e.to_string(),
                    method = "delete",
                    "MySqlUserRepository sqlx error"
                );

                ApiError::DatabaseError
            })?;

        if res.rows_affected() == 0 {
            Err(ApiError::UserNotDeleted)
        } else {
            Ok(())
        }
    }
}
