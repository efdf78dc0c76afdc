use crate::{
    auth::handlers::{AuthHandlers, LoginRequestBody, LoginResponseBody},
    errors::ApiError,
    http::{AppData, DataResponse, Json},
    user::{
        handlers::{UserCreatedBody, UserHandlers, UserIdPathParams, UserMutatedBody},
        models::{User, UserCreateData, UserUpdateData},
        repository::UserRepository,
    },
};
use axum::extract::Path;

pub async fn get_users<U>(
    AppData(data): AppData<UserHandlers<U>>,
) -> Result<DataResponse<Vec<User>>, ApiError>
where
    U: UserRepository + 'static,
{
    data.handle_get_all().await
}

pub async fn get_user_id<U>(
    AppData(data): AppData<UserHandlers<U>>,
    Path(path): Path<UserIdPathParams>,
) -> Result<DataResponse<User>, ApiError>
where
    U: UserRepository + 'static,
{
    data.handle_get_one(path).await
}

pub async fn post_user<U>(
    AppData(data): AppData<UserHandlers<U>>,
    Json(body): Json<UserCreateData>,
) -> Result<DataResponse<UserCreatedBody>, ApiError>
where
    U: UserRepository + 'static,
{
    data.handle_create(body).await
}

pub async fn put_user_id<U>(
    AppData(data): AppData<UserHandlers<U>>,
    Path(path): Path<UserIdPathParams>,
    Json(body): Json<UserUpdateData>,
) -> Result<DataResponse<UserMutatedBody>, ApiError>
where
    U: UserRepository + 'static,
{
    data.handle_update(path, body).await
}

pub async fn delete_user_id<U>(
    AppData(data): AppData<UserHandlers<U>>,
    Path(path): Path<UserIdPathParams>,
) -> Result<DataResponse<UserMutatedBody>, ApiError>
where
    U: UserRepository + 'static,
{
    data.handle_delete(path).await
}

pub async fn post_auth_login<U>(
    AppData(data): AppData<AuthHandlers<U>>,
    Json(body): Json<LoginRequestBody>,
) -> Result<DataResponse<LoginResponseBody>, ApiError>
where
    U: UserRepository + 'static,
{
    data.handle_login(body).await
}
