use super::models::UserAuthPayload;
use crate::{
    errors::ApiError,
    http::{ApiResponder, DataResponse},
    user::{models::User, repository::UserRepository},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::task::spawn_blocking;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequestBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponseBody {
    pub token: String,
    pub user: User,
}

impl ApiResponder for LoginResponseBody {
    fn unit() -> &'static str {
        "login response payload"
    }
    fn article() -> &'static str {
        "A"
    }
}

pub struct AuthHandlers<U: UserRepository> {
    user_repo: U,
    algo: Algorithm,
    enc_key: EncodingKey,
    token_duration: usize,
}

impl<U: UserRepository> AuthHandlers<U> {
    pub fn new(user_repo: U, algo: Algorithm, enc_key: EncodingKey, token_duration: usize) -> Self {
        Self {
            user_repo,
            algo,
            enc_key,
            token_duration,
        }
    }

    pub async fn handle_login(
        &self,
        body: LoginRequestBody,
    ) -> Result<DataResponse<LoginResponseBody>, ApiError> {
        let user = self.user_repo.get_by_login(body.email).await?;

        let password_hash = user.password.clone();
        let candidate = body.password;

        // A malformed stored hash is reported the same way as a mismatch so
        // the response never reveals which part of the attempt failed.
        let matches = spawn_blocking(move || bcrypt::verify(candidate, &password_hash))
            .await
            .map_err(|e| {
                tracing::error!(error = e.to_string(), "Failed to spawn blocking");
                ApiError::PasswordHashFailed
            })?
            .map_err(|e| {
                tracing::error!(
                    user_id = user.user_id,
                    error = e.to_string(),
                    "Failed to verify password hash"
                );
                ApiError::InvalidCredentials
            })?;

        if !matches {
            return Err(ApiError::InvalidCredentials);
        }

        let claims = UserAuthPayload::new(user.user_id, user.email.clone(), self.token_duration);

        let token = jsonwebtoken::encode(&Header::new(self.algo), &claims, &self.enc_key)
            .or(Err(ApiError::TokenGenerationFailed))?;

        Ok(LoginResponseBody { token, user }.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::user::{
        memory_repository::InMemoryUserRepository,
        models::{UserCreateData, UserRole},
    };
    use jsonwebtoken::{DecodingKey, Validation};

    const RANDOM_BASE64_STRING: &str =
        "YYX3sUuIw9wbAQOL3XOUkOwWE5JCx32VLae5t0mo7Zpqx17PT9UFl58Yj3QQetBn";

    async fn handlers_with_user(
        email: &str,
        password: &str,
    ) -> AuthHandlers<InMemoryUserRepository> {
        let user_repo = InMemoryUserRepository::new();

        user_repo
            .create(UserCreateData {
                user_name: "dave".to_string(),
                email: email.to_string(),
                password: bcrypt::hash(password, 4).unwrap(),
                role: UserRole::User,
            })
            .await
            .unwrap();

        AuthHandlers::new(
            user_repo,
            Algorithm::HS512,
            EncodingKey::from_base64_secret(RANDOM_BASE64_STRING).unwrap(),
            3600,
        )
    }

    #[tokio::test]
    async fn test_login_returns_decodable_token() {
        let handlers = handlers_with_user("d@x.com", "secret").await;

        let res = handlers
            .handle_login(LoginRequestBody {
                email: "d@x.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        let dec_key = DecodingKey::from_base64_secret(RANDOM_BASE64_STRING).unwrap();
        let token = jsonwebtoken::decode::<UserAuthPayload>(
            &res.data.token,
            &dec_key,
            &Validation::new(Algorithm::HS512),
        )
        .unwrap();

        assert_eq!(token.claims.sub, res.data.user.user_id);
        assert_eq!(token.claims.email, "d@x.com");
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let handlers = handlers_with_user("d@x.com", "secret").await;

        let err = handlers
            .handle_login(LoginRequestBody {
                email: "d@x.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .err()
            .unwrap();

        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_with_unknown_email() {
        let handlers = handlers_with_user("d@x.com", "secret").await;

        let err = handlers
            .handle_login(LoginRequestBody {
                email: "nobody@x.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .err()
            .unwrap();

        assert!(matches!(err, ApiError::InvalidCredentials));
    }
}
