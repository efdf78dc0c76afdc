use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAuthPayload {
    pub sub: i32,
    pub email: String,
    pub exp: usize,
    pub iat: usize,
}

impl UserAuthPayload {
    pub fn new(user_id: i32, email: String, duration: usize) -> Self {
        let now = Utc::now()
            .timestamp()
            .try_into()
            .expect("Failed to convert an unix timestamp integer type");

        Self {
            sub: user_id,
            email,
            exp: now + duration,
            iat: now,
        }
    }
}
