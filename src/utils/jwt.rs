//! 身份令牌校验
//!
//! 令牌由外部身份服务签发（HS256），这里只做校验，不签发。

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, JwtConfig};

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    #[serde(default)]
    pub name: Option<String>, // 显示名
    pub exp: usize,  // Expiration time (时间戳)
    pub iat: usize,  // Issued at (签发时间)
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    fn validation(config: &JwtConfig) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway;
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }

    /// 按给定配置校验令牌
    pub fn verify_with(
        token: &str,
        config: &JwtConfig,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        decode::<Claims>(token, &decoding_key, &Self::validation(config))
            .map(|token_data| token_data.claims)
    }

    // 验证 JWT token
    pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_with(token, &AppConfig::get().jwt)
    }
}
