use actix_web::{
    dev::Payload, error::ErrorUnauthorized, web::Data, Error as ActixError, FromRequest,
    HttpRequest,
};
use anyhow::Result;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

use crate::config::Config;
use crate::database::models::PersonId;

/// Token claims of the signed-in person. Tokens are issued by the login
/// service; this crate only validates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: PersonId,
    pub email: String,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn person_id(&self) -> PersonId {
        self.sub
    }

    pub fn decode(token: &str, secret: &str) -> Result<Self> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(token_data.claims)
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "));

        let (Some(token), Some(config)) = (token, req.app_data::<Data<Config>>()) else {
            return ready(Err(ErrorUnauthorized(
                "Missing or invalid authorization header",
            )));
        };

        match Claims::decode(token, &config.jwt_secret) {
            Ok(claims) => ready(Ok(claims)),
            Err(err) => {
                log::debug!("Rejecting bearer token: {}", err);
                ready(Err(ErrorUnauthorized("Invalid token")))
            }
        }
    }
}
