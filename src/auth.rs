//! JSON Web Token issuing and verification, plus the extractor that guards
//! protected routes.

use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    models::UserID,
    state::AppState,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// How long an issued token stays valid.
const TOKEN_LIFETIME: Duration = Duration::hours(24);

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: i64,
    /// The time the token was issued, as a unix timestamp.
    pub iat: i64,
    /// The expiry time of the token, as a unix timestamp.
    pub exp: i64,
}

impl Claims {
    /// The ID of the user the token was issued to.
    pub fn user_id(&self) -> UserID {
        UserID::new(self.sub)
    }
}

/// Create a signed token for `user_id`.
///
/// # Errors
///
/// Returns [Error::TokenCreation] if the token could not be signed.
pub fn issue_token(user_id: UserID, encoding_key: &EncodingKey) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id.as_i64(),
        iat: now.unix_timestamp(),
        exp: (now + TOKEN_LIFETIME).unix_timestamp(),
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|_| Error::TokenCreation)
}

/// Verify a token's signature and expiry and return its claims.
///
/// # Errors
///
/// Returns [Error::InvalidToken] if the token is malformed, has a bad
/// signature or has expired.
pub fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<Claims, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|_| Error::InvalidToken)
}

impl<C, T, U> FromRequestParts<AppState<C, T, U>> for Claims
where
    C: CategoryStore,
    T: TransactionStore,
    U: UserStore,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<C, T, U>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::InvalidToken)?;

        decode_token(bearer.token(), state.decoding_key())
    }
}

#[cfg(test)]
mod auth_tests {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use time::{Duration, OffsetDateTime};

    use crate::{Error, models::UserID, state::JwtKeys};

    use super::{Claims, decode_token, issue_token};

    #[test]
    fn issued_token_round_trips() {
        let keys = JwtKeys::from_secret("averysecretsecret");

        let token = issue_token(UserID::new(42), keys.encoding()).unwrap();
        let claims = decode_token(&token, keys.decoding()).unwrap();

        assert_eq!(claims.user_id(), UserID::new(42));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn decode_fails_with_wrong_secret() {
        let token = issue_token(
            UserID::new(42),
            JwtKeys::from_secret("averysecretsecret").encoding(),
        )
        .unwrap();

        let result = decode_token(&token, JwtKeys::from_secret("adifferentone").decoding());

        assert_eq!(result.map(|claims| claims.sub), Err(Error::InvalidToken));
    }

    #[test]
    fn decode_fails_with_expired_token() {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: 42,
            iat: (now - Duration::hours(48)).unix_timestamp(),
            exp: (now - Duration::hours(24)).unix_timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"averysecretsecret"),
        )
        .unwrap();

        let result = decode_token(&token, JwtKeys::from_secret("averysecretsecret").decoding());

        assert_eq!(result.map(|claims| claims.sub), Err(Error::InvalidToken));
    }
}
