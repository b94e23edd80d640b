// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{AuthUser, Claims, UserRole},
};

/// Valida o JWT emitido pelo backend gerenciado e injeta o usuário na requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::InvalidToken)?;

    let user = validate_token(token, &app_state.jwt_secret)?;

    // Insere o usuário nos "extensions" da requisição
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn validate_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::InvalidToken)?;

    Ok(AuthUser {
        id: token_data.claims.sub,
        // Token sem papel é de dono de veículo
        role: token_data.claims.role.unwrap_or(UserRole::Owner),
    })
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub AuthUser);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    fn token(secret: &str, role: Option<UserRole>) -> (Uuid, String) {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims { sub: Uuid::new_v4(), exp: now + 3600, iat: now, role };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref())).unwrap();
        (claims.sub, token)
    }

    #[test]
    fn valid_token_yields_user_and_role() {
        let (id, token) = token("segredo", Some(UserRole::Workshop));
        let user = validate_token(&token, "segredo").unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, UserRole::Workshop);
    }

    #[test]
    fn missing_role_defaults_to_owner() {
        let (_, token) = token("segredo", None);
        assert_eq!(validate_token(&token, "segredo").unwrap().role, UserRole::Owner);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let (_, token) = token("segredo", None);
        assert!(matches!(validate_token(&token, "outro"), Err(AppError::InvalidToken)));
    }
}
