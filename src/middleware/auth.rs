//! Middleware de autenticación JWT
//!
//! La autenticación/gestión de usuarios es responsabilidad de una capa
//! externa; este middleware solo decodifica el token ya emitido y expone
//! la identidad y rol del caller como extensión del request. El core la
//! consume únicamente como gate de precondiciones.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::permissions::Role;

/// Claims del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub company_id: String,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// Caller autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub role: Role,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    // Decodificar y validar JWT
    let token_data = decode::<Claims>(
        auth_header,
        &DecodingKey::from_secret(state.config.jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

    let claims = token_data.claims;

    let user = AuthenticatedUser {
        user_id: Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user id in token".to_string()))?,
        company_id: Uuid::parse_str(&claims.company_id)
            .map_err(|_| AppError::Unauthorized("Invalid company id in token".to_string()))?,
        role: Role::parse(&claims.role)
            .ok_or_else(|| AppError::Unauthorized(format!("Unknown role '{}'", claims.role)))?,
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
