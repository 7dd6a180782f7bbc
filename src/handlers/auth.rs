// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::{AppState, Config},
    middleware::auth::TOKEN_COOKIE,
    models::auth::{AuthResponse, LoginUserPayload, Principal, SessionResponse, SignupPayload},
};

/// Cookie HttpOnly com o token de sessão, válido pelo mesmo tempo do token.
pub fn session_cookie(config: &Config, token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::None)
        .path("/")
        .max_age(time::Duration::hours(config.token_ttl_hours))
        .build()
}

fn expired_cookie(config: &Config) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, ""))
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::None)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    request_body = SignupPayload,
    responses(
        (status = 201, description = "Usuário criado", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já em uso")
    )
)]
pub async fn signup(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SignupPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state.auth_service.signup(&payload).await?;
    let jar = jar.add(session_cookie(&app_state.config, token.clone()));

    Ok((StatusCode::CREATED, jar, Json(AuthResponse { token })))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;
    let jar = jar.add(session_cookie(&app_state.config, token.clone()));

    Ok((jar, Json(AuthResponse { token })))
}

// Tokens não são revogáveis: o logout só remove o cookie do navegador.
#[utoipa::path(
    post,
    path = "/api/users/logout",
    tag = "Users",
    responses((status = 204, description = "Cookie de sessão removido")),
    security(("api_jwt" = []))
)]
pub async fn logout(State(app_state): State<AppState>, _principal: Principal, jar: CookieJar) -> impl IntoResponse {
    (StatusCode::NO_CONTENT, jar.add(expired_cookie(&app_state.config)))
}

#[utoipa::path(
    get,
    path = "/api/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Sessão válida", body = SessionResponse),
        (status = 401, description = "Sessão inválida ou expirada")
    ),
    security(("api_jwt" = []))
)]
pub async fn session(
    State(app_state): State<AppState>,
    principal: Principal,
) -> Result<Json<SessionResponse>, AppError> {
    let session = app_state.auth_service.session(&principal).await?;
    Ok(Json(session))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database_url: "postgres://localhost/stockapp".into(),
            jwt_secret: "segredo".into(),
            bind_addr: "127.0.0.1:0".into(),
            token_ttl_hours: 24,
            low_stock_threshold: 10,
            db_max_connections: 1,
            cors_origin: "http://localhost:3000".into(),
            cookie_secure: true,
        }
    }

    #[test]
    fn session_cookie_is_http_only_and_lives_as_long_as_the_token() {
        let cookie = session_cookie(&config(), "abc".into());
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(24)));
    }

    #[test]
    fn logout_cookie_expires_immediately() {
        let cookie = expired_cookie(&config());
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
