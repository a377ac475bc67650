use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::warn;

use crate::{
    application::{errors::AppError, usecases::iam::IamUseCase},
    config::config_model::DotEnvyConfig,
    infrastructure::{
        postgres::{postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
        security::{jwt::JwtTokenService, password::Argon2PasswordService},
    },
};

pub type IamSquad = IamUseCase<UserPostgres, Argon2PasswordService, JwtTokenService>;

pub fn iam_usecase(db_pool: Arc<PgPoolSquad>, config: &DotEnvyConfig) -> IamSquad {
    IamUseCase::new(
        Arc::new(UserPostgres::new(db_pool)),
        Arc::new(Argon2PasswordService),
        Arc::new(JwtTokenService::new(
            config.user_secret.clone(),
            config.token_lifetime.clone(),
        )),
    )
}

/// Resolves the bearer token into an `AuthUser` extension for the wrapped routes.
pub async fn require_auth(
    State(iam_usecase): State<Arc<IamSquad>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return AppError::Unauthorized("Authentication credentials were not provided".to_string())
            .into_response();
    };

    match iam_usecase.authenticate(bearer.token()).await {
        Ok(auth_user) => {
            request.extensions_mut().insert(auth_user);
            next.run(request).await
        }
        Err(err) => {
            warn!(path = %request.uri().path(), "auth: request rejected");
            err.into_response()
        }
    }
}
