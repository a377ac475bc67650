use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use tracing::info;

use crate::{
    application::{
        interfaces::security::{PasswordService, TokenService},
        usecases::{iam::IamUseCase, users::UserUseCase},
    },
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::users::UserRepository,
        value_objects::{
            iam::{AuthUser, LoginModel, RefreshTokenModel, RegisterUserModel},
            pagination::PaginationQuery,
            users::UpdateProfileModel,
        },
    },
    infrastructure::{
        axum_http::{
            auth::{iam_usecase, require_auth},
            json_body::JsonBody,
            routers::user_telegrams,
        },
        postgres::{postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
        security::{jwt::JwtTokenService, password::Argon2PasswordService},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let iam_usecase = Arc::new(iam_usecase(Arc::clone(&db_pool), &config));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let user_usecase = UserUseCase::new(Arc::new(user_repository), config.pagination);

    let public = Router::new()
        .route(
            "/register",
            post(register::<UserPostgres, Argon2PasswordService, JwtTokenService>),
        )
        .route(
            "/login",
            post(login::<UserPostgres, Argon2PasswordService, JwtTokenService>),
        )
        .route(
            "/token/refresh",
            post(refresh::<UserPostgres, Argon2PasswordService, JwtTokenService>),
        )
        .with_state(Arc::clone(&iam_usecase));

    let protected = Router::new()
        .route("/users", get(list::<UserPostgres>))
        .route("/users/:id", get(retrieve::<UserPostgres>))
        .route(
            "/user",
            get(current::<UserPostgres>)
                .put(update_profile::<UserPostgres>)
                .patch(update_profile::<UserPostgres>),
        )
        .route("/deactivate", delete(deactivate::<UserPostgres>))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&iam_usecase),
            require_auth,
        ))
        .with_state(Arc::new(user_usecase));

    Router::new()
        .merge(public)
        .merge(protected)
        .nest("/tg-profile", user_telegrams::routes(db_pool, iam_usecase))
}

pub async fn register<U, P, T>(
    State(iam_usecase): State<Arc<IamUseCase<U, P, T>>>,
    JsonBody(register_user_model): JsonBody<RegisterUserModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: PasswordService + Send + Sync + 'static,
    T: TokenService + Send + Sync + 'static,
{
    info!("users: register request received");
    match iam_usecase.register(register_user_model).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn login<U, P, T>(
    State(iam_usecase): State<Arc<IamUseCase<U, P, T>>>,
    JsonBody(login_model): JsonBody<LoginModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: PasswordService + Send + Sync + 'static,
    T: TokenService + Send + Sync + 'static,
{
    match iam_usecase.login(login_model).await {
        Ok(tokens) => Json(tokens).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn refresh<U, P, T>(
    State(iam_usecase): State<Arc<IamUseCase<U, P, T>>>,
    JsonBody(refresh_token_model): JsonBody<RefreshTokenModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: PasswordService + Send + Sync + 'static,
    T: TokenService + Send + Sync + 'static,
{
    match iam_usecase.refresh(refresh_token_model).await {
        Ok(access) => Json(access).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match user_usecase.list(&auth_user, query).await {
        Ok(page) => Json(page).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn retrieve<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match user_usecase.retrieve(&auth_user, user_id).await {
        Ok(user) => Json(user).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn current<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    Extension(auth_user): Extension<AuthUser>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match user_usecase.current(&auth_user).await {
        Ok(user) => Json(user).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_profile<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    Extension(auth_user): Extension<AuthUser>,
    JsonBody(update_profile_model): JsonBody<UpdateProfileModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    info!(user_id = auth_user.user_id, "users: profile update request received");
    match user_usecase
        .update_profile(&auth_user, update_profile_model)
        .await
    {
        Ok(user) => Json(user).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn deactivate<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    Extension(auth_user): Extension<AuthUser>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    info!(user_id = auth_user.user_id, "users: deactivate request received");
    match user_usecase.deactivate(&auth_user).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
