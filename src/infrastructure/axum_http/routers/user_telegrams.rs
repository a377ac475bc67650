use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use tracing::info;

use crate::{
    application::usecases::user_telegrams::UserTelegramUseCase,
    domain::{
        repositories::user_telegrams::UserTelegramRepository,
        value_objects::{
            iam::AuthUser,
            user_telegrams::{PatchUserTelegramModel, UpsertUserTelegramModel},
        },
    },
    infrastructure::{
        axum_http::{
            auth::{IamSquad, require_auth},
            json_body::JsonBody,
        },
        postgres::{
            postgres_connection::PgPoolSquad, repositories::user_telegrams::UserTelegramPostgres,
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, iam_usecase: Arc<IamSquad>) -> Router {
    let user_telegram_repository = UserTelegramPostgres::new(Arc::clone(&db_pool));
    let user_telegram_usecase = UserTelegramUseCase::new(Arc::new(user_telegram_repository));

    Router::new()
        .route(
            "/",
            get(list::<UserTelegramPostgres>).post(create::<UserTelegramPostgres>),
        )
        .route(
            "/:id",
            get(retrieve::<UserTelegramPostgres>)
                .put(update::<UserTelegramPostgres>)
                .patch(partial_update::<UserTelegramPostgres>)
                .delete(remove::<UserTelegramPostgres>),
        )
        .route_layer(middleware::from_fn_with_state(iam_usecase, require_auth))
        .with_state(Arc::new(user_telegram_usecase))
}

pub async fn list<T>(
    State(user_telegram_usecase): State<Arc<UserTelegramUseCase<T>>>,
    Extension(auth_user): Extension<AuthUser>,
) -> impl IntoResponse
where
    T: UserTelegramRepository + Send + Sync + 'static,
{
    match user_telegram_usecase.list(&auth_user).await {
        Ok(profiles) => Json(profiles).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn create<T>(
    State(user_telegram_usecase): State<Arc<UserTelegramUseCase<T>>>,
    Extension(auth_user): Extension<AuthUser>,
    JsonBody(upsert_model): JsonBody<UpsertUserTelegramModel>,
) -> impl IntoResponse
where
    T: UserTelegramRepository + Send + Sync + 'static,
{
    info!(user_id = auth_user.user_id, "user_telegrams: create request received");
    match user_telegram_usecase.create(&auth_user, upsert_model).await {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn retrieve<T>(
    State(user_telegram_usecase): State<Arc<UserTelegramUseCase<T>>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(profile_id): Path<i64>,
) -> impl IntoResponse
where
    T: UserTelegramRepository + Send + Sync + 'static,
{
    match user_telegram_usecase.retrieve(&auth_user, profile_id).await {
        Ok(profile) => Json(profile).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update<T>(
    State(user_telegram_usecase): State<Arc<UserTelegramUseCase<T>>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(profile_id): Path<i64>,
    JsonBody(upsert_model): JsonBody<UpsertUserTelegramModel>,
) -> impl IntoResponse
where
    T: UserTelegramRepository + Send + Sync + 'static,
{
    match user_telegram_usecase
        .update(&auth_user, profile_id, upsert_model)
        .await
    {
        Ok(profile) => Json(profile).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn partial_update<T>(
    State(user_telegram_usecase): State<Arc<UserTelegramUseCase<T>>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(profile_id): Path<i64>,
    JsonBody(patch_model): JsonBody<PatchUserTelegramModel>,
) -> impl IntoResponse
where
    T: UserTelegramRepository + Send + Sync + 'static,
{
    match user_telegram_usecase
        .partial_update(&auth_user, profile_id, patch_model)
        .await
    {
        Ok(profile) => Json(profile).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn remove<T>(
    State(user_telegram_usecase): State<Arc<UserTelegramUseCase<T>>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(profile_id): Path<i64>,
) -> impl IntoResponse
where
    T: UserTelegramRepository + Send + Sync + 'static,
{
    info!(user_id = auth_user.user_id, profile_id, "user_telegrams: delete request received");
    match user_telegram_usecase.delete(&auth_user, profile_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
