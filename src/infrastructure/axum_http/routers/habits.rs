use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use tracing::info;

use crate::{
    application::usecases::habits::HabitUseCase,
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::habits::HabitRepository,
        value_objects::{
            habits::{PatchHabitModel, UpsertHabitModel},
            iam::AuthUser,
            pagination::PaginationQuery,
        },
    },
    infrastructure::{
        axum_http::{
            auth::{iam_usecase, require_auth},
            json_body::JsonBody,
        },
        postgres::{postgres_connection::PgPoolSquad, repositories::habits::HabitPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let iam_usecase = Arc::new(iam_usecase(Arc::clone(&db_pool), &config));
    let habit_repository = HabitPostgres::new(Arc::clone(&db_pool));
    let habit_usecase = Arc::new(HabitUseCase::new(
        Arc::new(habit_repository),
        config.pagination,
    ));

    let public = Router::new()
        .route("/public", get(list_public::<HabitPostgres>))
        .with_state(Arc::clone(&habit_usecase));

    let protected = Router::new()
        .route(
            "/",
            get(list::<HabitPostgres>).post(create::<HabitPostgres>),
        )
        .route(
            "/:id",
            get(retrieve::<HabitPostgres>)
                .put(update::<HabitPostgres>)
                .patch(partial_update::<HabitPostgres>)
                .delete(remove::<HabitPostgres>),
        )
        .route_layer(middleware::from_fn_with_state(iam_usecase, require_auth))
        .with_state(habit_usecase);

    Router::new().merge(public).merge(protected)
}

pub async fn list_public<H>(
    State(habit_usecase): State<Arc<HabitUseCase<H>>>,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse
where
    H: HabitRepository + Send + Sync + 'static,
{
    match habit_usecase.list_public(query).await {
        Ok(page) => Json(page).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list<H>(
    State(habit_usecase): State<Arc<HabitUseCase<H>>>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse
where
    H: HabitRepository + Send + Sync + 'static,
{
    match habit_usecase.list(&auth_user, query).await {
        Ok(page) => Json(page).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn create<H>(
    State(habit_usecase): State<Arc<HabitUseCase<H>>>,
    Extension(auth_user): Extension<AuthUser>,
    JsonBody(upsert_habit_model): JsonBody<UpsertHabitModel>,
) -> impl IntoResponse
where
    H: HabitRepository + Send + Sync + 'static,
{
    info!(user_id = auth_user.user_id, "habits: create request received");
    match habit_usecase.create(&auth_user, upsert_habit_model).await {
        Ok(habit) => (StatusCode::CREATED, Json(habit)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn retrieve<H>(
    State(habit_usecase): State<Arc<HabitUseCase<H>>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(habit_id): Path<i64>,
) -> impl IntoResponse
where
    H: HabitRepository + Send + Sync + 'static,
{
    match habit_usecase.retrieve(&auth_user, habit_id).await {
        Ok(habit) => Json(habit).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update<H>(
    State(habit_usecase): State<Arc<HabitUseCase<H>>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(habit_id): Path<i64>,
    JsonBody(upsert_habit_model): JsonBody<UpsertHabitModel>,
) -> impl IntoResponse
where
    H: HabitRepository + Send + Sync + 'static,
{
    info!(user_id = auth_user.user_id, habit_id, "habits: update request received");
    match habit_usecase
        .update(&auth_user, habit_id, upsert_habit_model)
        .await
    {
        Ok(habit) => Json(habit).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn partial_update<H>(
    State(habit_usecase): State<Arc<HabitUseCase<H>>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(habit_id): Path<i64>,
    JsonBody(patch_habit_model): JsonBody<PatchHabitModel>,
) -> impl IntoResponse
where
    H: HabitRepository + Send + Sync + 'static,
{
    info!(user_id = auth_user.user_id, habit_id, "habits: partial update request received");
    match habit_usecase
        .partial_update(&auth_user, habit_id, patch_habit_model)
        .await
    {
        Ok(habit) => Json(habit).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn remove<H>(
    State(habit_usecase): State<Arc<HabitUseCase<H>>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(habit_id): Path<i64>,
) -> impl IntoResponse
where
    H: HabitRepository + Send + Sync + 'static,
{
    info!(user_id = auth_user.user_id, habit_id, "habits: delete request received");
    match habit_usecase.delete(&auth_user, habit_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
