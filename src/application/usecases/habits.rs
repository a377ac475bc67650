use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use validator::ValidationErrors;

use crate::{
    application::errors::{AppError, AppResult},
    config::config_model::Pagination,
    domain::{
        entities::habits::HabitRecord,
        repositories::habits::HabitRepository,
        value_objects::{
            habit_rules::{HabitDraft, RelatedHabit},
            habits::{HabitModel, PatchHabitModel, UpsertHabitModel},
            iam::AuthUser,
            pagination::{Page, PageRequest, PaginationQuery},
            permissions::{can_read_habit, can_write_habit},
            validation::validation_error,
        },
    },
};

const HABIT_NOT_FOUND: &str = "Habit not found";

pub struct HabitUseCase<H>
where
    H: HabitRepository + Send + Sync,
{
    habit_repository: Arc<H>,
    pagination: Pagination,
}

impl<H> HabitUseCase<H>
where
    H: HabitRepository + Send + Sync,
{
    pub fn new(habit_repository: Arc<H>, pagination: Pagination) -> Self {
        Self {
            habit_repository,
            pagination,
        }
    }

    pub async fn list(
        &self,
        auth_user: &AuthUser,
        query: PaginationQuery,
    ) -> AppResult<Page<HabitModel>> {
        let page_request = PageRequest::resolve(&query, &self.pagination);
        let (records, count) = self
            .habit_repository
            .list_by_owner(auth_user.user_id, &page_request)
            .await?;

        to_page(records, count, &page_request)
    }

    pub async fn list_public(&self, query: PaginationQuery) -> AppResult<Page<HabitModel>> {
        let page_request = PageRequest::resolve(&query, &self.pagination);
        let (records, count) = self.habit_repository.list_public(&page_request).await?;

        to_page(records, count, &page_request)
    }

    pub async fn create(
        &self,
        auth_user: &AuthUser,
        upsert_habit_model: UpsertHabitModel,
    ) -> AppResult<HabitModel> {
        let draft = upsert_habit_model.into_draft();
        let related = self.resolve_related(auth_user, &draft).await?;
        let validated = draft.validate(None, related)?;

        let record = self
            .habit_repository
            .create(validated.into_insert_entity(auth_user.user_id, Utc::now()))
            .await?;

        info!(
            user_id = auth_user.user_id,
            habit_id = record.habit.id,
            "habits: habit created"
        );
        Ok(record.into())
    }

    pub async fn retrieve(&self, auth_user: &AuthUser, habit_id: i64) -> AppResult<HabitModel> {
        Ok(self.readable(auth_user, habit_id).await?.into())
    }

    /// Full replacement (PUT).
    pub async fn update(
        &self,
        auth_user: &AuthUser,
        habit_id: i64,
        upsert_habit_model: UpsertHabitModel,
    ) -> AppResult<HabitModel> {
        let current = self.writable(auth_user, habit_id).await?;
        self.save(auth_user, current, upsert_habit_model.into_draft())
            .await
    }

    pub async fn partial_update(
        &self,
        auth_user: &AuthUser,
        habit_id: i64,
        patch_habit_model: PatchHabitModel,
    ) -> AppResult<HabitModel> {
        let current = self.writable(auth_user, habit_id).await?;
        let draft = patch_habit_model.apply_to(&current.habit);
        self.save(auth_user, current, draft).await
    }

    pub async fn delete(&self, auth_user: &AuthUser, habit_id: i64) -> AppResult<()> {
        let current = self.writable(auth_user, habit_id).await?;
        self.habit_repository.delete(current.habit.id).await?;

        info!(user_id = auth_user.user_id, habit_id, "habits: habit deleted");
        Ok(())
    }

    async fn save(
        &self,
        auth_user: &AuthUser,
        current: HabitRecord,
        draft: HabitDraft,
    ) -> AppResult<HabitModel> {
        let related = self.resolve_related(auth_user, &draft).await?;
        let validated = draft.validate(Some(current.habit.id), related)?;

        if current.habit.is_pleasant
            && !validated.draft().is_pleasant
            && self
                .habit_repository
                .is_referenced_as_related(current.habit.id)
                .await?
        {
            warn!(
                habit_id = current.habit.id,
                "habits: linked pleasant habit cannot stop being pleasant"
            );
            let mut errors = ValidationErrors::new();
            errors.add(
                "is_pleasant",
                validation_error(
                    "linked_pleasant_habit",
                    "Other habits use this habit as their related habit, so it must stay pleasant.",
                ),
            );
            return Err(AppError::Validation(errors));
        }

        // A new reminder time starts a fresh schedule.
        let reset_last_reminded = validated.draft().remind_at != current.habit.remind_at;

        let record = self
            .habit_repository
            .update(
                current.habit.id,
                validated.into_edit_entity(Utc::now()),
                reset_last_reminded,
            )
            .await?;

        info!(
            user_id = auth_user.user_id,
            habit_id = record.habit.id,
            reset_last_reminded,
            "habits: habit updated"
        );
        Ok(record.into())
    }

    /// Only habits the caller can read may be linked; anything else reads as missing.
    async fn resolve_related(
        &self,
        auth_user: &AuthUser,
        draft: &HabitDraft,
    ) -> AppResult<Option<RelatedHabit>> {
        let Some(related_habit_id) = draft.related_habit_id else {
            return Ok(None);
        };

        Ok(self
            .habit_repository
            .find_by_id(related_habit_id)
            .await?
            .filter(|record| can_read_habit(Some(auth_user.user_id), &record.habit))
            .map(|record| RelatedHabit::from(&record.habit)))
    }

    async fn readable(&self, auth_user: &AuthUser, habit_id: i64) -> AppResult<HabitRecord> {
        self.habit_repository
            .find_by_id(habit_id)
            .await?
            .filter(|record| can_read_habit(Some(auth_user.user_id), &record.habit))
            .ok_or_else(|| AppError::NotFound(HABIT_NOT_FOUND.to_string()))
    }

    async fn writable(&self, auth_user: &AuthUser, habit_id: i64) -> AppResult<HabitRecord> {
        let record = self.readable(auth_user, habit_id).await?;
        if !can_write_habit(auth_user.user_id, &record.habit) {
            return Err(AppError::Forbidden(
                "Only the owner can modify this habit".to_string(),
            ));
        }
        Ok(record)
    }
}

fn to_page(
    records: Vec<HabitRecord>,
    count: i64,
    page_request: &PageRequest,
) -> AppResult<Page<HabitModel>> {
    Page::new(records, count, page_request)
        .map(|page| page.map(HabitModel::from))
        .ok_or_else(|| AppError::NotFound("Invalid page.".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::habits::HabitEntity, repositories::habits::MockHabitRepository,
        value_objects::enums::repeat_modes::RepeatMode,
    };
    use chrono::{Duration, NaiveTime};
    use mockall::predicate::eq;

    fn habit(id: i64, user_id: i64, is_public: bool) -> HabitEntity {
        let now = Utc::now();
        HabitEntity {
            id,
            user_id,
            action: "Drink water".to_string(),
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            place: "Kitchen".to_string(),
            periodicity: 1,
            reward: None,
            related_habit_id: None,
            is_pleasant: false,
            duration: 60,
            is_public,
            remind_at: None,
            repeat: "none".to_string(),
            last_reminded_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn record(habit: HabitEntity) -> HabitRecord {
        HabitRecord {
            owner_email: format!("user{}@example.com", habit.user_id),
            habit,
        }
    }

    fn auth(user_id: i64) -> AuthUser {
        AuthUser {
            user_id,
            is_staff: false,
        }
    }

    fn settings() -> Pagination {
        Pagination {
            page_size: 5,
            max_page_size: 100,
        }
    }

    fn upsert() -> UpsertHabitModel {
        UpsertHabitModel {
            action: "Read a book".to_string(),
            time: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            place: "Home".to_string(),
            periodicity: 1,
            reward: Some("Tea".to_string()),
            related_habit: None,
            is_pleasant: false,
            duration: 90,
            is_public: false,
            remind_at: None,
            repeat: RepeatMode::None,
        }
    }

    #[tokio::test]
    async fn create_persists_validated_habit_for_caller() {
        let mut habits = MockHabitRepository::new();
        habits
            .expect_create()
            .withf(|entity| entity.user_id == 1 && entity.reward.as_deref() == Some("Tea"))
            .times(1)
            .returning(|entity| {
                let mut created = habit(10, entity.user_id, entity.is_public);
                created.action = entity.action;
                created.reward = entity.reward;
                Ok(record(created))
            });

        let created = HabitUseCase::new(Arc::new(habits), settings())
            .create(&auth(1), upsert())
            .await
            .unwrap();

        assert_eq!(created.id, 10);
        assert_eq!(created.owner_email, "user1@example.com");
    }

    #[tokio::test]
    async fn create_rejects_reward_together_with_related_habit() {
        let mut habits = MockHabitRepository::new();
        habits.expect_find_by_id().with(eq(3)).returning(|id| {
            let mut related = habit(id, 1, false);
            related.is_pleasant = true;
            Ok(Some(record(related)))
        });
        habits.expect_create().never();

        let mut model = upsert();
        model.related_habit = Some(3);

        let err = HabitUseCase::new(Arc::new(habits), settings())
            .create(&auth(1), model)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_treats_foreign_private_related_habit_as_missing() {
        let mut habits = MockHabitRepository::new();
        habits.expect_find_by_id().returning(|id| {
            let mut related = habit(id, 2, false);
            related.is_pleasant = true;
            Ok(Some(record(related)))
        });
        habits.expect_create().never();

        let mut model = upsert();
        model.reward = None;
        model.related_habit = Some(3);

        let err = HabitUseCase::new(Arc::new(habits), settings())
            .create(&auth(1), model)
            .await
            .unwrap_err();

        assert!(
            matches!(err, AppError::Validation(ref e) if e.field_errors().contains_key("related_habit"))
        );
    }

    #[tokio::test]
    async fn private_habit_of_another_user_is_not_found() {
        let mut habits = MockHabitRepository::new();
        habits
            .expect_find_by_id()
            .returning(|id| Ok(Some(record(habit(id, 2, false)))));
        habits.expect_update().never();
        habits.expect_delete().never();

        let usecase = HabitUseCase::new(Arc::new(habits), settings());

        assert!(matches!(
            usecase.retrieve(&auth(1), 5).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            usecase.update(&auth(1), 5, upsert()).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn public_habit_is_readable_but_not_writable_by_others() {
        let mut habits = MockHabitRepository::new();
        habits
            .expect_find_by_id()
            .returning(|id| Ok(Some(record(habit(id, 2, true)))));
        habits.expect_update().never();
        habits.expect_delete().never();

        let usecase = HabitUseCase::new(Arc::new(habits), settings());

        assert_eq!(usecase.retrieve(&auth(1), 5).await.unwrap().id, 5);
        assert!(matches!(
            usecase.delete(&auth(1), 5).await.unwrap_err(),
            AppError::Forbidden(_)
        ));
        assert!(matches!(
            usecase
                .partial_update(&auth(1), 5, PatchHabitModel::default())
                .await
                .unwrap_err(),
            AppError::Forbidden(_)
        ));
    }

    #[tokio::test]
    async fn changing_remind_at_resets_reminder_state() {
        let remind_at = Utc::now() + Duration::hours(1);
        let mut habits = MockHabitRepository::new();
        habits
            .expect_find_by_id()
            .returning(|id| Ok(Some(record(habit(id, 1, false)))));
        habits
            .expect_update()
            .withf(move |id, entity, reset| {
                *id == 5 && entity.remind_at == Some(remind_at) && *reset
            })
            .times(1)
            .returning(|id, entity, _| {
                let mut updated = habit(id, 1, false);
                updated.remind_at = entity.remind_at;
                Ok(record(updated))
            });

        let updated = HabitUseCase::new(Arc::new(habits), settings())
            .partial_update(
                &auth(1),
                5,
                PatchHabitModel {
                    remind_at: Some(Some(remind_at)),
                    ..PatchHabitModel::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.remind_at, Some(remind_at));
    }

    #[tokio::test]
    async fn patch_without_remind_at_keeps_reminder_state() {
        let mut habits = MockHabitRepository::new();
        habits
            .expect_find_by_id()
            .returning(|id| Ok(Some(record(habit(id, 1, false)))));
        habits
            .expect_update()
            .withf(|_, entity, reset| entity.place == "Office" && !*reset)
            .times(1)
            .returning(|id, entity, _| {
                let mut updated = habit(id, 1, false);
                updated.place = entity.place;
                Ok(record(updated))
            });

        let updated = HabitUseCase::new(Arc::new(habits), settings())
            .partial_update(
                &auth(1),
                5,
                PatchHabitModel {
                    place: Some("Office".to_string()),
                    ..PatchHabitModel::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.place, "Office");
    }

    #[tokio::test]
    async fn linked_pleasant_habit_cannot_become_unpleasant() {
        let mut habits = MockHabitRepository::new();
        habits.expect_find_by_id().returning(|id| {
            let mut pleasant = habit(id, 1, false);
            pleasant.is_pleasant = true;
            Ok(Some(record(pleasant)))
        });
        habits
            .expect_is_referenced_as_related()
            .with(eq(5))
            .times(1)
            .returning(|_| Ok(true));
        habits.expect_update().never();

        let err = HabitUseCase::new(Arc::new(habits), settings())
            .partial_update(
                &auth(1),
                5,
                PatchHabitModel {
                    is_pleasant: Some(false),
                    ..PatchHabitModel::default()
                },
            )
            .await
            .unwrap_err();

        assert!(
            matches!(err, AppError::Validation(ref e) if e.field_errors().contains_key("is_pleasant"))
        );
    }

    #[tokio::test]
    async fn unlinked_pleasant_habit_can_become_unpleasant() {
        let mut habits = MockHabitRepository::new();
        habits.expect_find_by_id().returning(|id| {
            let mut pleasant = habit(id, 1, false);
            pleasant.is_pleasant = true;
            Ok(Some(record(pleasant)))
        });
        habits
            .expect_is_referenced_as_related()
            .returning(|_| Ok(false));
        habits
            .expect_update()
            .withf(|_, entity, _| !entity.is_pleasant)
            .times(1)
            .returning(|id, _, _| Ok(record(habit(id, 1, false))));

        let updated = HabitUseCase::new(Arc::new(habits), settings())
            .partial_update(
                &auth(1),
                5,
                PatchHabitModel {
                    is_pleasant: Some(false),
                    ..PatchHabitModel::default()
                },
            )
            .await
            .unwrap();

        assert!(!updated.is_pleasant);
    }

    #[tokio::test]
    async fn list_past_last_page_is_not_found() {
        let mut habits = MockHabitRepository::new();
        habits
            .expect_list_by_owner()
            .withf(|user_id, request| *user_id == 1 && request.page == 3)
            .returning(|_, _| Ok((Vec::new(), 6)));

        let err = HabitUseCase::new(Arc::new(habits), settings())
            .list(
                &auth(1),
                PaginationQuery {
                    page: Some(3),
                    page_size: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn public_list_maps_records() {
        let mut habits = MockHabitRepository::new();
        habits
            .expect_list_public()
            .returning(|_| Ok((vec![record(habit(1, 2, true)), record(habit(2, 3, true))], 2)));

        let page = HabitUseCase::new(Arc::new(habits), settings())
            .list_public(PaginationQuery::default())
            .await
            .unwrap();

        assert_eq!(page.count, 2);
        assert_eq!(page.next, None);
        assert_eq!(page.results[1].owner_email, "user3@example.com");
    }
}
