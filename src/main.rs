use anyhow::Result;
use habit_tracker::{
    application::usecases::reminders::{ReminderCheckUseCase, ReminderDeliveryUseCase},
    background_worker::{reminder_delivery, reminder_queue, reminder_scheduler},
    config::config_loader,
    infrastructure::{
        axum_http::http_serve,
        postgres::{
            postgres_connection,
            repositories::{habits::HabitPostgres, user_telegrams::UserTelegramPostgres},
        },
        telegram::bot_client::TelegramBotClient,
    },
    observability,
};
use std::{sync::Arc, time::Duration};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Habit tracker exited with error: {}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("habit-tracker", config_loader::get_stage())?;

    let dotenvy_env = Arc::new(config_loader::load()?);
    info!(stage = %dotenvy_env.stage, "ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let db_pool_arc = Arc::new(postgres_pool);

    let habit_repository = Arc::new(HabitPostgres::new(Arc::clone(&db_pool_arc)));
    let user_telegram_repository = Arc::new(UserTelegramPostgres::new(Arc::clone(&db_pool_arc)));
    let notifier = Arc::new(TelegramBotClient::new(&dotenvy_env.telegram)?);

    let (queue, receiver) = reminder_queue::channel(dotenvy_env.reminder.queue_capacity);

    let reminder_check_usecase = Arc::new(ReminderCheckUseCase::new(
        Arc::clone(&habit_repository),
        Arc::new(queue),
    ));
    let reminder_delivery_usecase = Arc::new(ReminderDeliveryUseCase::new(
        habit_repository,
        user_telegram_repository,
        notifier,
    ));

    let reminder_scheduler_loop = tokio::spawn(reminder_scheduler::run(
        reminder_check_usecase,
        Duration::from_secs(dotenvy_env.reminder.check_interval),
    ));

    let reminder_delivery_loop = tokio::spawn(reminder_delivery::run(
        reminder_delivery_usecase,
        receiver,
        dotenvy_env.reminder.workers,
    ));

    let server = tokio::spawn(http_serve::start(
        Arc::clone(&dotenvy_env),
        Arc::clone(&db_pool_arc),
    ));

    tokio::select! {
        result = server => result??,
        result = reminder_scheduler_loop => result??,
        result = reminder_delivery_loop => result??,
    };
    Ok(())
}
