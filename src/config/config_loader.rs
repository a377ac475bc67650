use std::{fmt::Display, str::FromStr};

use anyhow::{Context, Result, anyhow};

use super::{
    config_model::{
        Database, DotEnvyConfig, Pagination, Reminder, Server, Telegram, TokenLifetime, UserSecret,
    },
    stage::Stage,
};

const DEFAULT_TELEGRAM_BOT_URL: &str = "https://api.telegram.org/bot";

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: required_parsed("SERVER_PORT")?,
        body_limit: required_parsed("SERVER_BODY_LIMIT")?,
        timeout: required_parsed("SERVER_TIMEOUT")?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
    };

    let token_lifetime = TokenLifetime {
        access: optional_parsed("JWT_ACCESS_TTL_SECONDS", 5 * 60)?,
        refresh: optional_parsed("JWT_REFRESH_TTL_SECONDS", 24 * 60 * 60)?,
    };

    let telegram = Telegram {
        bot_url: std::env::var("TELEGRAM_BOT_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TELEGRAM_BOT_URL.to_string()),
        bot_token: required("TELEGRAM_BOT_TOKEN")?,
        timeout: optional_parsed("TELEGRAM_TIMEOUT", 10)?,
    };

    let reminder = Reminder {
        check_interval: optional_parsed("REMINDER_CHECK_INTERVAL", 60)?,
        workers: optional_parsed("REMINDER_WORKERS", 4)?,
        queue_capacity: optional_parsed("REMINDER_QUEUE_CAPACITY", 1024)?,
    };
    if reminder.check_interval == 0 || reminder.workers == 0 || reminder.queue_capacity == 0 {
        return Err(anyhow!(
            "REMINDER_CHECK_INTERVAL, REMINDER_WORKERS and REMINDER_QUEUE_CAPACITY must be positive"
        ));
    }

    let pagination = Pagination {
        page_size: optional_parsed("PAGINATION_PAGE_SIZE", 5)?,
        max_page_size: optional_parsed("PAGINATION_MAX_PAGE_SIZE", 100)?,
    };
    if pagination.page_size < 1 || pagination.max_page_size < pagination.page_size {
        return Err(anyhow!(
            "PAGINATION_PAGE_SIZE must be positive and not above PAGINATION_MAX_PAGE_SIZE"
        ));
    }

    Ok(DotEnvyConfig {
        stage: get_stage(),
        server,
        database,
        user_secret: get_user_secret()?,
        token_lifetime,
        telegram,
        reminder,
        pagination,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

pub fn get_user_secret() -> Result<UserSecret> {
    dotenvy::dotenv().ok();

    Ok(UserSecret {
        secret: required("JWT_USER_SECRET")?,
        refresh_secret: required("JWT_USER_REFRESH_SECRET")?,
    })
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{} is invalid", name))
}

fn required_parsed<T>(name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = required(name)?;
    raw.trim()
        .parse()
        .map_err(|err| anyhow!("{} is invalid: {}", name, err))
}

fn optional_parsed<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|err| anyhow!("{} is invalid: {}", name, err)),
        _ => Ok(default),
    }
}
