use super::stage::Stage;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub stage: Stage,
    pub server: Server,
    pub database: Database,
    pub user_secret: UserSecret,
    pub token_lifetime: TokenLifetime,
    pub telegram: Telegram,
    pub reminder: Reminder,
    pub pagination: Pagination,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct UserSecret {
    pub secret: String,
    pub refresh_secret: String,
}

/// Lifetimes in seconds.
#[derive(Debug, Clone)]
pub struct TokenLifetime {
    pub access: i64,
    pub refresh: i64,
}

#[derive(Debug, Clone)]
pub struct Telegram {
    pub bot_url: String,
    pub bot_token: String,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Reminder {
    pub check_interval: u64,
    pub workers: usize,
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page_size: i64,
    pub max_page_size: i64,
}
