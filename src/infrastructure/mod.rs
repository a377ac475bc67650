pub mod axum_http;
pub mod postgres;
pub mod security;
pub mod telegram;
