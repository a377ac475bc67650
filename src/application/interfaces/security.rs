use anyhow::Result;
use mockall::automock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

#[automock]
pub trait PasswordService {
    fn hash_password(&self, password: &str) -> Result<String>;
    fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool>;
}

#[automock]
pub trait TokenService {
    fn issue(&self, user_id: i64, kind: TokenKind) -> Result<String>;
    /// Returns the user id carried by a valid, unexpired token of the given kind.
    fn verify(&self, token: &str, kind: TokenKind) -> Result<i64>;
}
