use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Catalog category of a [`TrendRow`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrendCategory {
    Stocks,
    Crypto,
}

/// Database row representing a catalog entry for an investment opportunity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRow {
    pub trend_id: i32,
    pub trend_name: String,
    pub image: Option<String>,
    pub category: TrendCategory,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTrend {
    pub name: String,
    pub image: Option<String>,
    pub category: TrendCategory,
    pub description: Option<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

/// Database row representing a registered user. The password digest is never loaded into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub address: String,
    pub contact: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// Hex encoded SHA-256 digest.
    pub password_hash: String,
    pub address: String,
    pub contact: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    pub address: String,
    pub contact: String,
    pub role: UserRole,
}
