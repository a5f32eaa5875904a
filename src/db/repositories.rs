use async_trait::async_trait;

use crate::series::{MarketTable, MultiSeriesRow, RawValue, SeriesRow, SeriesSelection};

use super::{
    error::Result,
    models::{NewTrend, NewUser, TrendCategory, TrendRow, UserRow, UserUpdate},
};

#[async_trait]
pub(crate) trait MarketSeriesRepository: Send + Sync {
    /// Fetches `Time` and the selected column of every row, ordered by time of day.
    async fn get_series(&self, selection: SeriesSelection) -> Result<Vec<SeriesRow>>;

    /// Fetches `Time` and every instrument column of `table`, ordered by time of day.
    async fn get_multi_series(&self, table: MarketTable) -> Result<Vec<MultiSeriesRow<RawValue>>>;
}

#[async_trait]
pub(crate) trait TrendsRepository: Send + Sync {
    async fn get_trends(&self, category: Option<TrendCategory>) -> Result<Vec<TrendRow>>;

    async fn get_trend(&self, trend_id: i32) -> Result<Option<TrendRow>>;

    async fn add_trend(&self, trend: &NewTrend) -> Result<TrendRow>;

    /// Returns `false` if no trend with `trend_id` existed.
    async fn remove_trend(&self, trend_id: i32) -> Result<bool>;
}

#[async_trait]
pub(crate) trait UsersRepository: Send + Sync {
    /// Returns all users, most recently created first.
    async fn get_users(&self) -> Result<Vec<UserRow>>;

    /// Fails with [`DbError::UniqueViolation`] if the email is already registered.
    ///
    /// [`DbError::UniqueViolation`]: super::error::DbError::UniqueViolation
    async fn add_user(&self, user: &NewUser) -> Result<UserRow>;

    async fn get_user_by_credentials(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<UserRow>>;

    async fn update_user(&self, user_id: i32, update: &UserUpdate) -> Result<Option<UserRow>>;

    /// Returns `false` if no user with `user_id` existed.
    async fn remove_user(&self, user_id: i32) -> Result<bool>;
}
