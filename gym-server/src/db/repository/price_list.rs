//! Price List Repository
//!
//! Single-row configuration table (id = 1), seeded by the migration.

use super::{RepoError, RepoResult};
use shared::models::{PriceList, PriceListUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

pub async fn get(pool: &SqlitePool) -> RepoResult<PriceList> {
    let row = sqlx::query_as::<_, PriceList>(
        "SELECT daily, monthly, quarterly, annual, updated_at FROM price_list WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::Database("Price list row missing".into()))
}

pub async fn update(pool: &SqlitePool, data: PriceListUpdate) -> RepoResult<PriceList> {
    let now = now_millis();
    sqlx::query(
        "UPDATE price_list SET daily = ?, monthly = ?, quarterly = ?, annual = ?, updated_at = ? WHERE id = 1",
    )
    .bind(data.daily)
    .bind(data.monthly)
    .bind(data.quarterly)
    .bind(data.annual)
    .bind(now)
    .execute(pool)
    .await?;

    get(pool).await
}
