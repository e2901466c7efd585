use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::asset::Asset;
use crate::utils::errors::AppError;

pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Asset>, AppError> {
        let asset = sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(asset)
    }

    /// Variante sobre conexión, para usar dentro de una transacción de tanque
    pub async fn find_by_id_on(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Asset>, AppError> {
        let asset = sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(asset)
    }

    /// Actualizar el snapshot cacheado de lecturas del asset.
    ///
    /// Best-effort respecto al insert en el ledger: si este write se pierde,
    /// el cache queda stale pero es reconstruible desde el ledger
    /// (ver rebuild_cached_readings).
    pub async fn update_cached_readings(
        &self,
        id: Uuid,
        odometer: Option<Decimal>,
        hours: Option<Decimal>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE assets
            SET current_odometer = COALESCE($2, current_odometer),
                current_hours = COALESCE($3, current_hours),
                readings_updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(odometer)
        .bind(hours)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Reconstruir el snapshot cacheado desde el ledger de fuel_records.
    ///
    /// Toma la última lectura no nula de odómetro y de horas por fecha de
    /// transacción. Operación de replay para recuperar un cache stale.
    pub async fn rebuild_cached_readings(&self, id: Uuid) -> Result<Asset, AppError> {
        let latest_odometer: Option<(Decimal,)> = sqlx::query_as(
            r#"
            SELECT odometer_reading FROM fuel_records
            WHERE asset_id = $1 AND odometer_reading IS NOT NULL
            ORDER BY transaction_date DESC
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let latest_hours: Option<(Decimal,)> = sqlx::query_as(
            r#"
            SELECT hours_reading FROM fuel_records
            WHERE asset_id = $1 AND hours_reading IS NOT NULL
            ORDER BY transaction_date DESC
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let asset = sqlx::query_as::<_, Asset>(
            r#"
            UPDATE assets
            SET current_odometer = $2,
                current_hours = $3,
                readings_updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(latest_odometer.map(|r| r.0))
        .bind(latest_hours.map(|r| r.0))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Asset with id '{}' not found", id)))?;

        Ok(asset)
    }
}
