use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::fuel_record::FuelRecord;
use crate::utils::errors::AppError;

/// Parámetros de inserción de un FuelRecord. El record es inmutable una vez
/// creado: no existe método de update en este repositorio.
#[derive(Debug)]
pub struct NewFuelRecord {
    pub company_id: Uuid,
    pub asset_id: Uuid,
    pub transaction_date: DateTime<Utc>,
    pub transaction_type: String,
    pub fuel_type: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_cost: Decimal,
    pub odometer_reading: Option<Decimal>,
    pub hours_reading: Option<Decimal>,
    pub distance_since_last: Option<Decimal>,
    pub hours_since_last: Option<Decimal>,
    pub fuel_efficiency: Option<Decimal>,
    pub site: Option<String>,
    pub submitted_by: Uuid,
}

pub struct FuelRecordRepository {
    pool: PgPool,
}

impl FuelRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar sobre una conexión explícita (cascada de dispense corre
    /// dentro de la transacción del tanque).
    pub async fn insert_on(
        conn: &mut PgConnection,
        record: NewFuelRecord,
    ) -> Result<FuelRecord, AppError> {
        let inserted = sqlx::query_as::<_, FuelRecord>(
            r#"
            INSERT INTO fuel_records (
                id, company_id, asset_id, transaction_date, transaction_type,
                fuel_type, quantity, unit_price, total_cost,
                odometer_reading, hours_reading,
                distance_since_last, hours_since_last, fuel_efficiency,
                site, submitted_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.company_id)
        .bind(record.asset_id)
        .bind(record.transaction_date)
        .bind(record.transaction_type)
        .bind(record.fuel_type)
        .bind(record.quantity)
        .bind(record.unit_price)
        .bind(record.total_cost)
        .bind(record.odometer_reading)
        .bind(record.hours_reading)
        .bind(record.distance_since_last)
        .bind(record.hours_since_last)
        .bind(record.fuel_efficiency)
        .bind(record.site)
        .bind(record.submitted_by)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(inserted)
    }

    pub async fn insert(&self, record: NewFuelRecord) -> Result<FuelRecord, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_on(&mut conn, record).await
    }

    /// Registro anterior más reciente del asset, con transaction_date
    /// estrictamente anterior a la fecha dada. Input del motor de métricas.
    pub async fn find_latest_before_on(
        conn: &mut PgConnection,
        asset_id: Uuid,
        before: DateTime<Utc>,
    ) -> Result<Option<FuelRecord>, AppError> {
        let record = sqlx::query_as::<_, FuelRecord>(
            r#"
            SELECT * FROM fuel_records
            WHERE asset_id = $1 AND transaction_date < $2
            ORDER BY transaction_date DESC
            LIMIT 1
            "#,
        )
        .bind(asset_id)
        .bind(before)
        .fetch_optional(conn)
        .await?;

        Ok(record)
    }

    pub async fn find_latest_before(
        &self,
        asset_id: Uuid,
        before: DateTime<Utc>,
    ) -> Result<Option<FuelRecord>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::find_latest_before_on(&mut conn, asset_id, before).await
    }

    pub async fn list_for_asset(
        &self,
        asset_id: Uuid,
        limit: i64,
    ) -> Result<Vec<FuelRecord>, AppError> {
        let records = sqlx::query_as::<_, FuelRecord>(
            r#"
            SELECT * FROM fuel_records
            WHERE asset_id = $1
            ORDER BY transaction_date DESC
            LIMIT $2
            "#,
        )
        .bind(asset_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Registros de una empresa dentro de una ventana temporal, con cap de
    /// filas para acotar la latencia de los reportes.
    pub async fn find_in_window(
        &self,
        company_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        asset_id: Option<Uuid>,
        row_cap: i64,
    ) -> Result<Vec<FuelRecord>, AppError> {
        let records = sqlx::query_as::<_, FuelRecord>(
            r#"
            SELECT * FROM fuel_records
            WHERE company_id = $1
              AND transaction_date >= $2
              AND transaction_date <= $3
              AND ($4::uuid IS NULL OR asset_id = $4)
            ORDER BY transaction_date DESC
            LIMIT $5
            "#,
        )
        .bind(company_id)
        .bind(from)
        .bind(to)
        .bind(asset_id)
        .bind(row_cap)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
