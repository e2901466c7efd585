use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::fuel_tank::{FuelTank, FuelTankTransaction};
use crate::utils::errors::AppError;

/// Parámetros de inserción de una fila del ledger del tanque
#[derive(Debug)]
pub struct NewTankTransaction {
    pub tank_id: Uuid,
    pub transaction_type: String,
    pub quantity: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub asset_id: Option<Uuid>,
    pub notes: Option<String>,
    pub performed_by: Uuid,
    pub transaction_date: DateTime<Utc>,
}

pub struct FuelTankRepository {
    pool: PgPool,
}

impl FuelTankRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        company_id: Uuid,
        name: String,
        fuel_type: String,
        capacity: Decimal,
        current_level: Decimal,
        reorder_level: Decimal,
        site: Option<String>,
    ) -> Result<FuelTank, AppError> {
        let tank = sqlx::query_as::<_, FuelTank>(
            r#"
            INSERT INTO fuel_tanks (
                id, company_id, name, fuel_type, capacity, current_level,
                reorder_level, status, site, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'active', $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(name)
        .bind(fuel_type)
        .bind(capacity)
        .bind(current_level)
        .bind(reorder_level)
        .bind(site)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(tank)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        capacity: Option<Decimal>,
        reorder_level: Option<Decimal>,
        status: Option<String>,
        site: Option<String>,
    ) -> Result<FuelTank, AppError> {
        let tank = sqlx::query_as::<_, FuelTank>(
            r#"
            UPDATE fuel_tanks
            SET name = COALESCE($2, name),
                capacity = COALESCE($3, capacity),
                reorder_level = COALESCE($4, reorder_level),
                status = COALESCE($5, status),
                site = COALESCE($6, site)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(capacity)
        .bind(reorder_level)
        .bind(status)
        .bind(site)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Fuel tank with id '{}' not found", id)))?;

        Ok(tank)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FuelTank>, AppError> {
        let tank = sqlx::query_as::<_, FuelTank>("SELECT * FROM fuel_tanks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tank)
    }

    /// Leer el tanque con lock de fila. Serializa las mutaciones concurrentes
    /// contra el mismo tanque: el balance_before de la transacción coincide
    /// con current_level en el instante del commit.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<FuelTank>, AppError> {
        let tank =
            sqlx::query_as::<_, FuelTank>("SELECT * FROM fuel_tanks WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(conn)
                .await?;

        Ok(tank)
    }

    pub async fn insert_transaction_on(
        conn: &mut PgConnection,
        tx: NewTankTransaction,
    ) -> Result<FuelTankTransaction, AppError> {
        let inserted = sqlx::query_as::<_, FuelTankTransaction>(
            r#"
            INSERT INTO fuel_tank_transactions (
                id, tank_id, transaction_type, quantity, balance_before,
                balance_after, asset_id, notes, performed_by, transaction_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tx.tank_id)
        .bind(tx.transaction_type)
        .bind(tx.quantity)
        .bind(tx.balance_before)
        .bind(tx.balance_after)
        .bind(tx.asset_id)
        .bind(tx.notes)
        .bind(tx.performed_by)
        .bind(tx.transaction_date)
        .fetch_one(conn)
        .await?;

        Ok(inserted)
    }

    /// Actualizar nivel tras un refill, con bookkeeping de último refill
    pub async fn apply_refill_on(
        conn: &mut PgConnection,
        id: Uuid,
        new_level: Decimal,
        refill_quantity: Decimal,
        refill_date: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE fuel_tanks
            SET current_level = $2, last_refill_date = $3, last_refill_quantity = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(new_level)
        .bind(refill_date)
        .bind(refill_quantity)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Actualizar nivel tras un dispense
    pub async fn apply_level_on(
        conn: &mut PgConnection,
        id: Uuid,
        new_level: Decimal,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE fuel_tanks SET current_level = $2 WHERE id = $1")
            .bind(id)
            .bind(new_level)
            .execute(conn)
            .await?;

        Ok(())
    }

    pub async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<FuelTank>, AppError> {
        let tanks = sqlx::query_as::<_, FuelTank>(
            "SELECT * FROM fuel_tanks WHERE company_id = $1 ORDER BY name",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tanks)
    }

    /// Tanques activos por debajo (o en) su nivel de reorden
    pub async fn find_low_tanks(&self, company_id: Uuid) -> Result<Vec<FuelTank>, AppError> {
        let tanks = sqlx::query_as::<_, FuelTank>(
            r#"
            SELECT * FROM fuel_tanks
            WHERE company_id = $1 AND status = 'active' AND current_level <= reorder_level
            ORDER BY name
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tanks)
    }

    pub async fn list_transactions(
        &self,
        tank_id: Uuid,
        limit: i64,
    ) -> Result<Vec<FuelTankTransaction>, AppError> {
        let transactions = sqlx::query_as::<_, FuelTankTransaction>(
            r#"
            SELECT * FROM fuel_tank_transactions
            WHERE tank_id = $1
            ORDER BY transaction_date DESC
            LIMIT $2
            "#,
        )
        .bind(tank_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }
}
