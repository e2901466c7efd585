use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::breakdown::BreakdownLog;
use crate::utils::errors::AppError;

/// Parámetros de creación de una avería
#[derive(Debug)]
pub struct NewBreakdown {
    pub company_id: Uuid,
    pub asset_id: Uuid,
    pub severity: String,
    pub category: Option<String>,
    pub description: String,
    pub reported_by: Uuid,
    pub reported_date: DateTime<Utc>,
}

/// Patch de campos de una avería. Las mutaciones corren sobre conexión
/// explícita porque comparten transacción con el reconciler de estado.
#[derive(Debug, Default)]
pub struct BreakdownPatch {
    pub status: Option<String>,
    pub severity: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub repair_cost: Option<Decimal>,
    pub downtime_hours: Option<Decimal>,
    pub assigned_to: Option<Uuid>,
    pub resolved_by: Option<Uuid>,
    pub resolved_date: Option<DateTime<Utc>>,
}

/// Fila de listado: la avería junto con el estado actual de su asset
#[derive(Debug, sqlx::FromRow)]
pub struct BreakdownWithAssetStatus {
    #[sqlx(flatten)]
    pub log: BreakdownLog,
    pub asset_status: String,
}

pub struct BreakdownRepository {
    pool: PgPool,
}

impl BreakdownRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_on(
        conn: &mut PgConnection,
        breakdown: NewBreakdown,
    ) -> Result<BreakdownLog, AppError> {
        let inserted = sqlx::query_as::<_, BreakdownLog>(
            r#"
            INSERT INTO breakdown_logs (
                id, company_id, asset_id, status, severity, category,
                description, reported_by, reported_date, created_at
            )
            VALUES ($1, $2, $3, 'reported', $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(breakdown.company_id)
        .bind(breakdown.asset_id)
        .bind(breakdown.severity)
        .bind(breakdown.category)
        .bind(breakdown.description)
        .bind(breakdown.reported_by)
        .bind(breakdown.reported_date)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(inserted)
    }

    pub async fn find_by_id_on(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<BreakdownLog>, AppError> {
        let breakdown =
            sqlx::query_as::<_, BreakdownLog>("SELECT * FROM breakdown_logs WHERE id = $1")
                .bind(id)
                .fetch_optional(conn)
                .await?;

        Ok(breakdown)
    }

    pub async fn apply_patch_on(
        conn: &mut PgConnection,
        id: Uuid,
        patch: BreakdownPatch,
    ) -> Result<BreakdownLog, AppError> {
        let updated = sqlx::query_as::<_, BreakdownLog>(
            r#"
            UPDATE breakdown_logs
            SET status = COALESCE($2, status),
                severity = COALESCE($3, severity),
                category = COALESCE($4, category),
                description = COALESCE($5, description),
                repair_cost = COALESCE($6, repair_cost),
                downtime_hours = COALESCE($7, downtime_hours),
                assigned_to = COALESCE($8, assigned_to),
                resolved_by = COALESCE($9, resolved_by),
                resolved_date = COALESCE($10, resolved_date)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.status)
        .bind(patch.severity)
        .bind(patch.category)
        .bind(patch.description)
        .bind(patch.repair_cost)
        .bind(patch.downtime_hours)
        .bind(patch.assigned_to)
        .bind(patch.resolved_by)
        .bind(patch.resolved_date)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Breakdown with id '{}' not found", id)))?;

        Ok(updated)
    }

    pub async fn list_by_company(
        &self,
        company_id: Uuid,
        asset_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<BreakdownWithAssetStatus>, AppError> {
        let breakdowns = sqlx::query_as::<_, BreakdownWithAssetStatus>(
            r#"
            SELECT b.*, a.status AS asset_status
            FROM breakdown_logs b
            JOIN assets a ON a.id = b.asset_id
            WHERE b.company_id = $1
              AND ($2::uuid IS NULL OR b.asset_id = $2)
            ORDER BY b.reported_date DESC
            LIMIT $3
            "#,
        )
        .bind(company_id)
        .bind(asset_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(breakdowns)
    }
}
