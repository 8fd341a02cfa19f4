//! SurrealDB implementation of [`KpiRepository`].
//!
//! Metrics are computed by aggregate queries at call time; nothing is
//! cached or persisted.

use std::collections::HashMap;

use agristock_core::error::Result;
use agristock_core::models::kpi::{Kpi, KpiOverview};
use agristock_core::repository::KpiRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

#[derive(Debug, SurrealValue)]
struct SumRow {
    total: f64,
}

#[derive(Debug, SurrealValue)]
struct HangarSummaryRow {
    record_id: String,
    name: String,
    capacity_kg: f64,
}

#[derive(Debug, SurrealValue)]
struct StoredPerHangarRow {
    hangar_id: String,
    stored: f64,
}

/// SurrealDB implementation of the KPI repository.
#[derive(Clone)]
pub struct SurrealKpiRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealKpiRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn count(&self, query: &str) -> std::result::Result<u64, DbError> {
        let mut result = self.db.query(query).await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}

impl<C: Connection> KpiRepository for SurrealKpiRepository<C> {
    async fn overview(&self) -> Result<KpiOverview> {
        let mut kpis = Vec::new();

        // Total stored quantity across all hangars.
        let mut sum_result = self
            .db
            .query(
                "SELECT math::sum(quantity_kg) AS total FROM batch \
                 WHERE status = 'Stored' GROUP ALL",
            )
            .await
            .map_err(DbError::from)?;
        let sum_rows: Vec<SumRow> = sum_result.take(0).map_err(DbError::from)?;
        let total_stock = sum_rows.first().map(|r| r.total).unwrap_or(0.0);
        kpis.push(Kpi::TotalStock {
            quantity_kg: total_stock,
        });

        // Stored quantity per hangar, joined against the hangar list so
        // empty hangars still appear with zero.
        let mut stored_result = self
            .db
            .query(
                "SELECT hangar_id, math::sum(quantity_kg) AS stored FROM batch \
                 WHERE status = 'Stored' GROUP BY hangar_id",
            )
            .await
            .map_err(DbError::from)?;
        let stored_rows: Vec<StoredPerHangarRow> =
            stored_result.take(0).map_err(DbError::from)?;
        let stored_by_hangar: HashMap<String, f64> = stored_rows
            .into_iter()
            .map(|r| (r.hangar_id, r.stored))
            .collect();

        let mut hangar_result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, name, capacity_kg FROM hangar \
                 ORDER BY name ASC",
            )
            .await
            .map_err(DbError::from)?;
        let hangar_rows: Vec<HangarSummaryRow> =
            hangar_result.take(0).map_err(DbError::from)?;

        for hangar in hangar_rows {
            let hangar_id = Uuid::parse_str(&hangar.record_id)
                .map_err(|e| DbError::Decode(format!("invalid hangar UUID: {e}")))?;
            let stored_kg = stored_by_hangar
                .get(&hangar.record_id)
                .copied()
                .unwrap_or(0.0);
            kpis.push(Kpi::HangarOccupancy {
                hangar_id,
                name: hangar.name,
                capacity_kg: hangar.capacity_kg,
                stored_kg,
            });
        }

        let open_interventions = self
            .count(
                "SELECT count() AS total FROM intervention \
                 WHERE status IN ['Pending', 'InProgress'] GROUP ALL",
            )
            .await?;
        kpis.push(Kpi::OpenInterventions {
            count: open_interventions,
        });

        let unacknowledged = self
            .count(
                "SELECT count() AS total FROM alert \
                 WHERE acknowledged = false GROUP ALL",
            )
            .await?;
        kpis.push(Kpi::UnacknowledgedAlerts {
            count: unacknowledged,
        });

        let pending_approvals = self
            .count(
                "SELECT count() AS total FROM user \
                 WHERE is_approved = false GROUP ALL",
            )
            .await?;
        kpis.push(Kpi::PendingApprovals {
            count: pending_approvals,
        });

        Ok(KpiOverview { kpis })
    }
}
