//! Metrics service - body measurements and energy estimates.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use common::{AppResult, NutritionConfig, OptionExt};
use domain::nutrition::{daily_calories, macronutrients};
use domain::specification::MetricsForClient;
use domain::{BmiCategory, Client, ClientMetrics, DomainError, MacroTargets, RecordMetrics, Specification};

use crate::repository::{ClientMetricsRepository, ClientRepository, SortOrder};

/// Estimated daily intake for a client, from the latest measurements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyNeeds {
    pub calories: u32,
    pub macros: MacroTargets,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
}

#[async_trait]
pub trait MetricsService: Send + Sync {
    async fn record_metrics(&self, client_id: Uuid, data: RecordMetrics) -> AppResult<ClientMetrics>;

    /// All measurements of a client, newest first
    async fn history(&self, client_id: Uuid) -> AppResult<Vec<ClientMetrics>>;

    async fn latest(&self, client_id: Uuid) -> AppResult<ClientMetrics>;

    /// Calories and macros from the latest measurements and the configured split
    async fn estimate_daily_needs(&self, client_id: Uuid) -> AppResult<DailyNeeds>;

    async fn delete_metrics(&self, id: Uuid) -> AppResult<()>;
}

pub struct MetricsManager {
    metrics: Arc<dyn ClientMetricsRepository>,
    clients: Arc<dyn ClientRepository>,
    nutrition: NutritionConfig,
}

impl MetricsManager {
    pub fn new(
        metrics: Arc<dyn ClientMetricsRepository>,
        clients: Arc<dyn ClientRepository>,
        nutrition: NutritionConfig,
    ) -> Self {
        Self {
            metrics,
            clients,
            nutrition,
        }
    }

    async fn client(&self, client_id: Uuid) -> AppResult<Client> {
        self.clients
            .find_by_id(client_id)
            .await?
            .ok_or_not_found("Client", client_id)
    }
}

#[async_trait]
impl MetricsService for MetricsManager {
    async fn record_metrics(&self, client_id: Uuid, data: RecordMetrics) -> AppResult<ClientMetrics> {
        self.client(client_id).await?;

        let metrics = ClientMetrics::create(self.metrics.next_id(), client_id, data)?;
        let metrics = self.metrics.create(&metrics).await?;

        info!(client_id = %client_id, bmi = metrics.bmi(), "Metrics recorded");
        Ok(metrics)
    }

    async fn history(&self, client_id: Uuid) -> AppResult<Vec<ClientMetrics>> {
        let spec = MetricsForClient { client_id };
        self.metrics
            .find_sorted(&spec.to_filter(), &SortOrder::desc("recorded_at"))
            .await
    }

    async fn latest(&self, client_id: Uuid) -> AppResult<ClientMetrics> {
        self.metrics
            .find_latest_by_client_id(client_id)
            .await?
            .ok_or_not_found("ClientMetrics", client_id)
    }

    async fn estimate_daily_needs(&self, client_id: Uuid) -> AppResult<DailyNeeds> {
        let client = self.client(client_id).await?;

        let age = client.age().ok_or_else(|| {
            DomainError::validation("Client date of birth is required for energy estimation")
                .with_meta("field", "date_of_birth")
                .with_meta("client_id", client_id)
        })?;
        let gender = client.gender().ok_or_else(|| {
            DomainError::validation("Client gender is required for energy estimation")
                .with_meta("field", "gender")
                .with_meta("client_id", client_id)
        })?;
        let latest = self.latest(client_id).await?;

        let calories = daily_calories(
            latest.weight().kilograms(),
            latest.height().centimeters(),
            age,
            gender,
            self.nutrition.activity_level,
        )?;
        let macros = macronutrients(f64::from(calories), self.nutrition.macro_split())?;
        debug!(client_id = %client_id, calories, "Daily needs estimated");

        Ok(DailyNeeds {
            calories,
            macros,
            bmi: latest.bmi(),
            bmi_category: latest.bmi_category(),
        })
    }

    async fn delete_metrics(&self, id: Uuid) -> AppResult<()> {
        self.metrics.delete(id).await
    }
}
