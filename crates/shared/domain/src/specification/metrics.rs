//! Client metrics specifications.

use serde_json::Value;
use uuid::Uuid;

use super::{record_of, Filter, Record, Specification};
use crate::client_metrics::ClientMetrics;

impl Record for ClientMetrics {
    fn to_record(&self) -> Value {
        record_of(&self.to_props())
    }
}

#[derive(Debug, Clone)]
pub struct MetricsForClient {
    pub client_id: Uuid,
}

impl Specification<ClientMetrics> for MetricsForClient {
    fn is_satisfied_by(&self, metrics: &ClientMetrics) -> bool {
        metrics.client_id() == self.client_id
    }

    fn to_filter(&self) -> Filter {
        Filter::eq("client_id", self.client_id)
    }

    fn describe(&self) -> String {
        format!("metrics of client {}", self.client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_metrics::RecordMetrics;
    use crate::specification::testing::assert_faces_agree;
    use crate::value_objects::{Height, Weight};

    fn reading(client_id: Uuid, kg: f64) -> ClientMetrics {
        let data = RecordMetrics::new(
            Weight::from_kilograms(kg).unwrap(),
            Height::from_centimeters(172.0).unwrap(),
        );
        ClientMetrics::create(Uuid::new_v4(), client_id, data).unwrap()
    }

    #[test]
    fn test_metrics_for_client_faces_agree() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let history = vec![reading(alice, 64.0), reading(bob, 90.5), reading(alice, 63.2), reading(bob, 89.9)];

        let spec = MetricsForClient { client_id: alice };
        let weights: Vec<f64> = history
            .iter()
            .filter(|m| spec.is_satisfied_by(m))
            .map(|m| m.weight().kilograms())
            .collect();
        assert_eq!(weights, [64.0, 63.2]);
        assert_faces_agree(&spec, &history);

        let nobody = MetricsForClient { client_id: Uuid::new_v4() };
        assert!(history.iter().all(|m| !nobody.is_satisfied_by(m)));
        assert_faces_agree(&nobody, &history);
    }
}
