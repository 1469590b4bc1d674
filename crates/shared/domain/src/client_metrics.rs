//! Client metrics aggregate - a single body measurement record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MAX_BODY_FAT_PERCENTAGE;
use crate::error::{optional_text, DomainError, DomainResult};
use crate::nutrition::body_mass_index;
use crate::value_objects::{round_to, Height, Weight};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

/// Measurements captured in one session.
#[derive(Debug, Clone)]
pub struct RecordMetrics {
    pub weight: Weight,
    pub height: Height,
    pub body_fat_percentage: Option<f64>,
    pub waist_circumference: Option<f64>,
    pub hip_circumference: Option<f64>,
    /// Defaults to now
    pub recorded_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl RecordMetrics {
    pub fn new(weight: Weight, height: Height) -> Self {
        Self {
            weight,
            height,
            body_fat_percentage: None,
            waist_circumference: None,
            hip_circumference: None,
            recorded_at: None,
            notes: None,
        }
    }
}

/// Persisted shape of [`ClientMetrics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientMetricsProps {
    pub id: Uuid,
    pub client_id: Uuid,
    pub weight: Weight,
    pub height: Height,
    pub bmi: f64,
    pub body_fat_percentage: Option<f64>,
    pub waist_circumference: Option<f64>,
    pub hip_circumference: Option<f64>,
    pub recorded_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Immutable after creation. BMI is computed once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientMetrics {
    props: ClientMetricsProps,
}

fn check_circumference(value: Option<f64>, field: &str) -> DomainResult<()> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(DomainError::validation(format!(
            "{} must be greater than 0",
            field
        ))
        .with_meta("field", field)),
        _ => Ok(()),
    }
}

impl ClientMetrics {
    pub fn create(id: Uuid, client_id: Uuid, data: RecordMetrics) -> DomainResult<Self> {
        if client_id.is_nil() {
            return Err(DomainError::validation("Client id is required").with_meta("field", "client_id"));
        }
        if let Some(body_fat) = data.body_fat_percentage {
            if !(0.0..=MAX_BODY_FAT_PERCENTAGE).contains(&body_fat) {
                return Err(DomainError::validation("Body fat percentage must be between 0 and 100")
                    .with_meta("field", "body_fat_percentage"));
            }
        }
        check_circumference(data.waist_circumference, "waist_circumference")?;
        check_circumference(data.hip_circumference, "hip_circumference")?;

        let now = Utc::now();
        Ok(Self {
            props: ClientMetricsProps {
                id,
                client_id,
                bmi: body_mass_index(&data.weight, &data.height),
                weight: data.weight,
                height: data.height,
                body_fat_percentage: data.body_fat_percentage,
                waist_circumference: data.waist_circumference,
                hip_circumference: data.hip_circumference,
                recorded_at: data.recorded_at.unwrap_or(now),
                notes: optional_text(data.notes),
                created_at: now,
            },
        })
    }

    /// Rehydrate from persisted data without validation; the stored BMI is kept.
    pub fn reconstitute(props: ClientMetricsProps) -> Self {
        Self { props }
    }

    pub fn to_props(&self) -> ClientMetricsProps {
        self.props.clone()
    }

    pub fn id(&self) -> Uuid {
        self.props.id
    }

    pub fn client_id(&self) -> Uuid {
        self.props.client_id
    }

    pub fn weight(&self) -> Weight {
        self.props.weight
    }

    pub fn height(&self) -> Height {
        self.props.height
    }

    pub fn bmi(&self) -> f64 {
        self.props.bmi
    }

    pub fn bmi_category(&self) -> BmiCategory {
        BmiCategory::from_bmi(self.props.bmi)
    }

    pub fn body_fat_percentage(&self) -> Option<f64> {
        self.props.body_fat_percentage
    }

    pub fn waist_circumference(&self) -> Option<f64> {
        self.props.waist_circumference
    }

    pub fn hip_circumference(&self) -> Option<f64> {
        self.props.hip_circumference
    }

    /// waist / hip rounded to two decimals, `None` if either is missing.
    pub fn waist_to_hip_ratio(&self) -> Option<f64> {
        let waist = self.props.waist_circumference?;
        let hip = self.props.hip_circumference?;
        Some(round_to(waist / hip, 2))
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.props.recorded_at
    }

    pub fn notes(&self) -> Option<&str> {
        self.props.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.props.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kg: f64, cm: f64) -> RecordMetrics {
        RecordMetrics::new(Weight::from_kilograms(kg).unwrap(), Height::from_centimeters(cm).unwrap())
    }

    #[test]
    fn test_bmi_computed_once() {
        let metrics = ClientMetrics::create(Uuid::new_v4(), Uuid::new_v4(), record(70.0, 175.0)).unwrap();
        assert_eq!(metrics.bmi(), 22.9);
        assert_eq!(metrics.bmi_category(), BmiCategory::Normal);
    }

    #[test]
    fn test_reconstitute_keeps_stored_bmi() {
        let metrics = ClientMetrics::create(Uuid::new_v4(), Uuid::new_v4(), record(70.0, 175.0)).unwrap();
        let mut props = metrics.to_props();
        props.bmi = 23.4;
        assert_eq!(ClientMetrics::reconstitute(props).bmi(), 23.4);
    }

    #[test]
    fn test_waist_to_hip_ratio() {
        let mut data = record(70.0, 175.0);
        data.waist_circumference = Some(80.0);
        assert_eq!(
            ClientMetrics::create(Uuid::new_v4(), Uuid::new_v4(), data.clone()).unwrap().waist_to_hip_ratio(),
            None
        );

        data.hip_circumference = Some(95.0);
        let metrics = ClientMetrics::create(Uuid::new_v4(), Uuid::new_v4(), data).unwrap();
        assert_eq!(metrics.waist_to_hip_ratio(), Some(0.84));
    }

    #[test]
    fn test_invalid_measurements_rejected() {
        let mut data = record(70.0, 175.0);
        data.body_fat_percentage = Some(101.0);
        assert!(ClientMetrics::create(Uuid::new_v4(), Uuid::new_v4(), data).is_err());

        let mut data = record(70.0, 175.0);
        data.hip_circumference = Some(0.0);
        assert!(ClientMetrics::create(Uuid::new_v4(), Uuid::new_v4(), data).is_err());

        assert!(ClientMetrics::create(Uuid::new_v4(), Uuid::nil(), record(70.0, 175.0)).is_err());
    }

    #[test]
    fn test_bmi_categories() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }
}
