//! Client aggregate.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{optional_text, required_text, DomainError, DomainResult};
use crate::value_objects::Email;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        };
        f.write_str(name)
    }
}

/// Client creation data transfer object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateClient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medical_conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    pub notes: Option<String>,
}

/// Persisted shape of a [`Client`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProps {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub dietitian_id: Uuid,
    pub allergies: Vec<String>,
    pub medical_conditions: Vec<String>,
    pub medications: Vec<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Client aggregate, owned by a dietitian.
///
/// Allergy, condition and medication lists never hold blank or duplicate
/// entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    props: ClientProps,
}

/// Which of the three health lists an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HealthList {
    Allergies,
    Conditions,
    Medications,
}

impl HealthList {
    fn label(self) -> &'static str {
        match self {
            HealthList::Allergies => "Allergy",
            HealthList::Conditions => "Medical condition",
            HealthList::Medications => "Medication",
        }
    }
}

fn require_dietitian(dietitian_id: Uuid) -> DomainResult<()> {
    if dietitian_id.is_nil() {
        return Err(DomainError::validation("Dietitian id is required").with_meta("field", "dietitian_id"));
    }
    Ok(())
}

fn normalized_entry(value: &str, list: HealthList) -> DomainResult<String> {
    required_text(value, list.label())
}

fn normalized_list(values: Vec<String>, list: HealthList) -> DomainResult<Vec<String>> {
    let mut entries: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let entry = normalized_entry(&value, list)?;
        if !entries.contains(&entry) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

fn check_birth_date(date_of_birth: Option<NaiveDate>) -> DomainResult<()> {
    if let Some(dob) = date_of_birth {
        if dob > Utc::now().date_naive() {
            return Err(DomainError::validation("Date of birth cannot be in the future")
                .with_meta("field", "date_of_birth"));
        }
    }
    Ok(())
}

impl Client {
    /// Create a new, active client for `dietitian_id`.
    pub fn create(id: Uuid, dietitian_id: Uuid, data: CreateClient) -> DomainResult<Self> {
        require_dietitian(dietitian_id)?;
        check_birth_date(data.date_of_birth)?;
        let now = Utc::now();

        Ok(Self {
            props: ClientProps {
                id,
                first_name: required_text(&data.first_name, "First name")?,
                last_name: required_text(&data.last_name, "Last name")?,
                email: Email::create(&data.email)?,
                phone: optional_text(data.phone),
                date_of_birth: data.date_of_birth,
                gender: data.gender,
                dietitian_id,
                allergies: normalized_list(data.allergies, HealthList::Allergies)?,
                medical_conditions: normalized_list(data.medical_conditions, HealthList::Conditions)?,
                medications: normalized_list(data.medications, HealthList::Medications)?,
                notes: optional_text(data.notes),
                is_active: true,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            },
        })
    }

    /// Rehydrate from persisted data without validation.
    pub fn reconstitute(props: ClientProps) -> Self {
        Self { props }
    }

    pub fn to_props(&self) -> ClientProps {
        self.props.clone()
    }

    pub fn id(&self) -> Uuid {
        self.props.id
    }

    pub fn first_name(&self) -> &str {
        &self.props.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.props.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.props.first_name, self.props.last_name)
    }

    pub fn email(&self) -> &Email {
        &self.props.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.props.phone.as_deref()
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.props.date_of_birth
    }

    pub fn gender(&self) -> Option<Gender> {
        self.props.gender
    }

    pub fn dietitian_id(&self) -> Uuid {
        self.props.dietitian_id
    }

    pub fn allergies(&self) -> &[String] {
        &self.props.allergies
    }

    pub fn medical_conditions(&self) -> &[String] {
        &self.props.medical_conditions
    }

    pub fn medications(&self) -> &[String] {
        &self.props.medications
    }

    pub fn notes(&self) -> Option<&str> {
        self.props.notes.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.props.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.props.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.props.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.props.deleted_at
    }

    pub fn is_deleted(&self) -> bool {
        self.props.deleted_at.is_some()
    }

    /// Age in whole years on `today`, `None` without a date of birth.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let dob = self.props.date_of_birth?;
        let mut years = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }

    pub fn age(&self) -> Option<u32> {
        self.age_on(Utc::now().date_naive())
    }

    pub fn add_allergy(&mut self, allergy: &str) -> DomainResult<()> {
        self.add_entry(HealthList::Allergies, allergy)
    }

    pub fn remove_allergy(&mut self, allergy: &str) {
        self.remove_entry(HealthList::Allergies, allergy);
    }

    pub fn add_medical_condition(&mut self, condition: &str) -> DomainResult<()> {
        self.add_entry(HealthList::Conditions, condition)
    }

    pub fn remove_medical_condition(&mut self, condition: &str) {
        self.remove_entry(HealthList::Conditions, condition);
    }

    pub fn add_medication(&mut self, medication: &str) -> DomainResult<()> {
        self.add_entry(HealthList::Medications, medication)
    }

    pub fn remove_medication(&mut self, medication: &str) {
        self.remove_entry(HealthList::Medications, medication);
    }

    pub fn update_profile(
        &mut self,
        first_name: &str,
        last_name: &str,
        date_of_birth: Option<NaiveDate>,
        gender: Option<Gender>,
    ) -> DomainResult<()> {
        let first_name = required_text(first_name, "First name")?;
        let last_name = required_text(last_name, "Last name")?;
        check_birth_date(date_of_birth)?;

        self.props.first_name = first_name;
        self.props.last_name = last_name;
        self.props.date_of_birth = date_of_birth;
        self.props.gender = gender;
        self.touch();
        Ok(())
    }

    pub fn update_contact(&mut self, email: Email, phone: Option<String>) {
        self.props.email = email;
        self.props.phone = optional_text(phone);
        self.touch();
    }

    pub fn update_notes(&mut self, notes: Option<String>) {
        self.props.notes = optional_text(notes);
        self.touch();
    }

    /// Hand the client over to another dietitian.
    pub fn assign_to_dietitian(&mut self, dietitian_id: Uuid) -> DomainResult<()> {
        require_dietitian(dietitian_id)?;
        self.props.dietitian_id = dietitian_id;
        self.touch();
        Ok(())
    }

    pub fn activate(&mut self) {
        self.props.is_active = true;
        self.touch();
    }

    pub fn deactivate(&mut self) {
        self.props.is_active = false;
        self.touch();
    }

    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.props.deleted_at = Some(now);
        self.props.is_active = false;
        self.props.updated_at = now;
    }

    fn list_mut(&mut self, list: HealthList) -> &mut Vec<String> {
        match list {
            HealthList::Allergies => &mut self.props.allergies,
            HealthList::Conditions => &mut self.props.medical_conditions,
            HealthList::Medications => &mut self.props.medications,
        }
    }

    fn add_entry(&mut self, list: HealthList, value: &str) -> DomainResult<()> {
        let entry = normalized_entry(value, list)?;
        let entries = self.list_mut(list);
        if entries.contains(&entry) {
            return Ok(());
        }
        entries.push(entry);
        self.touch();
        Ok(())
    }

    fn remove_entry(&mut self, list: HealthList, value: &str) {
        let value = value.trim();
        let entries = self.list_mut(list);
        let before = entries.len();
        entries.retain(|entry| entry != value);
        if entries.len() != before {
            self.touch();
        }
    }

    fn touch(&mut self) {
        self.props.updated_at = Utc::now();
    }
}
