//! Specification predicates.
//!
//! A specification has two faces that must agree: an in-memory test
//! ([`Specification::is_satisfied_by`]) and a persistence filter
//! ([`Specification::to_filter`]). Combinators apply the same operator to
//! both faces.

mod client;
mod diet_plan;
mod filter;
mod food_item;
mod metrics;
mod user;

pub use client::{ActiveClientsOfDietitian, ClientsOfDietitian, ClientsWithAllergy, ClientNameContains};
pub use diet_plan::{active_plan_for_client, DietPlansByDietitian, DietPlansByStatus, DietPlansForClient};
pub use filter::{Filter, FilterValue};
pub use food_item::{ActiveFoods, FoodNameContains, FoodsByCategory, HighProteinLowCalorieFoods};
pub use metrics::MetricsForClient;
pub use user::{ActiveUsers, UserWithEmail, UsersByRole};

use std::marker::PhantomData;

use serde_json::Value;

/// Persisted record of an entity, keyed by column name.
pub trait Record {
    fn to_record(&self) -> Value;
}

/// Entities that support soft deletion.
pub trait SoftDeletable {
    fn is_deleted(&self) -> bool;
}

pub trait Specification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    fn to_filter(&self) -> Filter;

    /// Human-readable name, used in logs
    fn describe(&self) -> String;

    fn and<S>(self, other: S) -> And<Self, S>
    where
        Self: Sized,
        S: Specification<T>,
    {
        And { left: self, right: other }
    }

    fn or<S>(self, other: S) -> Or<Self, S>
    where
        Self: Sized,
        S: Specification<T>,
    {
        Or { left: self, right: other }
    }

    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not { inner: self }
    }
}

impl<T, S> Specification<T> for Box<S>
where
    S: Specification<T> + ?Sized,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        (**self).is_satisfied_by(candidate)
    }

    fn to_filter(&self) -> Filter {
        (**self).to_filter()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<T, S> Specification<T> for &S
where
    S: Specification<T> + ?Sized,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        (**self).is_satisfied_by(candidate)
    }

    fn to_filter(&self) -> Filter {
        (**self).to_filter()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[derive(Debug, Clone)]
pub struct And<L, R> {
    left: L,
    right: R,
}

impl<T, L, R> Specification<T> for And<L, R>
where
    L: Specification<T>,
    R: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.left.is_satisfied_by(candidate) && self.right.is_satisfied_by(candidate)
    }

    fn to_filter(&self) -> Filter {
        self.left.to_filter().and(self.right.to_filter())
    }

    fn describe(&self) -> String {
        format!("({} AND {})", self.left.describe(), self.right.describe())
    }
}

#[derive(Debug, Clone)]
pub struct Or<L, R> {
    left: L,
    right: R,
}

impl<T, L, R> Specification<T> for Or<L, R>
where
    L: Specification<T>,
    R: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.left.is_satisfied_by(candidate) || self.right.is_satisfied_by(candidate)
    }

    fn to_filter(&self) -> Filter {
        self.left.to_filter().or(self.right.to_filter())
    }

    fn describe(&self) -> String {
        format!("({} OR {})", self.left.describe(), self.right.describe())
    }
}

/// Negation. Only agrees with its filter when the inner filter never
/// evaluates to UNKNOWN, i.e. it reads non-nullable columns.
#[derive(Debug, Clone)]
pub struct Not<S> {
    inner: S,
}

impl<T, S> Specification<T> for Not<S>
where
    S: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        !self.inner.is_satisfied_by(candidate)
    }

    fn to_filter(&self) -> Filter {
        self.inner.to_filter().negate()
    }

    fn describe(&self) -> String {
        format!("NOT {}", self.inner.describe())
    }
}

/// Excludes soft-deleted entities.
pub struct NotDeleted<T> {
    _entity: PhantomData<fn(&T)>,
}

impl<T> NotDeleted<T> {
    pub fn new() -> Self {
        Self { _entity: PhantomData }
    }
}

impl<T> Default for NotDeleted<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SoftDeletable> Specification<T> for NotDeleted<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        !candidate.is_deleted()
    }

    fn to_filter(&self) -> Filter {
        Filter::is_null("deleted_at")
    }

    fn describe(&self) -> String {
        "not deleted".to_string()
    }
}

/// Matches everything.
pub struct Everything<T> {
    _entity: PhantomData<fn(&T)>,
}

impl<T> Everything<T> {
    pub fn new() -> Self {
        Self { _entity: PhantomData }
    }
}

impl<T> Default for Everything<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Specification<T> for Everything<T> {
    fn is_satisfied_by(&self, _candidate: &T) -> bool {
        true
    }

    fn to_filter(&self) -> Filter {
        Filter::All
    }

    fn describe(&self) -> String {
        "everything".to_string()
    }
}

/// Ad-hoc specification from a closure and its matching filter.
///
/// The caller is responsible for keeping `test` and `filter` in agreement.
pub struct Predicate<T, F> {
    name: String,
    filter: Filter,
    test: F,
    _entity: PhantomData<fn(&T)>,
}

impl<T, F> Predicate<T, F>
where
    F: Fn(&T) -> bool,
{
    pub fn new(name: impl Into<String>, filter: Filter, test: F) -> Self {
        Self {
            name: name.into(),
            filter,
            test,
            _entity: PhantomData,
        }
    }
}

impl<T, F> Specification<T> for Predicate<T, F>
where
    F: Fn(&T) -> bool,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        (self.test)(candidate)
    }

    fn to_filter(&self) -> Filter {
        self.filter.clone()
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// Serialize entity props into a record, falling back to `null`.
pub(crate) fn record_of<P: serde::Serialize>(props: &P) -> Value {
    serde_json::to_value(props).unwrap_or(Value::Null)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Record, Specification};

    /// Both faces agree on every candidate.
    pub fn assert_faces_agree<T: Record, S: Specification<T>>(spec: &S, candidates: &[T]) {
        let filter = spec.to_filter();
        for (index, candidate) in candidates.iter().enumerate() {
            assert_eq!(
                spec.is_satisfied_by(candidate),
                filter.matches(&candidate.to_record()),
                "{} disagrees on candidate {}",
                spec.describe(),
                index
            );
        }
    }
}
