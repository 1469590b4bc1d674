//! End-to-end domain scenarios across aggregates.

use chrono::{Duration, NaiveDate, Utc};
use domain::constants::DEFAULT_COMPLIANCE_TOLERANCE_PCT;
use domain::nutrition::{self, check_targets, macronutrients};
use domain::specification::{
    active_plan_for_client, ActiveClientsOfDietitian, ClientsWithAllergy, DietPlansByStatus,
    HighProteinLowCalorieFoods,
};
use domain::{
    ActivityLevel, ClientBuilder, ClientMetrics, DietPlanBuilder, DietPlanStatus, DomainResultExt, ErrorKind,
    FoodCategory, FoodItemBuilder, Gender, Height, MacroSplit, NutritionalValue, PlanAction,
    RecordMetrics, Specification, Weight,
};
use uuid::Uuid;

#[test]
fn test_completed_plan_cannot_be_reactivated() {
    let mut plan = DietPlanBuilder::new("Summer cut", Uuid::new_v4(), Uuid::new_v4())
        .target_calories(2000.0)
        .build()
        .unwrap();
    assert_eq!(plan.status(), DietPlanStatus::Draft);

    plan.activate().unwrap();
    assert!(plan.is_active());
    plan.complete().unwrap();
    assert_eq!(plan.status(), DietPlanStatus::Completed);

    let err = plan.activate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BusinessRule);
    assert_eq!(err.to_string(), "Cannot activate a completed diet plan");
    assert_eq!(plan.status(), DietPlanStatus::Completed);
    assert!(plan.allowed_actions().is_empty());
}

#[test]
fn test_new_version_starts_a_fresh_draft() {
    let mut original = DietPlanBuilder::new("Bulk", Uuid::new_v4(), Uuid::new_v4())
        .starting(Utc::now())
        .ending(Utc::now() + Duration::days(30))
        .target_macros(180.0, 300.0, 80.0)
        .build()
        .unwrap();
    original.activate().unwrap();

    let next = original.create_new_version(Uuid::new_v4());
    assert_eq!(next.status(), DietPlanStatus::Draft);
    assert_eq!(next.version(), 1);
    assert_eq!(next.derived_from(), Some(original.id()));
    assert_eq!(next.goals(), original.goals());
    assert_eq!(next.allowed_actions(), vec![PlanAction::Activate, PlanAction::Cancel]);
    assert_eq!(original.status(), DietPlanStatus::Active);
}

#[test]
fn test_plan_specs_select_the_single_active_plan() {
    let client = Uuid::new_v4();
    let dietitian = Uuid::new_v4();
    let mut old = DietPlanBuilder::new("Old", client, dietitian).build().unwrap();
    old.activate().unwrap();
    old.complete().unwrap();
    let mut current = DietPlanBuilder::new("Current", client, dietitian).build().unwrap();
    current.activate().unwrap();
    let draft = DietPlanBuilder::new("Next", client, dietitian).build().unwrap();

    let plans = [old, current, draft];
    let active = active_plan_for_client(client);
    let found: Vec<&str> = plans.iter().filter(|p| active.is_satisfied_by(p)).map(|p| p.name()).collect();
    assert_eq!(found, ["Current"]);

    let open = DietPlansByStatus { status: DietPlanStatus::Draft }
        .or(DietPlansByStatus { status: DietPlanStatus::Active });
    assert_eq!(plans.iter().filter(|p| open.is_satisfied_by(p)).count(), 2);
    assert!(open.to_filter().matches(&domain::Record::to_record(&plans[2])));
}

#[test]
fn test_client_specs_compose() {
    let dietitian = Uuid::new_v4();
    let nut_allergic = ClientBuilder::new(dietitian, "Ana", "Silva", "ana@mail.com")
        .allergy("Peanuts")
        .build()
        .unwrap();
    let mut inactive = ClientBuilder::new(dietitian, "Rui", "Costa", "rui@mail.com")
        .allergy("Peanuts")
        .build()
        .unwrap();
    inactive.deactivate();
    let other = ClientBuilder::new(Uuid::new_v4(), "Eva", "Lopes", "eva@mail.com")
        .allergy("Peanuts")
        .build()
        .unwrap();

    let spec = ActiveClientsOfDietitian { dietitian_id: dietitian }
        .and(ClientsWithAllergy { allergy: "Peanuts".into() });
    let clients = [nut_allergic, inactive, other];
    for client in &clients {
        let expected = ActiveClientsOfDietitian { dietitian_id: dietitian }.is_satisfied_by(client)
            && ClientsWithAllergy { allergy: "Peanuts".into() }.is_satisfied_by(client);
        assert_eq!(spec.is_satisfied_by(client), expected);
    }
    assert_eq!(clients.iter().filter(|c| spec.is_satisfied_by(c)).count(), 1);
}

#[test]
fn test_energy_budget_for_recorded_metrics() {
    let client = ClientBuilder::new(Uuid::new_v4(), "Rui", "Costa", "rui@mail.com")
        .gender(Gender::Male)
        .date_of_birth(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap())
        .build()
        .unwrap();
    let metrics = ClientMetrics::create(
        Uuid::new_v4(),
        client.id(),
        RecordMetrics::new(
            Weight::from_kilograms(70.0).unwrap(),
            Height::from_centimeters(175.0).unwrap(),
        ),
    )
    .unwrap();
    assert_eq!(metrics.bmi(), 22.9);

    let kcal = nutrition::daily_calories(
        metrics.weight().kilograms(),
        metrics.height().centimeters(),
        30,
        client.gender().unwrap(),
        ActivityLevel::ModeratelyActive.multiplier(),
    )
    .unwrap();
    assert_eq!(kcal, 2556);

    let targets = macronutrients(2000.0, MacroSplit::default()).unwrap();
    assert_eq!((targets.protein, targets.carbs, targets.fat, targets.fiber), (150, 200, 67, 28));
    assert!(macronutrients(2000.0, MacroSplit { protein_pct: 30.0, carbs_pct: 40.0, fat_pct: 31.0 })
        .is_failure_of(ErrorKind::Validation));
}

#[test]
fn test_day_of_food_against_plan_goals() {
    let chicken = FoodItemBuilder::new("Chicken breast", FoodCategory::Proteins)
        .nutrition(NutritionalValue::new(165.0, 31.0, 0.0, 3.6).unwrap())
        .build()
        .unwrap();
    let oats = FoodItemBuilder::new("Oats", FoodCategory::Grains)
        .nutrition(NutritionalValue::new(389.0, 16.9, 66.3, 6.9).and_then(|v| v.with_fiber(10.6)).unwrap())
        .build()
        .unwrap();

    let lean = HighProteinLowCalorieFoods { min_protein: 20.0, max_calories: 200.0 };
    assert!(lean.is_satisfied_by(&chicken));
    assert!(!lean.is_satisfied_by(&oats));

    let day = nutrition::sum(&[
        chicken.nutritional_value_for_servings(2.0).unwrap(),
        oats.nutritional_value_for_grams(150.0).unwrap(),
    ]);
    let plan = DietPlanBuilder::new("Plan", Uuid::new_v4(), Uuid::new_v4())
        .target_calories(2000.0)
        .target_macros(150.0, 200.0, 67.0)
        .target_fiber(28.0)
        .build()
        .unwrap();

    let report = check_targets(&day, &plan.goals().compliance_targets(), DEFAULT_COMPLIANCE_TOLERANCE_PCT);
    assert!(!report.overall_compliant);
    assert!(!report.calories.unwrap().compliant);
    assert!(report.warnings[0].starts_with("Calorie intake is below target"));
}
