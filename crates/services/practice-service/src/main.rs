//! Practice Service - nutrition calculator CLI.

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use domain::client_metrics::BmiCategory;
use domain::nutrition::{body_mass_index, daily_calories, macronutrients};
use domain::{ActivityLevel, Gender, Height, MacroSplit, Weight};
use practice_service_lib::config::PracticeServiceConfig;

#[derive(Parser)]
#[command(name = "practice-service")]
#[command(about = "Nutrition practice toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate daily energy needs (Mifflin-St Jeor)
    Calories {
        /// Body weight in kilograms
        #[arg(long)]
        weight: f64,
        /// Height in centimeters
        #[arg(long)]
        height: f64,
        #[arg(long)]
        age: u32,
        #[arg(long, value_enum)]
        sex: Sex,
        /// Defaults to PRACTICE_ACTIVITY_LEVEL
        #[arg(long, value_enum)]
        activity: Option<Activity>,
    },
    /// Split a calorie budget into macronutrient grams
    Macros {
        #[arg(long)]
        calories: f64,
        #[arg(long)]
        protein: Option<f64>,
        #[arg(long)]
        carbs: Option<f64>,
        #[arg(long)]
        fat: Option<f64>,
    },
    /// Body mass index and category
    Bmi {
        #[arg(long)]
        weight: f64,
        #[arg(long)]
        height: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Sex {
    Male,
    Female,
}

impl From<Sex> for Gender {
    fn from(sex: Sex) -> Self {
        match sex {
            Sex::Male => Gender::Male,
            Sex::Female => Gender::Female,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Activity {
    Sedentary,
    Light,
    Moderate,
    Very,
    Extra,
}

impl From<Activity> for ActivityLevel {
    fn from(activity: Activity) -> Self {
        match activity {
            Activity::Sedentary => ActivityLevel::Sedentary,
            Activity::Light => ActivityLevel::LightlyActive,
            Activity::Moderate => ActivityLevel::ModeratelyActive,
            Activity::Very => ActivityLevel::VeryActive,
            Activity::Extra => ActivityLevel::ExtraActive,
        }
    }
}

fn bmi_label(category: BmiCategory) -> &'static str {
    match category {
        BmiCategory::Underweight => "underweight",
        BmiCategory::Normal => "normal",
        BmiCategory::Overweight => "overweight",
        BmiCategory::Obese => "obese",
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let config = PracticeServiceConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Calories {
            weight,
            height,
            age,
            sex,
            activity,
        } => {
            let multiplier = activity
                .map(|a| ActivityLevel::from(a).multiplier())
                .unwrap_or(config.nutrition.activity_level);
            debug!(multiplier, "Estimating energy needs");

            let kcal = daily_calories(weight, height, age, sex.into(), multiplier)?;
            let macros = macronutrients(f64::from(kcal), config.nutrition.macro_split())?;
            println!("{} kcal/day", kcal);
            println!(
                "protein {} g, carbs {} g, fat {} g, fiber {} g",
                macros.protein, macros.carbs, macros.fat, macros.fiber
            );
        }
        Commands::Macros {
            calories,
            protein,
            carbs,
            fat,
        } => {
            let defaults = config.nutrition.macro_split();
            let split = MacroSplit {
                protein_pct: protein.unwrap_or(defaults.protein_pct),
                carbs_pct: carbs.unwrap_or(defaults.carbs_pct),
                fat_pct: fat.unwrap_or(defaults.fat_pct),
            };
            let macros = macronutrients(calories, split)?;
            println!(
                "protein {} g, carbs {} g, fat {} g, fiber {} g",
                macros.protein, macros.carbs, macros.fat, macros.fiber
            );
        }
        Commands::Bmi { weight, height } => {
            let bmi = body_mass_index(&Weight::from_kilograms(weight)?, &Height::from_centimeters(height)?);
            println!("BMI {:.1} ({})", bmi, bmi_label(BmiCategory::from_bmi(bmi)));
        }
    }

    Ok(())
}
