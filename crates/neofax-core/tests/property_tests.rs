//! Property tests over the whole catalog.

use chrono::NaiveDate;
use proptest::prelude::*;

use neofax_core::dosing::{dose_mg_per_kg, interval_hours};
use neofax_core::{Calculator, Catalog, Category, PatientMetrics};

proptest! {
    #[test]
    fn prop_every_input_yields_a_positive_dosage(
        weight in 0.1f64..20.0,
        ga in 20.0f64..50.0,
        pna in 0u32..400,
    ) {
        let catalog = Catalog::standard().unwrap();
        for antibiotic in catalog.iter() {
            let outcome = antibiotic.evaluate(weight, ga, pna);

            prop_assert!(outcome.dose_mg_per_kg > 0.0);
            prop_assert!(outcome.interval_hours > 0);
            prop_assert_eq!(dose_mg_per_kg(&outcome.dose_rule).unwrap(), outcome.dose_mg_per_kg);
            prop_assert_eq!(interval_hours(&outcome.interval).unwrap(), outcome.interval_hours);

            let expected = outcome.dose_mg_per_kg * weight * 24.0 / outcome.interval_hours as f64;
            prop_assert!((outcome.total_daily_dose_mg - expected).abs() < 1e-9);
            prop_assert!(outcome.total_daily_dose_mg.is_finite());
        }
    }

    #[test]
    fn prop_selected_leaf_belongs_to_table(
        weight in 0.1f64..20.0,
        ga in 20.0f64..50.0,
        pna in 0u32..400,
    ) {
        let catalog = Catalog::standard().unwrap();
        for antibiotic in catalog.iter() {
            let leaf = antibiotic.rules.select(weight, ga, pna);
            prop_assert!(antibiotic.rules.leaves().any(|l| l == leaf));
        }
    }

    #[test]
    fn prop_calculation_is_idempotent(
        weeks in 23u32..=42,
        days in 0u32..=6,
        weight in 0.5f64..10.0,
        age in 0i64..120,
    ) {
        let catalog = Catalog::standard().unwrap();
        let calculator = Calculator::new(&catalog);
        let birth = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let now = (birth + chrono::Duration::days(age)).and_hms_opt(9, 0, 0).unwrap();
        let metrics = PatientMetrics::from_parts(birth, weeks, days, weight, now);

        prop_assert_eq!(metrics.postnatal_age_days as i64, age);
        prop_assert!(metrics.check_domain().is_ok());

        for category in Category::VALUES {
            let first = calculator.calculate(&metrics, category);
            let second = calculator.calculate(&metrics, category);
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn prop_category_is_subsequence_of_all(
        weight in 0.5f64..10.0,
        ga in 23.0f64..43.0,
        pna in 0u32..60,
    ) {
        let catalog = Catalog::standard().unwrap();
        let birth = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let now = (birth + chrono::Duration::days(pna as i64)).and_hms_opt(0, 0, 0).unwrap();
        let weeks = ga.floor() as u32;
        let metrics = PatientMetrics::from_parts(birth, weeks, 0, weight, now);
        let calculator = Calculator::new(&catalog);

        let all = calculator.calculate(&metrics, Category::All);
        prop_assert_eq!(all.len(), catalog.len());

        for category in Category::VALUES {
            let subset = calculator.calculate(&metrics, category);
            let mut rest = all.iter();
            for item in &subset {
                prop_assert!(rest.any(|a| a == item));
            }
        }
    }
}

#[test]
fn test_nan_input_falls_back() {
    let catalog = Catalog::standard().unwrap();
    for antibiotic in catalog.iter() {
        let leaf = antibiotic.rules.select(f64::NAN, f64::NAN, 0);
        let outcome = antibiotic.evaluate(f64::NAN, f64::NAN, 0);
        assert!(outcome.interval_hours > 0);
        assert!(antibiotic.rules.leaves().any(|l| l == leaf));
    }
}
