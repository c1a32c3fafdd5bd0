//! # Platform Baseline Seed
//!
//! The platform-wide default tax rules for the reference jurisdictions.
//! Every baseline lives in the Default Policy Registry — resolution never
//! special-cases a country by name. Rates reflect the launch configuration
//! and are replaced by platform operators through the defaults surface.

use levy_core::{CalculationMethod, RatePercent};
use levy_catalog::seed::{
    BRITISH_COLUMBIA, CANADA, CALIFORNIA, INDIA, KARNATAKA, MAHARASHTRA, NEW_YORK, ONTARIO,
    QUEBEC, TAMIL_NADU, TEXAS, UNITED_STATES,
};

use crate::rule::DefaultTaxRule;

/// Return the platform baseline rules for the reference catalog.
///
/// - **India** — a central GST component plus state GST components that
///   supersede it (`instead`), matching how the platform charges a single
///   state-determined rate there.
/// - **United States** — no federal sales tax; state rates stand alone
///   (`added` against an absent federal rate).
/// - **Canada** — federal GST plus provincial components: HST provinces
///   replace the federal rate (`instead`), PST provinces add to it, and
///   Quebec's QST compounds on the GST-inclusive amount.
pub fn platform_baseline_rules() -> Vec<DefaultTaxRule> {
    let rate = |s: &str| match RatePercent::parse(s) {
        Ok(r) => r,
        Err(err) => unreachable!("baseline seed rate {s:?} is valid: {err}"),
    };

    vec![
        // India
        DefaultTaxRule {
            country_id: INDIA,
            state_id: None,
            tax_label: "Federal GST".into(),
            tax_rate: rate("9"),
            calculation_method: None,
        },
        DefaultTaxRule {
            country_id: INDIA,
            state_id: Some(MAHARASHTRA),
            tax_label: "IGST".into(),
            tax_rate: rate("18"),
            calculation_method: Some(CalculationMethod::Instead),
        },
        DefaultTaxRule {
            country_id: INDIA,
            state_id: Some(KARNATAKA),
            tax_label: "IGST".into(),
            tax_rate: rate("18"),
            calculation_method: Some(CalculationMethod::Instead),
        },
        DefaultTaxRule {
            country_id: INDIA,
            state_id: Some(TAMIL_NADU),
            tax_label: "IGST".into(),
            tax_rate: rate("18"),
            calculation_method: Some(CalculationMethod::Instead),
        },
        // United States — no federal row.
        DefaultTaxRule {
            country_id: UNITED_STATES,
            state_id: Some(CALIFORNIA),
            tax_label: "CA Sales Tax".into(),
            tax_rate: rate("7.25"),
            calculation_method: Some(CalculationMethod::Added),
        },
        DefaultTaxRule {
            country_id: UNITED_STATES,
            state_id: Some(NEW_YORK),
            tax_label: "NY Sales Tax".into(),
            tax_rate: rate("4"),
            calculation_method: Some(CalculationMethod::Added),
        },
        DefaultTaxRule {
            country_id: UNITED_STATES,
            state_id: Some(TEXAS),
            tax_label: "TX Sales Tax".into(),
            tax_rate: rate("6.25"),
            calculation_method: Some(CalculationMethod::Added),
        },
        // Canada
        DefaultTaxRule {
            country_id: CANADA,
            state_id: None,
            tax_label: "GST".into(),
            tax_rate: rate("5"),
            calculation_method: None,
        },
        DefaultTaxRule {
            country_id: CANADA,
            state_id: Some(ONTARIO),
            tax_label: "HST".into(),
            tax_rate: rate("13"),
            calculation_method: Some(CalculationMethod::Instead),
        },
        DefaultTaxRule {
            country_id: CANADA,
            state_id: Some(QUEBEC),
            tax_label: "QST".into(),
            tax_rate: rate("9.98"),
            calculation_method: Some(CalculationMethod::Compounded),
        },
        DefaultTaxRule {
            country_id: CANADA,
            state_id: Some(BRITISH_COLUMBIA),
            tax_label: "PST".into(),
            tax_rate: rate("7"),
            calculation_method: Some(CalculationMethod::Added),
        },
    ]
}
