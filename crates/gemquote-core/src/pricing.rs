//! Ballpark price calculator and the static sample report.
//!
//! This is the "instant calculator" linked from the intake confirmation, not the
//! real pricing analysis, which happens out of band.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::Brand;

/// Hourly labor rate, in dollars.
pub const LABOR_RATE_PER_HOUR: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Overhead as a fraction of materials plus labor (15%).
pub const OVERHEAD_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("materials cost must not be negative")]
    NegativeMaterials,
    #[error("hours must not be negative")]
    NegativeHours,
    #[error("inputs are too large to price")]
    Overflow,
}

/// Cost breakdown and suggested retail range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ballpark {
    pub brand: Brand,
    pub materials: Decimal,
    pub hours: Decimal,
    pub labor_rate: Decimal,
    pub labor: Decimal,
    pub overhead: Decimal,
    pub total_cost: Decimal,
    /// Suggested range in whole dollars
    pub low: Decimal,
    pub high: Decimal,
}

/// (low, high) markup over total cost for a brand positioning.
///
/// Only the mid range is backed by published figures (the sample report).
/// Budget and premium are placeholder multipliers until real data exists.
fn markup(brand: Brand) -> (Decimal, Decimal) {
    match brand {
        Brand::Budget => (Decimal::new(100, 2), Decimal::new(115, 2)),
        Brand::Mid => (Decimal::new(107, 2), Decimal::new(130, 2)),
        Brand::Premium => (Decimal::new(125, 2), Decimal::new(160, 2)),
    }
}

fn cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn ballpark(materials: Decimal, hours: Decimal, brand: Brand) -> Result<Ballpark, PricingError> {
    if materials.is_sign_negative() && !materials.is_zero() {
        return Err(PricingError::NegativeMaterials);
    }
    if hours.is_sign_negative() && !hours.is_zero() {
        return Err(PricingError::NegativeHours);
    }
    compute(materials, hours, brand)
}

fn compute(materials: Decimal, hours: Decimal, brand: Brand) -> Result<Ballpark, PricingError> {
    let materials = cents(materials);
    let labor = cents(
        hours
            .checked_mul(LABOR_RATE_PER_HOUR)
            .ok_or(PricingError::Overflow)?,
    );
    let subtotal = materials
        .checked_add(labor)
        .ok_or(PricingError::Overflow)?;
    let overhead = cents(
        subtotal
            .checked_mul(OVERHEAD_RATE)
            .ok_or(PricingError::Overflow)?,
    );
    let total_cost = subtotal
        .checked_add(overhead)
        .ok_or(PricingError::Overflow)?;
    let (low_markup, high_markup) = markup(brand);
    let low = total_cost
        .checked_mul(low_markup)
        .ok_or(PricingError::Overflow)?;
    let high = total_cost
        .checked_mul(high_markup)
        .ok_or(PricingError::Overflow)?;

    Ok(Ballpark {
        brand,
        materials,
        hours,
        labor_rate: LABOR_RATE_PER_HOUR,
        labor,
        overhead,
        total_cost,
        low: low.floor(),
        high: high.ceil(),
    })
}

/// The example report shown to visitors before they submit.
#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    pub title: &'static str,
    pub image_url: &'static str,
    pub materials_note: &'static str,
    pub labor_note: &'static str,
    pub breakdown: Ballpark,
}

pub fn sample_report() -> Result<SampleReport, PricingError> {
    let breakdown = compute(Decimal::new(910, 2), Decimal::new(15, 1), Brand::Mid)?;
    Ok(SampleReport {
        title: "Handmade Silver Ring",
        image_url: "https://images.unsplash.com/photo-1603569283847-2778687b2c2f?q=80&w=400&auto=format&fit=crop",
        materials_note: "Silver wire, beads",
        labor_note: "Design + crafting",
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn sample_report_matches_published_figures() {
        let report = sample_report().unwrap();
        let b = report.breakdown;
        assert_eq!(b.materials, d("9.10"));
        assert_eq!(b.labor, d("30.00"));
        assert_eq!(b.overhead, d("5.87"));
        assert_eq!(b.total_cost, d("44.97"));
        assert_eq!(b.low, d("48"));
        assert_eq!(b.high, d("59"));
    }

    #[test]
    fn premium_widens_range_upwards() {
        let mid = ballpark(d("12.50"), d("2"), Brand::Mid).unwrap();
        let premium = ballpark(d("12.50"), d("2"), Brand::Premium).unwrap();
        assert_eq!(mid.total_cost, premium.total_cost);
        assert!(premium.low > mid.low);
        assert!(premium.high > mid.high);
    }

    #[test]
    fn zero_inputs_price_at_zero() {
        let b = ballpark(Decimal::ZERO, Decimal::ZERO, Brand::Budget).unwrap();
        assert_eq!(b.low, Decimal::ZERO);
        assert_eq!(b.high, Decimal::ZERO);
    }

    #[test]
    fn huge_inputs_are_an_error_not_a_panic() {
        assert_eq!(
            ballpark(Decimal::ONE, Decimal::MAX, Brand::Mid),
            Err(PricingError::Overflow)
        );
        assert_eq!(
            ballpark(Decimal::MAX, Decimal::ZERO, Brand::Premium),
            Err(PricingError::Overflow)
        );
    }

    #[test]
    fn rejects_negative_inputs() {
        assert_eq!(
            ballpark(d("-1"), d("1"), Brand::Mid),
            Err(PricingError::NegativeMaterials)
        );
        assert_eq!(
            ballpark(d("1"), d("-0.25"), Brand::Mid),
            Err(PricingError::NegativeHours)
        );
    }
}
