//! # Assessment Module
//!
//! Weighted grade computation over scored assessment items.
//!
//! final = Σ (score / maxScore × weight)
//!
//! The weighted sum is NOT normalized when the weights do not add up to 100.
//! [`check_weights`] reports that discrepancy separately so callers can show
//! it without changing the grade.

use crate::decimal::{FRACTION_DIGITS, SCALE, div_round, format_units};
use crate::{Decimal, lenient};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Decimals used by [`compute_final_grade`].
pub const DEFAULT_DECIMALS: u32 = 2;

/// Internal precision of a single item's contribution, in fractional digits.
const CONTRIBUTION_DIGITS: u32 = 8;

// =============================================================================
// ASSESSMENT ITEM
// =============================================================================

/// One scored assessment component.
///
/// Every numeric field is lenient: absent, `null` or malformed values are 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentItem {
    /// Category label, e.g. "Quiz" or "Final exam".
    #[serde(deserialize_with = "lenient::text")]
    pub category: String,
    /// Weight as a percentage (0-100).
    pub weight: Decimal,
    pub score: Decimal,
    pub max_score: Decimal,
    #[serde(deserialize_with = "lenient::count")]
    pub quantity: u32,
    /// Duration in minutes.
    pub duration: Decimal,
    #[serde(deserialize_with = "lenient::text")]
    pub question_type: String,
}

impl AssessmentItem {
    /// Create an uncategorised item from its score, maximum and weight.
    #[must_use]
    pub fn scored(score: Decimal, max_score: Decimal, weight: Decimal) -> Self {
        Self {
            score,
            max_score,
            weight,
            ..Self::default()
        }
    }

    /// Set the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// This item's share of the final grade in units of 10^-8.
    ///
    /// A non-positive `max_score` contributes nothing. A share too large for
    /// i128 saturates.
    fn contribution(&self) -> i128 {
        if !self.max_score.is_positive() {
            return 0;
        }
        // Two i64 raws always fit in an i128 product.
        let numerator = i128::from(self.score.raw()) * i128::from(self.weight.raw());
        let denominator = i128::from(self.max_score.raw()) * i128::from(SCALE);
        let scale = 10_i128.pow(CONTRIBUTION_DIGITS);

        let whole = (numerator / denominator).saturating_mul(scale);
        let fraction = div_round((numerator % denominator) * scale, denominator);
        whole.saturating_add(fraction)
    }
}

// =============================================================================
// FINAL GRADE
// =============================================================================

/// A weighted percentage grade rounded to a fixed number of decimals.
///
/// Displays and serializes as a fixed-width string such as `"85.00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FinalGrade {
    /// Value times 10^decimals.
    units: i64,
    decimals: u32,
}

impl FinalGrade {
    /// The grade of an empty assessment set.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            units: 0,
            decimals: DEFAULT_DECIMALS,
        }
    }

    /// Value times 10^[`decimals`](Self::decimals).
    #[must_use]
    pub const fn units(self) -> i64 {
        self.units
    }

    #[must_use]
    pub const fn decimals(self) -> u32 {
        self.decimals
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.units == 0
    }

    /// The grade as a [`Decimal`]. Exact, since `decimals` never exceeds
    /// the decimal's own precision.
    #[must_use]
    pub fn as_decimal(self) -> Decimal {
        let factor = 10_i64.pow(FRACTION_DIGITS - self.decimals);
        Decimal::from_raw(self.units.saturating_mul(factor))
    }
}

impl Default for FinalGrade {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for FinalGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_units(i128::from(self.units), self.decimals))
    }
}

impl Serialize for FinalGrade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Compute the weighted grade rounded to two decimals.
///
/// Returns [`FinalGrade::zero`] for an empty list.
#[must_use]
pub fn compute_final_grade(items: &[AssessmentItem]) -> FinalGrade {
    compute_final_grade_with_precision(items, DEFAULT_DECIMALS)
}

/// Compute the weighted grade rounded to `decimals` (capped at 4).
///
/// Contributions are summed at 10^-8 precision and rounded exactly once.
#[must_use]
pub fn compute_final_grade_with_precision(items: &[AssessmentItem], decimals: u32) -> FinalGrade {
    let decimals = decimals.min(FRACTION_DIGITS);
    let total = items
        .iter()
        .map(AssessmentItem::contribution)
        .fold(0_i128, i128::saturating_add);
    let units = div_round(total, 10_i128.pow(CONTRIBUTION_DIGITS - decimals));
    FinalGrade {
        units: units.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64,
        decimals,
    }
}

// =============================================================================
// WEIGHT CHECK
// =============================================================================

/// Whether an assessment set's weights add up to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum WeightCheck {
    /// Weights total exactly 100.
    Balanced,
    /// Weights total something else. Display-only; the grade is unaffected.
    Discrepancy { total: Decimal },
}

impl WeightCheck {
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced)
    }

    /// The weight total this check was made against.
    #[must_use]
    pub fn total(&self) -> Decimal {
        match self {
            Self::Balanced => Decimal::ONE_HUNDRED,
            Self::Discrepancy { total } => *total,
        }
    }
}

/// Sum of all item weights.
#[must_use]
pub fn weight_total(items: &[AssessmentItem]) -> Decimal {
    items.iter().map(|item| item.weight).sum()
}

/// Compare the weight total against 100.
#[must_use]
pub fn check_weights(items: &[AssessmentItem]) -> WeightCheck {
    let total = weight_total(items);
    if total == Decimal::ONE_HUNDRED {
        WeightCheck::Balanced
    } else {
        WeightCheck::Discrepancy { total }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(score: &str, max: &str, weight: &str) -> AssessmentItem {
        AssessmentItem::scored(dec(score), dec(max), dec(weight))
    }

    fn sample_set() -> Vec<AssessmentItem> {
        vec![
            item("8.5", "10", "10").with_category("Participation"),
            item("9", "10", "10").with_category("Assignment 1"),
            item("9.2", "10", "15").with_category("Progress test 1"),
            item("8.8", "10", "15").with_category("Progress test 2"),
            item("9.5", "10", "10").with_category("Assignment 2"),
            item("7.5", "10", "20").with_category("Practical exam"),
            item("8", "10", "20").with_category("Final exam"),
        ]
    }

    #[test]
    fn empty_set_is_zero() {
        let grade = compute_final_grade(&[]);
        assert!(grade.is_zero());
        assert_eq!(grade, FinalGrade::zero());
        assert_eq!(grade.to_string(), "0.00");
    }

    #[test]
    fn full_score_single_item() {
        let grade = compute_final_grade(&[item("10", "10", "100")]);
        assert_eq!(grade.to_string(), "100.00");
    }

    #[test]
    fn sample_set_weighted_sum() {
        // 8.5 + 9 + 13.8 + 13.2 + 9.5 + 15 + 16
        let grade = compute_final_grade(&sample_set());
        assert_eq!(grade.to_string(), "85.00");
        assert!(check_weights(&sample_set()).is_balanced());
    }

    #[test]
    fn zero_max_score_contributes_nothing() {
        let items = vec![item("5", "0", "50"), item("10", "10", "50")];
        assert_eq!(compute_final_grade(&items).to_string(), "50.00");
    }

    #[test]
    fn negative_max_score_contributes_nothing() {
        let items = vec![item("5", "-10", "50")];
        assert!(compute_final_grade(&items).is_zero());
    }

    #[test]
    fn weights_are_not_normalized() {
        let items = vec![item("10", "10", "30"), item("10", "10", "30")];
        assert_eq!(compute_final_grade(&items).to_string(), "60.00");

        let check = check_weights(&items);
        assert_eq!(check, WeightCheck::Discrepancy { total: dec("60") });
        assert_eq!(check.total(), dec("60"));
    }

    #[test]
    fn oversized_items_saturate_instead_of_vanishing() {
        let huge = Decimal::from_raw(i64::MAX);
        let oversized = AssessmentItem::scored(huge, Decimal::ONE_HUNDRED, huge);
        let grade = compute_final_grade(&[oversized, item("10", "10", "50")]);
        assert_eq!(grade.units(), i64::MAX);

        let full = AssessmentItem::scored(huge, huge, huge);
        assert_eq!(compute_final_grade_with_precision(&[full], 4).as_decimal(), huge);
    }

    #[test]
    fn rounds_half_away_from_zero_once() {
        assert_eq!(compute_final_grade(&[item("1", "3", "100")]).to_string(), "33.33");
        assert_eq!(compute_final_grade(&[item("2", "3", "100")]).to_string(), "66.67");
    }

    #[test]
    fn configurable_precision() {
        let items = [item("2", "3", "100")];
        assert_eq!(compute_final_grade_with_precision(&items, 0).to_string(), "67");
        assert_eq!(compute_final_grade_with_precision(&items, 4).to_string(), "66.6667");
        assert_eq!(compute_final_grade_with_precision(&items, 9).decimals(), 4);
    }

    #[test]
    fn as_decimal_is_exact() {
        let grade = compute_final_grade(&[item("2", "3", "100")]);
        assert_eq!(grade.as_decimal(), dec("66.67"));
    }

    #[test]
    fn malformed_fields_become_zero() {
        let items: Vec<AssessmentItem> = serde_json::from_str(
            r#"[
                {"category": "Quiz", "score": "abc", "maxScore": 10, "weight": 40},
                {"category": null, "score": 10, "maxScore": null, "weight": 30},
                {"score": 5, "maxScore": 10, "weight": "60"}
            ]"#,
        )
        .unwrap();

        assert_eq!(items[0].score, Decimal::ZERO);
        assert_eq!(items[1].category, "");
        assert_eq!(compute_final_grade(&items).to_string(), "30.00");
    }

    #[test]
    fn deserializes_camel_case_fields() {
        let item: AssessmentItem = serde_json::from_str(
            r#"{"category": "Lab", "weight": 15, "score": 8, "maxScore": 10,
                "quantity": 3, "duration": 45, "questionType": "Practical"}"#,
        )
        .unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(item.duration, dec("45"));
        assert_eq!(item.question_type, "Practical");
    }

    #[test]
    fn grade_serializes_as_string() {
        let grade = compute_final_grade(&[item("10", "10", "100")]);
        assert_eq!(serde_json::to_string(&grade).unwrap(), r#""100.00""#);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let items = sample_set();
        assert_eq!(compute_final_grade(&items), compute_final_grade(&items));
    }
}
