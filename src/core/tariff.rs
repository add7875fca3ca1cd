//! Withholding tables and bracket lookup.

use super::warnings::Warning;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Largest gap between the two bracket formulas at a boundary that is still
/// treated as continuous.
const CONTINUITY_TOLERANCE: Decimal = dec!(0.01);

/// One row of a withholding table.
///
/// Tax for an amount falling in this bracket is
/// `fixed_fee + (amount - floor) * rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    /// Amount the marginal rate is applied above
    pub floor: Decimal,
    /// Inclusive upper bound, `None` for the top bracket
    pub upper: Option<Decimal>,
    /// Tax owed at `floor`
    pub fixed_fee: Decimal,
    /// Marginal rate as a fraction (0.35 = 35%)
    pub rate: Decimal,
}

impl Bracket {
    const fn new(floor: Decimal, upper: Option<Decimal>, fixed_fee: Decimal, rate: Decimal) -> Self {
        Bracket {
            floor,
            upper,
            fixed_fee,
            rate,
        }
    }

    /// Evaluate this bracket's formula, whether or not `amount` lies in it.
    pub fn apply(&self, amount: Decimal) -> BracketBreakdown {
        let excess = amount - self.floor;
        let marginal = if self.rate.is_zero() {
            Decimal::ZERO
        } else {
            excess * self.rate
        };
        BracketBreakdown {
            lower_limit: self.floor,
            upper_limit: self.upper,
            excess,
            rate: self.rate,
            marginal,
            fixed_fee: self.fixed_fee,
            tax: self.fixed_fee + marginal,
        }
    }
}

/// How the tax for a single amount was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketBreakdown {
    pub lower_limit: Decimal,
    pub upper_limit: Option<Decimal>,
    pub excess: Decimal,
    pub rate: Decimal,
    pub marginal: Decimal,
    pub fixed_fee: Decimal,
    pub tax: Decimal,
}

static WITHHOLDING_2026: [Bracket; 6] = [
    Bracket::new(dec!(0), Some(dec!(874.04)), dec!(0), dec!(0)),
    Bracket::new(dec!(874.04), Some(dec!(3500.54)), dec!(0), dec!(0.1925)),
    Bracket::new(dec!(3500.54), Some(dec!(6234.40)), dec!(502.97), dec!(0.20)),
    Bracket::new(dec!(6234.40), Some(dec!(10019.99)), dec!(1050.14), dec!(0.22)),
    Bracket::new(dec!(10019.99), Some(dec!(12958.55)), dec!(1902.06), dec!(0.23)),
    Bracket::new(dec!(12958.55), None, dec!(2565.41), dec!(0.35)),
];

/// An ordered withholding table. Brackets are sorted by upper bound and the
/// last one is unbounded.
#[derive(Debug, Clone, Copy)]
pub struct Tariff {
    name: &'static str,
    brackets: &'static [Bracket],
}

impl Tariff {
    /// The 2026 period withholding table.
    pub fn withholding_2026() -> Self {
        Tariff {
            name: "ISR withholding 2026",
            brackets: &WITHHOLDING_2026,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn brackets(&self) -> &'static [Bracket] {
        self.brackets
    }

    /// Index of the first bracket whose inclusive upper bound covers `amount`.
    pub fn position(&self, amount: Decimal) -> usize {
        let idx = self
            .brackets
            .partition_point(|b| b.upper.is_some_and(|upper| amount > upper));
        idx.min(self.brackets.len().saturating_sub(1))
    }

    /// Tax owed on `amount`, with the matched bracket's details.
    pub fn evaluate(&self, amount: Decimal) -> BracketBreakdown {
        let position = self.position(amount);
        log::debug!("{}: {} falls in bracket {}", self.name, amount, position + 1);
        self.brackets[position].apply(amount)
    }

    /// Check the table's shape: bounds must ascend, only the last bracket may
    /// be open, and adjacent formulas should agree at each boundary.
    pub fn check(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();
        for (idx, pair) in self.brackets.windows(2).enumerate() {
            let (lower, upper) = (&pair[0], &pair[1]);
            let Some(boundary) = lower.upper else {
                warnings.push(Warning::UnboundedBracket { bracket: idx + 1 });
                continue;
            };
            if upper.upper.is_some_and(|next| next <= boundary) {
                warnings.push(Warning::BracketOrder {
                    bracket: idx + 2,
                    boundary,
                });
            }
            let below = lower.apply(boundary).tax;
            let above = upper.apply(boundary).tax;
            if (above - below).abs() > CONTINUITY_TOLERANCE {
                warnings.push(Warning::BracketDiscontinuity {
                    boundary,
                    below,
                    above,
                });
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tax(amount: Decimal) -> Decimal {
        Tariff::withholding_2026().evaluate(amount).tax
    }

    #[test]
    fn first_bracket_is_tax_free() {
        assert_eq!(tax(dec!(0)), dec!(0));
        assert_eq!(tax(dec!(500)), dec!(0));
        assert_eq!(tax(dec!(874.04)), dec!(0));
    }

    #[test]
    fn negative_amounts_fall_in_first_bracket() {
        let breakdown = Tariff::withholding_2026().evaluate(dec!(-1500));
        assert_eq!(breakdown.tax, dec!(0));
        assert_eq!(breakdown.lower_limit, dec!(0));
    }

    #[test]
    fn upper_bounds_are_inclusive() {
        let tariff = Tariff::withholding_2026();
        assert_eq!(tariff.position(dec!(874.04)), 0);
        assert_eq!(tariff.position(dec!(874.05)), 1);
        assert_eq!(tariff.position(dec!(3500.54)), 1);
        assert_eq!(tariff.position(dec!(3500.55)), 2);
        assert_eq!(tariff.position(dec!(12958.55)), 4);
        assert_eq!(tariff.position(dec!(12958.56)), 5);
        assert_eq!(tariff.position(dec!(1000000)), 5);
    }

    #[test]
    fn second_bracket_formula() {
        assert_eq!(tax(dec!(3000)), dec!(409.2473));
    }

    #[test]
    fn third_bracket_formula() {
        let breakdown = Tariff::withholding_2026().evaluate(dec!(4500));
        assert_eq!(breakdown.lower_limit, dec!(3500.54));
        assert_eq!(breakdown.excess, dec!(999.46));
        assert_eq!(breakdown.marginal, dec!(199.892));
        assert_eq!(breakdown.fixed_fee, dec!(502.97));
        assert_eq!(breakdown.tax, dec!(702.862));
    }

    #[test]
    fn top_bracket_formula() {
        // 2565.41 + (20000 - 12958.55) * 0.35
        assert_eq!(tax(dec!(20000)), dec!(5029.9175));
    }

    #[test]
    fn breakdown_adds_up() {
        let tariff = Tariff::withholding_2026();
        for amount in [dec!(900), dec!(5000), dec!(8000), dec!(11000), dec!(50000)] {
            let b = tariff.evaluate(amount);
            assert_eq!(b.excess, amount - b.lower_limit);
            assert_eq!(b.tax, b.fixed_fee + b.marginal);
        }
    }

    #[test]
    fn withholding_table_is_well_ordered() {
        let warnings = Tariff::withholding_2026().check();
        assert!(!warnings
            .iter()
            .any(|w| matches!(w, Warning::BracketOrder { .. } | Warning::UnboundedBracket { .. })));
    }

    #[test]
    fn continuous_at_first_boundary() {
        let tariff = Tariff::withholding_2026();
        let brackets = tariff.brackets();
        assert_eq!(brackets[0].apply(dec!(874.04)).tax, brackets[1].apply(dec!(874.04)).tax);
    }

    #[test]
    fn published_table_gaps_are_reported() {
        let warnings = Tariff::withholding_2026().check();
        let boundaries: Vec<Decimal> = warnings
            .iter()
            .filter_map(|w| match w {
                Warning::BracketDiscontinuity { boundary, .. } => Some(*boundary),
                _ => None,
            })
            .collect();
        assert_eq!(
            boundaries,
            vec![dec!(3500.54), dec!(6234.40), dec!(10019.99), dec!(12958.55)]
        );

        match &warnings[0] {
            Warning::BracketDiscontinuity { below, above, .. } => {
                // (3500.54 - 874.04) * 0.1925 against the published 502.97
                assert_eq!(*below, dec!(505.60125));
                assert_eq!(*above, dec!(502.97));
            }
            other => panic!("unexpected warning {other:?}"),
        }
    }
}
