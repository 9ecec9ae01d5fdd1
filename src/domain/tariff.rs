//! Tiered (block) tariff pricing.
//!
//! A tariff is an ordered list of brackets. Each bracket covers the half-open
//! interval `(previous_bound, upper_bound]` of monthly consumption and prices
//! everything inside it at a single rate. The final bracket is unbounded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while pricing consumption against a tiered tariff.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TariffError {
    /// The quantity being priced violates its precondition (negative or not finite).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The tier list does not describe a usable pricing policy.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// One pricing bracket.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffTier {
    /// Display name of the bracket (e.g. "green").
    #[serde(default)]
    pub name: String,
    /// Inclusive upper bound in kWh. `None` means unbounded and is only
    /// allowed on the last tier.
    #[serde(default)]
    pub upper_bound: Option<f64>,
    /// Price per kWh inside this bracket.
    pub rate: f64,
}

impl TariffTier {
    pub fn bounded(name: impl Into<String>, upper_bound: f64, rate: f64) -> Self {
        Self {
            name: name.into(),
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn unbounded(name: impl Into<String>, rate: f64) -> Self {
        Self {
            name: name.into(),
            upper_bound: None,
            rate,
        }
    }
}

/// Result of splitting one quantity across the brackets of a tariff.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Amount allocated to each tier, in tier order.
    pub per_tier_quantity: Vec<f64>,
    /// Sum of `per_tier_quantity[i] * tiers[i].rate`.
    pub total_cost: f64,
}

impl AllocationResult {
    /// Total quantity across all tiers.
    pub fn allocated_total(&self) -> f64 {
        self.per_tier_quantity.iter().sum()
    }

    /// Index of the highest tier that received a positive amount.
    /// Zero consumption sits in the first tier.
    pub fn zone_index(&self) -> usize {
        self.per_tier_quantity
            .iter()
            .rposition(|q| *q > 0.0)
            .unwrap_or(0)
    }
}

/// Results of pricing several independent quantities against one tariff.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAllocation {
    pub items: Vec<AllocationResult>,
    /// Element-wise sum of the per-tier quantities and costs of `items`.
    pub aggregate: AllocationResult,
}

/// Split `quantity` across `tiers` and price it.
///
/// Tier `i` receives `max(0, min(quantity, ub_i) - lb_i)`, where `lb_i` is the
/// previous tier's bound (0 for the first tier) and the last tier's bound is
/// infinite. A quantity exactly on a bound belongs entirely to the lower tier.
pub fn allocate(quantity: f64, tiers: &[TariffTier]) -> Result<AllocationResult, TariffError> {
    validate_tiers(tiers)?;
    validate_quantity(quantity)?;
    price_tiers(quantity, tiers)
}

/// Check a tier list for ordering, bounds and rates.
pub fn validate_tiers(tiers: &[TariffTier]) -> Result<(), TariffError> {
    if tiers.is_empty() {
        return Err(TariffError::Configuration(
            "at least one tariff tier is required".to_string(),
        ));
    }

    let last = tiers.len() - 1;
    let mut previous = 0.0_f64;

    for (i, tier) in tiers.iter().enumerate() {
        if !tier.rate.is_finite() || tier.rate < 0.0 {
            return Err(TariffError::Configuration(format!(
                "tier {} has invalid rate {}",
                i, tier.rate
            )));
        }

        match tier.upper_bound {
            None if i != last => {
                return Err(TariffError::Configuration(format!(
                    "tier {} is unbounded but is not the last tier",
                    i
                )));
            }
            None => {}
            Some(bound) => {
                if !bound.is_finite() {
                    return Err(TariffError::Configuration(format!(
                        "tier {} has non-finite upper bound",
                        i
                    )));
                }
                if bound <= previous {
                    return Err(TariffError::Configuration(format!(
                        "tier {} upper bound {} must exceed {}",
                        i, bound, previous
                    )));
                }
                previous = bound;
            }
        }
    }

    Ok(())
}

fn validate_quantity(quantity: f64) -> Result<(), TariffError> {
    if !quantity.is_finite() {
        return Err(TariffError::InvalidInput(format!(
            "quantity must be finite, got {}",
            quantity
        )));
    }
    if quantity < 0.0 {
        return Err(TariffError::InvalidInput(format!(
            "quantity must be non-negative, got {}",
            quantity
        )));
    }
    Ok(())
}

/// Assumes `tiers` and `quantity` have been validated. Fails only if the cost overflows.
fn price_tiers(quantity: f64, tiers: &[TariffTier]) -> Result<AllocationResult, TariffError> {
    let last = tiers.len() - 1;
    let mut lower = 0.0_f64;
    let mut per_tier_quantity = Vec::with_capacity(tiers.len());
    let mut total_cost = 0.0;

    for (i, tier) in tiers.iter().enumerate() {
        let upper = if i == last {
            f64::INFINITY
        } else {
            tier.upper_bound.unwrap_or(f64::INFINITY)
        };
        let amount = (quantity.min(upper) - lower).max(0.0);
        total_cost += amount * tier.rate;
        per_tier_quantity.push(amount);
        lower = upper;
    }

    if !total_cost.is_finite() {
        return Err(TariffError::InvalidInput(format!(
            "cost of {} kWh exceeds the representable range",
            quantity
        )));
    }

    Ok(AllocationResult {
        per_tier_quantity,
        total_cost,
    })
}

/// A tier list that has already passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TariffSchedule {
    tiers: Vec<TariffTier>,
}

impl TariffSchedule {
    pub fn new(tiers: Vec<TariffTier>) -> Result<Self, TariffError> {
        validate_tiers(&tiers)?;
        Ok(Self { tiers })
    }

    /// Serbian EPS three-zone household tariff (green / blue / red), in dinars per kWh.
    pub fn default_three_zone() -> Self {
        Self {
            tiers: vec![
                TariffTier::bounded("green", 350.0, 6.0),
                TariffTier::bounded("blue", 1600.0, 9.5),
                TariffTier::unbounded("red", 19.0),
            ],
        }
    }

    pub fn tiers(&self) -> &[TariffTier] {
        &self.tiers
    }

    pub fn into_tiers(self) -> Vec<TariffTier> {
        self.tiers
    }

    pub fn allocate(&self, quantity: f64) -> Result<AllocationResult, TariffError> {
        validate_quantity(quantity)?;
        price_tiers(quantity, &self.tiers)
    }

    /// Price every quantity independently; the first invalid quantity fails the batch.
    pub fn allocate_batch(&self, quantities: &[f64]) -> Result<BatchAllocation, TariffError> {
        let items = quantities
            .iter()
            .map(|q| self.allocate(*q))
            .collect::<Result<Vec<_>, _>>()?;

        let mut aggregate = AllocationResult {
            per_tier_quantity: vec![0.0; self.tiers.len()],
            total_cost: 0.0,
        };
        for item in &items {
            for (sum, q) in aggregate
                .per_tier_quantity
                .iter_mut()
                .zip(&item.per_tier_quantity)
            {
                *sum += q;
            }
            aggregate.total_cost += item.total_cost;
        }
        if !aggregate.total_cost.is_finite() {
            return Err(TariffError::InvalidInput(
                "aggregate cost exceeds the representable range".to_string(),
            ));
        }

        Ok(BatchAllocation { items, aggregate })
    }

    /// Index and tier that `quantity` falls into.
    pub fn zone_for(&self, quantity: f64) -> Result<(usize, &TariffTier), TariffError> {
        let index = self.allocate(quantity)?.zone_index();
        Ok((index, &self.tiers[index]))
    }
}

impl<'de> Deserialize<'de> for TariffSchedule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tiers = Vec::<TariffTier>::deserialize(deserializer)?;
        Self::new(tiers).map_err(serde::de::Error::custom)
    }
}

impl Default for TariffSchedule {
    fn default() -> Self {
        Self::default_three_zone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn three_tiers() -> Vec<TariffTier> {
        vec![
            TariffTier::bounded("a", 350.0, 6.0),
            TariffTier::bounded("b", 1600.0, 9.0),
            TariffTier::unbounded("c", 18.0),
        ]
    }

    #[rstest]
    #[case(1201.0, [350.0, 851.0, 0.0], 9759.0)]
    #[case(500.0, [350.0, 150.0, 0.0], 3450.0)]
    #[case(2000.0, [350.0, 1250.0, 400.0], 20550.0)]
    #[case(0.0, [0.0, 0.0, 0.0], 0.0)]
    fn test_three_tier_scenarios(
        #[case] quantity: f64,
        #[case] expected: [f64; 3],
        #[case] cost: f64,
    ) {
        let result = allocate(quantity, &three_tiers()).unwrap();
        assert_eq!(result.per_tier_quantity, expected.to_vec());
        assert!((result.total_cost - cost).abs() < 1e-9);
    }

    #[rstest]
    #[case(350.0, 0)]
    #[case(1600.0, 1)]
    fn test_boundary_belongs_to_lower_tier(#[case] bound: f64, #[case] tier: usize) {
        let tiers = three_tiers();
        let result = allocate(bound, &tiers).unwrap();
        let lower = if tier == 0 { 0.0 } else { tiers[tier - 1].upper_bound.unwrap() };

        assert_eq!(result.per_tier_quantity[tier], bound - lower);
        assert_eq!(result.per_tier_quantity[tier + 1], 0.0);
        assert_eq!(result.zone_index(), tier);
    }

    #[test]
    fn test_negative_quantity_is_invalid_input() {
        let err = allocate(-5.0, &three_tiers()).unwrap_err();
        assert!(matches!(err, TariffError::InvalidInput(_)));
    }

    #[test]
    fn test_non_finite_quantity_is_invalid_input() {
        assert!(matches!(
            allocate(f64::NAN, &three_tiers()),
            Err(TariffError::InvalidInput(_))
        ));
        assert!(matches!(
            allocate(f64::INFINITY, &three_tiers()),
            Err(TariffError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_tiers_is_configuration_error() {
        let err = allocate(500.0, &[]).unwrap_err();
        assert!(matches!(err, TariffError::Configuration(_)));
    }

    #[test]
    fn test_configuration_checked_before_quantity() {
        assert!(matches!(
            allocate(-1.0, &[]),
            Err(TariffError::Configuration(_))
        ));
    }

    #[rstest]
    #[case::descending(vec![
        TariffTier::bounded("a", 1600.0, 6.0),
        TariffTier::bounded("b", 350.0, 9.0),
        TariffTier::unbounded("c", 18.0),
    ])]
    #[case::duplicate_bound(vec![
        TariffTier::bounded("a", 350.0, 6.0),
        TariffTier::bounded("b", 350.0, 9.0),
        TariffTier::unbounded("c", 18.0),
    ])]
    #[case::negative_rate(vec![
        TariffTier::bounded("a", 350.0, -6.0),
        TariffTier::unbounded("b", 9.0),
    ])]
    #[case::zero_first_bound(vec![
        TariffTier::bounded("a", 0.0, 6.0),
        TariffTier::unbounded("b", 9.0),
    ])]
    #[case::unbounded_in_middle(vec![
        TariffTier::bounded("a", 350.0, 6.0),
        TariffTier::unbounded("b", 9.0),
        TariffTier::unbounded("c", 18.0),
    ])]
    #[case::nan_rate(vec![TariffTier::unbounded("a", f64::NAN)])]
    #[case::infinite_bound(vec![
        TariffTier::bounded("a", f64::INFINITY, 6.0),
        TariffTier::unbounded("b", 9.0),
    ])]
    #[case::nan_bound(vec![
        TariffTier::bounded("a", f64::NAN, 6.0),
        TariffTier::unbounded("b", 9.0),
    ])]
    fn test_invalid_configurations(#[case] tiers: Vec<TariffTier>) {
        assert!(matches!(
            allocate(100.0, &tiers),
            Err(TariffError::Configuration(_))
        ));
        assert!(TariffSchedule::new(tiers).is_err());
    }

    #[test]
    fn test_cost_overflow_is_rejected() {
        let err = allocate(1e307, &three_tiers()).unwrap_err();
        assert!(matches!(err, TariffError::InvalidInput(_)));

        let schedule = TariffSchedule::new(three_tiers()).unwrap();
        assert!(matches!(
            schedule.allocate(f64::MAX),
            Err(TariffError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_batch_aggregate_overflow_is_rejected() {
        let schedule = TariffSchedule::new(vec![TariffTier::unbounded("flat", 1.0)]).unwrap();
        assert!(matches!(
            schedule.allocate_batch(&[f64::MAX, f64::MAX]),
            Err(TariffError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bounded_last_tier_is_treated_as_unbounded() {
        let tiers = vec![
            TariffTier::bounded("a", 100.0, 1.0),
            TariffTier::bounded("b", 200.0, 2.0),
        ];
        let result = allocate(500.0, &tiers).unwrap();
        assert_eq!(result.per_tier_quantity, vec![100.0, 400.0]);
        assert_eq!(result.total_cost, 900.0);
    }

    #[test]
    fn test_single_tier() {
        let tiers = vec![TariffTier::unbounded("flat", 7.5)];
        let result = allocate(120.0, &tiers).unwrap();
        assert_eq!(result.per_tier_quantity, vec![120.0]);
        assert_eq!(result.total_cost, 900.0);
    }

    #[test]
    fn test_schedule_zone_for() {
        let schedule = TariffSchedule::default_three_zone();
        assert_eq!(schedule.zone_for(350.0).unwrap().1.name, "green");
        assert_eq!(schedule.zone_for(350.01).unwrap().1.name, "blue");
        assert_eq!(schedule.zone_for(1600.0).unwrap().0, 1);
        assert_eq!(schedule.zone_for(1700.0).unwrap().1.name, "red");
        assert_eq!(schedule.zone_for(0.0).unwrap().0, 0);
    }

    #[test]
    fn test_allocate_batch_aggregates() {
        let schedule = TariffSchedule::new(three_tiers()).unwrap();
        let batch = schedule.allocate_batch(&[500.0, 1201.0]).unwrap();

        assert_eq!(batch.items.len(), 2);
        assert_eq!(batch.aggregate.per_tier_quantity, vec![700.0, 1001.0, 0.0]);
        assert!((batch.aggregate.total_cost - (3450.0 + 9759.0)).abs() < 1e-9);
    }

    #[test]
    fn test_allocate_batch_fails_whole_batch() {
        let schedule = TariffSchedule::new(three_tiers()).unwrap();
        assert!(matches!(
            schedule.allocate_batch(&[500.0, -1.0, 20.0]),
            Err(TariffError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_schedule_deserialize_validates() {
        let ok: TariffSchedule = serde_json::from_str(
            r#"[{"name":"low","upper_bound":100.0,"rate":1.0},{"name":"high","rate":2.0}]"#,
        )
        .unwrap();
        assert_eq!(ok.tiers().len(), 2);

        let bad = serde_json::from_str::<TariffSchedule>("[]");
        assert!(bad.is_err());
    }

    fn arb_tiers() -> impl Strategy<Value = Vec<TariffTier>> {
        prop::collection::vec((1.0f64..500.0, 0.0f64..30.0), 1..6).prop_map(|steps| {
            let last = steps.len() - 1;
            let mut bound = 0.0;
            steps
                .into_iter()
                .enumerate()
                .map(|(i, (width, rate))| {
                    bound += width;
                    TariffTier {
                        name: format!("t{}", i),
                        upper_bound: if i == last { None } else { Some(bound) },
                        rate,
                    }
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_partition_sums_to_quantity(tiers in arb_tiers(), q in 0.0f64..5000.0) {
            let result = allocate(q, &tiers).unwrap();
            prop_assert!((result.allocated_total() - q).abs() < 1e-6);
            prop_assert!(result.per_tier_quantity.iter().all(|x| *x >= 0.0));
        }

        #[test]
        fn prop_cost_is_monotone(tiers in arb_tiers(), a in 0.0f64..5000.0, b in 0.0f64..5000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_cost = allocate(lo, &tiers).unwrap().total_cost;
            let hi_cost = allocate(hi, &tiers).unwrap().total_cost;
            prop_assert!(lo_cost <= hi_cost + 1e-9);
        }

        #[test]
        fn prop_zero_quantity_costs_nothing(tiers in arb_tiers()) {
            let result = allocate(0.0, &tiers).unwrap();
            prop_assert!(result.per_tier_quantity.iter().all(|x| *x == 0.0));
            prop_assert_eq!(result.total_cost, 0.0);
        }

        #[test]
        fn prop_single_tier_is_linear(rate in 0.0f64..50.0, q in 0.0f64..5000.0) {
            let tiers = vec![TariffTier::unbounded("flat", rate)];
            let result = allocate(q, &tiers).unwrap();
            prop_assert!((result.total_cost - q * rate).abs() < 1e-9 * (1.0 + q * rate));
        }

        #[test]
        fn prop_allocation_is_deterministic(tiers in arb_tiers(), q in 0.0f64..5000.0) {
            prop_assert_eq!(allocate(q, &tiers).unwrap(), allocate(q, &tiers).unwrap());
        }
    }
}
