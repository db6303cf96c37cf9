//! Property tests over whole repair-shop runs.

use proptest::prelude::*;
use repairsim::factory::config::{DurationDistribution, FactoryConfig};
use repairsim::factory::scenario::run_scenario;
use repairsim::EventKind;

fn arb_config() -> impl Strategy<Value = FactoryConfig> {
    (
        any::<u64>(),
        1usize..15,
        1u64..4,
        1u64..6,
        5.0f64..60.0,
        50.0f64..400.0,
    )
        .prop_map(|(seed, machines, technicians, spares, mean_failure, horizon)| {
            FactoryConfig::default()
                .with_seed(seed)
                .with_machine_count(machines)
                .with_technicians(technicians)
                .with_spares(spares, spares)
                .with_horizon(horizon)
                .with_failure_interval(DurationDistribution::Exponential { mean: mean_failure })
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Identical configuration and seed give an identical record stream.
    #[test]
    fn deterministic_for_fixed_seed(config in arb_config()) {
        let a = run_scenario(&config).unwrap();
        let b = run_scenario(&config).unwrap();
        prop_assert_eq!(a.timeline(), b.timeline());
        prop_assert_eq!(a.total_cost, b.total_cost);
    }

    /// Spares balance, resources stay in bounds, cost never decreases.
    #[test]
    fn run_invariants_hold(config in arb_config()) {
        let report = run_scenario(&config).unwrap();

        prop_assert!(report.technicians.held <= report.technicians.capacity);
        prop_assert!(report.spares.held <= report.spares.capacity);
        prop_assert_eq!(
            report.spares.held + report.spares_handed_out,
            report.spares.capacity + report.spares_returned
        );
        prop_assert!(
            report.count(EventKind::RepairCompleted) <= report.count(EventKind::MachineFailed)
        );
        for pair in report.cost_history.windows(2) {
            prop_assert!(pair[0].total <= pair[1].total);
        }
        for pair in report.records.windows(2) {
            prop_assert!(pair[0].time <= pair[1].time);
        }
    }
}
