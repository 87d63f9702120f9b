use approx::assert_abs_diff_eq;
use minimuf::*;
use proptest::prelude::*;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
struct TestConfig {
    general: GeneralConfig,
    scenarios: Vec<TestScenario>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeneralConfig {
    tolerance_muf: f64,
    tolerance_power: f64,
    tolerance_delay: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct TestScenario {
    name: String,
    #[allow(dead_code)]
    description: String,
    tx: (f64, f64),
    rx: (f64, f64),
    config: CircuitConfig,
    hour: f64,
    expected: Expected,
}

#[derive(Debug, Clone, Deserialize)]
struct Expected {
    min_hops: usize,
    delay_ms: f64,
    muf: f64,
    paths: Vec<Option<ExpectedPath>>,
    optimum_frequency: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct ExpectedPath {
    hops: usize,
    received_power: f64,
    codes: String,
}

fn load_test_config() -> TestConfig {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/scenarios.json");
    let content = fs::read_to_string(path).expect("Failed to read scenarios");
    serde_json::from_str(&content).expect("Failed to parse scenarios")
}

fn circuit_for(scenario: &TestScenario) -> Circuit {
    Circuit::new(
        Location::from_degrees(scenario.tx.0, scenario.tx.1),
        Location::from_degrees(scenario.rx.0, scenario.rx.1),
        &scenario.config,
        None,
    )
    .unwrap()
}

#[test]
fn reference_scenarios() {
    let config = load_test_config();
    let tol = &config.general;
    assert!(!config.scenarios.is_empty());

    for scenario in &config.scenarios {
        let circuit = circuit_for(scenario);
        let expected = &scenario.expected;
        assert_eq!(circuit.minimum_hop().hops, expected.min_hops, "{}", scenario.name);
        assert_abs_diff_eq!(circuit.delay_ms(), expected.delay_ms, epsilon = tol.tolerance_delay);

        let hour = circuit.predict_hour(scenario.hour).unwrap();
        assert_abs_diff_eq!(hour.muf, expected.muf, epsilon = tol.tolerance_muf);
        assert_eq!(hour.evaluations.len(), expected.paths.len(), "{}", scenario.name);

        for (evaluation, path) in hour.evaluations.iter().zip(&expected.paths) {
            match (evaluation.best_budget(), path) {
                (Some(best), Some(path)) => {
                    assert_eq!(best.hops, path.hops, "{} at {} MHz", scenario.name, evaluation.frequency);
                    assert_abs_diff_eq!(best.received_power, path.received_power, epsilon = tol.tolerance_power);
                    let codes: String = best.flags.day_night_code().into_iter().chain([best.flags.quality_code()]).collect();
                    assert_eq!(codes, path.codes, "{} at {} MHz", scenario.name, evaluation.frequency);
                }
                (None, None) => {}
                (got, want) => panic!(
                    "{} at {} MHz: got {:?}, expected {:?}",
                    scenario.name, evaluation.frequency, got, want
                ),
            }
        }

        assert_eq!(hour.optimum_frequency(), expected.optimum_frequency, "{}", scenario.name);
    }
}

#[test]
fn kauai_below_the_e_layer() {
    let config = load_test_config();
    let scenario = config
        .scenarios
        .iter()
        .find(|s| s.name == "kauai_night")
        .unwrap();
    let hour = circuit_for(scenario).predict_hour(scenario.hour).unwrap();

    // At 2.5 MHz the four-hop path is cut off by the E layer but still the
    // strongest after its penalty
    let eval = &hour.evaluations[0];
    let best = eval.best_budget().unwrap();
    assert!(best.flags.contains(PathFlags::E_CUTOFF));
    assert_abs_diff_eq!(best.effective_power, best.received_power - constants::MPATH);

    let five = eval.candidates[1].unwrap();
    assert!(five.flags.contains(PathFlags::WEAK));
    assert!(best.effective_power > five.effective_power);
    assert_eq!(eval.candidates[2].unwrap().flags.day_night_code(), Some('x'));
}

#[test]
fn whole_day_is_consistent() {
    let config = load_test_config();
    let scenario = &config.scenarios[0];
    let circuit = circuit_for(scenario);
    let day = circuit.predict_day(0, 23).unwrap();

    for (i, hour) in day.iter().enumerate() {
        assert_eq!(hour.hour, i as f64);
        assert!(hour.muf > 0.0 && hour.muf < 100.0);
        assert!((0.0..24.0).contains(&hour.local_time));
        assert_eq!(hour.hops.len(), constants::CANDIDATE_HOPS);
        assert_eq!(hour.hops[0].geometry.hops, circuit.minimum_hop().hops);
    }
}

#[test]
fn results_serialize() {
    let config = load_test_config();
    let hour = circuit_for(&config.scenarios[0]).predict_hour(12.0).unwrap();
    let json = serde_json::to_value(&hour).unwrap();
    assert_eq!(json["evaluations"].as_array().unwrap().len(), 5);
    assert_eq!(json["hops"][0]["ionosphere"]["flags"], 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chosen_paths_are_the_strongest(
        hour in 0u32..24,
        month in 1u32..=12,
        flux in 65.0f64..250.0,
        rx_lat in -60.0f64..60.0,
        rx_lon in -180.0f64..180.0,
    ) {
        let config = CircuitConfig {
            month: month as f64,
            flux,
            ..CircuitConfig::default()
        };
        let circuit = match Circuit::new(
            Location::from_degrees(39.70000, -75.78194),
            Location::from_degrees(rx_lat, rx_lon),
            &config,
            None,
        ) {
            Ok(circuit) => circuit,
            Err(PredictionError::HopSearchDiverged { .. }) => return Ok(()),
            Err(e) => return Err(TestCaseError::fail(e.to_string())),
        };

        let first = circuit.predict_hour(hour as f64).unwrap();
        let second = circuit.predict_hour(hour as f64).unwrap();
        prop_assert_eq!(&first, &second);

        for eval in &first.evaluations {
            let strongest = eval
                .candidates
                .iter()
                .flatten()
                .map(|b| b.effective_power)
                .fold(f64::NEG_INFINITY, f64::max);
            match eval.best_budget() {
                Some(best) => {
                    prop_assert!(best.effective_power > circuit.noise_floor());
                    prop_assert_eq!(best.effective_power, strongest);
                }
                None => prop_assert!(strongest <= circuit.noise_floor()),
            }
            for (candidate, hop) in eval.candidates.iter().zip(&first.hops) {
                let usable = eval.frequency < constants::FOT_FRACTION * hop.ionosphere.muf_f;
                prop_assert_eq!(candidate.is_some(), usable);
                if let Some(budget) = candidate {
                    prop_assert!(!budget.flags.contains(PathFlags::MULTIPATH) || Some(budget) == eval.best_budget());
                }
            }
        }

        if let Some(optimum) = first.optimum_evaluation() {
            let power = optimum.received_power().unwrap();
            for eval in &first.evaluations {
                if let Some(other) = eval.received_power() {
                    prop_assert!(other <= power);
                }
            }
        }
    }
}
