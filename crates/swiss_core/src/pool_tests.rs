use super::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn decks(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn rates(pairs: &[(&str, f64)]) -> PlayRates {
    pairs.iter().map(|(d, r)| (d.to_string(), *r)).collect()
}

fn counts(allocations: &[Allocation]) -> Vec<u32> {
    allocations.iter().map(|a| a.count).collect()
}

#[test]
fn test_exact_split() {
    let allocations = allocate(&decks(&["A", "B"]), &rates(&[("A", 50.0), ("B", 50.0)]), 100);
    assert_eq!(counts(&allocations), vec![50, 50]);
    assert_eq!(allocations[0].deck, "A");
}

#[test]
fn test_rounding_up_drift_goes_to_largest() {
    // 34 + 34 + 33 = 101, drift -1 lands on the first-listed deck
    let allocations = allocate(
        &decks(&["A", "B", "C"]),
        &rates(&[("A", 33.5), ("B", 33.5), ("C", 33.0)]),
        100,
    );
    assert_eq!(counts(&allocations), vec![33, 34, 33]);
}

#[test]
fn test_rounding_down_drift_goes_to_largest() {
    // round(3.33) x 3 = 9, drift +1
    let allocations = allocate(
        &decks(&["A", "B", "C"]),
        &rates(&[("A", 33.3), ("B", 33.3), ("C", 33.4)]),
        10,
    );
    assert_eq!(counts(&allocations).iter().sum::<u32>(), 10);
    assert_eq!(counts(&allocations), vec![4, 3, 3]);
}

#[test]
fn test_zero_rate_deck_gets_nobody() {
    let allocations = allocate(
        &decks(&["A", "B", "C"]),
        &rates(&[("A", 70.0), ("B", 30.0)]),
        50,
    );
    assert_eq!(counts(&allocations), vec![35, 15, 0]);
}

#[test]
fn test_negative_drift_spills_past_empty_bucket() {
    // 200 decks at 0.5% of 100 each round to 1: drift -100
    let names: Vec<String> = (0..200).map(|i| format!("D{i}")).collect();
    let rates: PlayRates = names.iter().map(|d| (d.clone(), 0.5)).collect();
    let allocations = allocate(&names, &rates, 100);
    assert_eq!(counts(&allocations).iter().sum::<u32>(), 100);
}

#[test]
fn test_no_decks_no_players() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(allocate(&[], &PlayRates::new(), 100).is_empty());
    assert!(build_pool(&[], &PlayRates::new(), 100, &mut rng).is_empty());
}

#[test]
fn test_build_pool_ids_and_decks() {
    let mut rng = StdRng::seed_from_u64(7);
    let names = decks(&["A", "B"]);
    let players = build_pool(&names, &rates(&[("A", 25.0), ("B", 75.0)]), 40, &mut rng);

    assert_eq!(players.len(), 40);
    let ids: HashSet<u32> = players.iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=40).collect());
    assert_eq!(players.iter().filter(|p| &*p.deck == "A").count(), 10);
    assert!(players.iter().all(|p| p.match_points == 0 && p.opponents.is_empty()));
}

#[test]
fn test_build_pool_is_shuffled() {
    let mut rng = StdRng::seed_from_u64(3);
    let names = decks(&["A", "B"]);
    let players = build_pool(&names, &rates(&[("A", 50.0), ("B", 50.0)]), 200, &mut rng);
    let in_order = players.windows(2).all(|w| w[0].id < w[1].id);
    assert!(!in_order);
}

#[test]
fn test_equal_rates() {
    let rates = equal_rates(&decks(&["A", "B", "C", "D"]));
    assert_eq!(rates.len(), 4);
    assert!((rates.values().sum::<f64>() - 100.0).abs() < 1e-9);
    assert!(equal_rates(&[]).is_empty());
}

proptest! {
    #[test]
    fn allocation_sums_to_entrants(
        weights in prop::collection::vec(0u32..1000, 1..12),
        total in 1u32..5000,
    ) {
        let names: Vec<String> = (0..weights.len()).map(|i| format!("deck{i}")).collect();
        let weight_sum: u32 = weights.iter().sum();
        let rates: PlayRates = names
            .iter()
            .zip(&weights)
            .map(|(deck, &w)| {
                let rate = if weight_sum == 0 {
                    0.0
                } else {
                    f64::from(w) * 100.0 / f64::from(weight_sum)
                };
                (deck.clone(), rate)
            })
            .collect();

        let allocations = allocate(&names, &rates, total);
        prop_assert_eq!(allocations.len(), names.len());
        prop_assert_eq!(allocations.iter().map(|a| a.count).sum::<u32>(), total);
    }
}
