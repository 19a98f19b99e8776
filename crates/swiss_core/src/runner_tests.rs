use super::*;
use crate::matchup::{MatchupIndex, MatchupRow};
use crate::pool::{build_pool, PlayRates};
use crate::resolver::{MatchOutcome, MatchupResolver};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Lower id always wins
struct SeniorityResolver;

impl MatchResolver for SeniorityResolver {
    fn resolve<R: Rng + ?Sized>(&self, p1: &Player, p2: &Player, _rng: &mut R) -> MatchOutcome {
        if p1.id < p2.id {
            MatchOutcome::Player1Win
        } else {
            MatchOutcome::Player2Win
        }
    }
}

fn two_deck_setup() -> (MatchupIndex, Vec<String>, PlayRates) {
    let index = MatchupIndex::from_rows(vec![MatchupRow::new("A", "B", 60, 40)]);
    let decks = index.decks().to_vec();
    let rates: PlayRates = [("A".to_string(), 50.0), ("B".to_string(), 50.0)]
        .into_iter()
        .collect();
    (index, decks, rates)
}

fn total(counts: &DeckCounts) -> u32 {
    counts.values().sum()
}

#[test]
fn test_round_counts_match_opponent_history() {
    let (index, decks, rates) = two_deck_setup();
    let runner = TournamentRunner::new(
        TournamentConfig::for_entrants(100),
        MatchupResolver::new(&index),
    );
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..20 {
        let players = build_pool(&decks, &rates, 100, &mut rng);
        let outcome = runner.run(players, &mut rng);

        assert_eq!(outcome.eliminated.len() + outcome.standings.len(), 100);
        assert!(outcome.eliminated.iter().all(|p| p.rounds_played() == 9));
        assert!(outcome.standings.iter().all(|p| p.rounds_played() == 15));
        assert!(outcome.eliminated.iter().all(|p| p.match_points < 19));
    }
}

#[test]
fn test_snapshots_are_consistent() {
    let (index, decks, rates) = two_deck_setup();
    let runner = TournamentRunner::new(
        TournamentConfig::for_entrants(100),
        MatchupResolver::new(&index),
    );
    let mut rng = StdRng::seed_from_u64(7);
    let players = build_pool(&decks, &rates, 100, &mut rng);
    let outcome = runner.run(players, &mut rng);
    let results = &outcome.results;

    assert_eq!(results.day1.get("A"), Some(&50));
    assert_eq!(results.day1.get("B"), Some(&50));
    assert_eq!(total(&results.day2) as usize, outcome.standings.len());
    assert_eq!(total(&results.top8) as usize, outcome.standings.len().min(8));
    assert!(results.top16.is_none());
    assert!(results.top32.is_none());
}

#[test]
fn test_standings_sorted_by_points() {
    let (index, decks, rates) = two_deck_setup();
    let runner = TournamentRunner::new(
        TournamentConfig::for_entrants(64),
        MatchupResolver::new(&index),
    );
    let mut rng = StdRng::seed_from_u64(3);
    let players = build_pool(&decks, &rates, 64, &mut rng);
    let outcome = runner.run(players, &mut rng);

    assert!(outcome
        .standings
        .windows(2)
        .all(|w| w[0].match_points >= w[1].match_points));
}

#[test]
fn test_large_field_has_all_cuts() {
    let (index, decks, rates) = two_deck_setup();
    let runner = TournamentRunner::new(
        TournamentConfig::for_entrants(450),
        MatchupResolver::new(&index),
    );
    let mut rng = StdRng::seed_from_u64(17);
    let players = build_pool(&decks, &rates, 450, &mut rng);
    let outcome = runner.run(players, &mut rng);

    let top16 = outcome.results.top16.expect("top 16 for 450 players");
    let top32 = outcome.results.top32.expect("top 32 for 450 players");
    assert_eq!(total(&top16) as usize, outcome.standings.len().min(16));
    assert_eq!(total(&top32) as usize, outcome.standings.len().min(32));
}

#[test]
fn test_mid_field_has_top16_only() {
    let (index, decks, rates) = two_deck_setup();
    let runner = TournamentRunner::new(
        TournamentConfig::for_entrants(300),
        MatchupResolver::new(&index),
    );
    let mut rng = StdRng::seed_from_u64(5);
    let players = build_pool(&decks, &rates, 300, &mut rng);
    let outcome = runner.run(players, &mut rng);

    assert!(outcome.results.top16.is_some());
    assert!(outcome.results.top32.is_none());
}

#[test]
fn test_empty_field() {
    let runner = TournamentRunner::new(TournamentConfig::for_entrants(0), SeniorityResolver);
    let mut rng = StdRng::seed_from_u64(0);
    let outcome = runner.run(Vec::new(), &mut rng);

    assert_eq!(outcome.results, SimulationResults::default());
    assert!(outcome.standings.is_empty());
}

#[test]
fn test_deterministic_resolver_single_player_field() {
    // A lone player takes a bye in all 15 rounds
    let runner = TournamentRunner::new(TournamentConfig::for_entrants(1), SeniorityResolver);
    let mut rng = StdRng::seed_from_u64(0);
    let players = vec![Player::new(1, "Solo".into())];
    let outcome = runner.run(players, &mut rng);

    assert_eq!(outcome.standings.len(), 1);
    let solo = &outcome.standings[0];
    assert_eq!(solo.match_points, 45);
    assert_eq!(solo.byes(), 15);
    assert_eq!(outcome.results.top8.get("Solo"), Some(&1));
}

#[test]
fn test_results_json_keeps_optional_cuts() {
    let (index, decks, rates) = two_deck_setup();
    let runner = TournamentRunner::new(
        TournamentConfig::for_entrants(300),
        MatchupResolver::new(&index),
    );
    let mut rng = StdRng::seed_from_u64(21);
    let players = build_pool(&decks, &rates, 300, &mut rng);
    let results = runner.run(players, &mut rng).results;
    assert!(results.top16.is_some());
    assert!(results.top32.is_none());

    let json = serde_json::to_string(&results).unwrap();
    let loaded: SimulationResults = serde_json::from_str(&json).unwrap();
    assert_eq!(loaded, results);
    assert_eq!(total(&loaded.day1), 300);
}

#[test]
fn test_count_decks() {
    let players = vec![
        Player::new(1, "A".into()),
        Player::new(2, "B".into()),
        Player::new(3, "A".into()),
    ];
    let counts = count_decks(&players);
    assert_eq!(counts.get("A"), Some(&2));
    assert_eq!(counts.get("B"), Some(&1));
    assert!(count_decks(&[]).is_empty());
}
