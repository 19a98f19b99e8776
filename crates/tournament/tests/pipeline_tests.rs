//! Load matchup data from disk, run a batch and write the report back out

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use swiss_core::{BatchRunner, MatchupIndex};
use tournament::{load_matchups, BatchReport, RunSettings};

const MATCHUPS_CSV: &str = "\
deck_a,deck_b,wins,losses
Burn,Tron,60,40
Burn,Control,45,55
Tron,Control,70,30
";

#[test]
fn test_csv_to_report() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("matchups.csv");
    fs::write(&data, MATCHUPS_CSV).unwrap();

    let index = MatchupIndex::from_rows(load_matchups(&data).unwrap());
    assert_eq!(index.decks(), ["Burn", "Tron", "Control"]);

    let mut settings = RunSettings {
        entrants: 64,
        trials: 50,
        matchups: Some(data),
        ..RunSettings::default()
    };
    settings.set_equal_rates(&index);
    settings.validate(&index).unwrap();

    let rates = settings.play_rates();
    let mut rng = StdRng::seed_from_u64(3);
    let results = BatchRunner::new(&index, &rates, settings.entrants)
        .run_with_rng(settings.trials, &mut rng);
    assert_eq!(results.trials_completed, 50);

    let day1_total: u32 = results.decks.iter().map(|d| d.day1_count).sum();
    assert_eq!(day1_total, 64);
    let day2_total: f64 = results.decks.iter().map(|d| d.day2_avg).sum();
    let top8_total: f64 = results.decks.iter().map(|d| d.top8_avg).sum();
    assert!(day2_total <= 64.0);
    assert!(top8_total <= 8.0 + 1e-9);
    assert!(top8_total <= day2_total + 1e-9);

    let report = BatchReport::new(settings.entrants, settings.trials, results);
    assert!(!report.cancelled());
    let out = dir.path().join("report.json");
    report.save(&out).unwrap();
    let loaded = BatchReport::load(&out).unwrap();
    assert_eq!(loaded.entrants, 64);
    assert_eq!(loaded.results.trials_completed, 50);
    assert_eq!(loaded.results.decks.len(), 3);
}

#[test]
fn test_settings_file_drives_a_run() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("matchups.json");
    fs::write(
        &data,
        r#"[{"deck_a": "Burn", "deck_b": "Tron", "wins": 55, "losses": 45}]"#,
    )
    .unwrap();

    let config = dir.path().join("tournament.toml");
    fs::write(
        &config,
        format!(
            "entrants = 32\ntrials = 5\nmatchups = {:?}\n\n[play_rates]\nBurn = 75.0\nTron = 25.0\n",
            data.display().to_string()
        ),
    )
    .unwrap();

    let settings = RunSettings::load(&config).unwrap();
    let rows = load_matchups(settings.matchups.as_ref().unwrap()).unwrap();
    let index = MatchupIndex::from_rows(rows);
    settings.validate(&index).unwrap();

    let rates = settings.play_rates();
    let mut rng = StdRng::seed_from_u64(11);
    let results = BatchRunner::new(&index, &rates, settings.entrants)
        .run_with_rng(settings.trials, &mut rng);

    assert_eq!(results.deck("Burn").unwrap().day1_count, 24);
    assert_eq!(results.deck("Tron").unwrap().day1_count, 8);
}
