//! Probabilistic match resolution from historical matchup data

use rand::Rng;

use crate::matchup::{MatchupIndex, MatchupStat};
use crate::player::{Player, TIE_POINTS, WIN_POINTS};

/// Result of a single match, from player 1's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Player1Win,
    Player2Win,
    Tie,
}

/// Outcome probabilities for one pairing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchProbabilities {
    pub player1_win: f64,
    pub player2_win: f64,
    pub tie: f64,
}

impl MatchProbabilities {
    /// Probabilities from a record oriented towards player 1.
    ///
    /// Returns `None` when the record has no decided games.
    pub fn from_stat(stat: &MatchupStat) -> Option<Self> {
        let total = stat.total();
        if total == 0 {
            return None;
        }

        let total = f64::from(total);
        let player1_win = f64::from(stat.wins) / total;
        let player2_win = f64::from(stat.losses) / total;
        Some(Self {
            player1_win,
            player2_win,
            tie: (1.0 - player1_win - player2_win).max(0.0),
        })
    }

    /// Draw an outcome. The tie is decided first; the win split is then
    /// renormalized over the remaining mass.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> MatchOutcome {
        if rng.gen::<f64>() < self.tie {
            return MatchOutcome::Tie;
        }

        let decided = self.player1_win + self.player2_win;
        if decided <= 0.0 {
            return coin_flip(rng);
        }
        if rng.gen::<f64>() < self.player1_win / decided {
            MatchOutcome::Player1Win
        } else {
            MatchOutcome::Player2Win
        }
    }
}

fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> MatchOutcome {
    if rng.gen_bool(0.5) {
        MatchOutcome::Player1Win
    } else {
        MatchOutcome::Player2Win
    }
}

/// Decides the outcome of a pairing.
///
/// The default implementation is [`MatchupResolver`]; tests substitute
/// deterministic resolvers.
pub trait MatchResolver {
    fn resolve<R: Rng + ?Sized>(
        &self,
        player1: &Player,
        player2: &Player,
        rng: &mut R,
    ) -> MatchOutcome;
}

/// Resolves matches from head-to-head records.
///
/// Mirror matches, unknown pairings and records without decided games are
/// coin flips.
#[derive(Debug, Clone, Copy)]
pub struct MatchupResolver<'a> {
    index: &'a MatchupIndex,
}

impl<'a> MatchupResolver<'a> {
    pub fn new(index: &'a MatchupIndex) -> Self {
        Self { index }
    }

    /// Probabilities for `deck1` (player 1) against `deck2`, or `None` when
    /// the match is a coin flip
    pub fn probabilities(&self, deck1: &str, deck2: &str) -> Option<MatchProbabilities> {
        if deck1 == deck2 {
            return None;
        }
        self.index
            .lookup(deck1, deck2)
            .and_then(|stat| MatchProbabilities::from_stat(&stat))
    }
}

impl MatchResolver for MatchupResolver<'_> {
    fn resolve<R: Rng + ?Sized>(
        &self,
        player1: &Player,
        player2: &Player,
        rng: &mut R,
    ) -> MatchOutcome {
        match self.probabilities(&player1.deck, &player2.deck) {
            Some(probabilities) => probabilities.sample(rng),
            None => coin_flip(rng),
        }
    }
}

/// Award match points and record each player as the other's opponent
pub fn apply_outcome(player1: &mut Player, player2: &mut Player, outcome: MatchOutcome) {
    match outcome {
        MatchOutcome::Player1Win => player1.match_points += WIN_POINTS,
        MatchOutcome::Player2Win => player2.match_points += WIN_POINTS,
        MatchOutcome::Tie => {
            player1.match_points += TIE_POINTS;
            player2.match_points += TIE_POINTS;
        }
    }
    player1.opponents.push(player2.id);
    player2.opponents.push(player1.id);
}

/// Resolve and apply one match
pub fn play_match<M, R>(
    resolver: &M,
    player1: &mut Player,
    player2: &mut Player,
    rng: &mut R,
) -> MatchOutcome
where
    M: MatchResolver,
    R: Rng + ?Sized,
{
    let outcome = resolver.resolve(player1, player2, rng);
    apply_outcome(player1, player2, outcome);
    outcome
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod resolver_tests;
