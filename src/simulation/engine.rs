use crate::report::ResultRow;
use crate::rng::SimRng;
use crate::simulation::deck::{Deck, DeckComposition, DeckError};
use crate::simulation::hand::HandTally;
use crate::simulation::mulligan::{resolve_mulligans, OpeningHand};
use thiserror::Error;

const COLOR_A: usize = 0;
const COLOR_B: usize = 1;
const DUAL: usize = 2;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequirementError {
    #[error("Color requirement must name one or two colors, got {0}")]
    ColorCount(usize),
    #[error("Color requirement counts must be positive")]
    ZeroNeed,
    #[error("Turn must be at least 1")]
    ZeroTurn,
    #[error("Invalid deck: {0}")]
    Deck(#[from] DeckError),
}

/// Colored sources needed by the deadline turn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorRequirement {
    One(u32),
    Two(u32, u32),
}

/// A deck and the mana it has to produce by a given turn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Requirement {
    total_cards: u32,
    total_lands: u32,
    turn: u32,
    colors: ColorRequirement,
}

impl Requirement {
    pub fn new(total_cards: u32, total_lands: u32, turn: u32, needs: &[u32]) -> Result<Self, RequirementError> {
        if turn == 0 {
            return Err(RequirementError::ZeroTurn);
        }
        if needs.contains(&0) {
            return Err(RequirementError::ZeroNeed);
        }
        let colors = match *needs {
            [need] => ColorRequirement::One(need),
            [need_a, need_b] => ColorRequirement::Two(need_a, need_b),
            _ => return Err(RequirementError::ColorCount(needs.len())),
        };
        if total_lands > total_cards {
            return Err(DeckError::TooManyLands {
                lands: total_lands,
                cards: total_cards,
            }
            .into());
        }
        Ok(Requirement {
            total_cards,
            total_lands,
            turn,
            colors,
        })
    }

    pub fn total_cards(&self) -> u32 {
        self.total_cards
    }

    pub fn total_lands(&self) -> u32 {
        self.total_lands
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn colors(&self) -> ColorRequirement {
        self.colors
    }
}

/// How the colored lands of a two-color deck are split
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LandSplit {
    pub land_a: u32,
    pub land_b: u32,
    pub land_ab: u32,
}

impl LandSplit {
    /// Every split with `land_a + land_b + land_ab <= total_lands`,
    /// ordered by A, then B, then dual
    pub fn all(total_lands: u32) -> impl Iterator<Item = LandSplit> {
        (0..=total_lands).flat_map(move |land_a| {
            (0..=total_lands - land_a).flat_map(move |land_b| {
                (0..=total_lands - land_a - land_b).map(move |land_ab| LandSplit {
                    land_a,
                    land_b,
                    land_ab,
                })
            })
        })
    }
}

/// Result of a single simulated game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrialOutcome {
    /// Enough lands of any kind by the deadline
    pub enough_lands: bool,
    /// Enough lands and the colored sources the requirement asks for
    pub colors_ok: bool,
}

/// Trial counters for one deck configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Estimate {
    pub trials: u64,
    pub conditional: u64,
    pub ok: u64,
}

impl Estimate {
    pub fn record(&mut self, outcome: TrialOutcome) {
        self.trials += 1;
        if outcome.enough_lands {
            self.conditional += 1;
        }
        if outcome.colors_ok {
            self.ok += 1;
        }
    }

    /// P(colors satisfied | enough lands), `None` if no trial had enough lands
    pub fn probability(&self) -> Option<f64> {
        if self.conditional == 0 {
            None
        } else {
            Some(self.ok as f64 / self.conditional as f64)
        }
    }
}

/// Knobs shared by every requirement of a sweep
#[derive(Clone, Copy, Debug)]
pub struct SimSettings {
    pub trials: u64,
    /// Upper bound of the good-land sweep for one-color requirements
    pub max_good_lands: u32,
}

fn draw_turns(deck: &mut Deck, tally: &mut HandTally, turn: u32, rng: &mut SimRng) {
    // The opening hand covers turn 1
    for _ in 2..=turn {
        if let Some(category) = deck.draw(rng) {
            tally.add(category);
        }
    }
}

/// Bottom cards after a mulligan, keeping good lands first
fn bottom_one_color(opening: &mut OpeningHand) {
    if opening.mulliganed() {
        let tally = &mut opening.tally;
        tally.cap_lands(opening.hand_size - 1);
        let lands = tally.lands();
        tally.cap_good(0, lands);
    }
}

/// Bottom cards after a mulligan, keeping duals first and splitting the
/// rest between the two colors in proportion to what each color needs
pub fn bottom_two_color(opening: &mut OpeningHand, need_a: u32, need_b: u32) {
    if !opening.mulliganed() {
        return;
    }
    let tally = &mut opening.tally;
    tally.cap_lands(opening.hand_size - 1);

    // Duals are not capped; they can outnumber the kept lands
    let remaining = tally.lands().saturating_sub(tally.good(DUAL));
    if tally.good(COLOR_A) + tally.good(COLOR_B) > remaining {
        let total = need_a + need_b;
        tally.cap_good(COLOR_A, remaining * need_a / total);
        tally.cap_good(COLOR_B, remaining * need_b / total);
    }
}

pub fn run_one_color_trial(
    deck: &mut Deck,
    composition: &DeckComposition,
    need: u32,
    turn: u32,
    rng: &mut SimRng,
) -> TrialOutcome {
    let mut opening = resolve_mulligans(deck, composition, rng);
    bottom_one_color(&mut opening);

    let mut tally = opening.tally;
    draw_turns(deck, &mut tally, turn, rng);

    let enough_lands = tally.lands() >= turn;
    TrialOutcome {
        enough_lands,
        colors_ok: enough_lands && tally.good(0) >= need,
    }
}

pub fn run_two_color_trial(
    deck: &mut Deck,
    composition: &DeckComposition,
    need_a: u32,
    need_b: u32,
    turn: u32,
    rng: &mut SimRng,
) -> TrialOutcome {
    let mut opening = resolve_mulligans(deck, composition, rng);
    bottom_two_color(&mut opening, need_a, need_b);

    let mut tally = opening.tally;
    draw_turns(deck, &mut tally, turn, rng);

    let enough_lands = tally.lands() >= turn;
    TrialOutcome {
        enough_lands,
        colors_ok: enough_lands && two_color_sources_ok(&tally, need_a, need_b),
    }
}

/// Whether the hand covers both colors: single-color lands go to their own
/// color first and duals must cover whatever is left
pub fn two_color_sources_ok(tally: &HandTally, need_a: u32, need_b: u32) -> bool {
    let for_a = need_a.min(tally.good(COLOR_A));
    let for_b = need_b.min(tally.good(COLOR_B));
    tally.good(DUAL) >= need_a + need_b - for_a - for_b
}

pub fn estimate_one_color(composition: &DeckComposition, need: u32, turn: u32, trials: u64, rng: &mut SimRng) -> Estimate {
    let mut deck = Deck::new(composition);
    let mut estimate = Estimate::default();
    for _ in 0..trials {
        estimate.record(run_one_color_trial(&mut deck, composition, need, turn, rng));
    }
    estimate
}

pub fn estimate_two_color(
    composition: &DeckComposition,
    need_a: u32,
    need_b: u32,
    turn: u32,
    trials: u64,
    rng: &mut SimRng,
) -> Estimate {
    let mut deck = Deck::new(composition);
    let mut estimate = Estimate::default();
    for _ in 0..trials {
        estimate.record(run_two_color_trial(&mut deck, composition, need_a, need_b, turn, rng));
    }
    estimate
}

/// Run every deck configuration a requirement covers and return one row
/// per configuration, in sweep order
pub fn simulate_requirement(
    requirement: &Requirement,
    settings: &SimSettings,
    rng: &mut SimRng,
) -> Result<Vec<ResultRow>, DeckError> {
    let lands = requirement.total_lands();
    let cards = requirement.total_cards();
    let turn = requirement.turn();

    let mut rows = Vec::new();
    match requirement.colors() {
        ColorRequirement::One(need) => {
            for good in need..=settings.max_good_lands.min(lands) {
                let composition = DeckComposition::new(lands, &[good], cards)?;
                let estimate = estimate_one_color(&composition, need, turn, settings.trials, rng);
                rows.push(ResultRow {
                    need_a: need,
                    need_b: 0,
                    turn,
                    land_a: good,
                    land_b: 0,
                    land_ab: 0,
                    total_lands: lands,
                    total_cards: cards,
                    probability: estimate.probability(),
                });
            }
        }
        ColorRequirement::Two(need_a, need_b) => {
            for split in LandSplit::all(lands) {
                let composition = DeckComposition::new(lands, &[split.land_a, split.land_b, split.land_ab], cards)?;
                let estimate = estimate_two_color(&composition, need_a, need_b, turn, settings.trials, rng);
                rows.push(ResultRow {
                    need_a,
                    need_b,
                    turn,
                    land_a: split.land_a,
                    land_b: split.land_b,
                    land_ab: split.land_ab,
                    total_lands: lands,
                    total_cards: cards,
                    probability: estimate.probability(),
                });
            }
        }
    }
    Ok(rows)
}
