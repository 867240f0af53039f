use crate::rng::SimRng;
use crate::simulation::deck::{Deck, DeckComposition};
use crate::simulation::hand::HandTally;

/// Cards drawn for every opening hand, before any bottoming
pub const STARTING_HAND_SIZE: u32 = 7;

/// Hand size at which the player keeps whatever was drawn
pub const MULLIGAN_FLOOR: u32 = 2;

/// Land counts (inclusive) an opening seven must show to be kept
pub const MIN_KEEP_LANDS: u32 = 2;
pub const MAX_KEEP_LANDS: u32 = 5;

/// Hand kept after the mulligan loop
#[derive(Clone, Copy, Debug)]
pub struct OpeningHand {
    pub hand_size: u32,
    pub tally: HandTally,
}

impl OpeningHand {
    pub fn mulliganed(&self) -> bool {
        self.hand_size < STARTING_HAND_SIZE
    }
}

/// Decide whether a seven-card draw with `lands` lands is unkeepable
pub fn should_mulligan(lands: u32) -> bool {
    !(MIN_KEEP_LANDS..=MAX_KEEP_LANDS).contains(&lands)
}

/// Resolve mulligans London style: every attempt reshuffles the full deck
/// and draws seven, the kept size drops by one per attempt.
/// The deck is left holding whatever the last seven did not take.
pub fn resolve_mulligans(deck: &mut Deck, composition: &DeckComposition, rng: &mut SimRng) -> OpeningHand {
    let mut hand_size = STARTING_HAND_SIZE + 1;
    let mut tally = HandTally::new(composition.good_kinds());
    let mut mulligan = true;

    while mulligan && hand_size > MULLIGAN_FLOOR {
        deck.reset(composition);
        tally = HandTally::new(composition.good_kinds());
        for _ in 0..STARTING_HAND_SIZE {
            if let Some(category) = deck.draw(rng) {
                tally.add(category);
            }
        }
        mulligan = should_mulligan(tally.lands());
        hand_size -= 1;
    }

    OpeningHand { hand_size, tally }
}
