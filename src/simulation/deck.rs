use crate::rng::SimRng;
use thiserror::Error;

/// Most good-land kinds a deck can carry (A, B and dual A+B)
pub const MAX_GOOD_KINDS: usize = 3;

/// Largest category id: every good kind plus plain land and spell
pub const MAX_CATEGORY_ID: usize = MAX_GOOD_KINDS + 2;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DeckError {
    #[error("Deck needs 1 to 3 good land kinds, got {0}")]
    GoodKinds(usize),
    #[error("{good} good lands do not fit in {lands} lands")]
    TooManyGoodLands { good: u32, lands: u32 },
    #[error("{lands} lands do not fit in a {cards} card deck")]
    TooManyLands { lands: u32, cards: u32 },
}

/// What a single draw turned up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// Land of the given good kind (0-based)
    Good(usize),
    PlainLand,
    Spell,
}

impl Category {
    pub fn is_land(self) -> bool {
        !matches!(self, Category::Spell)
    }

    /// Numeric id: good kinds first (1-based), then plain land, then spell
    pub fn id(self, good_kinds: usize) -> usize {
        match self {
            Category::Good(kind) => kind + 1,
            Category::PlainLand => good_kinds + 1,
            Category::Spell => good_kinds + 2,
        }
    }
}

/// Validated starting contents of a deck
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeckComposition {
    total_cards: u32,
    total_lands: u32,
    good: [u32; MAX_GOOD_KINDS],
    good_kinds: usize,
}

impl DeckComposition {
    pub fn new(total_lands: u32, good_counts: &[u32], total_cards: u32) -> Result<Self, DeckError> {
        if good_counts.is_empty() || good_counts.len() > MAX_GOOD_KINDS {
            return Err(DeckError::GoodKinds(good_counts.len()));
        }
        let good_total: u32 = good_counts.iter().sum();
        if good_total > total_lands {
            return Err(DeckError::TooManyGoodLands {
                good: good_total,
                lands: total_lands,
            });
        }
        if total_lands > total_cards {
            return Err(DeckError::TooManyLands {
                lands: total_lands,
                cards: total_cards,
            });
        }

        let mut good = [0; MAX_GOOD_KINDS];
        good[..good_counts.len()].copy_from_slice(good_counts);
        Ok(DeckComposition {
            total_cards,
            total_lands,
            good,
            good_kinds: good_counts.len(),
        })
    }

    pub fn good_kinds(&self) -> usize {
        self.good_kinds
    }
}

/// Library being drawn from without replacement.
///
/// Only the category counts are tracked; a draw picks a uniform position
/// among the remaining cards and maps it onto the categories in order:
/// good kinds, plain lands, spells.
#[derive(Clone, Debug)]
pub struct Deck {
    remaining_cards: u32,
    remaining_lands: u32,
    remaining_good: [u32; MAX_GOOD_KINDS],
    good_kinds: usize,
}

impl Deck {
    pub fn new(composition: &DeckComposition) -> Self {
        let mut deck = Deck {
            remaining_cards: 0,
            remaining_lands: 0,
            remaining_good: [0; MAX_GOOD_KINDS],
            good_kinds: 0,
        };
        deck.reset(composition);
        deck
    }

    /// Restore the full starting composition
    pub fn reset(&mut self, composition: &DeckComposition) {
        self.remaining_cards = composition.total_cards;
        self.remaining_lands = composition.total_lands;
        self.remaining_good = composition.good;
        self.good_kinds = composition.good_kinds;
    }

    pub fn remaining_cards(&self) -> u32 {
        self.remaining_cards
    }

    pub fn remaining_lands(&self) -> u32 {
        self.remaining_lands
    }

    pub fn remaining_good(&self) -> &[u32] {
        &self.remaining_good[..self.good_kinds]
    }

    /// Draw one card, or `None` once the library is empty
    pub fn draw(&mut self, rng: &mut SimRng) -> Option<Category> {
        if self.remaining_cards == 0 {
            return None;
        }
        let position = rng.position(self.remaining_cards);
        self.remaining_cards -= 1;

        let mut cutoff = 0;
        for kind in 0..self.good_kinds {
            cutoff += self.remaining_good[kind];
            if position <= cutoff {
                self.remaining_good[kind] -= 1;
                self.remaining_lands -= 1;
                return Some(Category::Good(kind));
            }
        }

        // Good lands are a prefix of the lands, so the plain-land cutoff is
        // the total land count.
        if position <= self.remaining_lands {
            self.remaining_lands -= 1;
            Some(Category::PlainLand)
        } else {
            Some(Category::Spell)
        }
    }
}
