use crate::simulation::deck::{Category, MAX_CATEGORY_ID};

/// Running count of what is in hand, indexed by category id
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandTally {
    lands: u32,
    by_id: [u32; MAX_CATEGORY_ID + 1],
    good_kinds: usize,
}

impl HandTally {
    pub fn new(good_kinds: usize) -> Self {
        HandTally {
            good_kinds,
            ..HandTally::default()
        }
    }

    pub fn add(&mut self, category: Category) {
        if category.is_land() {
            self.lands += 1;
        }
        self.by_id[category.id(self.good_kinds)] += 1;
    }

    pub fn lands(&self) -> u32 {
        self.lands
    }

    /// Lands of the given good kind (0-based)
    pub fn good(&self, kind: usize) -> u32 {
        self.by_id[Category::Good(kind).id(self.good_kinds)]
    }

    #[cfg(test)]
    pub fn plain_lands(&self) -> u32 {
        self.by_id[Category::PlainLand.id(self.good_kinds)]
    }

    #[cfg(test)]
    pub fn spells(&self) -> u32 {
        self.by_id[Category::Spell.id(self.good_kinds)]
    }

    pub fn cap_lands(&mut self, max: u32) {
        self.lands = self.lands.min(max);
    }

    pub fn cap_good(&mut self, kind: usize, max: u32) {
        let slot = &mut self.by_id[Category::Good(kind).id(self.good_kinds)];
        *slot = (*slot).min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_counts_lands_and_categories() {
        let mut tally = HandTally::new(3);
        tally.add(Category::Good(0));
        tally.add(Category::Good(2));
        tally.add(Category::PlainLand);
        tally.add(Category::Spell);
        tally.add(Category::Spell);

        assert_eq!(tally.lands(), 3);
        assert_eq!(tally.good(0), 1);
        assert_eq!(tally.good(1), 0);
        assert_eq!(tally.good(2), 1);
        assert_eq!(tally.plain_lands(), 1);
        assert_eq!(tally.spells(), 2);
    }

    #[test]
    fn test_caps_only_lower() {
        let mut tally = HandTally::new(1);
        tally.add(Category::Good(0));
        tally.add(Category::Good(0));
        tally.cap_lands(5);
        tally.cap_good(0, 1);
        assert_eq!(tally.lands(), 2);
        assert_eq!(tally.good(0), 1);
    }
}
