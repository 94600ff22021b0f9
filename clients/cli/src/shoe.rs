use rand::seq::SliceRandom;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use twentyone::{Card, CardSource, SourceError};

/// Multi-deck shoe with a cut card at a quarter of the way from the end.
pub struct Shoe {
    decks: u8,
    cards: Vec<Card>,
    cut: usize,
    rng: ChaCha8Rng,
}

impl Shoe {
    pub fn new(decks: u8, seed: u64) -> Self {
        let decks = decks.max(1);
        let mut shoe = Self {
            decks,
            cards: Vec::with_capacity(decks as usize * 52),
            cut: decks as usize * 52 / 4,
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        shoe.shuffle();
        shoe
    }

    /// Gathers every card back and shuffles.
    pub fn shuffle(&mut self) {
        self.cards.clear();
        for _ in 0..self.decks {
            self.cards.extend((0..52).filter_map(Card::from_index));
        }
        self.cards.shuffle(&mut self.rng);
        log::debug!("shoe shuffled: {} cards", self.cards.len());
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn past_cut(&self) -> bool {
        self.cards.len() < self.cut
    }
}

impl CardSource for Shoe {
    fn draw_next_card(&mut self) -> Result<Card, SourceError> {
        self.cards.pop().ok_or(SourceError::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_shoe_is_full() {
        let shoe = Shoe::new(2, 7);
        assert_eq!(shoe.remaining(), 104);
        assert!(!shoe.past_cut());
    }

    #[test]
    fn test_same_seed_same_order() {
        let mut a = Shoe::new(1, 42);
        let mut b = Shoe::new(1, 42);
        for _ in 0..52 {
            assert_eq!(a.draw_next_card(), b.draw_next_card());
        }
    }

    #[test]
    fn test_exhaustion() {
        let mut shoe = Shoe::new(1, 1);
        for _ in 0..52 {
            shoe.draw_next_card().unwrap();
        }
        assert_eq!(shoe.draw_next_card(), Err(SourceError::Exhausted));
        assert!(shoe.past_cut());

        shoe.shuffle();
        assert_eq!(shoe.remaining(), 52);
    }

    #[test]
    fn test_zero_decks_means_one() {
        assert_eq!(Shoe::new(0, 3).remaining(), 52);
    }
}
