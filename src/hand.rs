use crate::{Card, TableRules};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    Player,
    Dealer,
}

/// One side's cards and running total.
///
/// `total` only counts visible cards. A face-down hole card is tracked in
/// `hole_total` until `reveal_hole` folds it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    seat: Seat,
    cards: Vec<Card>,
    total: u8,
    hole_total: u8,
    hole_index: Option<usize>,
}

impl Hand {
    pub fn new(seat: Seat) -> Self {
        Self {
            seat,
            cards: Vec::new(),
            total: 0,
            hole_total: 0,
            hole_index: None,
        }
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Visible total
    pub fn total(&self) -> u8 {
        self.total
    }

    pub fn hole_total(&self) -> u8 {
        self.hole_total
    }

    pub fn has_hole_card(&self) -> bool {
        self.hole_index.is_some()
    }

    /// Visible total plus any unrevealed hole card.
    pub fn combined_total(&self) -> u8 {
        self.total + self.hole_total
    }

    pub fn is_busted(&self, rules: &TableRules) -> bool {
        rules.is_bust(self.total)
    }

    /// Appends a face-up card and returns the new visible total.
    pub fn add_up_card(&mut self, card: Card) -> u8 {
        self.cards.push(card);
        self.total += card.value();
        self.check_total();
        self.total
    }

    /// Appends a face-down card. Only one may be pending at a time.
    pub fn add_hole_card(&mut self, card: Card) {
        assert!(
            self.hole_index.is_none(),
            "{:?} hand already holds an unrevealed card",
            self.seat
        );
        self.hole_index = Some(self.cards.len());
        self.cards.push(card);
        self.hole_total = card.value();
        self.check_total();
    }

    /// Folds the hole card into the visible total.
    /// Returns the new total, or `None` if there was nothing to reveal.
    pub fn reveal_hole(&mut self) -> Option<u8> {
        self.hole_index.take()?;
        self.total += self.hole_total;
        self.hole_total = 0;
        self.check_total();
        Some(self.total)
    }

    /// Demotes every visible Ace still counting 11, taking 10 off the total
    /// for each. Returns how many were demoted.
    pub fn correct_aces(&mut self) -> usize {
        let hole_index = self.hole_index;
        let mut corrected = 0;
        for (index, card) in self.cards.iter_mut().enumerate() {
            if Some(index) == hole_index {
                continue;
            }
            if card.demote_ace() {
                self.total -= 10;
                corrected += 1;
            }
        }
        self.check_total();
        corrected
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.total = 0;
        self.hole_total = 0;
        self.hole_index = None;
    }

    fn visible_sum(&self) -> u8 {
        self.cards
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != self.hole_index)
            .map(|(_, card)| card.value())
            .sum()
    }

    fn check_total(&self) {
        debug_assert_eq!(
            self.total,
            self.visible_sum(),
            "{:?} total drifted from its cards",
            self.seat
        );
    }
}
