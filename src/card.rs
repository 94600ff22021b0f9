use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn symbol(&self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }
}

/// Rank of a card as the judgment sees it.
///
/// The Ace has two identities: `AceEleven` when freshly drawn and `AceOne`
/// once it has been corrected to avoid a bust. They are states of the same
/// physical card, so `is_ace` holds for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    AceEleven,
    AceOne,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// Deck order, Ace through King. The Ace starts out counting 11.
    pub const DECK_ORDER: [Rank; 13] = [
        Rank::AceEleven,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    pub fn value(&self) -> u8 {
        match self {
            Rank::AceEleven => 11,
            Rank::AceOne => 1,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
        }
    }

    pub fn is_ace(&self) -> bool {
        matches!(self, Rank::AceEleven | Rank::AceOne)
    }

    fn label(&self) -> &'static str {
        match self {
            Rank::AceEleven | Rank::AceOne => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    pub fn is_ace(&self) -> bool {
        self.rank.is_ace()
    }

    /// Card at `index` in a fresh 52-card deck (suit-major, Ace..King).
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= 52 {
            return None;
        }
        Some(Self::new(Suit::ALL[index / 13], Rank::DECK_ORDER[index % 13]))
    }

    /// Re-identifies an Ace counting 11 as an Ace counting 1.
    /// Returns false for every other card.
    pub fn demote_ace(&mut self) -> bool {
        if self.rank == Rank::AceEleven {
            self.rank = Rank::AceOne;
            true
        } else {
            false
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index_covers_the_deck() {
        let cards: Vec<Card> = (0..52).filter_map(Card::from_index).collect();
        assert_eq!(cards.len(), 52);
        assert_eq!(cards[0], Card::new(Suit::Spades, Rank::AceEleven));
        assert_eq!(cards[12], Card::new(Suit::Spades, Rank::King));
        assert_eq!(cards[13], Card::new(Suit::Hearts, Rank::AceEleven));
        assert_eq!(cards[51], Card::new(Suit::Clubs, Rank::King));
        assert!(Card::from_index(52).is_none());
    }

    #[test]
    fn test_deck_value_sum() {
        // 4 * (11 + 2..=9 + 10 * 4)
        let sum: u32 = (0..52)
            .filter_map(Card::from_index)
            .map(|c| c.value() as u32)
            .sum();
        assert_eq!(sum, 4 * (11 + 44 + 40));
    }

    #[test]
    fn test_face_cards_count_ten() {
        for rank in [Rank::Ten, Rank::Jack, Rank::Queen, Rank::King] {
            assert_eq!(rank.value(), 10);
        }
    }

    #[test]
    fn test_demote_ace() {
        let mut ace = Card::new(Suit::Hearts, Rank::AceEleven);
        assert_eq!(ace.value(), 11);
        assert!(ace.demote_ace());
        assert_eq!(ace.rank, Rank::AceOne);
        assert_eq!(ace.value(), 1);
        assert!(ace.is_ace());
        // already demoted
        assert!(!ace.demote_ace());
    }

    #[test]
    fn test_demote_non_ace_is_noop() {
        let mut king = Card::new(Suit::Clubs, Rank::King);
        assert!(!king.demote_ace());
        assert_eq!(king.rank, Rank::King);
    }

    #[test]
    fn test_display() {
        assert_eq!(Card::new(Suit::Spades, Rank::AceEleven).to_string(), "A♠");
        assert_eq!(Card::new(Suit::Spades, Rank::AceOne).to_string(), "A♠");
        assert_eq!(Card::new(Suit::Hearts, Rank::Ten).to_string(), "10♥");
        assert_eq!(Card::new(Suit::Diamonds, Rank::Queen).to_string(), "Q♦");
    }
}
