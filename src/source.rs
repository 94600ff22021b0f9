use std::collections::VecDeque;

use crate::{Card, SourceError};

/// Supplies one card per call. Shuffling and shoe management belong to the
/// implementor; the engine only reads the rank of what it is handed.
pub trait CardSource {
    fn draw_next_card(&mut self) -> Result<Card, SourceError>;
}

impl<S: CardSource + ?Sized> CardSource for Box<S> {
    fn draw_next_card(&mut self) -> Result<Card, SourceError> {
        (**self).draw_next_card()
    }
}

/// Deals a fixed sequence of cards in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    cards: VecDeque<Card>,
}

impl ScriptedSource {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    pub fn extend(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl CardSource for ScriptedSource {
    fn draw_next_card(&mut self) -> Result<Card, SourceError> {
        self.cards.pop_front().ok_or(SourceError::Exhausted)
    }
}
