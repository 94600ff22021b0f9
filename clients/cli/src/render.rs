//! Console observers: one prints the table as it changes, the other tallies
//! judged rounds for the simulator.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use twentyone::{Card, Judgment, RoundEvent, RoundObserver, RoundOutcome, Seat, TableRules};

#[derive(Default)]
pub struct ConsoleTable {
    hole_card: Option<Card>,
}

impl ConsoleTable {
    fn outcome_text(judgment: &Judgment) -> String {
        let Judgment {
            outcome,
            player_total,
            dealer_total,
        } = judgment;
        match outcome {
            RoundOutcome::PlayerBlackjack => "Blackjack! You win.".to_string(),
            RoundOutcome::DealerBlackjack => "Dealer has blackjack. You lose.".to_string(),
            RoundOutcome::Push => format!("Push at {player_total}."),
            RoundOutcome::PlayerWin => format!("You win, {player_total} against {dealer_total}."),
            RoundOutcome::DealerWin => {
                format!("Dealer wins, {dealer_total} against your {player_total}.")
            }
            RoundOutcome::DealerBustPlayerAlreadyBust => {
                "Dealer busts, but you busted first. You lose.".to_string()
            }
        }
    }
}

impl RoundObserver for ConsoleTable {
    fn on_event(&mut self, event: &RoundEvent) {
        match event {
            RoundEvent::RoundStarted => println!("--- new round ---"),
            RoundEvent::CardDrawn {
                seat: Seat::Player,
                card,
                ..
            } => println!("You draw {card}"),
            RoundEvent::CardDrawn {
                seat: Seat::Dealer,
                card,
                face_up: true,
            } => println!("Dealer draws {card}"),
            RoundEvent::CardDrawn {
                seat: Seat::Dealer,
                card,
                face_up: false,
            } => {
                self.hole_card = Some(*card);
                println!("Dealer draws a face-down card");
            }
            RoundEvent::PlayerTotalChanged(total) => println!("  your total: {total}"),
            RoundEvent::DealerTotalChanged(total) => println!("  dealer total: {total}"),
            RoundEvent::AceCorrected { seat, aces, total } => {
                let who = match seat {
                    Seat::Player => "Your",
                    Seat::Dealer => "Dealer's",
                };
                println!("  {who} {aces} ace(s) now count as 1 ({total})");
            }
            RoundEvent::HoleCardRevealed => {
                if let Some(card) = self.hole_card.take() {
                    println!("Dealer turns over {card}");
                }
            }
            RoundEvent::RoundJudged(judgment) => println!("{}", Self::outcome_text(judgment)),
            RoundEvent::RoundReset => self.hole_card = None,
            RoundEvent::UpCardRevealed => {}
        }
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct Tally {
    pub rounds: u32,
    pub player_blackjack: u32,
    pub dealer_blackjack: u32,
    pub player_win: u32,
    pub dealer_win: u32,
    pub push: u32,
    pub dealer_bust_player_already_bust: u32,
    pub player_busts: u32,
    pub dealer_busts: u32,
}

impl Tally {
    pub fn record(&mut self, judgment: &Judgment, rules: &TableRules) {
        self.rounds += 1;
        match judgment.outcome {
            RoundOutcome::PlayerBlackjack => self.player_blackjack += 1,
            RoundOutcome::DealerBlackjack => self.dealer_blackjack += 1,
            RoundOutcome::PlayerWin => self.player_win += 1,
            RoundOutcome::DealerWin => self.dealer_win += 1,
            RoundOutcome::Push => self.push += 1,
            RoundOutcome::DealerBustPlayerAlreadyBust => self.dealer_bust_player_already_bust += 1,
        }
        if rules.is_bust(judgment.player_total) {
            self.player_busts += 1;
        }
        if rules.is_bust(judgment.dealer_total) {
            self.dealer_busts += 1;
        }
    }
}

/// Records every `RoundJudged` into a shared `Tally`.
pub struct TallyObserver {
    rules: TableRules,
    tally: Arc<Mutex<Tally>>,
}

impl TallyObserver {
    pub fn new(rules: TableRules) -> (Self, Arc<Mutex<Tally>>) {
        let tally = Arc::new(Mutex::new(Tally::default()));
        (
            TallyObserver {
                rules,
                tally: tally.clone(),
            },
            tally,
        )
    }
}

impl RoundObserver for TallyObserver {
    fn on_event(&mut self, event: &RoundEvent) {
        if let RoundEvent::RoundJudged(judgment) = event {
            if let Ok(mut tally) = self.tally.lock() {
                tally.record(judgment, &self.rules);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn judgment(outcome: RoundOutcome, player_total: u8, dealer_total: u8) -> Judgment {
        Judgment {
            outcome,
            player_total,
            dealer_total,
        }
    }

    #[test]
    fn test_tally_observer_counts_judgments_only() {
        let (mut observer, tally) = TallyObserver::new(TableRules::default());
        observer.on_event(&RoundEvent::RoundStarted);
        observer.on_event(&RoundEvent::RoundJudged(judgment(
            RoundOutcome::DealerWin,
            24,
            10,
        )));
        observer.on_event(&RoundEvent::RoundJudged(judgment(
            RoundOutcome::PlayerWin,
            18,
            23,
        )));
        observer.on_event(&RoundEvent::RoundReset);

        let tally = tally.lock().unwrap();
        assert_eq!(tally.rounds, 2);
        assert_eq!(tally.dealer_win, 1);
        assert_eq!(tally.player_win, 1);
        assert_eq!(tally.player_busts, 1);
        assert_eq!(tally.dealer_busts, 1);
    }

    #[test]
    fn test_outcome_text() {
        let text = ConsoleTable::outcome_text(&judgment(RoundOutcome::PlayerWin, 19, 17));
        assert_eq!(text, "You win, 19 against 17.");
        let text = ConsoleTable::outcome_text(&judgment(RoundOutcome::Push, 20, 20));
        assert_eq!(text, "Push at 20.");
    }

    #[test]
    fn test_console_table_forgets_hole_card_on_reveal() {
        let mut table = ConsoleTable::default();
        let card = Card::from_index(6).unwrap();
        table.on_event(&RoundEvent::CardDrawn {
            seat: Seat::Dealer,
            card,
            face_up: false,
        });
        assert_eq!(table.hole_card, Some(card));
        table.on_event(&RoundEvent::HoleCardRevealed);
        assert_eq!(table.hole_card, None);
    }
}
