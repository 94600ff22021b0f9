use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::events::{EventBus, RoundEvent, RoundObserver, SubscriptionId};
use crate::{Card, CardSource, EngineError, Hand, Seat, TableRules};


/// Where the current round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Dealing,
    PlayerTurn,
    DealerTurn,
    Judged,
}

/// Driver inputs, used to report protocol violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    StartRound,
    PlayerDraw,
    PlayerEndTurn,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::StartRound => "start round",
            Action::PlayerDraw => "player draw",
            Action::PlayerEndTurn => "player end turn",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    PlayerBlackjack,
    DealerBlackjack,
    Push,
    PlayerWin,
    DealerWin,
    /// Both hands at or over the bust threshold. The player's bust came first.
    DealerBustPlayerAlreadyBust,
}

impl RoundOutcome {
    pub fn winner(&self) -> Option<Seat> {
        match self {
            RoundOutcome::PlayerBlackjack | RoundOutcome::PlayerWin => Some(Seat::Player),
            RoundOutcome::DealerBlackjack
            | RoundOutcome::DealerWin
            | RoundOutcome::DealerBustPlayerAlreadyBust => Some(Seat::Dealer),
            RoundOutcome::Push => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    pub outcome: RoundOutcome,
    pub player_total: u8,
    /// Dealer total as shown at judgment. Excludes the hole card when the
    /// round ended on a player bust.
    pub dealer_total: u8,
}

/// What the driver gets back after each input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    PlayerTurn { player_total: u8, dealer_total: u8 },
    Finished(Judgment),
}

impl Step {
    pub fn judgment(&self) -> Option<Judgment> {
        match self {
            Step::Finished(judgment) => Some(*judgment),
            Step::PlayerTurn { .. } => None,
        }
    }
}

/// Adjudicates two final totals.
pub fn judge(player_total: u8, dealer_total: u8, rules: &TableRules) -> RoundOutcome {
    let player_bust = rules.is_bust(player_total);
    let dealer_bust = rules.is_bust(dealer_total);
    match (player_bust, dealer_bust) {
        (true, true) => RoundOutcome::DealerBustPlayerAlreadyBust,
        (true, false) => RoundOutcome::DealerWin,
        (false, true) => RoundOutcome::PlayerWin,
        (false, false) => match player_total.cmp(&dealer_total) {
            Ordering::Greater => RoundOutcome::PlayerWin,
            Ordering::Less => RoundOutcome::DealerWin,
            Ordering::Equal => RoundOutcome::Push,
        },
    }
}

/// Player-vs-dealer round state machine.
///
/// Owns both hands and the card source. Every input either advances the
/// round synchronously or is rejected without touching state. A round that
/// reaches judgment is reset before the call returns, so the engine is
/// always `Idle` between rounds.
pub struct HandEngine<S: CardSource> {
    source: S,
    rules: TableRules,
    player: Hand,
    dealer: Hand,
    phase: Phase,
    bus: EventBus,
    rounds_played: u64,
}

impl<S: CardSource> HandEngine<S> {
    pub fn new(source: S, rules: TableRules) -> Result<Self, EngineError> {
        rules.validate()?;
        Ok(Self {
            source,
            rules,
            player: Hand::new(Seat::Player),
            dealer: Hand::new(Seat::Dealer),
            phase: Phase::Idle,
            bus: EventBus::new(),
            rounds_played: 0,
        })
    }

    pub fn subscribe(&mut self, observer: Box<dyn RoundObserver>) -> SubscriptionId {
        self.bus.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer
    }

    /// Rounds that reached judgment. Abandoned rounds are not counted.
    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Only safe to use between rounds, e.g. to reshuffle a shoe.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Deals player, dealer up, player, dealer hole, then checks both
    /// sides for an immediate blackjack.
    pub fn start_round(&mut self) -> Result<Step, EngineError> {
        if self.phase != Phase::Idle {
            return Err(EngineError::OutOfTurn {
                action: Action::StartRound,
                phase: self.phase,
            });
        }
        debug_assert!(self.player.is_empty() && self.dealer.is_empty());

        self.enter(Phase::Dealing);
        self.publish(RoundEvent::RoundStarted);

        self.draw_player()?;
        self.draw_dealer_up()?;
        self.publish(RoundEvent::UpCardRevealed);
        self.draw_player()?;
        self.draw_dealer_hole()?;
        debug_assert_eq!(self.player.len() + self.dealer.len(), 4);

        if let Some(outcome) = self.initial_outcome() {
            self.reveal_hole();
            return Ok(Step::Finished(self.finish(outcome)));
        }

        self.enter(Phase::PlayerTurn);
        Ok(self.player_turn_step())
    }

    pub fn player_draw(&mut self) -> Result<Step, EngineError> {
        self.expect_player_turn(Action::PlayerDraw)?;

        let total = self.draw_player()?;
        if self.rules.is_bust(total) {
            log::debug!("player busts with {total}");
            return Ok(Step::Finished(self.finish(RoundOutcome::DealerWin)));
        }
        Ok(self.player_turn_step())
    }

    /// Reveals the hole card, runs the dealer's forced draws and judges.
    pub fn player_end_turn(&mut self) -> Result<Judgment, EngineError> {
        self.expect_player_turn(Action::PlayerEndTurn)?;

        self.enter(Phase::DealerTurn);
        self.reveal_hole();
        while self.rules.dealer_must_draw(self.dealer.total()) {
            self.draw_dealer_up()?;
        }

        let outcome = judge(self.player.total(), self.dealer.total(), &self.rules);
        Ok(self.finish(outcome))
    }

    /// Drops the round in flight without judging it.
    /// Returns false if there was nothing to abandon.
    pub fn abandon_round(&mut self) -> bool {
        if self.phase == Phase::Idle {
            return false;
        }
        log::warn!("abandoning round in phase {:?}", self.phase);
        self.reset();
        true
    }

    fn initial_outcome(&self) -> Option<RoundOutcome> {
        let blackjack = self.rules.blackjack_value;
        let player = self.player.total() == blackjack;
        let dealer = self.dealer.combined_total() == blackjack;
        match (player, dealer) {
            (true, true) => Some(RoundOutcome::Push),
            (false, true) => Some(RoundOutcome::DealerBlackjack),
            (true, false) => Some(RoundOutcome::PlayerBlackjack),
            // only reachable with a bust threshold low enough to bust on two cards
            (false, false) if self.player.is_busted(&self.rules) => Some(RoundOutcome::DealerWin),
            (false, false) => None,
        }
    }

    fn expect_player_turn(&self, action: Action) -> Result<(), EngineError> {
        if self.phase != Phase::PlayerTurn {
            return Err(EngineError::OutOfTurn {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn player_turn_step(&self) -> Step {
        Step::PlayerTurn {
            player_total: self.player.total(),
            dealer_total: self.dealer.total(),
        }
    }

    fn draw(&mut self) -> Result<Card, EngineError> {
        match self.source.draw_next_card() {
            Ok(card) => Ok(card),
            Err(err) => {
                log::warn!("card source failed: {err}");
                self.abandon_round();
                Err(err.into())
            }
        }
    }

    /// Draws for the player, applying the Ace correction when the raw
    /// total reaches the bust threshold. Returns the settled total.
    fn draw_player(&mut self) -> Result<u8, EngineError> {
        let card = self.draw()?;
        let raw = self.player.add_up_card(card);
        self.publish(RoundEvent::CardDrawn {
            seat: Seat::Player,
            card,
            face_up: true,
        });
        if self.rules.is_bust(raw) {
            self.correct_aces(Seat::Player);
        }
        let total = self.player.total();
        self.publish(RoundEvent::PlayerTotalChanged(total));
        Ok(total)
    }

    fn draw_dealer_up(&mut self) -> Result<u8, EngineError> {
        let card = self.draw()?;
        let raw = self.dealer.add_up_card(card);
        self.publish(RoundEvent::CardDrawn {
            seat: Seat::Dealer,
            card,
            face_up: true,
        });
        if self.rules.dealer_ace_correction && self.rules.is_bust(raw) {
            self.correct_aces(Seat::Dealer);
        }
        let total = self.dealer.total();
        self.publish(RoundEvent::DealerTotalChanged(total));
        Ok(total)
    }

    fn draw_dealer_hole(&mut self) -> Result<(), EngineError> {
        let card = self.draw()?;
        self.dealer.add_hole_card(card);
        self.publish(RoundEvent::CardDrawn {
            seat: Seat::Dealer,
            card,
            face_up: false,
        });
        Ok(())
    }

    fn correct_aces(&mut self, seat: Seat) {
        let hand = match seat {
            Seat::Player => &mut self.player,
            Seat::Dealer => &mut self.dealer,
        };
        let aces = hand.correct_aces();
        if aces > 0 {
            let total = hand.total();
            log::debug!("{seat:?} aces corrected: {aces}, total now {total}");
            self.publish(RoundEvent::AceCorrected { seat, aces, total });
        }
    }

    fn reveal_hole(&mut self) {
        if let Some(total) = self.dealer.reveal_hole() {
            self.publish(RoundEvent::HoleCardRevealed);
            if self.rules.dealer_ace_correction && self.rules.is_bust(total) {
                self.correct_aces(Seat::Dealer);
            }
            self.publish(RoundEvent::DealerTotalChanged(self.dealer.total()));
        }
    }

    fn finish(&mut self, outcome: RoundOutcome) -> Judgment {
        self.enter(Phase::Judged);
        let judgment = Judgment {
            outcome,
            player_total: self.player.total(),
            dealer_total: self.dealer.total(),
        };
        log::info!(
            "round judged: {:?} (player {}, dealer {})",
            judgment.outcome,
            judgment.player_total,
            judgment.dealer_total
        );
        self.publish(RoundEvent::RoundJudged(judgment));
        self.rounds_played += 1;
        self.reset();
        judgment
    }

    fn reset(&mut self) {
        self.player.clear();
        self.dealer.clear();
        self.enter(Phase::Idle);
        self.publish(RoundEvent::RoundReset);
    }

    fn enter(&mut self, phase: Phase) {
        log::debug!("phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn publish(&mut self, event: RoundEvent) {
        self.bus.publish(&event);
    }
}

impl<S: CardSource + fmt::Debug> fmt::Debug for HandEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandEngine")
            .field("source", &self.source)
            .field("rules", &self.rules)
            .field("player", &self.player)
            .field("dealer", &self.dealer)
            .field("phase", &self.phase)
            .field("bus", &self.bus)
            .field("rounds_played", &self.rounds_played)
            .finish()
    }
}
