mod card;
mod error;
pub mod events;
mod hand;
mod round;
mod rules;
mod source;

pub use card::{Card, Rank, Suit};
pub use error::{EngineError, SourceError};
pub use events::{EventBus, EventLog, RoundEvent, RoundObserver, SubscriptionId};
pub use hand::{Hand, Seat};
pub use round::{judge, Action, HandEngine, Judgment, Phase, RoundOutcome, Step};
pub use rules::{TableRules, MAX_BUST_THRESHOLD};
pub use source::{CardSource, ScriptedSource};
