//! `tandem-comms` — the asynchronous message substrate.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`message`]  | `Message` tagged union, `CallId` conversation identity  |
//! | [`envelope`] | `Envelope`, `Address` (unicast / team broadcast)        |
//! | [`bus`]      | `MessageBus` — randomized per-message delivery delay    |
//!
//! # Design notes
//!
//! The bus is the only construct modeling asynchrony: robots never share
//! memory, they exchange envelopes that arrive a random number of ticks
//! later.  Delivery is at-most-once with **no ordering guarantee** between
//! independently delayed messages — the rendezvous protocol must treat
//! everything it receives as possibly stale, which is why every protocol
//! message carries a [`CallId`].

pub mod bus;
pub mod envelope;
pub mod message;


pub use bus::{DelayRange, MessageBus};
pub use envelope::{Address, Envelope};
pub use message::{CallId, Message};
