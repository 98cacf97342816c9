//! Search engine for Caro, the five-in-a-row board game.
//!
//! The host sends a board snapshot, the side to move and a time or depth
//! budget; the engine answers with one move. Everything runs synchronously
//! inside a single request (see [`protocol::handle_request`]), either called
//! directly or through the web worker in [`worker`].

pub mod engine;
pub mod logic;
pub mod protocol;
pub mod worker;
