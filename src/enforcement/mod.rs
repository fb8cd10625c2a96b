// src/enforcement/mod.rs
// Request-time enforcement of the block list

pub mod block_page;
mod gate;


pub use block_page::BLOCKED_MESSAGE;
pub use gate::{store_unavailable_decision, GateDecision, RequestGate};
