//! Pipeline chaining over pending carriers.

mod chain;

pub use chain::Chain;
