pub mod first_follow;
pub mod grammar;
pub mod ll1_table;
pub mod parse;
pub mod predictive;
pub mod pretty_print;

pub use grammar::{Grammar, GrammarError};
pub use ll1_table::{Conflict, LL1Table, ProductionRef};
pub use predictive::{ParseError, ParseTree, PredictiveParser};

pub const EPSILON: &str = "ε";
pub const END_MARK: &str = "$";

/// Reserved arena slots, fixed by `Grammar::new`.
pub const EPSILON_IDX: usize = 0;
pub const END_MARK_IDX: usize = 1;
