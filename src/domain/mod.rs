pub mod card;
pub mod commands;
pub mod errors;
pub mod ledger;
pub mod tier;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
