#[allow(unused_imports)]
pub mod card_repository;
#[allow(unused_imports)]
pub mod customer_directory;
#[allow(unused_imports)]
pub mod ledger_store;
#[allow(unused_imports)]
pub mod reward_catalog;

#[allow(unused_imports)]
pub use card_repository::*;
#[allow(unused_imports)]
pub use customer_directory::*;
#[allow(unused_imports)]
pub use ledger_store::*;
#[allow(unused_imports)]
pub use reward_catalog::*;
