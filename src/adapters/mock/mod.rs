pub mod customer_directory;
pub mod reward_catalog;

#[allow(unused_imports)]
pub use customer_directory::CustomerDirectory;
#[allow(unused_imports)]
pub use reward_catalog::RewardCatalog;
