mod card_store;
mod errors;
mod lifecycle;
mod locks;
mod point_ledger;
mod redemption;

#[allow(unused_imports)]
pub use card_store::{
    CardDetail, ServiceDependencies, card_stats, create_card, delete_card, get_card,
    get_card_by_customer, list_cards, update_card,
};
#[allow(unused_imports)]
pub use errors::{CardApplicationError, Result};
#[allow(unused_imports)]
pub use lifecycle::change_card_status;
#[allow(unused_imports)]
pub use locks::CardLockRegistry;
#[allow(unused_imports)]
pub use point_ledger::{add_points, adjust_points, point_history};
#[allow(unused_imports)]
pub use redemption::redeem_points;
