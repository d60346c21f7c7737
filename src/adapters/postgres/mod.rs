pub mod card_repository;
pub mod ledger_store;

// パブリックに型を再エクスポート
pub use card_repository::CardRepository as PostgresCardRepository;
pub use ledger_store::LedgerStore as PostgresLedgerStore;
