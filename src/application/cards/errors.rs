use thiserror::Error;

use crate::domain::card::CardStatus;

/// 会員カードアプリケーション層のエラー
#[derive(Debug, Error)]
pub enum CardApplicationError {
    /// 入力が不正
    #[error("Validation error: {0}")]
    Validation(String),

    /// カードが見つからない
    #[error("Card not found")]
    CardNotFound,

    /// 顧客が既にカードを保有している（1顧客1枚）
    #[error("Customer already has a card")]
    DuplicateCard,

    /// カードがactiveではない（特典交換不可）
    #[error("Card is not active (status: {})", .0.as_str())]
    CardNotActive(CardStatus),

    /// ポイント残高不足
    #[error("Insufficient points: requested {requested}, available {available}")]
    InsufficientPoints { requested: i64, available: i64 },

    /// 調整後の残高が負になる
    #[error("Invalid adjustment: delta {delta} would take balance {balance} below zero")]
    InvalidAdjustment { delta: i64, balance: i64 },

    /// 特典が見つからない
    #[error("Reward not found")]
    RewardNotFound,

    /// 無効なステータス遷移（同一ステータスへの変更）
    #[error("Invalid status transition: card is already {}", .0.as_str())]
    InvalidTransition(CardStatus),

    /// カードリポジトリのエラー
    #[error("Card repository error")]
    CardRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 台帳ストアのエラー
    #[error("Ledger store error")]
    LedgerStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 顧客ディレクトリのエラー
    #[error("Customer directory error")]
    CustomerDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 特典カタログのエラー
    #[error("Reward catalog error")]
    RewardCatalogError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, CardApplicationError>;
