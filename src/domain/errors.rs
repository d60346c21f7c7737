#![allow(dead_code)]

use super::card::CardStatus;

/// カード発行のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueCardError {
    /// 有効期限が発行日以前
    ExpireBeforeIssue,
}

/// 台帳エントリのエラー
///
/// ポイント残高の不変条件（残高 ≥ 0）を守るためのバリデーション。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEntryError {
    /// earnのdeltaは正でなければならない
    NonPositiveEarn { delta: i64 },
    /// redeemのdeltaは負でなければならない
    NonNegativeRedeem { delta: i64 },
    /// 残高を超える引き落とし
    InsufficientPoints { requested: i64, available: i64 },
    /// 調整後の残高が負になる
    InvalidAdjustment { delta: i64, balance: i64 },
}

/// ステータス変更のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChangeError {
    /// 既に同じステータス（no-opは呼び出し側の誤りとして拒否する）
    AlreadyInStatus(CardStatus),
}

/// カード更新のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCardError {
    /// 累計利用額は負にできない
    NegativeTotalSpent { value: i64 },
    /// 有効期限が発行日以前
    ExpireBeforeIssue,
}
