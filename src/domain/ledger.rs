#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CardId, LedgerEntryError, TransactionId};

// ============================================================================
// 取引種別
// ============================================================================

/// 取引種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// 利用額に応じたポイント付与
    Earn,
    /// 特典交換による引き落とし
    Redeem,
    /// 管理者による残高調整（正負どちらも）
    Adjust,
}

impl TransactionKind {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Earn => "earn",
            TransactionKind::Redeem => "redeem",
            TransactionKind::Adjust => "adjust",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "earn" => Ok(TransactionKind::Earn),
            "redeem" => Ok(TransactionKind::Redeem),
            "adjust" => Ok(TransactionKind::Adjust),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

// ============================================================================
// PointTransaction
// ============================================================================

/// PointTransaction - 追記専用台帳の1エントリ
///
/// ## 不変条件
/// - 書き込み後は不変（更新・削除されない）
/// - カードごとのdeltaの総和 == カードのpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTransaction {
    pub id: TransactionId,
    pub card_id: CardId,
    pub kind: TransactionKind,

    /// 符号付きポイント変動（earnは正、redeemは負、adjustは任意）
    pub delta: i64,

    /// earnに紐づく利用金額（最小通貨単位）
    pub amount: Option<i64>,

    pub description: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// 純粋関数
// ============================================================================

/// 純粋関数：台帳エントリを検証し、適用後の残高を返す
///
/// ビジネスルール：
/// - earn: deltaは正
/// - redeem: deltaは負、かつ |delta| ≤ 残高
/// - adjust: 符号は任意、ただし適用後の残高は0以上
///
/// すべての残高変動はこの関数を通る。副作用なし。
pub fn post_entry(
    balance: i64,
    kind: TransactionKind,
    delta: i64,
) -> Result<i64, LedgerEntryError> {
    match kind {
        TransactionKind::Earn => {
            // バリデーション：earnのdeltaは正
            if delta <= 0 {
                return Err(LedgerEntryError::NonPositiveEarn { delta });
            }
        }
        TransactionKind::Redeem => {
            // バリデーション：redeemのdeltaは負
            if delta >= 0 {
                return Err(LedgerEntryError::NonNegativeRedeem { delta });
            }
            // バリデーション：残高を超える引き落としは不可
            if -delta > balance {
                return Err(LedgerEntryError::InsufficientPoints {
                    requested: -delta,
                    available: balance,
                });
            }
        }
        TransactionKind::Adjust => {
            // バリデーション：適用後の残高は0以上
            if balance + delta < 0 {
                return Err(LedgerEntryError::InvalidAdjustment { delta, balance });
            }
        }
    }

    Ok(balance + delta)
}

/// 純粋関数：台帳エントリを生成する
///
/// created_atは呼び出し側（アプリケーション層）がサーバー時刻を渡す。
/// クライアント指定の時刻は受け付けない。
pub fn new_transaction(
    card_id: CardId,
    kind: TransactionKind,
    delta: i64,
    amount: Option<i64>,
    description: String,
    created_at: DateTime<Utc>,
) -> PointTransaction {
    PointTransaction {
        id: TransactionId::new(),
        card_id,
        kind,
        delta,
        amount,
        description,
        created_at,
    }
}
