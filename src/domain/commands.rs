use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::card::{CardPatch, CardStatus, Tier};
use super::{CardId, CustomerId, RewardId};

/// コマンド：カードを発行する
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCard {
    pub customer_id: CustomerId,
    pub tier: Tier,
    pub issue_date: DateTime<Utc>,
    pub expire_date: DateTime<Utc>,
}

/// コマンド：カードの属性を更新する
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCard {
    pub card_id: CardId,
    pub patch: CardPatch,
}

/// コマンド：カードステータスを変更する
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCardStatus {
    pub card_id: CardId,
    pub new_status: CardStatus,
}

/// コマンド：ポイントを加算する
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPoints {
    pub card_id: CardId,
    /// 加算ポイント（正）
    pub points: i64,
    /// 付与の根拠となった利用金額（最小通貨単位）
    pub amount: Option<i64>,
    pub description: Option<String>,
}

/// コマンド：残高を調整する
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustPoints {
    pub card_id: CardId,
    /// 符号付き調整量
    pub delta: i64,
    pub description: Option<String>,
}

/// コマンド：特典と交換する
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemPoints {
    pub card_id: CardId,
    pub reward_id: RewardId,
    /// 引き落とすポイント（正で指定）
    pub points: i64,
    pub description: Option<String>,
}
