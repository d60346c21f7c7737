#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CardId, CustomerId, IssueCardError, StatusChangeError, UpdateCardError};

// ============================================================================
// 会員ランク
// ============================================================================

/// 会員ランク
///
/// 累計利用額による分類。順序は Silver < Gold < Platinum。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// シルバー（基準ランク）
    Silver,
    /// ゴールド
    Gold,
    /// プラチナ（最上位）
    Platinum,
}

impl Tier {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
        }
    }

    /// 次のランク（Platinumは最上位なのでNone）
    pub fn next(&self) -> Option<Tier> {
        match self {
            Tier::Silver => Some(Tier::Gold),
            Tier::Gold => Some(Tier::Platinum),
            Tier::Platinum => None,
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "silver" => Ok(Tier::Silver),
            "gold" => Ok(Tier::Gold),
            "platinum" => Ok(Tier::Platinum),
            _ => Err(format!("Unknown tier: {}", s)),
        }
    }
}

// ============================================================================
// カードステータス
// ============================================================================

/// カードステータス
///
/// active / expired / blocked は互いに排他。
/// 特典交換が許可されるのはactiveのみ（加算・調整は状態に依らない）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    /// 有効
    Active,
    /// 期限切れ
    Expired,
    /// 利用停止
    Blocked,
}

impl CardStatus {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Active => "active",
            CardStatus::Expired => "expired",
            CardStatus::Blocked => "blocked",
        }
    }

    /// 特典交換が許可される状態か
    pub fn is_active(&self) -> bool {
        matches!(self, CardStatus::Active)
    }
}

impl std::str::FromStr for CardStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "active" => Ok(CardStatus::Active),
            "expired" => Ok(CardStatus::Expired),
            "blocked" => Ok(CardStatus::Blocked),
            _ => Err(format!("Unknown card status: {}", s)),
        }
    }
}

// ============================================================================
// MembershipCard集約
// ============================================================================

/// MembershipCard集約 - 1顧客につき1枚の会員カード
///
/// ## 不変条件
/// - points ≥ 0（変動は台帳エントリ経由のみ）
/// - total_spent ≥ 0（最小通貨単位）
/// - expire_date > issue_date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipCard {
    // 識別子
    pub id: CardId,

    // 他の集約への参照（IDのみ）
    pub customer_id: CustomerId,

    // 分類と状態
    pub tier: Tier,
    pub status: CardStatus,

    // ポイント残高と累計利用額（最小通貨単位）
    pub points: i64,
    pub total_spent: i64,

    // 有効期間
    pub issue_date: DateTime<Utc>,
    pub expire_date: DateTime<Utc>,

    // 監査情報
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MembershipCard {
    /// 特典交換が許可されるか
    ///
    /// 加算・調整はバックオフィスのデータ修正を妨げないよう、
    /// ステータスに関わらず許可される。
    pub fn can_transact(&self) -> bool {
        self.status.is_active()
    }
}

/// カード更新の差分
///
/// pointsは含まない。残高の変動は台帳（PointTransaction）経由のみ。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPatch {
    pub tier: Option<Tier>,
    pub status: Option<CardStatus>,
    pub issue_date: Option<DateTime<Utc>>,
    pub expire_date: Option<DateTime<Utc>>,
    pub total_spent: Option<i64>,
}

// ============================================================================
// 純粋関数
// ============================================================================

/// 純粋関数：カードを発行する
///
/// ビジネスルール：
/// - ポイント残高は0、累計利用額は0から開始
/// - 状態はActive
/// - 有効期限は発行日より後
///
/// 副作用なし。新しいMembershipCardを返す。
pub fn issue_card(
    customer_id: CustomerId,
    tier: Tier,
    issue_date: DateTime<Utc>,
    expire_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<MembershipCard, IssueCardError> {
    // バリデーション：有効期限は発行日より後
    if expire_date <= issue_date {
        return Err(IssueCardError::ExpireBeforeIssue);
    }

    Ok(MembershipCard {
        id: CardId::new(),
        customer_id,
        tier,
        status: CardStatus::Active,
        points: 0,
        total_spent: 0,
        issue_date,
        expire_date,
        created_at: now,
        updated_at: now,
    })
}

/// 純粋関数：カードステータスを変更する
///
/// ビジネスルール：
/// - 任意の状態から異なる任意の状態へ遷移できる
/// - 同一ステータスへの変更は拒否（呼び出し側の誤りを早期に検出する）
/// - 時刻起点の自動遷移は行わない（管理者操作のみ）
///
/// 副作用なし。新しいMembershipCardを返す。
pub fn change_status(
    card: &MembershipCard,
    new_status: CardStatus,
    now: DateTime<Utc>,
) -> Result<MembershipCard, StatusChangeError> {
    // バリデーション：同一ステータスは拒否
    if card.status == new_status {
        return Err(StatusChangeError::AlreadyInStatus(card.status));
    }

    Ok(MembershipCard {
        status: new_status,
        updated_at: now,
        ..card.clone()
    })
}

/// 純粋関数：カードの属性を更新する
///
/// ビジネスルール：
/// - 編集できるのはtier / status / 有効期間 / total_spentのみ
/// - pointsはここでは変更できない（台帳経由のみ）
/// - total_spentは0以上
/// - 有効期限は発行日より後
///
/// 副作用なし。新しいMembershipCardを返す。
pub fn apply_update(
    card: &MembershipCard,
    patch: CardPatch,
    now: DateTime<Utc>,
) -> Result<MembershipCard, UpdateCardError> {
    let total_spent = patch.total_spent.unwrap_or(card.total_spent);
    // バリデーション：累計利用額は負にできない
    if total_spent < 0 {
        return Err(UpdateCardError::NegativeTotalSpent { value: total_spent });
    }

    let issue_date = patch.issue_date.unwrap_or(card.issue_date);
    let expire_date = patch.expire_date.unwrap_or(card.expire_date);
    // バリデーション：有効期限は発行日より後
    if expire_date <= issue_date {
        return Err(UpdateCardError::ExpireBeforeIssue);
    }

    Ok(MembershipCard {
        tier: patch.tier.unwrap_or(card.tier),
        status: patch.status.unwrap_or(card.status),
        total_spent,
        issue_date,
        expire_date,
        updated_at: now,
        ..card.clone()
    })
}
