#![allow(dead_code)]

//! APIリクエスト / レスポンスの型定義
//!
//! 外部に公開するJSON表現をここに集約する。
//! ドメイン型との変換は `From` 実装と `to_command` 系メソッドで行い、
//! ハンドラー本体には変換ロジックを持ち込まない。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::cards::CardDetail;
use crate::domain::CustomerId;
use crate::domain::card::{CardPatch, CardStatus, MembershipCard, Tier};
use crate::domain::commands::CreateCard;
use crate::domain::ledger::PointTransaction;
use crate::ports::card_repository::{CardStats, PageRequest, StatusBreakdown, TierBreakdown};
use crate::ports::reward_catalog::Reward;

// ============================================================
// リクエスト型
// ============================================================

/// カード発行リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub customer_id: Uuid,
    pub tier: String,
    pub issue_date: DateTime<Utc>,
    pub expire_date: DateTime<Utc>,
}

impl CreateCardRequest {
    /// ドメインのコマンドへ変換する（ティア文字列の検証込み）
    pub fn to_command(&self) -> Result<CreateCard, String> {
        let tier = self.tier.parse::<Tier>()?;
        Ok(CreateCard {
            customer_id: CustomerId::from_uuid(self.customer_id),
            tier,
            issue_date: self.issue_date,
            expire_date: self.expire_date,
        })
    }
}

/// カード属性更新リクエスト
///
/// 省略されたフィールドは変更しない。ポイント残高は台帳経由でのみ
/// 変化するため、ここには含めない。
#[derive(Debug, Deserialize)]
pub struct UpdateCardRequest {
    pub tier: Option<String>,
    pub status: Option<String>,
    pub issue_date: Option<DateTime<Utc>>,
    pub expire_date: Option<DateTime<Utc>>,
    pub total_spent: Option<i64>,
}

impl UpdateCardRequest {
    pub fn to_patch(&self) -> Result<CardPatch, String> {
        let tier = match &self.tier {
            Some(raw) => Some(raw.parse::<Tier>()?),
            None => None,
        };
        let status = match &self.status {
            Some(raw) => Some(raw.parse::<CardStatus>()?),
            None => None,
        };
        Ok(CardPatch {
            tier,
            status,
            issue_date: self.issue_date,
            expire_date: self.expire_date,
            total_spent: self.total_spent,
        })
    }
}

/// ステータス変更リクエスト
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
}

/// ポイント加算リクエスト
#[derive(Debug, Deserialize)]
pub struct AddPointsRequest {
    pub points: i64,
    /// 同時に記録する利用金額（最小通貨単位）。省略可。
    pub amount: Option<i64>,
    pub description: Option<String>,
}

/// ポイント調整リクエスト
#[derive(Debug, Deserialize)]
pub struct AdjustPointsRequest {
    pub delta: i64,
    pub description: Option<String>,
}

/// 特典交換リクエスト
#[derive(Debug, Deserialize)]
pub struct RedeemPointsRequest {
    pub reward_id: Uuid,
    pub points: i64,
    pub description: Option<String>,
}

// ============================================================
// クエリパラメータ
// ============================================================

/// カード一覧のフィルタ / ページング
#[derive(Debug, Deserialize)]
pub struct ListCardsQuery {
    pub search: Option<String>,
    pub tier: Option<String>,
    pub status: Option<String>,
    pub customer_id: Option<Uuid>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// 取引履歴のページング
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// page / limit を安全な範囲に正規化する
///
/// page は 1 始まり、limit は 1〜100 に丸める。
pub fn page_request(page: Option<u32>, limit: Option<u32>) -> PageRequest {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(20).clamp(1, 100);
    PageRequest::new(page, limit)
}

// ============================================================
// レスポンス型
// ============================================================

/// カードのJSON表現
#[derive(Debug, Serialize, Deserialize)]
pub struct CardResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub tier: String,
    pub status: String,
    pub points: i64,
    pub total_spent: i64,
    pub issue_date: DateTime<Utc>,
    pub expire_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MembershipCard> for CardResponse {
    fn from(card: MembershipCard) -> Self {
        Self {
            id: card.id.value(),
            customer_id: card.customer_id.value(),
            tier: card.tier.as_str().to_string(),
            status: card.status.as_str().to_string(),
            points: card.points,
            total_spent: card.total_spent,
            issue_date: card.issue_date,
            expire_date: card.expire_date,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

/// 顧客情報・ティア進捗込みのカード詳細
#[derive(Debug, Serialize, Deserialize)]
pub struct CardDetailResponse {
    #[serde(flatten)]
    pub card: CardResponse,
    pub customer_name: Option<String>,
    pub customer_code: Option<String>,
    pub suggested_tier: String,
    /// 次のティアまでの進捗率（0〜100）。最上位ティアは常に100。
    pub tier_progress: u8,
}

impl From<CardDetail> for CardDetailResponse {
    fn from(detail: CardDetail) -> Self {
        Self {
            card: CardResponse::from(detail.card),
            customer_name: detail.customer_name,
            customer_code: detail.customer_code,
            suggested_tier: detail.suggested_tier.as_str().to_string(),
            tier_progress: detail.tier_progress.unwrap_or(100),
        }
    }
}

/// ポイント取引のJSON表現
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub card_id: Uuid,
    pub kind: String,
    pub delta: i64,
    pub amount: Option<i64>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<PointTransaction> for TransactionResponse {
    fn from(transaction: PointTransaction) -> Self {
        Self {
            id: transaction.id.value(),
            card_id: transaction.card_id.value(),
            kind: transaction.kind.as_str().to_string(),
            delta: transaction.delta,
            amount: transaction.amount,
            description: transaction.description,
            created_at: transaction.created_at,
        }
    }
}

/// カード一覧レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct CardListResponse {
    pub cards: Vec<CardResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

/// 取引履歴レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

/// 残高を変更する操作の共通レスポンス
///
/// 更新後のカードと追記された取引を併せて返す。
#[derive(Debug, Serialize, Deserialize)]
pub struct PointsChangedResponse {
    pub card: CardResponse,
    pub transaction: TransactionResponse,
}

impl PointsChangedResponse {
    pub fn new(card: MembershipCard, transaction: PointTransaction) -> Self {
        Self {
            card: CardResponse::from(card),
            transaction: TransactionResponse::from(transaction),
        }
    }
}

/// カード削除レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct CardDeletedResponse {
    pub id: Uuid,
    pub deleted: bool,
}

/// ティア別集計
#[derive(Debug, Serialize, Deserialize)]
pub struct TierBreakdownResponse {
    pub silver: i64,
    pub gold: i64,
    pub platinum: i64,
}

impl From<TierBreakdown> for TierBreakdownResponse {
    fn from(breakdown: TierBreakdown) -> Self {
        Self {
            silver: breakdown.silver,
            gold: breakdown.gold,
            platinum: breakdown.platinum,
        }
    }
}

/// ステータス別集計
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusBreakdownResponse {
    pub active: i64,
    pub expired: i64,
    pub blocked: i64,
}

impl From<StatusBreakdown> for StatusBreakdownResponse {
    fn from(breakdown: StatusBreakdown) -> Self {
        Self {
            active: breakdown.active,
            expired: breakdown.expired,
            blocked: breakdown.blocked,
        }
    }
}

/// カード全体の統計レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct CardStatsResponse {
    pub total_cards: i64,
    pub by_tier: TierBreakdownResponse,
    pub by_status: StatusBreakdownResponse,
    pub total_points: i64,
    pub total_spent: i64,
    pub average_points: f64,
}

impl From<CardStats> for CardStatsResponse {
    fn from(stats: CardStats) -> Self {
        Self {
            total_cards: stats.total_cards,
            by_tier: TierBreakdownResponse::from(stats.by_tier),
            by_status: StatusBreakdownResponse::from(stats.by_status),
            total_points: stats.total_points,
            total_spent: stats.total_spent,
            average_points: stats.average_points,
        }
    }
}

/// 特典のJSON表現
#[derive(Debug, Serialize, Deserialize)]
pub struct RewardResponse {
    pub id: Uuid,
    pub name: String,
    pub points_cost: i64,
    pub description: String,
}

impl From<Reward> for RewardResponse {
    fn from(reward: Reward) -> Self {
        Self {
            id: reward.id.value(),
            name: reward.name,
            points_cost: reward.points_cost,
            description: reward.description,
        }
    }
}

/// エラーレスポンスの共通形
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}
