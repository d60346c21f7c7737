use crate::domain::card::{CardStatus, MembershipCard, Tier};
use crate::domain::value_objects::{CardId, CustomerId};
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ページング指定
///
/// pageは1始まり。値の検証（page ≥ 1、limitの上限）はAPI層で行う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// SQLのOFFSET値
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

/// カード検索フィルタ
///
/// すべてANDで結合される。searchはカードID文字列の部分一致。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFilter {
    pub search: Option<String>,
    pub tier: Option<Tier>,
    pub status: Option<CardStatus>,
    pub customer_id: Option<CustomerId>,
}

/// カード一覧の1ページ（フィルタ適用後の総件数つき）
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct CardPage {
    pub cards: Vec<MembershipCard>,
    pub total: i64,
}

/// ランク別件数
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierBreakdown {
    pub silver: i64,
    pub gold: i64,
    pub platinum: i64,
}

/// ステータス別件数
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusBreakdown {
    pub active: i64,
    pub expired: i64,
    pub blocked: i64,
}

/// ダッシュボード統計
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct CardStats {
    pub total_cards: i64,
    pub by_tier: TierBreakdown,
    pub by_status: StatusBreakdown,
    pub total_points: i64,
    pub total_spent: i64,
    pub average_points: f64,
}

/// カードリポジトリポート
#[allow(dead_code)]
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// 新しいカードを保存する
    ///
    /// 1顧客1枚の重複チェックはアプリケーション層が行い、
    /// ストレージのUNIQUE制約が最後の砦になる。
    async fn insert(&self, card: &MembershipCard) -> Result<()>;

    /// カードの現在状態を保存する（全項目のUPDATE）
    async fn update(&self, card: &MembershipCard) -> Result<()>;

    /// IDでカードを取得する
    async fn get_by_id(&self, card_id: CardId) -> Result<Option<MembershipCard>>;

    /// 顧客IDでカードを取得する
    ///
    /// 1顧客1枚の重複チェックに使用される。
    async fn get_by_customer_id(&self, customer_id: CustomerId)
    -> Result<Option<MembershipCard>>;

    /// フィルタ・ページング付きでカードを検索する
    ///
    /// 作成日時の新しい順に返す。
    async fn list(&self, filter: &CardFilter, page: PageRequest) -> Result<CardPage>;

    /// ダッシュボード統計を集計する
    async fn stats(&self) -> Result<CardStats>;

    /// カードを削除する
    ///
    /// カードの取引履歴も同時に削除される（カスケード）。
    /// 対象が存在した場合はtrueを返す。
    async fn delete(&self, card_id: CardId) -> Result<bool>;
}
