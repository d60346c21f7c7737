use crate::domain::ledger::PointTransaction;
use crate::domain::value_objects::CardId;
use async_trait::async_trait;

use super::card_repository::PageRequest;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 取引履歴の1ページ（総件数つき）
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct TransactionPage {
    pub transactions: Vec<PointTransaction>,
    pub total: i64,
}

/// ポイント台帳ポート
///
/// 取引は追記専用ログに保存される不変の事実。
/// 残高はカード側に保持されるが、変動は必ずappend経由で行われる。
#[allow(dead_code)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// 取引を追記し、同じ原子的単位でカードの残高を更新する
    ///
    /// new_total_spentがSomeの場合は累計利用額も同時に更新する。
    /// 取引が書かれたのに残高が古いまま、という乖離を残してはならない。
    async fn append(
        &self,
        transaction: &PointTransaction,
        new_balance: i64,
        new_total_spent: Option<i64>,
    ) -> Result<()>;

    /// カードの取引履歴を新しい順に取得する
    ///
    /// 書き込みがなければ何度呼んでも同じ結果を返す。
    async fn history(&self, card_id: CardId, page: PageRequest) -> Result<TransactionPage>;
}
