use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::card::{CardStatus, MembershipCard, Tier};
use crate::domain::ledger::PointTransaction;
use crate::domain::value_objects::{CardId, CustomerId};
use crate::ports::card_repository::{
    CardFilter, CardPage, CardRepository, CardStats, PageRequest, StatusBreakdown, TierBreakdown,
};
use crate::ports::ledger_store::{LedgerStore, TransactionPage};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Default)]
struct MemoryState {
    cards: HashMap<CardId, MembershipCard>,
    /// 挿入順の追記専用ログ
    transactions: Vec<PointTransaction>,
}

/// CardRepositoryとLedgerStoreのインメモリ実装
///
/// データベースなしの起動とテストをサポートする。
/// カードと台帳を1つのMutexで保持するため、appendの残高更新と
/// 取引追記は単一のクリティカルセクションで行われる（原子的）。
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(card: &MembershipCard, filter: &CardFilter) -> bool {
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        if !card.id.value().to_string().contains(&needle) {
            return false;
        }
    }
    if let Some(tier) = filter.tier {
        if card.tier != tier {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if card.status != status {
            return false;
        }
    }
    if let Some(customer_id) = filter.customer_id {
        if card.customer_id != customer_id {
            return false;
        }
    }
    true
}

fn page_bounds(page: PageRequest, len: usize) -> (usize, usize) {
    let offset = page.offset().max(0) as usize;
    let start = offset.min(len);
    let end = (offset + page.limit as usize).min(len);
    (start, end)
}

#[async_trait]
impl CardRepository for MemoryStore {
    async fn insert(&self, card: &MembershipCard) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.cards.insert(card.id, card.clone());
        Ok(())
    }

    async fn update(&self, card: &MembershipCard) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.cards.insert(card.id, card.clone());
        Ok(())
    }

    async fn get_by_id(&self, card_id: CardId) -> Result<Option<MembershipCard>> {
        let state = self.state.lock().unwrap();
        Ok(state.cards.get(&card_id).cloned())
    }

    async fn get_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<MembershipCard>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .cards
            .values()
            .find(|card| card.customer_id == customer_id)
            .cloned())
    }

    async fn list(&self, filter: &CardFilter, page: PageRequest) -> Result<CardPage> {
        let state = self.state.lock().unwrap();

        let mut cards: Vec<MembershipCard> = state
            .cards
            .values()
            .filter(|card| matches(card, filter))
            .cloned()
            .collect();

        // 作成日時の新しい順。同時刻はIDで安定させる
        cards.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.value().cmp(&b.id.value()))
        });

        let total = cards.len() as i64;
        let (start, end) = page_bounds(page, cards.len());
        let cards = cards[start..end].to_vec();

        Ok(CardPage { cards, total })
    }

    async fn stats(&self) -> Result<CardStats> {
        let state = self.state.lock().unwrap();

        let mut by_tier = TierBreakdown::default();
        let mut by_status = StatusBreakdown::default();
        let mut total_points = 0i64;
        let mut total_spent = 0i64;

        for card in state.cards.values() {
            match card.tier {
                Tier::Silver => by_tier.silver += 1,
                Tier::Gold => by_tier.gold += 1,
                Tier::Platinum => by_tier.platinum += 1,
            }
            match card.status {
                CardStatus::Active => by_status.active += 1,
                CardStatus::Expired => by_status.expired += 1,
                CardStatus::Blocked => by_status.blocked += 1,
            }
            total_points += card.points;
            total_spent += card.total_spent;
        }

        let total_cards = state.cards.len() as i64;
        let average_points = if total_cards > 0 {
            total_points as f64 / total_cards as f64
        } else {
            0.0
        };

        Ok(CardStats {
            total_cards,
            by_tier,
            by_status,
            total_points,
            total_spent,
            average_points,
        })
    }

    async fn delete(&self, card_id: CardId) -> Result<bool> {
        let mut state = self.state.lock().unwrap();

        let existed = state.cards.remove(&card_id).is_some();
        if existed {
            // カスケード：カードの取引も消す
            state.transactions.retain(|tx| tx.card_id != card_id);
        }

        Ok(existed)
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn append(
        &self,
        transaction: &PointTransaction,
        new_balance: i64,
        new_total_spent: Option<i64>,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();

        let card = state
            .cards
            .get_mut(&transaction.card_id)
            .ok_or_else(|| {
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("card not found: {}", transaction.card_id.value()),
                )) as Box<dyn std::error::Error + Send + Sync>
            })?;

        card.points = new_balance;
        if let Some(total_spent) = new_total_spent {
            card.total_spent = total_spent;
        }
        card.updated_at = transaction.created_at;

        state.transactions.push(transaction.clone());
        Ok(())
    }

    async fn history(&self, card_id: CardId, page: PageRequest) -> Result<TransactionPage> {
        let state = self.state.lock().unwrap();

        // 挿入の逆順 == 新しい順（同時刻でも安定）
        let mut transactions: Vec<PointTransaction> = state
            .transactions
            .iter()
            .filter(|tx| tx.card_id == card_id)
            .cloned()
            .collect();
        transactions.reverse();

        let total = transactions.len() as i64;
        let (start, end) = page_bounds(page, transactions.len());
        let transactions = transactions[start..end].to_vec();

        Ok(TransactionPage {
            transactions,
            total,
        })
    }
}
