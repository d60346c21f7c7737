use std::sync::Arc;

use chrono::Utc;

use crate::domain::card::{self, MembershipCard, Tier};
use crate::domain::commands::{CreateCard, UpdateCard};
use crate::domain::errors::UpdateCardError;
use crate::domain::tier::TierSchedule;
use crate::domain::value_objects::{CardId, CustomerId};
use crate::ports::card_repository::{CardFilter, CardPage, CardRepository, CardStats, PageRequest};
use crate::ports::customer_directory::CustomerDirectory;
use crate::ports::ledger_store::LedgerStore;
use crate::ports::reward_catalog::RewardCatalog;

use super::errors::{CardApplicationError, Result};
use super::locks::CardLockRegistry;

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
///
/// このパターンにより：
/// - すべての依存が明示的
/// - データと振る舞いの分離
/// - 関数合成が容易
/// - テストが明確
#[derive(Clone)]
#[allow(dead_code)]
pub struct ServiceDependencies {
    pub card_repository: Arc<dyn CardRepository>,
    pub ledger_store: Arc<dyn LedgerStore>,
    pub customer_directory: Arc<dyn CustomerDirectory>,
    pub reward_catalog: Arc<dyn RewardCatalog>,
    pub card_locks: Arc<CardLockRegistry>,
    pub tier_schedule: TierSchedule,
}

/// カード詳細ビュー
///
/// カード本体に、顧客ディレクトリの表示情報とTierEngineの
/// 推奨ランク・進捗率を添えたもの。
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct CardDetail {
    pub card: MembershipCard,
    pub customer_name: Option<String>,
    pub customer_code: Option<String>,
    /// 累計利用額からの推奨ランク（表示専用、自動昇格はしない）
    pub suggested_tier: Tier,
    /// 次ランクへの進捗率（PlatinumはNone）
    pub tier_progress: Option<u8>,
}

/// リポジトリからカードを取得するヘルパー関数
///
/// 各ユースケースで共通利用される。
///
/// # エラー
/// - CardRepositoryError: 読み込み失敗
/// - CardNotFound: カードが存在しない
pub(super) async fn load_card(
    deps: &ServiceDependencies,
    card_id: CardId,
) -> Result<MembershipCard> {
    deps.card_repository
        .get_by_id(card_id)
        .await
        .map_err(CardApplicationError::CardRepositoryError)?
        .ok_or(CardApplicationError::CardNotFound)
}

/// カードを発行する（純粋な関数）
///
/// ビジネスルール：
/// - 1顧客につきカードは1枚
/// - 新規カードはpoints=0、total_spent=0、status=active
/// - 有効期限は発行日より後
///
/// すべての依存が引数として明示的に渡される（関数型の原則）。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 発行コマンド
///
/// # 戻り値
/// 成功時は発行されたカード
#[allow(dead_code)]
pub async fn create_card(deps: &ServiceDependencies, cmd: CreateCard) -> Result<MembershipCard> {
    // 1. 既存カードの確認（1顧客1枚）
    let existing = deps
        .card_repository
        .get_by_customer_id(cmd.customer_id)
        .await
        .map_err(CardApplicationError::CardRepositoryError)?;

    if existing.is_some() {
        return Err(CardApplicationError::DuplicateCard);
    }

    // 2. ドメイン層の純粋関数でカードを発行
    let card = card::issue_card(
        cmd.customer_id,
        cmd.tier,
        cmd.issue_date,
        cmd.expire_date,
        Utc::now(),
    )
    .map_err(|_| {
        CardApplicationError::Validation("expire_date must be after issue_date".to_string())
    })?;

    // 3. リポジトリに保存（ストレージのUNIQUE制約が重複の最後の砦）
    deps.card_repository
        .insert(&card)
        .await
        .map_err(CardApplicationError::CardRepositoryError)?;

    Ok(card)
}

/// カード詳細を取得する（純粋な関数）
///
/// 顧客ディレクトリの表示名・顧客コードを添えて返す。
/// 未登録の顧客でもカードの読み取り自体は失敗しない。
#[allow(dead_code)]
pub async fn get_card(deps: &ServiceDependencies, card_id: CardId) -> Result<CardDetail> {
    // 1. カードを取得
    let card = load_card(deps, card_id).await?;

    // 2. 顧客ディレクトリから表示情報を取得
    let customer_name = deps
        .customer_directory
        .display_name(card.customer_id)
        .await
        .map_err(CardApplicationError::CustomerDirectoryError)?;

    let customer_code = deps
        .customer_directory
        .code(card.customer_id)
        .await
        .map_err(CardApplicationError::CustomerDirectoryError)?;

    // 3. 推奨ランクと進捗率を計算（表示専用）
    let suggested_tier = deps.tier_schedule.tier_for(card.total_spent);
    let tier_progress = deps
        .tier_schedule
        .progress_to_next_tier(card.total_spent, card.tier);

    Ok(CardDetail {
        card,
        customer_name,
        customer_code,
        suggested_tier,
        tier_progress,
    })
}

/// 顧客IDでカードを取得する（純粋な関数）
#[allow(dead_code)]
pub async fn get_card_by_customer(
    deps: &ServiceDependencies,
    customer_id: CustomerId,
) -> Result<MembershipCard> {
    deps.card_repository
        .get_by_customer_id(customer_id)
        .await
        .map_err(CardApplicationError::CardRepositoryError)?
        .ok_or(CardApplicationError::CardNotFound)
}

/// カードの属性を更新する（純粋な関数）
///
/// ビジネスルール：
/// - 編集できるのはtier / status / 有効期間 / total_spentのみ
/// - pointsはここでは変更できない。残高の修正はadjust取引として
///   台帳を通す（生の残高上書きは存在しない）
#[allow(dead_code)]
pub async fn update_card(deps: &ServiceDependencies, cmd: UpdateCard) -> Result<MembershipCard> {
    // 1. カードロックを取得（台帳追記と同じ直列化単位）
    let _guard = deps.card_locks.acquire(cmd.card_id).await;

    // 2. カードを取得
    let card = load_card(deps, cmd.card_id).await?;

    // 3. ドメイン層の純粋関数で差分を適用
    let updated = card::apply_update(&card, cmd.patch, Utc::now()).map_err(map_update_error)?;

    // 4. リポジトリに保存
    deps.card_repository
        .update(&updated)
        .await
        .map_err(CardApplicationError::CardRepositoryError)?;

    Ok(updated)
}

/// カードを削除する（純粋な関数）
///
/// 取引履歴ごと消えるカスケード削除。取り消しはできない。
#[allow(dead_code)]
pub async fn delete_card(deps: &ServiceDependencies, card_id: CardId) -> Result<()> {
    // 1. カードロックを取得（進行中の台帳追記と競合させない）
    let _guard = deps.card_locks.acquire(card_id).await;

    // 2. 削除（取引 → カードの順にカスケード）
    let deleted = deps
        .card_repository
        .delete(card_id)
        .await
        .map_err(CardApplicationError::CardRepositoryError)?;

    if !deleted {
        return Err(CardApplicationError::CardNotFound);
    }

    // 3. ロックエントリを破棄
    deps.card_locks.remove(card_id).await;

    Ok(())
}

/// カードを検索する（純粋な関数）
///
/// フィルタはANDで結合され、作成日時の新しい順に返す。
#[allow(dead_code)]
pub async fn list_cards(
    deps: &ServiceDependencies,
    filter: CardFilter,
    page: PageRequest,
) -> Result<CardPage> {
    deps.card_repository
        .list(&filter, page)
        .await
        .map_err(CardApplicationError::CardRepositoryError)
}

/// ダッシュボード統計を取得する（純粋な関数）
#[allow(dead_code)]
pub async fn card_stats(deps: &ServiceDependencies) -> Result<CardStats> {
    deps.card_repository
        .stats()
        .await
        .map_err(CardApplicationError::CardRepositoryError)
}

fn map_update_error(e: UpdateCardError) -> CardApplicationError {
    match e {
        UpdateCardError::NegativeTotalSpent { value } => CardApplicationError::Validation(
            format!("total_spent must be >= 0 (got {})", value),
        ),
        UpdateCardError::ExpireBeforeIssue => {
            CardApplicationError::Validation("expire_date must be after issue_date".to_string())
        }
    }
}
