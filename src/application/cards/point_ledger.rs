use chrono::Utc;

use crate::domain::card::MembershipCard;
use crate::domain::commands::{AddPoints, AdjustPoints};
use crate::domain::errors::LedgerEntryError;
use crate::domain::ledger::{self, PointTransaction, TransactionKind};
use crate::domain::value_objects::CardId;
use crate::ports::card_repository::PageRequest;
use crate::ports::ledger_store::TransactionPage;

use super::card_store::{ServiceDependencies, load_card};
use super::errors::{CardApplicationError, Result};

/// earn取引の既定の摘要
const DEFAULT_EARN_DESCRIPTION: &str = "Points earned";

/// adjust取引の既定の摘要
const DEFAULT_ADJUST_DESCRIPTION: &str = "Manual adjustment";

/// ポイントを加算する（純粋な関数）
///
/// ビジネスルール：
/// - pointsは正
/// - amountが付く場合は累計利用額にも同じ原子的単位で加算される
/// - 残高の更新と取引の追記は1つの原子的単位（部分的な失敗を残さない）
///
/// すべての依存が引数として明示的に渡される（関数型の原則）。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 加算コマンド
///
/// # 戻り値
/// 更新後のカードと追記された取引
#[allow(dead_code)]
pub async fn add_points(
    deps: &ServiceDependencies,
    cmd: AddPoints,
) -> Result<(MembershipCard, PointTransaction)> {
    // 1. 入力の検証
    if cmd.points <= 0 {
        return Err(CardApplicationError::Validation(
            "points must be positive".to_string(),
        ));
    }
    if let Some(amount) = cmd.amount {
        if amount < 0 {
            return Err(CardApplicationError::Validation(
                "amount must not be negative".to_string(),
            ));
        }
    }

    // 2. カードロックを取得（読み込み → 検証 → 追記を直列化）
    let _guard = deps.card_locks.acquire(cmd.card_id).await;

    // 3. カードを取得
    let card = load_card(deps, cmd.card_id).await?;

    // 4. ドメイン層の純粋関数で新残高を検証
    let new_balance = ledger::post_entry(card.points, TransactionKind::Earn, cmd.points)
        .map_err(map_ledger_error)?;

    // 5. 取引を生成して原子的に追記（amountは累計利用額にも反映）
    let new_total_spent = cmd.amount.map(|amount| card.total_spent + amount);
    let transaction = ledger::new_transaction(
        cmd.card_id,
        TransactionKind::Earn,
        cmd.points,
        cmd.amount,
        cmd.description
            .unwrap_or_else(|| DEFAULT_EARN_DESCRIPTION.to_string()),
        Utc::now(),
    );

    deps.ledger_store
        .append(&transaction, new_balance, new_total_spent)
        .await
        .map_err(CardApplicationError::LedgerStoreError)?;

    // 6. 更新後のカードを返す
    let updated = MembershipCard {
        points: new_balance,
        total_spent: new_total_spent.unwrap_or(card.total_spent),
        updated_at: transaction.created_at,
        ..card
    };

    Ok((updated, transaction))
}

/// 残高を調整する（純粋な関数）
///
/// ビジネスルール：
/// - deltaの符号は任意、ただし適用後の残高は0以上
/// - 管理者によるデータ修正もすべて台帳を通る
#[allow(dead_code)]
pub async fn adjust_points(
    deps: &ServiceDependencies,
    cmd: AdjustPoints,
) -> Result<(MembershipCard, PointTransaction)> {
    // 1. カードロックを取得
    let _guard = deps.card_locks.acquire(cmd.card_id).await;

    // 2. カードを取得
    let card = load_card(deps, cmd.card_id).await?;

    // 3. ドメイン層の純粋関数で新残高を検証（適用後も0以上）
    let new_balance = ledger::post_entry(card.points, TransactionKind::Adjust, cmd.delta)
        .map_err(map_ledger_error)?;

    // 4. 取引を生成して原子的に追記
    let transaction = ledger::new_transaction(
        cmd.card_id,
        TransactionKind::Adjust,
        cmd.delta,
        None,
        cmd.description
            .unwrap_or_else(|| DEFAULT_ADJUST_DESCRIPTION.to_string()),
        Utc::now(),
    );

    deps.ledger_store
        .append(&transaction, new_balance, None)
        .await
        .map_err(CardApplicationError::LedgerStoreError)?;

    // 5. 更新後のカードを返す
    let updated = MembershipCard {
        points: new_balance,
        updated_at: transaction.created_at,
        ..card
    };

    Ok((updated, transaction))
}

/// カードの取引履歴を取得する（純粋な関数）
///
/// 新しい順。取引は不変なので、書き込みがなければ何度呼んでも
/// 同じページが返る。読み取りのためロックは取らない。
#[allow(dead_code)]
pub async fn point_history(
    deps: &ServiceDependencies,
    card_id: CardId,
    page: PageRequest,
) -> Result<TransactionPage> {
    // 1. カードの存在確認
    load_card(deps, card_id).await?;

    // 2. 履歴を取得
    deps.ledger_store
        .history(card_id, page)
        .await
        .map_err(CardApplicationError::LedgerStoreError)
}

/// 台帳エラーをアプリケーション層のエラーへ写すヘルパー関数
///
/// add_points, adjust_points, redeem_pointsで共通利用される。
pub(super) fn map_ledger_error(e: LedgerEntryError) -> CardApplicationError {
    match e {
        LedgerEntryError::NonPositiveEarn { delta } => {
            CardApplicationError::Validation(format!("earn delta must be positive (got {})", delta))
        }
        LedgerEntryError::NonNegativeRedeem { delta } => CardApplicationError::Validation(format!(
            "redeem delta must be negative (got {})",
            delta
        )),
        LedgerEntryError::InsufficientPoints {
            requested,
            available,
        } => CardApplicationError::InsufficientPoints {
            requested,
            available,
        },
        LedgerEntryError::InvalidAdjustment { delta, balance } => {
            CardApplicationError::InvalidAdjustment { delta, balance }
        }
    }
}
