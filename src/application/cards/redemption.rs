use chrono::Utc;

use crate::domain::card::MembershipCard;
use crate::domain::commands::RedeemPoints;
use crate::domain::ledger::{self, PointTransaction, TransactionKind};

use super::card_store::{ServiceDependencies, load_card};
use super::errors::{CardApplicationError, Result};
use super::point_ledger::map_ledger_error;

/// 特典と交換する（純粋な関数）
///
/// ビジネスルール：
/// - カードがactiveであること
/// - 特典がカタログに存在すること
/// - 残高が要求ポイント以上であること
/// - 引き落としはredeem取引として台帳に残る
///
/// 検証の順序は固定：カード取得 → active確認 → 特典照会 →
/// 残高確認 → 台帳追記。どの段階で失敗しても残高と台帳は変わらない。
/// 原子的な台帳追記以外に補償すべき外部副作用はない。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 交換コマンド
///
/// # 戻り値
/// 更新後のカードと追記された取引
#[allow(dead_code)]
pub async fn redeem_points(
    deps: &ServiceDependencies,
    cmd: RedeemPoints,
) -> Result<(MembershipCard, PointTransaction)> {
    // 1. 入力の検証
    if cmd.points <= 0 {
        return Err(CardApplicationError::Validation(
            "points must be positive".to_string(),
        ));
    }

    // 2. カードロックを取得（読み込み → 検証 → 追記を直列化）
    let _guard = deps.card_locks.acquire(cmd.card_id).await;

    // 3. カードを取得
    let card = load_card(deps, cmd.card_id).await?;

    // 4. activeであることを確認
    if !card.can_transact() {
        return Err(CardApplicationError::CardNotActive(card.status));
    }

    // 5. 特典カタログを照会
    let reward = deps
        .reward_catalog
        .get(cmd.reward_id)
        .await
        .map_err(CardApplicationError::RewardCatalogError)?
        .ok_or(CardApplicationError::RewardNotFound)?;

    // 6. ドメイン層の純粋関数で新残高を検証（残高不足はここで弾く）
    let new_balance = ledger::post_entry(card.points, TransactionKind::Redeem, -cmd.points)
        .map_err(map_ledger_error)?;

    // 7. 取引を生成して原子的に追記
    let description = cmd
        .description
        .unwrap_or_else(|| format!("Redeemed {}", reward.name));
    let transaction = ledger::new_transaction(
        cmd.card_id,
        TransactionKind::Redeem,
        -cmd.points,
        None,
        description,
        Utc::now(),
    );

    deps.ledger_store
        .append(&transaction, new_balance, None)
        .await
        .map_err(CardApplicationError::LedgerStoreError)?;

    // 8. 更新後のカードを返す
    let updated = MembershipCard {
        points: new_balance,
        updated_at: transaction.created_at,
        ..card
    };

    Ok((updated, transaction))
}
