use chrono::Utc;

use crate::domain::card::{self, MembershipCard};
use crate::domain::commands::ChangeCardStatus;
use crate::domain::errors::StatusChangeError;

use super::card_store::{ServiceDependencies, load_card};
use super::errors::{CardApplicationError, Result};

/// カードステータスを変更する（純粋な関数）
///
/// ビジネスルール：
/// - 任意の状態から異なる任意の状態へ遷移できる
/// - 同一ステータスへの変更はInvalidTransition
/// - 管理者操作のみ。expire_date経過による自動遷移は行わない
#[allow(dead_code)]
pub async fn change_card_status(
    deps: &ServiceDependencies,
    cmd: ChangeCardStatus,
) -> Result<MembershipCard> {
    // 1. カードロックを取得（属性更新と同じ直列化単位）
    let _guard = deps.card_locks.acquire(cmd.card_id).await;

    // 2. カードを取得
    let card = load_card(deps, cmd.card_id).await?;

    // 3. ドメイン層の純粋関数で遷移を検証
    let updated = card::change_status(&card, cmd.new_status, Utc::now()).map_err(|e| match e {
        StatusChangeError::AlreadyInStatus(status) => {
            CardApplicationError::InvalidTransition(status)
        }
    })?;

    // 4. リポジトリに保存
    deps.card_repository
        .update(&updated)
        .await
        .map_err(CardApplicationError::CardRepositoryError)?;

    Ok(updated)
}
