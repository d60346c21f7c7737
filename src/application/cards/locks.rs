use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::value_objects::CardId;

/// カード単位の直列化ロック
///
/// カードへの書き込み（加算・調整・交換・属性更新・ステータス変更・削除）は
/// 対象カードのロックを保持したまま 読み込み → 検証 → 書き込み を行う。
/// 素朴なread-modify-writeの競合で残高が負になったり、全項目UPDATEが
/// 並行する台帳追記を上書きしたりすることを防ぐ。
///
/// - 同じカードへの書き込みは直列化される
/// - 異なるカードの操作は並行に進む
/// - 読み取り（一覧・履歴・統計）はロックを取らない
#[derive(Default)]
pub struct CardLockRegistry {
    locks: Mutex<HashMap<CardId, Arc<Mutex<()>>>>,
}

impl CardLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// カードのロックを取得する
    ///
    /// 返されたガードがドロップされるまで、同じカードの取得は待たされる。
    pub async fn acquire(&self, card_id: CardId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(card_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }

    /// カードのロックエントリを破棄する
    ///
    /// カード削除後に呼び、レジストリが削除済みカードの分だけ
    /// 成長し続けないようにする。
    pub async fn remove(&self, card_id: CardId) {
        let mut locks = self.locks.lock().await;
        locks.remove(&card_id);
    }
}
