//! ルーティング定義
//!
//! | Method | Path                          | 説明                     |
//! |--------|-------------------------------|--------------------------|
//! | GET    | /health                       | ヘルスチェック           |
//! | GET    | /cards                        | カード一覧（検索）       |
//! | POST   | /cards                        | カード発行               |
//! | GET    | /cards/stats                  | ダッシュボード統計       |
//! | GET    | /cards/customer/:customer_id  | 顧客IDでカード取得       |
//! | GET    | /cards/:id                    | カード詳細               |
//! | PUT    | /cards/:id                    | カード属性更新           |
//! | DELETE | /cards/:id                    | カード削除               |
//! | POST   | /cards/:id/status             | ステータス変更           |
//! | GET    | /cards/:id/transactions       | ポイント取引履歴         |
//! | POST   | /cards/:id/points             | ポイント加算             |
//! | POST   | /cards/:id/adjust             | ポイント調整             |
//! | POST   | /cards/:id/redeem             | 特典交換                 |
//! | GET    | /rewards                      | 特典一覧                 |

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, add_points, adjust_points, card_stats, change_card_status, create_card, delete_card,
    get_card, get_card_by_customer, health_check, list_cards, list_rewards, point_history,
    redeem_points, update_card,
};

/// アプリケーションのルーターを構築する
///
/// 静的パス（/cards/stats など）はパスパラメータ（/cards/:id）より
/// 優先してマッチする。
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // ヘルスチェック
        .route("/health", get(health_check))
        // カードのライフサイクル
        .route("/cards", get(list_cards).post(create_card))
        .route("/cards/stats", get(card_stats))
        .route("/cards/customer/:customer_id", get(get_card_by_customer))
        .route(
            "/cards/:id",
            get(get_card).put(update_card).delete(delete_card),
        )
        .route("/cards/:id/status", post(change_card_status))
        // ポイント台帳
        .route("/cards/:id/transactions", get(point_history))
        .route("/cards/:id/points", post(add_points))
        .route("/cards/:id/adjust", post(adjust_points))
        .route("/cards/:id/redeem", post(redeem_points))
        // 特典カタログ
        .route("/rewards", get(list_rewards))
        // リクエスト/レスポンスのトレースログ
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
