#![allow(dead_code)]

//! HTTPハンドラー
//!
//! コマンド系（書き込み）はアプリケーション層のユースケース関数を呼び、
//! エラーは `ApiError` がHTTPレスポンスへ写す。
//! クエリ系（読み取り）は失敗の種類が少ないため、軽い `QueryError` を使う。

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::application::cards::{
    CardApplicationError, ServiceDependencies, add_points as execute_add_points,
    adjust_points as execute_adjust_points, card_stats as execute_card_stats,
    change_card_status as execute_change_card_status, create_card as execute_create_card,
    delete_card as execute_delete_card, get_card as execute_get_card,
    get_card_by_customer as execute_get_card_by_customer, list_cards as execute_list_cards,
    point_history as execute_point_history, redeem_points as execute_redeem_points,
    update_card as execute_update_card,
};
use crate::domain::card::{CardStatus, Tier};
use crate::domain::commands::{AddPoints, AdjustPoints, ChangeCardStatus, RedeemPoints, UpdateCard};
use crate::domain::{CardId, CustomerId, RewardId};
use crate::ports::card_repository::CardFilter;

use super::error::ApiError;
use super::types::{
    AddPointsRequest, AdjustPointsRequest, CardDeletedResponse, CardDetailResponse,
    CardListResponse, CardResponse, CardStatsResponse, ChangeStatusRequest, CreateCardRequest,
    ErrorResponse, HistoryQuery, ListCardsQuery, PointsChangedResponse, RedeemPointsRequest,
    RewardResponse, TransactionListResponse, TransactionResponse, UpdateCardRequest, page_request,
};

/// 全ハンドラーで共有される状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// ヘルスチェック
pub async fn health_check() -> &'static str {
    "OK"
}

// ============================================================
// コマンドハンドラー（書き込み）
// ============================================================

/// POST /cards - カードを発行する
pub async fn create_card(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<CardResponse>), ApiError> {
    let cmd = req.to_command().map_err(CardApplicationError::Validation)?;

    let card = execute_create_card(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(CardResponse::from(card))))
}

/// PUT /cards/:id - カードの属性を更新する
pub async fn update_card(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCardRequest>,
) -> Result<Json<CardResponse>, ApiError> {
    let patch = req.to_patch().map_err(CardApplicationError::Validation)?;
    let cmd = UpdateCard {
        card_id: CardId::from_uuid(id),
        patch,
    };

    let card = execute_update_card(&state.service_deps, cmd).await?;

    Ok(Json(CardResponse::from(card)))
}

/// DELETE /cards/:id - カードと取引履歴を削除する
pub async fn delete_card(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CardDeletedResponse>, ApiError> {
    execute_delete_card(&state.service_deps, CardId::from_uuid(id)).await?;

    Ok(Json(CardDeletedResponse { id, deleted: true }))
}

/// POST /cards/:id/status - カードのステータスを変更する
pub async fn change_card_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<CardResponse>, ApiError> {
    let new_status = req
        .status
        .parse::<CardStatus>()
        .map_err(CardApplicationError::Validation)?;
    let cmd = ChangeCardStatus {
        card_id: CardId::from_uuid(id),
        new_status,
    };

    let card = execute_change_card_status(&state.service_deps, cmd).await?;

    Ok(Json(CardResponse::from(card)))
}

/// POST /cards/:id/points - ポイントを加算する
pub async fn add_points(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddPointsRequest>,
) -> Result<Json<PointsChangedResponse>, ApiError> {
    let cmd = AddPoints {
        card_id: CardId::from_uuid(id),
        points: req.points,
        amount: req.amount,
        description: req.description,
    };

    let (card, transaction) = execute_add_points(&state.service_deps, cmd).await?;

    Ok(Json(PointsChangedResponse::new(card, transaction)))
}

/// POST /cards/:id/adjust - ポイント残高を調整する
pub async fn adjust_points(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<AdjustPointsRequest>,
) -> Result<Json<PointsChangedResponse>, ApiError> {
    let cmd = AdjustPoints {
        card_id: CardId::from_uuid(id),
        delta: req.delta,
        description: req.description,
    };

    let (card, transaction) = execute_adjust_points(&state.service_deps, cmd).await?;

    Ok(Json(PointsChangedResponse::new(card, transaction)))
}

/// POST /cards/:id/redeem - ポイントで特典と交換する
pub async fn redeem_points(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<RedeemPointsRequest>,
) -> Result<Json<PointsChangedResponse>, ApiError> {
    let cmd = RedeemPoints {
        card_id: CardId::from_uuid(id),
        reward_id: RewardId::from_uuid(req.reward_id),
        points: req.points,
        description: req.description,
    };

    let (card, transaction) = execute_redeem_points(&state.service_deps, cmd).await?;

    Ok(Json(PointsChangedResponse::new(card, transaction)))
}

// ============================================================
// クエリハンドラー（読み取り）
// ============================================================

/// GET /cards - カード一覧を検索する
pub async fn list_cards(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCardsQuery>,
) -> Result<Json<CardListResponse>, QueryError> {
    let tier = match &query.tier {
        Some(raw) => Some(raw.parse::<Tier>().map_err(QueryError::BadRequest)?),
        None => None,
    };
    let status = match &query.status {
        Some(raw) => Some(raw.parse::<CardStatus>().map_err(QueryError::BadRequest)?),
        None => None,
    };

    let filter = CardFilter {
        search: query.search,
        tier,
        status,
        customer_id: query.customer_id.map(CustomerId::from_uuid),
    };
    let page = page_request(query.page, query.limit);

    let result = execute_list_cards(&state.service_deps, filter, page)
        .await
        .map_err(query_error)?;

    Ok(Json(CardListResponse {
        cards: result.cards.into_iter().map(CardResponse::from).collect(),
        total: result.total,
        page: page.page,
        limit: page.limit,
    }))
}

/// GET /cards/stats - ダッシュボード統計を取得する
pub async fn card_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CardStatsResponse>, QueryError> {
    let stats = execute_card_stats(&state.service_deps)
        .await
        .map_err(query_error)?;

    Ok(Json(CardStatsResponse::from(stats)))
}

/// GET /cards/:id - カード詳細を取得する
pub async fn get_card(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CardDetailResponse>, QueryError> {
    let detail = execute_get_card(&state.service_deps, CardId::from_uuid(id))
        .await
        .map_err(query_error)?;

    Ok(Json(CardDetailResponse::from(detail)))
}

/// GET /cards/customer/:customer_id - 顧客IDでカードを取得する
pub async fn get_card_by_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<CardResponse>, QueryError> {
    let card = execute_get_card_by_customer(&state.service_deps, CustomerId::from_uuid(customer_id))
        .await
        .map_err(query_error)?;

    Ok(Json(CardResponse::from(card)))
}

/// GET /cards/:id/transactions - ポイント取引履歴を取得する
pub async fn point_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<TransactionListResponse>, QueryError> {
    let page = page_request(query.page, query.limit);

    let result = execute_point_history(&state.service_deps, CardId::from_uuid(id), page)
        .await
        .map_err(query_error)?;

    Ok(Json(TransactionListResponse {
        transactions: result
            .transactions
            .into_iter()
            .map(TransactionResponse::from)
            .collect(),
        total: result.total,
        page: page.page,
        limit: page.limit,
    }))
}

/// GET /rewards - 交換可能な特典の一覧を取得する
pub async fn list_rewards(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RewardResponse>>, QueryError> {
    let rewards = state
        .service_deps
        .reward_catalog
        .list()
        .await
        .map_err(|e| QueryError::InternalError(e.to_string()))?;

    Ok(Json(
        rewards.into_iter().map(RewardResponse::from).collect(),
    ))
}

// ============================================================
// クエリエラー
// ============================================================

/// クエリ系ハンドラーのエラー型
#[derive(Debug)]
pub enum QueryError {
    NotFound(String),
    BadRequest(String),
    InternalError(String),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            QueryError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            QueryError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            QueryError::InternalError(msg) => {
                tracing::error!("query failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

/// アプリケーションエラーをクエリエラーへ写す
fn query_error(e: CardApplicationError) -> QueryError {
    match e {
        CardApplicationError::CardNotFound => QueryError::NotFound("Card not found".to_string()),
        CardApplicationError::Validation(msg) => QueryError::BadRequest(msg),
        other => QueryError::InternalError(other.to_string()),
    }
}
