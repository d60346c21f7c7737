#![allow(dead_code)]

//! アプリケーションエラーからHTTPレスポンスへの変換

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::cards::CardApplicationError;

use super::types::ErrorResponse;

/// コマンド系ハンドラーの共通エラー型
///
/// アプリケーション層のエラーを包み、`IntoResponse` で
/// ステータスコードと `{code, message}` 形式のボディに写す。
#[derive(Debug)]
pub struct ApiError(pub CardApplicationError);

impl From<CardApplicationError> for ApiError {
    fn from(e: CardApplicationError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self.0 {
            CardApplicationError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            CardApplicationError::CardNotFound => (
                StatusCode::NOT_FOUND,
                "CARD_NOT_FOUND",
                "Card not found".to_string(),
            ),
            CardApplicationError::RewardNotFound => (
                StatusCode::NOT_FOUND,
                "REWARD_NOT_FOUND",
                "Reward not found".to_string(),
            ),
            CardApplicationError::DuplicateCard => (
                StatusCode::CONFLICT,
                "DUPLICATE_CARD",
                "Customer already has a membership card".to_string(),
            ),
            // 422: リクエスト自体は整形済みだが、ビジネスルールが拒否した
            CardApplicationError::CardNotActive(status) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CARD_NOT_ACTIVE",
                format!("Card is not active (status: {})", status.as_str()),
            ),
            CardApplicationError::InsufficientPoints {
                requested,
                available,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INSUFFICIENT_POINTS",
                format!(
                    "Insufficient points: requested {}, available {}",
                    requested, available
                ),
            ),
            CardApplicationError::InvalidAdjustment { delta, balance } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_ADJUSTMENT",
                format!(
                    "Adjustment of {} would make balance {} negative",
                    delta, balance
                ),
            ),
            CardApplicationError::InvalidTransition(status) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_TRANSITION",
                format!("Card is already {}", status.as_str()),
            ),
            // 500: インフラ起因。詳細はログに残し、クライアントには返さない
            CardApplicationError::CardRepositoryError(e) => {
                tracing::error!("card repository error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
            CardApplicationError::LedgerStoreError(e) => {
                tracing::error!("ledger store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
            CardApplicationError::CustomerDirectoryError(e) => {
                tracing::error!("customer directory error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
            CardApplicationError::RewardCatalogError(e) => {
                tracing::error!("reward catalog error: {}", e);
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
