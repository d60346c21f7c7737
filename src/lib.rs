//! 会員カード・ポイント台帳サービス
//!
//! ホテル / レストランのバックオフィス向けロイヤルティ基盤。
//! ヘキサゴナルアーキテクチャと関数型DDDで構成する。
//!
//! - `domain`: 純粋なビジネスロジック（カード、台帳、ランク判定）
//! - `ports`: 外部依存の抽象（async trait）
//! - `application`: ユースケース（依存を引数で受け取る関数群）
//! - `adapters`: PostgreSQL / インメモリ / モック実装
//! - `api`: axumベースのRESTインターフェース

pub mod adapters;
pub mod api;
pub mod application;
pub mod domain;
pub mod ports;
