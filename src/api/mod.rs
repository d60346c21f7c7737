//! HTTP API層
//!
//! axumベースのRESTインターフェース。アプリケーション層の
//! ユースケース関数を薄く包むことに徹し、ビジネスルールは持たない。

pub mod error;
pub mod handlers;
pub mod router;
pub mod types;

#[allow(unused_imports)]
pub use error::ApiError;
#[allow(unused_imports)]
pub use handlers::AppState;
#[allow(unused_imports)]
pub use router::create_router;
