use crate::domain::value_objects::CustomerId;
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 顧客ディレクトリポート
///
/// カードコンテキストと顧客管理コンテキストの境界を維持する。
/// カードコンテキストはCustomerIDのみを知り、顧客詳細は知らない。
#[allow(dead_code)]
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// 顧客の表示名を取得する
    ///
    /// カード詳細でわかりやすい表示をするために使用される。
    /// 未登録の顧客はNone（カードの読み取り自体は失敗させない）。
    async fn display_name(&self, customer_id: CustomerId) -> Result<Option<String>>;

    /// 顧客コードを取得する
    ///
    /// フロントで使われる会員番号などの外部コード。未登録はNone。
    async fn code(&self, customer_id: CustomerId) -> Result<Option<String>>;
}
