use crate::domain::value_objects::RewardId;
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 特典（カタログコンテキスト所有の読み取り専用ビュー）
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub id: RewardId,
    pub name: String,
    /// 交換に必要なポイント
    pub points_cost: i64,
    pub description: String,
}

/// 特典カタログポート
///
/// カードコンテキストは特典の管理をせず、交換時の照会のみ行う。
#[allow(dead_code)]
#[async_trait]
pub trait RewardCatalog: Send + Sync {
    /// 特典を取得する
    ///
    /// 交換前の特典バリデーションに使用される。
    async fn get(&self, reward_id: RewardId) -> Result<Option<Reward>>;

    /// 交換可能な特典の一覧を取得する
    async fn list(&self) -> Result<Vec<Reward>>;
}
