use crate::domain::value_objects::RewardId;
use crate::ports::reward_catalog::{Reward, RewardCatalog as RewardCatalogTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock implementation of RewardCatalog
///
/// Holds rewards in insertion order so listings are deterministic.
/// The catalog is read-only from the card context's point of view;
/// registration helpers exist for tests and demo seeding only.
#[allow(dead_code)]
pub struct RewardCatalog {
    rewards: Mutex<Vec<Reward>>,
}

#[allow(dead_code)]
impl RewardCatalog {
    pub fn new() -> Self {
        Self {
            rewards: Mutex::new(Vec::new()),
        }
    }

    /// Register a reward for testing or seeding purposes
    pub fn add_reward(&self, reward: Reward) {
        self.rewards.lock().unwrap().push(reward);
    }
}

impl Default for RewardCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RewardCatalogTrait for RewardCatalog {
    /// Look up a reward by id
    async fn get(&self, reward_id: RewardId) -> Result<Option<Reward>> {
        Ok(self
            .rewards
            .lock()
            .unwrap()
            .iter()
            .find(|reward| reward.id == reward_id)
            .cloned())
    }

    /// List all rewards in registration order
    async fn list(&self) -> Result<Vec<Reward>> {
        Ok(self.rewards.lock().unwrap().clone())
    }
}
