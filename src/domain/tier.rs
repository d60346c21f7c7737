#![allow(dead_code)]

use super::card::Tier;

/// ゴールド昇格の既定閾値（最小通貨単位）
pub const DEFAULT_GOLD_FLOOR: i64 = 15_000_000;

/// プラチナ昇格の既定閾値（最小通貨単位）
pub const DEFAULT_PLATINUM_FLOOR: i64 = 30_000_000;

/// ランク閾値表
///
/// 累計利用額からランクを分類する。状態を持たず、カードを変更しない。
/// 分類結果は表示・推奨（suggested_tier）にのみ使われ、
/// 自動昇格は行わない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierSchedule {
    /// この額以上でゴールド
    pub gold_floor: i64,
    /// この額以上でプラチナ
    pub platinum_floor: i64,
}

impl Default for TierSchedule {
    fn default() -> Self {
        Self {
            gold_floor: DEFAULT_GOLD_FLOOR,
            platinum_floor: DEFAULT_PLATINUM_FLOOR,
        }
    }
}

impl TierSchedule {
    /// 環境変数から閾値を読む（TIER_GOLD_FLOOR / TIER_PLATINUM_FLOOR）
    ///
    /// 未設定・解析不能・閾値の逆転は既定値に戻す。
    pub fn from_env() -> Self {
        let gold_floor = read_floor("TIER_GOLD_FLOOR", DEFAULT_GOLD_FLOOR);
        let platinum_floor = read_floor("TIER_PLATINUM_FLOOR", DEFAULT_PLATINUM_FLOOR);

        if gold_floor <= 0 || platinum_floor <= gold_floor {
            return Self::default();
        }

        Self {
            gold_floor,
            platinum_floor,
        }
    }

    /// 純粋関数：累計利用額からランクを分類する
    ///
    /// ビジネスルール：
    /// - gold_floor未満はSilver
    /// - gold_floor以上 platinum_floor未満はGold
    /// - platinum_floor以上はPlatinum
    pub fn tier_for(&self, total_spent: i64) -> Tier {
        if total_spent >= self.platinum_floor {
            Tier::Platinum
        } else if total_spent >= self.gold_floor {
            Tier::Gold
        } else {
            Tier::Silver
        }
    }

    /// 純粋関数：次ランクの閾値に対する進捗率（0〜100）
    ///
    /// 現在の（管理者が設定した）ランクを基準に計算する。
    /// Platinumは次ランクがないためNone。
    pub fn progress_to_next_tier(&self, total_spent: i64, tier: Tier) -> Option<u8> {
        let next_floor = match tier {
            Tier::Silver => self.gold_floor,
            Tier::Gold => self.platinum_floor,
            Tier::Platinum => return None,
        };

        if total_spent >= next_floor {
            return Some(100);
        }

        Some((total_spent * 100 / next_floor) as u8)
    }
}

fn read_floor(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
