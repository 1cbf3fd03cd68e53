use crate::features::catalog::models::{Category, Vehicle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// 料金帯
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriceRange {
    /// $50未満
    #[serde(rename = "under-50")]
    Under50,
    /// $50以上$100以下（両端を含む）
    #[serde(rename = "50-100")]
    From50To100,
    /// $100超
    #[serde(rename = "over-100")]
    Over100,
}

impl PriceRange {
    pub const ALL: [PriceRange; 3] = [
        PriceRange::Under50,
        PriceRange::From50To100,
        PriceRange::Over100,
    ];

    /// 1日あたりの料金がこの料金帯に含まれるか
    ///
    /// 料金は丸めずに比較する（49.6は$50未満、100.4は$100超）
    pub fn contains(&self, daily_price: f64) -> bool {
        match self {
            PriceRange::Under50 => daily_price < 50.0,
            PriceRange::From50To100 => (50.0..=100.0).contains(&daily_price),
            PriceRange::Over100 => daily_price > 100.0,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            PriceRange::Under50 => "under-50",
            PriceRange::From50To100 => "50-100",
            PriceRange::Over100 => "over-100",
        }
    }

    /// フィルター一覧の表示ラベル
    pub fn label(&self) -> &'static str {
        match self {
            PriceRange::Under50 => "Under $50/day",
            PriceRange::From50To100 => "$50 - $100/day",
            PriceRange::Over100 => "Over $100/day",
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PriceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "under-50" => Ok(PriceRange::Under50),
            "50-100" => Ok(PriceRange::From50To100),
            "over-100" => Ok(PriceRange::Over100),
            other => Err(format!("不明な料金帯です: {other}")),
        }
    }
}

/// カタログの絞り込み条件
///
/// 画面内だけで保持し、永続化しない
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    price_ranges: BTreeSet<PriceRange>,
    categories: BTreeSet<Category>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 料金帯の選択を切り替える（選択後の状態を返す）
    pub fn toggle_price(&mut self, range: PriceRange) -> bool {
        if self.price_ranges.remove(&range) {
            false
        } else {
            self.price_ranges.insert(range);
            true
        }
    }

    /// カテゴリーの選択を切り替える（選択後の状態を返す）
    pub fn toggle_category(&mut self, category: Category) -> bool {
        if self.categories.remove(&category) {
            false
        } else {
            self.categories.insert(category);
            true
        }
    }

    /// すべての選択を解除する
    pub fn reset(&mut self) {
        self.price_ranges.clear();
        self.categories.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.price_ranges.is_empty() && self.categories.is_empty()
    }

    pub fn price_ranges(&self) -> &BTreeSet<PriceRange> {
        &self.price_ranges
    }

    pub fn categories(&self) -> &BTreeSet<Category> {
        &self.categories
    }

    pub fn is_price_selected(&self, range: PriceRange) -> bool {
        self.price_ranges.contains(&range)
    }

    pub fn is_category_selected(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    /// 車両が絞り込み条件を満たすか
    ///
    /// 料金帯同士・カテゴリー同士はOR、料金帯とカテゴリーはAND。
    /// 未選択の段は全件通過する。
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        let price_ok = self.price_ranges.is_empty()
            || self
                .price_ranges
                .iter()
                .any(|range| range.contains(vehicle.price));

        let category_ok =
            self.categories.is_empty() || self.categories.contains(&vehicle.effective_category());

        price_ok && category_ok
    }
}

/// 絞り込み条件に一致する車両を元の順序のまま返す
pub fn filter_vehicles(vehicles: &[Vehicle], selection: &FilterSelection) -> Vec<Vehicle> {
    if selection.is_empty() {
        return vehicles.to_vec();
    }

    vehicles
        .iter()
        .filter(|vehicle| selection.matches(vehicle))
        .cloned()
        .collect()
}
