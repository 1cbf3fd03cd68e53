use crate::shared::utils::{format_days, format_dollars};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 税・手数料（定額）
pub const TAXES_FLAT: f64 = 25.0;

/// オプション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddOn {
    Insurance,
    #[serde(rename = "gps")]
    Navigation,
    ChildSeat,
    Wifi,
}

impl AddOn {
    pub const ALL: [AddOn; 4] = [
        AddOn::Insurance,
        AddOn::Navigation,
        AddOn::ChildSeat,
        AddOn::Wifi,
    ];

    /// 1日あたりの料金（ドル）
    pub fn daily_rate(&self) -> f64 {
        match self {
            AddOn::Insurance => 15.0,
            AddOn::Navigation => 8.0,
            AddOn::ChildSeat => 12.0,
            AddOn::Wifi => 10.0,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            AddOn::Insurance => "insurance",
            AddOn::Navigation => "gps",
            AddOn::ChildSeat => "child-seat",
            AddOn::Wifi => "wifi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AddOn::Insurance => "Additional Insurance (+$15/day)",
            AddOn::Navigation => "GPS Navigation (+$8/day)",
            AddOn::ChildSeat => "Child Safety Seat (+$12/day)",
            AddOn::Wifi => "WiFi Hotspot (+$10/day)",
        }
    }
}

/// 料金計算の結果（保存しない）
///
/// 金額はドル単位。車両の日額を丸めずに使うため小数を含むことがある
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub days: u64,
    pub daily_rate: f64,
    pub car_cost: f64,
    /// 保険（オプション費用の内数）
    pub insurance_cost: f64,
    /// 保険以外のオプション（オプション費用の内数）
    pub other_extras_cost: f64,
    pub extras_cost: f64,
    pub taxes_and_fees: f64,
    pub total: f64,
}

/// 料金明細の1行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostLine {
    pub label: String,
    pub amount: f64,
}

/// レンタル日数（どちらかが未選択、または返却日が前の場合は0）
pub fn rental_days(pickup: Option<NaiveDate>, return_date: Option<NaiveDate>) -> u64 {
    match (pickup, return_date) {
        (Some(pickup), Some(return_date)) => {
            let days = (return_date - pickup).num_days();
            if days > 0 {
                days as u64
            } else {
                0
            }
        }
        _ => 0,
    }
}

/// 料金を計算する
///
/// # 引数
/// * `daily_rate` - 車両の1日あたりの料金（車両未選択の場合は0）
/// * `pickup` - 受取日
/// * `return_date` - 返却日
/// * `add_ons` - 選択したオプション
pub fn price(
    daily_rate: f64,
    pickup: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
    add_ons: &BTreeSet<AddOn>,
) -> PricingResult {
    let days = rental_days(pickup, return_date);
    let day_count = days as f64;
    let car_cost = day_count * daily_rate;

    let extras_daily: f64 = add_ons.iter().map(AddOn::daily_rate).sum();
    let extras_cost = day_count * extras_daily;
    let insurance_cost = if add_ons.contains(&AddOn::Insurance) {
        day_count * AddOn::Insurance.daily_rate()
    } else {
        0.0
    };

    PricingResult {
        days,
        daily_rate,
        car_cost,
        insurance_cost,
        other_extras_cost: extras_cost - insurance_cost,
        extras_cost,
        taxes_and_fees: TAXES_FLAT,
        total: car_cost + extras_cost + TAXES_FLAT,
    }
}

impl PricingResult {
    /// 予約サマリーの料金明細
    ///
    /// 保険と保険以外のオプションは選択されている場合のみ表示する
    pub fn breakdown(&self, add_ons: &BTreeSet<AddOn>) -> Vec<CostLine> {
        let days = format_days(self.days);
        let mut lines = vec![CostLine {
            label: format!(
                "Car Rental ({days} × {})",
                format_dollars(self.daily_rate)
            ),
            amount: self.car_cost,
        }];

        if add_ons.contains(&AddOn::Insurance) {
            lines.push(CostLine {
                label: format!(
                    "Insurance ({days} × {})",
                    format_dollars(AddOn::Insurance.daily_rate())
                ),
                amount: self.insurance_cost,
            });
        }

        if add_ons.iter().any(|add_on| *add_on != AddOn::Insurance) {
            lines.push(CostLine {
                label: format!("Extras ({days})"),
                amount: self.other_extras_cost,
            });
        }

        lines.push(CostLine {
            label: "Taxes & Fees".to_string(),
            amount: self.taxes_and_fees,
        });

        lines
    }
}
