use crate::features::bookings::models::BookingRequest;
use crate::features::catalog::models::Vehicle;
use crate::features::checkout::pricing::{price, AddOn, PricingResult};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{
    format_date_input, format_dollars, non_empty, normalize_string, parse_date_input,
    validate_email, validate_required_field, validate_text_length,
};
use crate::shared::view_state::{Navigation, Route};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 利用規約に同意していない場合のメッセージ
pub const TERMS_REQUIRED: &str = "Please agree to Terms & Privacy Policy";

/// 要望欄の最大文字数
const SPECIAL_REQUESTS_MAX_LENGTH: usize = 1000;

/// 店舗
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    #[default]
    MainOffice,
    Airport,
    Downtown,
    Mall,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::MainOffice,
        Location::Airport,
        Location::Downtown,
        Location::Mall,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Location::MainOffice => "main-office",
            Location::Airport => "airport",
            Location::Downtown => "downtown",
            Location::Mall => "mall",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Location::MainOffice => "Main Office - 123 Main Street",
            Location::Airport => "Airport Location - Terminal 1",
            Location::Downtown => "Downtown Branch - City Center",
            Location::Mall => "Shopping Mall - West Side",
        }
    }
}

/// 返却店舗（デフォルトは受取店舗と同じ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnLocation {
    #[default]
    SameAsPickup,
    At(Location),
}

impl ReturnLocation {
    pub fn key(&self) -> &'static str {
        match self {
            ReturnLocation::SameAsPickup => "same",
            ReturnLocation::At(location) => location.key(),
        }
    }
}

/// チェックアウトフォーム
///
/// 日付を変更するたびに、返却日が受取日より前になっていないかを確認し、
/// 前になっている場合は返却日をクリアする。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license: String,
    pickup_date: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
    pub pickup_location: Location,
    pub return_location: ReturnLocation,
    pub special_requests: String,
    add_ons: BTreeSet<AddOn>,
    pub terms: bool,
}

/// 予約送信後のサマリー
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub guest_name: String,
    pub car_name: String,
    pub days: u64,
    pub total: f64,
}

impl BookingSummary {
    /// 送信完了時に表示するメッセージ
    pub fn message(&self) -> String {
        format!(
            "Booking submitted for {}\nCar: {}\nDays: {}\nTotal: {}",
            self.guest_name,
            self.car_name,
            self.days,
            format_dollars(self.total)
        )
    }
}

impl CheckoutForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pickup_date(&self) -> Option<NaiveDate> {
        self.pickup_date
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    /// 受取日を設定する
    pub fn set_pickup_date(&mut self, date: Option<NaiveDate>) {
        self.pickup_date = date;
        self.enforce_date_order();
    }

    /// 返却日を設定する
    pub fn set_return_date(&mut self, date: Option<NaiveDate>) {
        self.return_date = date;
        self.enforce_date_order();
    }

    /// 日付入力欄の値（YYYY-MM-DD）から受取日を設定する
    pub fn set_pickup_date_input(&mut self, value: &str) -> AppResult<()> {
        let date = parse_date_input(value)?;
        self.set_pickup_date(date);
        Ok(())
    }

    /// 日付入力欄の値（YYYY-MM-DD）から返却日を設定する
    pub fn set_return_date_input(&mut self, value: &str) -> AppResult<()> {
        let date = parse_date_input(value)?;
        self.set_return_date(date);
        Ok(())
    }

    /// 日付入力欄に表示する値
    pub fn pickup_date_input(&self) -> String {
        format_date_input(self.pickup_date)
    }

    pub fn return_date_input(&self) -> String {
        format_date_input(self.return_date)
    }

    fn enforce_date_order(&mut self) {
        if let (Some(pickup), Some(return_date)) = (self.pickup_date, self.return_date) {
            if return_date < pickup {
                log::debug!("返却日が受取日より前のためクリアしました: pickup={pickup}, return={return_date}");
                self.return_date = None;
            }
        }
    }

    pub fn add_ons(&self) -> &BTreeSet<AddOn> {
        &self.add_ons
    }

    pub fn set_add_on(&mut self, add_on: AddOn, selected: bool) {
        if selected {
            self.add_ons.insert(add_on);
        } else {
            self.add_ons.remove(&add_on);
        }
    }

    /// オプションの選択を切り替える（選択後の状態を返す）
    pub fn toggle_add_on(&mut self, add_on: AddOn) -> bool {
        let selected = !self.add_ons.contains(&add_on);
        self.set_add_on(add_on, selected);
        selected
    }

    /// 返却店舗（受取店舗と同じ場合は受取店舗）
    pub fn resolved_return_location(&self) -> Location {
        match self.return_location {
            ReturnLocation::SameAsPickup => self.pickup_location,
            ReturnLocation::At(location) => location,
        }
    }

    /// 現在の入力内容で料金を計算する
    pub fn pricing(&self, vehicle: Option<&Vehicle>) -> PricingResult {
        let daily_rate = vehicle.map(|v| v.price).unwrap_or(0.0);
        price(daily_rate, self.pickup_date, self.return_date, &self.add_ons)
    }

    /// 送信前の検証
    pub fn validate(&self) -> AppResult<()> {
        validate_required_field(&self.name, "Full name")?;
        validate_email(&self.email)?;
        validate_required_field(&self.phone, "Phone number")?;
        validate_required_field(&self.license, "Driver's license number")?;

        if self.pickup_date.is_none() {
            return Err(AppError::validation("Pickup date is required"));
        }
        if self.return_date.is_none() {
            return Err(AppError::validation("Return date is required"));
        }

        validate_text_length(
            &self.special_requests,
            SPECIAL_REQUESTS_MAX_LENGTH,
            "Special requests",
        )?;

        if !self.terms {
            return Err(AppError::validation(TERMS_REQUIRED));
        }

        Ok(())
    }

    /// 送信内容のサマリーを作成する
    pub fn summary(&self, vehicle: Option<&Vehicle>) -> BookingSummary {
        let pricing = self.pricing(vehicle);
        BookingSummary {
            guest_name: non_empty(&self.name).unwrap_or_else(|| "Guest".to_string()),
            car_name: vehicle
                .map(Vehicle::display_name)
                .unwrap_or_else(|| "N/A".to_string()),
            days: pricing.days,
            total: pricing.total,
        }
    }

    /// 予約APIのリクエストを作成する（検証済みであること）
    pub fn booking_request(&self, vehicle: &Vehicle) -> AppResult<BookingRequest> {
        let (Some(pickup), Some(return_date)) = (self.pickup_date, self.return_date) else {
            return Err(AppError::validation("Pickup and return dates are required"));
        };
        let pricing = self.pricing(Some(vehicle));

        Ok(BookingRequest {
            car: vehicle.id.clone(),
            start_date: format_date_input(Some(pickup)),
            end_date: format_date_input(Some(return_date)),
            pickup_location: self.pickup_location.key().to_string(),
            return_location: self.resolved_return_location().key().to_string(),
            extras: self.add_ons.iter().map(|a| a.key().to_string()).collect(),
            total_price: pricing.total,
            customer_name: normalize_string(&self.name),
            customer_email: normalize_string(&self.email),
            customer_phone: normalize_string(&self.phone),
            driver_license: normalize_string(&self.license),
            special_requests: non_empty(&self.special_requests),
        })
    }

    /// 選択をクリアしてカタログへ戻る
    ///
    /// 日付・オプション・要望をリセットする。連絡先は保持する。
    pub fn clear_selection(&mut self) -> Navigation {
        self.pickup_date = None;
        self.return_date = None;
        self.add_ons.clear();
        self.special_requests.clear();
        Navigation::go(Route::Cars)
    }
}
