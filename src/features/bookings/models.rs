use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 予約ステータス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    #[serde(other)]
    Unknown,
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

/// 予約データ（バックエンド定義の項目は`extra`に保持する）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 予約作成リクエスト
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub car: String,
    /// YYYY-MM-DD
    pub start_date: String,
    /// YYYY-MM-DD
    pub end_date: String,
    pub pickup_location: String,
    pub return_location: String,
    pub extras: Vec<String>,
    pub total_price: f64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub driver_license: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

/// ステータス更新リクエスト（`{status}`）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}
