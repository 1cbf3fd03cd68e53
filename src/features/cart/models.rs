use serde::{Deserialize, Serialize};

/// ローカルカートの1行（`rentacar_cart`に保存する）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCartItem {
    pub id: String,
    pub qty: u32,
}

impl LocalCartItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), qty: 1 }
    }
}

/// カートAPIへの追加リクエスト
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub car_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl CartItemRequest {
    pub fn for_car(car_id: impl Into<String>) -> Self {
        Self {
            car_id: car_id.into(),
            start_date: None,
            end_date: None,
        }
    }
}
