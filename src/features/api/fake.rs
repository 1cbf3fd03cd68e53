use super::StorefrontApi;
use crate::features::auth::models::{
    AuthResponse, LoginRequest, ProfileResponse, ProfileUpdate, RegisterRequest, UserProfile,
};
use crate::features::bookings::models::{Booking, BookingRequest, BookingStatus};
use crate::features::cart::models::CartItemRequest;
use crate::features::catalog::models::{CarQuery, CarsPage, Vehicle};
use crate::shared::errors::{AppError, AppResult};
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};

/// 応答を保留するゲート
///
/// 車両取得と予約作成は`release`が呼ばれるまで応答を返さない
pub(crate) struct PendingGate {
    arrived: Notify,
    released: Semaphore,
}

impl PendingGate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            arrived: Notify::new(),
            released: Semaphore::new(0),
        })
    }

    /// リクエストが届くまで待つ
    pub async fn wait_for_request(&self) {
        self.arrived.notified().await;
    }

    /// 保留中・以降のリクエストに応答させる
    pub fn release(&self) {
        self.released.add_permits(64);
    }

    async fn pass(&self) {
        self.arrived.notify_one();
        let _ = self.released.acquire().await;
    }
}

/// テスト用のメモリ上のバックエンド
#[derive(Default)]
pub(crate) struct FakeStorefrontApi {
    pub cars: Vec<Vehicle>,
    pub featured: Vec<Vehicle>,
    /// 車両取得系をすべて失敗させる
    pub fail_cars: bool,
    /// 認証系を失敗させる（メッセージ付き）
    pub auth_error: Option<String>,
    pub fail_bookings: bool,
    pub logins: Mutex<Vec<LoginRequest>>,
    pub registrations: Mutex<Vec<RegisterRequest>>,
    pub bookings: Mutex<Vec<BookingRequest>>,
    pub car_queries: Mutex<Vec<CarQuery>>,
    pub gate: Option<Arc<PendingGate>>,
}

impl FakeStorefrontApi {
    pub fn with_cars(cars: Vec<Vehicle>) -> Self {
        Self {
            featured: cars.clone(),
            cars,
            ..Self::default()
        }
    }

    /// 保留ゲートがあれば解放まで待つ
    pub fn with_gate(mut self, gate: Arc<PendingGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
    }

    fn check_cars(&self) -> AppResult<()> {
        if self.fail_cars {
            return Err(AppError::network("connection refused"));
        }
        Ok(())
    }

    fn auth_response(&self, name: &str, email: &str) -> AppResult<AuthResponse> {
        if let Some(message) = &self.auth_error {
            return Err(AppError::ExternalService(message.clone()));
        }
        Ok(AuthResponse {
            token: "fake-token".to_string(),
            user: UserProfile {
                id: "u1".to_string(),
                name: name.to_string(),
                email: email.to_string(),
                phone: None,
                extra: Map::new(),
            },
        })
    }
}

#[async_trait::async_trait]
impl StorefrontApi for FakeStorefrontApi {
    async fn list_cars(&self, query: &CarQuery) -> AppResult<CarsPage> {
        self.wait_gate().await;
        self.check_cars()?;
        if let Ok(mut queries) = self.car_queries.lock() {
            queries.push(query.clone());
        }

        let cars: Vec<Vehicle> = self
            .cars
            .iter()
            .filter(|car| match &query.category {
                Some(category) => &car.effective_category() == category,
                None => true,
            })
            .cloned()
            .collect();

        Ok(CarsPage {
            total: cars.len() as u64,
            cars,
            current_page: 1,
            total_pages: 1,
        })
    }

    async fn get_car(&self, id: &str) -> AppResult<Vehicle> {
        self.wait_gate().await;
        self.check_cars()?;
        self.cars
            .iter()
            .find(|car| car.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))
    }

    async fn featured_cars(&self) -> AppResult<Vec<Vehicle>> {
        self.wait_gate().await;
        self.check_cars()?;
        Ok(self.featured.clone())
    }

    async fn login(&self, request: &LoginRequest) -> AppResult<AuthResponse> {
        if let Ok(mut logins) = self.logins.lock() {
            logins.push(request.clone());
        }
        self.auth_response("Jane Doe", &request.email)
    }

    async fn register(&self, request: &RegisterRequest) -> AppResult<AuthResponse> {
        if let Ok(mut registrations) = self.registrations.lock() {
            registrations.push(request.clone());
        }
        self.auth_response(&request.name, &request.email)
    }

    async fn get_profile(&self) -> AppResult<UserProfile> {
        Ok(self.auth_response("Jane Doe", "jane@example.com")?.user)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<ProfileResponse> {
        let mut user = self.auth_response("Jane Doe", "jane@example.com")?.user;
        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(phone) = &update.phone {
            user.phone = Some(phone.clone());
        }
        Ok(ProfileResponse {
            token: Some("refreshed-token".to_string()),
            user,
        })
    }

    async fn get_cart(&self) -> AppResult<Value> {
        Ok(json!({ "items": [] }))
    }

    async fn add_to_cart(&self, item: &CartItemRequest) -> AppResult<Value> {
        Ok(json!({ "items": [{ "car": item.car_id }] }))
    }

    async fn remove_from_cart(&self, _car_id: &str) -> AppResult<Value> {
        Ok(json!({ "items": [] }))
    }

    async fn clear_cart(&self) -> AppResult<Value> {
        Ok(json!({ "message": "Cart cleared" }))
    }

    async fn create_booking(&self, request: &BookingRequest) -> AppResult<Booking> {
        self.wait_gate().await;
        if self.fail_bookings {
            return Err(AppError::ExternalService("Car is not available".to_string()));
        }
        let mut bookings = self
            .bookings
            .lock()
            .map_err(|e| AppError::storage(e.to_string()))?;
        bookings.push(request.clone());

        Ok(Booking {
            id: format!("b{}", bookings.len()),
            status: BookingStatus::Pending,
            total_price: Some(request.total_price),
            extra: Map::new(),
        })
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        let bookings = self
            .bookings
            .lock()
            .map_err(|e| AppError::storage(e.to_string()))?;
        Ok(bookings
            .iter()
            .enumerate()
            .map(|(i, request)| Booking {
                id: format!("b{}", i + 1),
                status: BookingStatus::Pending,
                total_price: Some(request.total_price),
                extra: Map::new(),
            })
            .collect())
    }

    async fn get_booking(&self, id: &str) -> AppResult<Booking> {
        self.list_bookings()
            .await?
            .into_iter()
            .find(|booking| booking.id == id)
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
    }

    async fn update_booking_status(&self, id: &str, status: BookingStatus) -> AppResult<Booking> {
        let mut booking = self.get_booking(id).await?;
        booking.status = status;
        Ok(booking)
    }
}
