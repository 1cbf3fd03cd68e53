/// ストアフロントのREST API
///
/// 画面コントローラーは`StorefrontApi`トレイト越しにバックエンドを呼び出す。
/// 本番では`HttpStorefrontApi`、テストではメモリ上のフェイクを使う。
use crate::features::auth::models::{
    AuthResponse, LoginRequest, ProfileResponse, ProfileUpdate, RegisterRequest, UserProfile,
};
use crate::features::auth::session::SessionContext;
use crate::features::bookings::models::{
    Booking, BookingRequest, BookingStatus, BookingStatusUpdate,
};
use crate::features::cart::models::CartItemRequest;
use crate::features::catalog::models::{CarQuery, CarsPage, CarsResponse, Vehicle};
use crate::shared::api_client::ApiClient;
use crate::shared::errors::AppResult;
use serde_json::Value;

#[cfg(test)]
pub(crate) mod fake;

#[async_trait::async_trait]
pub trait StorefrontApi: Send + Sync {
    /// 車両一覧（`GET /cars`）
    async fn list_cars(&self, query: &CarQuery) -> AppResult<CarsPage>;

    /// 車両詳細（`GET /cars/:id`）
    async fn get_car(&self, id: &str) -> AppResult<Vehicle>;

    /// おすすめ車両（`GET /cars/featured`）
    async fn featured_cars(&self) -> AppResult<Vec<Vehicle>>;

    async fn login(&self, request: &LoginRequest) -> AppResult<AuthResponse>;

    async fn register(&self, request: &RegisterRequest) -> AppResult<AuthResponse>;

    async fn get_profile(&self) -> AppResult<UserProfile>;

    async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<ProfileResponse>;

    /// カート（レスポンスの形はバックエンド定義）
    async fn get_cart(&self) -> AppResult<Value>;

    async fn add_to_cart(&self, item: &CartItemRequest) -> AppResult<Value>;

    async fn remove_from_cart(&self, car_id: &str) -> AppResult<Value>;

    async fn clear_cart(&self) -> AppResult<Value>;

    async fn create_booking(&self, request: &BookingRequest) -> AppResult<Booking>;

    async fn list_bookings(&self) -> AppResult<Vec<Booking>>;

    async fn get_booking(&self, id: &str) -> AppResult<Booking>;

    async fn update_booking_status(&self, id: &str, status: BookingStatus) -> AppResult<Booking>;
}

/// HTTP経由の実装
///
/// セッションにトークンがあればBearerトークンとして付与する
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    client: ApiClient,
    session: SessionContext,
}

impl HttpStorefrontApi {
    pub fn new(client: ApiClient, session: SessionContext) -> Self {
        Self { client, session }
    }

    fn token(&self) -> AppResult<Option<String>> {
        self.session.token()
    }
}

/// パスに埋め込むIDをエンコードする
fn path_id(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[async_trait::async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn list_cars(&self, query: &CarQuery) -> AppResult<CarsPage> {
        let token = self.token()?;
        let response: CarsResponse = self
            .client
            .get("/cars", &query.to_query_pairs(), token.as_deref())
            .await?;
        Ok(response.into())
    }

    async fn get_car(&self, id: &str) -> AppResult<Vehicle> {
        let token = self.token()?;
        self.client
            .get(&format!("/cars/{}", path_id(id)), &[], token.as_deref())
            .await
    }

    async fn featured_cars(&self) -> AppResult<Vec<Vehicle>> {
        let token = self.token()?;
        let response: CarsResponse = self
            .client
            .get("/cars/featured", &[], token.as_deref())
            .await?;
        Ok(CarsPage::from(response).cars)
    }

    async fn login(&self, request: &LoginRequest) -> AppResult<AuthResponse> {
        self.client.post("/auth/login", request, None).await
    }

    async fn register(&self, request: &RegisterRequest) -> AppResult<AuthResponse> {
        self.client.post("/auth/register", request, None).await
    }

    async fn get_profile(&self) -> AppResult<UserProfile> {
        let token = self.token()?;
        self.client.get("/auth/profile", &[], token.as_deref()).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<ProfileResponse> {
        let token = self.token()?;
        self.client
            .put("/auth/profile", update, token.as_deref())
            .await
    }

    async fn get_cart(&self) -> AppResult<Value> {
        let token = self.token()?;
        self.client.get("/cart", &[], token.as_deref()).await
    }

    async fn add_to_cart(&self, item: &CartItemRequest) -> AppResult<Value> {
        let token = self.token()?;
        self.client.post("/cart", item, token.as_deref()).await
    }

    async fn remove_from_cart(&self, car_id: &str) -> AppResult<Value> {
        let token = self.token()?;
        self.client
            .delete(&format!("/cart/{}", path_id(car_id)), token.as_deref())
            .await
    }

    async fn clear_cart(&self) -> AppResult<Value> {
        let token = self.token()?;
        self.client.delete("/cart", token.as_deref()).await
    }

    async fn create_booking(&self, request: &BookingRequest) -> AppResult<Booking> {
        let token = self.token()?;
        self.client.post("/bookings", request, token.as_deref()).await
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        let token = self.token()?;
        self.client.get("/bookings", &[], token.as_deref()).await
    }

    async fn get_booking(&self, id: &str) -> AppResult<Booking> {
        let token = self.token()?;
        self.client
            .get(&format!("/bookings/{}", path_id(id)), &[], token.as_deref())
            .await
    }

    async fn update_booking_status(&self, id: &str, status: BookingStatus) -> AppResult<Booking> {
        let token = self.token()?;
        self.client
            .put(
                &format!("/bookings/{}", path_id(id)),
                &BookingStatusUpdate { status },
                token.as_deref(),
            )
            .await
    }
}
