/// カートAPIサービス（ログイン中のサーバー側カート）
use crate::features::api::StorefrontApi;
use crate::features::auth::session::SessionContext;
use crate::features::cart::models::CartItemRequest;
use crate::shared::errors::{AppError, AppResult};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct CartService {
    api: Arc<dyn StorefrontApi>,
    session: SessionContext,
}

impl CartService {
    pub fn new(api: Arc<dyn StorefrontApi>, session: SessionContext) -> Self {
        Self { api, session }
    }

    fn require_login(&self) -> AppResult<()> {
        if self.session.is_logged_in() {
            Ok(())
        } else {
            Err(AppError::validation("Please log in to use your cart"))
        }
    }

    pub async fn get(&self) -> AppResult<Value> {
        self.require_login()?;
        self.api.get_cart().await
    }

    pub async fn add(&self, item: &CartItemRequest) -> AppResult<Value> {
        self.require_login()?;
        let cart = self.api.add_to_cart(item).await?;
        log::info!("サーバー側カートに追加しました: car_id={}", item.car_id);
        Ok(cart)
    }

    pub async fn remove(&self, car_id: &str) -> AppResult<Value> {
        self.require_login()?;
        let cart = self.api.remove_from_cart(car_id).await?;
        log::info!("サーバー側カートから削除しました: car_id={car_id}");
        Ok(cart)
    }

    pub async fn clear(&self) -> AppResult<Value> {
        self.require_login()?;
        self.api.clear_cart().await
    }
}
