// 機能モジュールと共有モジュール
pub mod features;
pub mod shared;

use features::api::{HttpStorefrontApi, StorefrontApi};
use features::auth::{AuthPage, AuthService, SessionContext};
use features::bookings::BookingService;
use features::cart::{CartService, SelectionContext};
use features::catalog::{CarDetailsPage, CatalogPage, HomePage};
use features::checkout::CheckoutPage;
use features::contact::ContactPage;
use log::info;
use shared::api_client::{ApiClient, ApiClientConfig};
use shared::config::{initialize_application, log_initialization_complete};
use shared::errors::AppResult;
use shared::storage::{FileKeyValueStore, KeyValueStore};
use std::sync::Arc;

/// トップページのヒーロースライド枚数
const HERO_SLIDE_COUNT: usize = 3;

/// ストアフロントのアプリケーション状態
///
/// APIクライアントとローカルストアを一度だけ作成し、各画面コントローラーに共有する
#[derive(Clone)]
pub struct Storefront {
    api: Arc<dyn StorefrontApi>,
    session: SessionContext,
    selection: SelectionContext,
}

impl Storefront {
    /// 環境変数・ログ・ローカルストアを初期化してアプリケーション状態を作成する
    pub fn initialize() -> AppResult<Self> {
        let result = initialize_application()?;

        let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::open(&result.store_path)?);
        let session = SessionContext::new(store.clone());
        let client = ApiClient::new_with_config(ApiClientConfig::from(result.api_config.clone()))?;
        let api: Arc<dyn StorefrontApi> = Arc::new(HttpStorefrontApi::new(client, session.clone()));

        log_initialization_complete(&result);
        info!("ストアフロントを初期化しました");

        Ok(Self::from_parts(api, store))
    }

    /// APIとストアを指定して作成する
    pub fn from_parts(api: Arc<dyn StorefrontApi>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            api,
            session: SessionContext::new(store.clone()),
            selection: SelectionContext::new(store),
        }
    }

    pub fn api(&self) -> Arc<dyn StorefrontApi> {
        self.api.clone()
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn selection(&self) -> &SelectionContext {
        &self.selection
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.session.clone())
    }

    pub fn booking_service(&self) -> BookingService {
        BookingService::new(self.api.clone(), self.session.clone())
    }

    pub fn cart_service(&self) -> CartService {
        CartService::new(self.api.clone(), self.session.clone())
    }

    pub fn home_page(&self) -> HomePage {
        HomePage::new(self.api.clone(), HERO_SLIDE_COUNT)
    }

    pub fn catalog_page(&self) -> CatalogPage {
        CatalogPage::new(self.api.clone(), self.selection.clone())
    }

    pub fn car_details_page(&self) -> CarDetailsPage {
        CarDetailsPage::new(self.api.clone(), self.selection.clone())
    }

    pub fn checkout_page(&self) -> CheckoutPage {
        CheckoutPage::new(self.api.clone(), self.session.clone(), self.selection.clone())
    }

    pub fn auth_page(&self) -> AuthPage {
        AuthPage::new(self.auth_service())
    }

    pub fn contact_page(&self) -> ContactPage {
        ContactPage::new()
    }
}
