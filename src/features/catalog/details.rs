use crate::features::api::StorefrontApi;
use crate::features::cart::selection::SelectionContext;
use crate::features::catalog::models::{CarQuery, Vehicle};
use crate::features::catalog::similar::{pick_similar, DEFAULT_SIMILAR_COUNT};
use crate::shared::notifications::Notifier;
use crate::shared::view_state::{LoadState, MountGuard, Navigation, Route};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use std::sync::Arc;

pub const CAR_DETAILS_FAILED: &str = "Failed to load car details";
pub const ADDED_TO_CART: &str = "Added to cart";
pub const SHARE_TEXT: &str = "Check out this car on RentaCar!";

/// 共有ダイアログに渡す内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

/// 車両詳細画面
pub struct CarDetailsPage {
    api: Arc<dyn StorefrontApi>,
    selection: SelectionContext,
    vehicle: LoadState<Vehicle>,
    similar: Vec<Vehicle>,
    rng: Box<dyn RngCore + Send>,
    notifier: Notifier,
    guard: MountGuard,
}

impl CarDetailsPage {
    pub fn new(api: Arc<dyn StorefrontApi>, selection: SelectionContext) -> Self {
        Self::with_rng(api, selection, Box::new(StdRng::from_entropy()))
    }

    /// 類似車両の補完に使う乱数生成器を指定して作成する
    pub fn with_rng(
        api: Arc<dyn StorefrontApi>,
        selection: SelectionContext,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        Self {
            api,
            selection,
            vehicle: LoadState::Loading,
            similar: Vec::new(),
            rng,
            notifier: Notifier::new(),
            guard: MountGuard::new(),
        }
    }

    /// 車両と全車両一覧を並行して読み込み、類似車両を選ぶ
    ///
    /// 一覧の取得だけが失敗した場合は類似車両なしで表示する
    pub async fn load(&mut self, car_id: &str) {
        self.vehicle = LoadState::Loading;
        self.similar.clear();

        let guard = self.guard.clone();
        let all_query = CarQuery::default();
        let (car_result, all_result) =
            tokio::join!(self.api.get_car(car_id), self.api.list_cars(&all_query));
        let Some((car_result, all_result)) = guard.apply_if_mounted((car_result, all_result))
        else {
            return;
        };

        let vehicle = match car_result {
            Ok(vehicle) => vehicle,
            Err(e) => {
                self.vehicle = LoadState::Failed(CAR_DETAILS_FAILED.to_string());
                self.notifier.error_from(CAR_DETAILS_FAILED, &e);
                return;
            }
        };

        let all = match all_result {
            Ok(page) => page.cars,
            Err(e) => {
                log::warn!("類似車両用の一覧取得に失敗しました: {e}");
                Vec::new()
            }
        };

        self.similar = pick_similar(
            &all,
            &vehicle.id,
            &vehicle.effective_category(),
            DEFAULT_SIMILAR_COUNT,
            &mut self.rng,
        );
        log::info!(
            "車両詳細を読み込みました: car_id={}, similar={}",
            vehicle.id,
            self.similar.len()
        );
        self.vehicle = LoadState::Ready(vehicle);
    }

    pub fn vehicle(&self) -> &LoadState<Vehicle> {
        &self.vehicle
    }

    pub fn similar(&self) -> &[Vehicle] {
        &self.similar
    }

    /// 「今すぐ予約」：車両IDを渡してチェックアウトへ進む
    pub fn rent_now(&self) -> Navigation {
        match self.vehicle.ready() {
            Some(vehicle) => Navigation::checkout_with(vehicle.id.clone()),
            None => Navigation::Stay,
        }
    }

    /// 「カートに追加」：ローカルカートへ追加し、チェックアウトへの受け渡しを保存する
    ///
    /// # 戻り値
    /// 新しく追加した場合はtrue
    pub fn add_to_cart(&mut self) -> bool {
        let Some(vehicle) = self.vehicle.ready().cloned() else {
            return false;
        };

        let result = self
            .selection
            .add_to_cart(&vehicle.id)
            .and_then(|added| self.selection.select(&vehicle).map(|_| added));

        match result {
            Ok(added) => {
                self.notifier.success(ADDED_TO_CART);
                added
            }
            Err(e) => {
                self.notifier.error_from("Could not add to cart", &e);
                false
            }
        }
    }

    /// 共有内容（車両未読み込みの場合はNone）
    ///
    /// # 引数
    /// * `page_url` - 現在の画面のURL
    pub fn share_payload(&self, page_url: &str) -> Option<SharePayload> {
        self.vehicle.ready().map(|vehicle| SharePayload {
            title: vehicle.name.clone(),
            text: SHARE_TEXT.to_string(),
            url: page_url.to_string(),
        })
    }

    pub fn back_to_cars(&self) -> Navigation {
        Navigation::go(Route::Cars)
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    /// 非同期処理中に画面を破棄するためのフラグ
    pub fn guard(&self) -> MountGuard {
        self.guard.clone()
    }

    pub fn unmount(&self) {
        self.guard.unmount();
    }
}
