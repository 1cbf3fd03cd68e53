use crate::features::api::StorefrontApi;
use crate::features::cart::selection::SelectionContext;
use crate::features::catalog::filter::{filter_vehicles, FilterSelection, PriceRange};
use crate::features::catalog::models::{CarQuery, Category, Vehicle};
use crate::shared::notifications::Notifier;
use crate::shared::view_state::{LoadState, MountGuard, Navigation, Route};
use std::sync::Arc;

pub const CARS_LOAD_FAILED: &str = "Failed to load cars. Please try again.";

/// カタログ画面
///
/// 全車両を一度だけ取得し、絞り込みは手元で行う
pub struct CatalogPage {
    api: Arc<dyn StorefrontApi>,
    selection: SelectionContext,
    vehicles: LoadState<Vec<Vehicle>>,
    filters: FilterSelection,
    notifier: Notifier,
    guard: MountGuard,
}

impl CatalogPage {
    pub fn new(api: Arc<dyn StorefrontApi>, selection: SelectionContext) -> Self {
        Self {
            api,
            selection,
            vehicles: LoadState::Loading,
            filters: FilterSelection::new(),
            notifier: Notifier::new(),
            guard: MountGuard::new(),
        }
    }

    /// 車両一覧を読み込む
    pub async fn load(&mut self) {
        self.vehicles = LoadState::Loading;

        let guard = self.guard.clone();
        let result = self.api.list_cars(&CarQuery::default()).await;
        let Some(result) = guard.apply_if_mounted(result) else {
            return;
        };

        match result {
            Ok(page) => {
                log::info!("車両一覧を読み込みました: count={}", page.cars.len());
                self.vehicles = LoadState::from_list(page.cars);
            }
            Err(e) => {
                log::error!("車両一覧の読み込みに失敗しました: {e}");
                self.vehicles = LoadState::Failed(CARS_LOAD_FAILED.to_string());
                self.notifier.error(CARS_LOAD_FAILED);
            }
        }
    }

    /// 読み込んだ全車両の状態
    pub fn all(&self) -> &LoadState<Vec<Vehicle>> {
        &self.vehicles
    }

    /// 絞り込み後の表示状態
    ///
    /// 読み込み中・失敗はそのまま返し、絞り込み結果が0件の場合は`Empty`
    pub fn visible(&self) -> LoadState<Vec<Vehicle>> {
        match &self.vehicles {
            LoadState::Ready(all) => LoadState::from_list(filter_vehicles(all, &self.filters)),
            LoadState::Loading => LoadState::Loading,
            LoadState::Empty => LoadState::Empty,
            LoadState::Failed(message) => LoadState::Failed(message.clone()),
        }
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn toggle_price(&mut self, range: PriceRange) -> bool {
        self.filters.toggle_price(range)
    }

    pub fn toggle_category(&mut self, category: Category) -> bool {
        self.filters.toggle_category(category)
    }

    pub fn reset_filters(&mut self) {
        self.filters.reset();
    }

    /// 車両を選択してチェックアウトへ進む
    pub fn add_to_cart(&mut self, vehicle: &Vehicle) -> Navigation {
        match self.selection.select(vehicle) {
            Ok(()) => Navigation::go(Route::Checkout),
            Err(e) => {
                self.notifier.error_from("Could not save your selection", &e);
                Navigation::Stay
            }
        }
    }

    /// 詳細画面へ進む
    pub fn view_details(&self, car_id: &str) -> Navigation {
        Navigation::go(Route::CarDetails(car_id.to_string()))
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
