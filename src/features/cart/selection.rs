/// 車両選択の受け渡しとローカルカート
///
/// カタログ・詳細画面で選んだ車両をチェックアウト画面へ渡すために、
/// `selectedCarId`/`selectedCarData`キーへ保存する。
/// 受け渡しはチェックアウト画面で車両を表示できた時点で削除する。
use crate::features::cart::models::LocalCartItem;
use crate::features::catalog::models::Vehicle;
use crate::shared::errors::AppResult;
use crate::shared::storage::{get_json, set_json, KeyValueStore, StorageKeys};
use std::sync::Arc;

#[derive(Clone)]
pub struct SelectionContext {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SelectionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionContext").finish_non_exhaustive()
    }
}

impl SelectionContext {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// 車両を選択してチェックアウトへの受け渡しを保存する
    pub fn select(&self, vehicle: &Vehicle) -> AppResult<()> {
        self.store.set(StorageKeys::SELECTED_CAR_ID, &vehicle.id)?;
        set_json(self.store.as_ref(), StorageKeys::SELECTED_CAR_DATA, vehicle)?;
        log::info!("車両を選択しました: car_id={}", vehicle.id);
        Ok(())
    }

    /// 選択中の車両ID（読み出しのみ）
    pub fn selected_id(&self) -> AppResult<Option<String>> {
        Ok(self
            .store
            .get(StorageKeys::SELECTED_CAR_ID)?
            .filter(|id| !id.is_empty()))
    }

    /// 選択時に保存した車両データ
    pub fn selected_snapshot(&self) -> AppResult<Option<Vehicle>> {
        get_json(self.store.as_ref(), StorageKeys::SELECTED_CAR_DATA)
    }

    /// 受け渡しを削除する
    pub fn clear_selection(&self) -> AppResult<()> {
        self.store.remove(StorageKeys::SELECTED_CAR_ID)?;
        self.store.remove(StorageKeys::SELECTED_CAR_DATA)?;
        log::debug!("車両選択をクリアしました");
        Ok(())
    }

    /// ローカルカートの内容
    pub fn cart_items(&self) -> AppResult<Vec<LocalCartItem>> {
        Ok(get_json(self.store.as_ref(), StorageKeys::LOCAL_CART)?.unwrap_or_default())
    }

    /// ローカルカートに追加する（既にある場合は何もしない）
    ///
    /// # 戻り値
    /// 新しく追加した場合はtrue
    pub fn add_to_cart(&self, car_id: &str) -> AppResult<bool> {
        let mut items = self.cart_items()?;
        if items.iter().any(|item| item.id == car_id) {
            log::debug!("カートに追加済みです: car_id={car_id}");
            return Ok(false);
        }

        items.push(LocalCartItem::new(car_id));
        set_json(self.store.as_ref(), StorageKeys::LOCAL_CART, &items)?;
        log::info!("カートに追加しました: car_id={car_id}, items={}", items.len());
        Ok(true)
    }
}
