/// 画面状態の共通部品
///
/// - `LoadState`: 読み込み中 / 表示可能 / 空 / 失敗 を区別する
/// - `MountGuard`: 画面が破棄された後に届いたレスポンスを破棄する
/// - `Route` / `Navigation`: 画面遷移の結果
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 非同期で読み込むデータの表示状態
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    /// まだ結果が届いていない
    Loading,
    /// 表示可能なデータがある
    Ready(T),
    /// 読み込みは成功したが表示対象がない
    Empty,
    /// 読み込みに失敗した（ユーザー向けメッセージ付き）
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Loading
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, LoadState::Empty)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }

    /// 表示可能なデータを参照する
    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> LoadState<Vec<T>> {
    /// 一覧データから状態を作る（空の一覧は`Empty`）
    pub fn from_list(items: Vec<T>) -> Self {
        if items.is_empty() {
            LoadState::Empty
        } else {
            LoadState::Ready(items)
        }
    }

    /// 表示中の一覧（読み込み中・空・失敗時は空スライス）
    pub fn items(&self) -> &[T] {
        match self {
            LoadState::Ready(items) => items,
            _ => &[],
        }
    }
}

/// 画面がまだ表示中かを示すフラグ
///
/// 非同期処理の開始時に`clone`しておき、結果の反映前に`is_mounted`を確認する
#[derive(Debug, Clone)]
pub struct MountGuard {
    mounted: Arc<AtomicBool>,
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl MountGuard {
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// 画面の破棄を通知する
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    /// 表示中の場合のみ結果を返す
    pub fn apply_if_mounted<T>(&self, value: T) -> Option<T> {
        if self.is_mounted() {
            Some(value)
        } else {
            log::debug!("画面破棄後のレスポンスを破棄しました");
            None
        }
    }
}

/// ストアフロントの画面
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", content = "param", rename_all = "kebab-case")]
pub enum Route {
    Home,
    Cars,
    CarDetails(String),
    Checkout,
    Login,
    Contact,
}

impl Route {
    /// ルートのパス表現
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Cars => "/cars".to_string(),
            Route::CarDetails(id) => format!("/car-details/{id}"),
            Route::Checkout => "/checkout".to_string(),
            Route::Login => "/login".to_string(),
            Route::Contact => "/contact".to_string(),
        }
    }
}

/// 画面遷移の指示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// 現在の画面に留まる
    Stay,
    /// 通常の遷移（`car_id`はチェックアウトへ渡すナビゲーション状態）
    Go { route: Route, car_id: Option<String> },
    /// 必要なデータが無いためのリダイレクト
    Redirect(Route),
}

impl Navigation {
    pub fn go(route: Route) -> Self {
        Navigation::Go {
            route,
            car_id: None,
        }
    }

    /// チェックアウトへ車両IDを渡して遷移する
    pub fn checkout_with(car_id: impl Into<String>) -> Self {
        Navigation::Go {
            route: Route::Checkout,
            car_id: Some(car_id.into()),
        }
    }

    /// 遷移先のルート（留まる場合はNone）
    pub fn route(&self) -> Option<&Route> {
        match self {
            Navigation::Stay => None,
            Navigation::Go { route, .. } => Some(route),
            Navigation::Redirect(route) => Some(route),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_state_from_list() {
        let empty: LoadState<Vec<u32>> = LoadState::from_list(vec![]);
        assert!(empty.is_empty());
        assert!(empty.items().is_empty());

        let ready = LoadState::from_list(vec![1, 2, 3]);
        assert_eq!(ready.items(), &[1, 2, 3]);
        assert!(!ready.is_loading());
    }

    #[test]
    fn test_load_state_default_is_loading() {
        let state: LoadState<Vec<u32>> = LoadState::default();
        assert!(state.is_loading());
        // 読み込み中と空は区別される
        assert_ne!(state, LoadState::Empty);
    }

    #[test]
    fn test_mount_guard() {
        let guard = MountGuard::new();
        let in_flight = guard.clone();

        assert_eq!(in_flight.apply_if_mounted(1), Some(1));

        guard.unmount();
        assert!(!in_flight.is_mounted());
        assert_eq!(in_flight.apply_if_mounted(2), None);
    }

    #[test]
    fn test_route_path() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::CarDetails("abc".to_string()).path(), "/car-details/abc");
        assert_eq!(Route::Checkout.path(), "/checkout");
    }

    #[test]
    fn test_navigation_route() {
        assert_eq!(Navigation::Stay.route(), None);
        assert_eq!(
            Navigation::checkout_with("7").route(),
            Some(&Route::Checkout)
        );
        assert_eq!(
            Navigation::Redirect(Route::Cars).route(),
            Some(&Route::Cars)
        );
    }
}
