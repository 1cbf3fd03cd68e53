use crate::features::api::StorefrontApi;
use crate::features::catalog::models::{CarQuery, Category, Vehicle};
use crate::shared::notifications::Notifier;
use crate::shared::view_state::{LoadState, MountGuard, Navigation, Route};
use std::sync::Arc;
use std::time::Duration;

/// トップページに表示する台数
pub const FEATURED_LIMIT: usize = 8;

/// ヒーロースライダーの自動切り替え間隔
pub const HERO_SLIDE_INTERVAL: Duration = Duration::from_secs(5);

pub const FEATURED_LOAD_FAILED: &str = "Failed to load featured cars";
pub const CATEGORY_FILTER_FAILED: &str = "Failed to filter cars";

/// トップページのカテゴリータブ
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryTab {
    /// おすすめ車両
    #[default]
    All,
    Category(Category),
}

impl CategoryTab {
    /// タブ文字列（"all" / カテゴリー名）から作成する
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().eq_ignore_ascii_case("all") {
            CategoryTab::All
        } else {
            CategoryTab::Category(Category::normalize(tag))
        }
    }
}

/// トップページ
pub struct HomePage {
    api: Arc<dyn StorefrontApi>,
    active_tab: CategoryTab,
    featured: LoadState<Vec<Vehicle>>,
    slide_count: usize,
    current_slide: usize,
    notifier: Notifier,
    guard: MountGuard,
}

impl HomePage {
    /// # 引数
    /// * `api` - ストアフロントAPI
    /// * `slide_count` - ヒーロースライドの枚数
    pub fn new(api: Arc<dyn StorefrontApi>, slide_count: usize) -> Self {
        Self {
            api,
            active_tab: CategoryTab::All,
            featured: LoadState::Loading,
            slide_count,
            current_slide: 0,
            notifier: Notifier::new(),
            guard: MountGuard::new(),
        }
    }

    /// おすすめ車両を読み込む
    pub async fn load(&mut self) {
        self.select_tab(CategoryTab::All).await;
    }

    /// カテゴリータブを切り替えて車両を読み込む
    pub async fn select_tab(&mut self, tab: CategoryTab) {
        self.active_tab = tab.clone();
        self.featured = LoadState::Loading;

        let guard = self.guard.clone();
        let (result, failure) = match &tab {
            CategoryTab::All => (self.api.featured_cars().await, FEATURED_LOAD_FAILED),
            CategoryTab::Category(category) => (
                self.api
                    .list_cars(&CarQuery::by_category(category.clone()))
                    .await
                    .map(|page| page.cars),
                CATEGORY_FILTER_FAILED,
            ),
        };
        let Some(result) = guard.apply_if_mounted(result) else {
            return;
        };

        match result {
            Ok(cars) => {
                let cars: Vec<Vehicle> = cars.into_iter().take(FEATURED_LIMIT).collect();
                log::info!("トップページの車両を読み込みました: tab={tab:?}, count={}", cars.len());
                self.featured = LoadState::from_list(cars);
            }
            Err(e) => {
                log::error!("トップページの車両読み込みに失敗しました: {e}");
                self.featured = LoadState::Failed(failure.to_string());
                self.notifier.error(failure);
            }
        }
    }

    pub fn active_tab(&self) -> &CategoryTab {
        &self.active_tab
    }

    pub fn featured(&self) -> &LoadState<Vec<Vehicle>> {
        &self.featured
    }

    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    /// 次のスライドへ進む（最後のスライドの次は先頭）
    pub fn advance_slide(&mut self) {
        if self.slide_count > 0 {
            self.current_slide = (self.current_slide + 1) % self.slide_count;
        }
    }

    pub fn go_to_slide(&mut self, index: usize) {
        if index < self.slide_count {
            self.current_slide = index;
        }
    }

    pub fn view_details(&self, car_id: &str) -> Navigation {
        Navigation::go(Route::CarDetails(car_id.to_string()))
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    pub fn guard(&self) -> MountGuard {
        self.guard.clone()
    }

    pub fn unmount(&self) {
        self.guard.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::api::fake::{FakeStorefrontApi, PendingGate};
    use crate::features::catalog::models::fixtures::vehicle;

    fn fleet(count: usize) -> Vec<Vehicle> {
        (0..count)
            .map(|i| {
                let category = if i % 2 == 0 { Category::Suv } else { Category::Luxury };
                vehicle(&i.to_string(), category, 60)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_featured_limited_to_eight() {
        let mut page = HomePage::new(Arc::new(FakeStorefrontApi::with_cars(fleet(12))), 3);
        page.load().await;
        assert_eq!(page.featured().items().len(), FEATURED_LIMIT);
        assert_eq!(page.active_tab(), &CategoryTab::All);
    }

    #[tokio::test]
    async fn test_category_tab_queries_backend() {
        let api = Arc::new(FakeStorefrontApi::with_cars(fleet(6)));
        let mut page = HomePage::new(api.clone(), 3);

        page.select_tab(CategoryTab::from_tag("suv")).await;
        assert_eq!(page.featured().items().len(), 3);
        assert!(page
            .featured()
            .items()
            .iter()
            .all(|v| v.category == Category::Suv));

        let queries = api.car_queries.lock().unwrap();
        assert_eq!(queries[0].category, Some(Category::Suv));
    }

    #[tokio::test]
    async fn test_featured_failure() {
        let mut page = HomePage::new(
            Arc::new(FakeStorefrontApi {
                fail_cars: true,
                ..FakeStorefrontApi::default()
            }),
            3,
        );
        page.load().await;

        assert!(page.featured().is_failed());
        assert!(page.featured().items().is_empty());
        assert_eq!(
            page.notifier_mut().last().unwrap().message,
            FEATURED_LOAD_FAILED
        );

        page.select_tab(CategoryTab::from_tag("luxury")).await;
        assert_eq!(
            page.notifier_mut().last().unwrap().message,
            CATEGORY_FILTER_FAILED
        );
    }

    #[test]
    fn test_hero_slider() {
        let mut page = HomePage::new(Arc::new(FakeStorefrontApi::default()), 3);
        page.advance_slide();
        page.advance_slide();
        assert_eq!(page.current_slide(), 2);
        page.advance_slide();
        assert_eq!(page.current_slide(), 0);

        page.go_to_slide(1);
        assert_eq!(page.current_slide(), 1);
        page.go_to_slide(7);
        assert_eq!(page.current_slide(), 1);
    }

    #[test]
    fn test_category_tab_from_tag() {
        assert_eq!(CategoryTab::from_tag("All"), CategoryTab::All);
        assert_eq!(
            CategoryTab::from_tag("electric"),
            CategoryTab::Category(Category::Electric)
        );
    }

    #[tokio::test]
    async fn test_select_tab_resets_to_loading() {
        let mut page = HomePage::new(Arc::new(FakeStorefrontApi::with_cars(fleet(4))), 3);
        page.load().await;
        assert_eq!(page.featured().items().len(), 4);

        // 応答を破棄しても前のタブの車両は残らない
        page.unmount();
        page.select_tab(CategoryTab::from_tag("suv")).await;
        assert!(page.featured().is_loading());
        assert_eq!(page.active_tab(), &CategoryTab::from_tag("suv"));
    }

    #[tokio::test]
    async fn test_unmount_while_loading_discards_response() {
        let gate = PendingGate::new();
        let api = FakeStorefrontApi::with_cars(fleet(4)).with_gate(gate.clone());
        let mut page = HomePage::new(Arc::new(api), 3);
        let guard = page.guard();

        tokio::join!(page.load(), async {
            gate.wait_for_request().await;
            guard.unmount();
            gate.release();
        });

        assert!(page.featured().is_loading());
    }
}
