use crate::features::api::StorefrontApi;
use crate::features::auth::session::SessionContext;
use crate::features::bookings::models::Booking;
use crate::features::cart::selection::SelectionContext;
use crate::features::catalog::models::Vehicle;
use crate::features::checkout::form::{BookingSummary, CheckoutForm};
use crate::features::checkout::pricing::{CostLine, PricingResult};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::notifications::Notifier;
use crate::shared::view_state::{LoadState, MountGuard, Navigation, Route};
use std::sync::Arc;

pub const SELECT_CAR_FIRST: &str = "Please select a car first";
pub const CAR_LOAD_FAILED: &str = "Failed to load car details";
pub const BOOKING_FAILED: &str = "Failed to create booking";

/// チェックアウト画面
pub struct CheckoutPage {
    api: Arc<dyn StorefrontApi>,
    session: SessionContext,
    selection: SelectionContext,
    pub form: CheckoutForm,
    vehicle: LoadState<Vehicle>,
    last_booking: Option<Booking>,
    notifier: Notifier,
    guard: MountGuard,
}

impl CheckoutPage {
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        session: SessionContext,
        selection: SelectionContext,
    ) -> Self {
        Self {
            api,
            session,
            selection,
            form: CheckoutForm::new(),
            vehicle: LoadState::Loading,
            last_booking: None,
            notifier: Notifier::new(),
            guard: MountGuard::new(),
        }
    }

    /// 予約対象の車両を読み込む
    ///
    /// 車両IDは画面遷移で渡されたものを優先し、無ければ選択の受け渡しから取り出す。
    /// どちらも無い場合や取得に失敗した場合はカタログへ戻す。
    /// 通信できない場合は、受け渡し時に保存した同じ車両のデータがあればそれを表示する。
    ///
    /// # 引数
    /// * `navigation_car_id` - 「今すぐ予約」から渡された車両ID
    pub async fn load(&mut self, navigation_car_id: Option<String>) -> Navigation {
        self.vehicle = LoadState::Loading;

        let car_id = match navigation_car_id.filter(|id| !id.is_empty()) {
            Some(id) => Some(id),
            None => match self.selection.selected_id() {
                Ok(id) => id,
                Err(e) => {
                    log::warn!("車両選択の読み込みに失敗しました: {e}");
                    None
                }
            },
        };

        let Some(car_id) = car_id else {
            self.vehicle = LoadState::Empty;
            self.notifier.error(SELECT_CAR_FIRST);
            return Navigation::Redirect(Route::Cars);
        };

        let guard = self.guard.clone();
        let result = self.api.get_car(&car_id).await;
        let Some(result) = guard.apply_if_mounted(result) else {
            return Navigation::Stay;
        };

        match result {
            Ok(vehicle) => {
                log::info!("チェックアウト対象の車両を読み込みました: car_id={}", vehicle.id);
                if let Err(e) = self.selection.clear_selection() {
                    log::warn!("車両選択のクリアに失敗しました: {e}");
                }
                self.vehicle = LoadState::Ready(vehicle);
                Navigation::Stay
            }
            Err(e) => {
                if let Some(snapshot) = self.offline_snapshot(&car_id, &e) {
                    log::warn!(
                        "車両の取得に失敗したため保存済みのデータを表示します: car_id={car_id}, error={e}"
                    );
                    if let Err(e) = self.selection.clear_selection() {
                        log::warn!("車両選択のクリアに失敗しました: {e}");
                    }
                    self.vehicle = LoadState::Ready(snapshot);
                    return Navigation::Stay;
                }

                log::error!(
                    "チェックアウト対象の車両の取得に失敗しました: car_id={car_id}, error={e}"
                );
                self.vehicle = LoadState::Failed(CAR_LOAD_FAILED.to_string());
                self.notifier.error_from(CAR_LOAD_FAILED, &e);
                Navigation::Redirect(Route::Cars)
            }
        }
    }

    /// 通信エラー時に使える受け渡し済みの車両データ
    fn offline_snapshot(&self, car_id: &str, error: &AppError) -> Option<Vehicle> {
        if !matches!(error, AppError::Network(_)) {
            return None;
        }
        match self.selection.selected_snapshot() {
            Ok(snapshot) => snapshot.filter(|vehicle| vehicle.id == car_id),
            Err(e) => {
                log::warn!("保存済みの車両データを読み込めませんでした: {e}");
                None
            }
        }
    }

    pub fn vehicle(&self) -> &LoadState<Vehicle> {
        &self.vehicle
    }

    pub fn pricing(&self) -> PricingResult {
        self.form.pricing(self.vehicle.ready())
    }

    /// 予約サマリーの料金明細
    pub fn cost_breakdown(&self) -> Vec<CostLine> {
        self.pricing().breakdown(self.form.add_ons())
    }

    /// 予約サマリーの車両表示（"Toyota Camry" / "Select a Car"）
    pub fn car_heading(&self) -> String {
        match self.vehicle.ready() {
            Some(vehicle) => format!("{} {}", vehicle.brand, vehicle.model).trim().to_string(),
            None => "Select a Car".to_string(),
        }
    }

    /// 予約を送信する
    ///
    /// ログイン中の場合は予約APIへ登録する。未ログインの場合はサマリーのみ表示する。
    pub async fn submit(&mut self) -> AppResult<BookingSummary> {
        if let Err(e) = self.form.validate() {
            self.notifier.error(e.user_message());
            return Err(e);
        }

        let summary = self.form.summary(self.vehicle.ready());

        if let (Some(vehicle), true) = (self.vehicle.ready(), self.session.is_logged_in()) {
            let request = self.form.booking_request(vehicle)?;
            let guard = self.guard.clone();
            let result = self.api.create_booking(&request).await;
            if guard.apply_if_mounted(()).is_none() {
                return result.map(|_| summary);
            }

            match result {
                Ok(booking) => {
                    log::info!("予約を登録しました: booking_id={}", booking.id);
                    self.last_booking = Some(booking);
                }
                Err(e) => {
                    self.notifier.error_from(BOOKING_FAILED, &e);
                    return Err(e);
                }
            }
        }

        self.notifier.success(summary.message());
        Ok(summary)
    }

    /// 直近に登録した予約
    pub fn last_booking(&self) -> Option<&Booking> {
        self.last_booking.as_ref()
    }

    pub fn clear_selection(&mut self) -> Navigation {
        self.form.clear_selection()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::api::fake::{FakeStorefrontApi, PendingGate};
    use crate::features::auth::models::{AuthSession, UserProfile};
    use crate::features::catalog::models::{fixtures::vehicle, Category};
    use crate::features::checkout::pricing::AddOn;
    use crate::shared::notifications::NotificationKind;
    use crate::shared::storage::MemoryKeyValueStore;
    use chrono::NaiveDate;

    struct Harness {
        page: CheckoutPage,
        api: Arc<FakeStorefrontApi>,
        session: SessionContext,
        selection: SelectionContext,
    }

    fn harness(api: FakeStorefrontApi) -> Harness {
        let store = Arc::new(MemoryKeyValueStore::new());
        let api = Arc::new(api);
        let session = SessionContext::new(store.clone());
        let selection = SelectionContext::new(store);
        Harness {
            page: CheckoutPage::new(api.clone(), session.clone(), selection.clone()),
            api,
            session,
            selection,
        }
    }

    fn fleet() -> FakeStorefrontApi {
        FakeStorefrontApi::with_cars(vec![
            vehicle("c1", Category::Sedan, 45),
            vehicle("c2", Category::Suv, 80),
        ])
    }

    fn fill(form: &mut CheckoutForm) {
        form.name = "Jane Doe".to_string();
        form.email = "jane@example.com".to_string();
        form.phone = "555-0100".to_string();
        form.license = "D1234567".to_string();
        form.set_pickup_date(NaiveDate::from_ymd_opt(2024, 6, 1));
        form.set_return_date(NaiveDate::from_ymd_opt(2024, 6, 4));
        form.terms = true;
    }

    #[tokio::test]
    async fn test_load_from_navigation_state() {
        let mut h = harness(fleet());
        assert_eq!(h.page.load(Some("c2".to_string())).await, Navigation::Stay);
        assert_eq!(h.page.vehicle().ready().unwrap().id, "c2");
        assert_eq!(h.page.car_heading(), "Brand Model c2");
    }

    #[tokio::test]
    async fn test_load_from_selection_clears_handoff() {
        let mut h = harness(fleet());
        h.selection.select(&vehicle("c1", Category::Sedan, 45)).unwrap();

        assert_eq!(h.page.load(None).await, Navigation::Stay);
        assert_eq!(h.page.vehicle().ready().unwrap().id, "c1");
        assert_eq!(h.selection.selected_id().unwrap(), None);
    }

    #[tokio::test]
    async fn test_no_car_redirects_to_catalog() {
        let mut h = harness(fleet());
        assert_eq!(h.page.load(None).await, Navigation::Redirect(Route::Cars));

        let last = h.page.notifier_mut().last().unwrap();
        assert_eq!(last.kind, NotificationKind::Error);
        assert_eq!(last.message, SELECT_CAR_FIRST);
    }

    #[tokio::test]
    async fn test_fetch_failure_redirects() {
        let mut h = harness(fleet());
        assert_eq!(
            h.page.load(Some("missing".to_string())).await,
            Navigation::Redirect(Route::Cars)
        );
        assert!(h.page.vehicle().is_failed());
        assert_eq!(h.page.notifier_mut().last().unwrap().message, CAR_LOAD_FAILED);
    }

    #[tokio::test]
    async fn test_submit_without_terms_is_reported() {
        let mut h = harness(fleet());
        h.page.load(Some("c1".to_string())).await;
        fill(&mut h.page.form);
        h.page.form.terms = false;

        assert!(h.page.submit().await.is_err());
        assert_eq!(
            h.page.notifier_mut().last().unwrap().message,
            "Please agree to Terms & Privacy Policy"
        );
    }

    #[tokio::test]
    async fn test_submit_as_guest_does_not_post() {
        let mut h = harness(fleet());
        h.page.load(Some("c1".to_string())).await;
        fill(&mut h.page.form);
        h.page.form.toggle_add_on(AddOn::Insurance);

        let summary = h.page.submit().await.unwrap();
        assert_eq!(summary.total, 205.0);
        assert_eq!(h.page.cost_breakdown().len(), 3);
        assert!(h.api.bookings.lock().unwrap().is_empty());
        assert_eq!(
            h.page.notifier_mut().last().unwrap().kind,
            NotificationKind::Success
        );
    }

    #[tokio::test]
    async fn test_submit_when_logged_in_posts_booking() {
        let mut h = harness(fleet());
        h.session
            .save(&AuthSession {
                token: "jwt".to_string(),
                user: UserProfile::default(),
            })
            .unwrap();
        h.page.load(Some("c1".to_string())).await;
        fill(&mut h.page.form);

        let summary = h.page.submit().await.unwrap();
        assert_eq!(summary.days, 3);
        assert_eq!(h.page.last_booking().unwrap().id, "b1");
        assert_eq!(h.api.bookings.lock().unwrap()[0].car, "c1");
    }

    #[tokio::test]
    async fn test_booking_failure_is_reported() {
        let mut api = fleet();
        api.fail_bookings = true;
        let mut h = harness(api);
        h.session
            .save(&AuthSession {
                token: "jwt".to_string(),
                user: UserProfile::default(),
            })
            .unwrap();
        h.page.load(Some("c1".to_string())).await;
        fill(&mut h.page.form);

        assert!(h.page.submit().await.is_err());
        assert_eq!(
            h.page.notifier_mut().last().unwrap().message,
            "Car is not available"
        );
    }

    #[tokio::test]
    async fn test_network_failure_uses_handoff_snapshot() {
        let mut h = harness(FakeStorefrontApi {
            fail_cars: true,
            ..FakeStorefrontApi::default()
        });
        h.selection.select(&vehicle("c2", Category::Suv, 80)).unwrap();

        assert_eq!(h.page.load(None).await, Navigation::Stay);
        assert_eq!(h.page.vehicle().ready().unwrap().id, "c2");
        assert_eq!(h.selection.selected_snapshot().unwrap(), None);
        assert!(h.page.notifier_mut().last().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_not_used_for_other_car_or_missing_car() {
        // 通信エラーでも別の車両のデータは使わない
        let mut h = harness(FakeStorefrontApi {
            fail_cars: true,
            ..FakeStorefrontApi::default()
        });
        h.selection.select(&vehicle("c2", Category::Suv, 80)).unwrap();
        assert_eq!(
            h.page.load(Some("c1".to_string())).await,
            Navigation::Redirect(Route::Cars)
        );

        // 削除された車両は保存済みのデータがあっても表示しない
        let mut h = harness(fleet());
        h.selection.select(&vehicle("gone", Category::Suv, 80)).unwrap();
        assert_eq!(h.page.load(None).await, Navigation::Redirect(Route::Cars));
        assert!(h.page.vehicle().is_failed());
    }

    #[tokio::test]
    async fn test_unmount_while_loading_discards_response() {
        let gate = PendingGate::new();
        let mut h = harness(fleet().with_gate(gate.clone()));
        let guard = h.page.guard();

        let (navigation, _) = tokio::join!(h.page.load(Some("c1".to_string())), async {
            gate.wait_for_request().await;
            guard.unmount();
            gate.release();
        });

        assert_eq!(navigation, Navigation::Stay);
        assert!(h.page.vehicle().is_loading());
    }
}
