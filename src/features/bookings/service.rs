/// 予約サービス
///
/// 予約APIはログインが必要なため、未ログインの場合は呼び出し前にエラーにする
use crate::features::api::StorefrontApi;
use crate::features::auth::session::SessionContext;
use crate::features::bookings::models::{Booking, BookingRequest, BookingStatus};
use crate::shared::errors::{AppError, AppResult};
use std::sync::Arc;

#[derive(Clone)]
pub struct BookingService {
    api: Arc<dyn StorefrontApi>,
    session: SessionContext,
}

impl BookingService {
    pub fn new(api: Arc<dyn StorefrontApi>, session: SessionContext) -> Self {
        Self { api, session }
    }

    fn require_login(&self) -> AppResult<()> {
        if self.session.is_logged_in() {
            Ok(())
        } else {
            Err(AppError::validation("Please log in to manage your bookings"))
        }
    }

    pub async fn create(&self, request: &BookingRequest) -> AppResult<Booking> {
        self.require_login()?;
        let booking = self.api.create_booking(request).await?;
        log::info!("予約を作成しました: booking_id={}, car={}", booking.id, request.car);
        Ok(booking)
    }

    /// ログイン中のユーザーの予約一覧
    pub async fn list(&self) -> AppResult<Vec<Booking>> {
        self.require_login()?;
        let bookings = self.api.list_bookings().await?;
        log::debug!("予約一覧を取得しました: count={}", bookings.len());
        Ok(bookings)
    }

    pub async fn get(&self, id: &str) -> AppResult<Booking> {
        self.require_login()?;
        self.api.get_booking(id).await
    }

    pub async fn update_status(&self, id: &str, status: BookingStatus) -> AppResult<Booking> {
        self.require_login()?;
        if status == BookingStatus::Unknown {
            return Err(AppError::validation("Unsupported booking status"));
        }
        let booking = self.api.update_booking_status(id, status).await?;
        log::info!("予約ステータスを更新しました: booking_id={id}, status={:?}", booking.status);
        Ok(booking)
    }
}
