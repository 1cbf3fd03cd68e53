/// 機能別モジュール
///
/// 各機能モジュールは、その機能に関連するコード（モデル、フォーム、サービス、画面）を含む。
/// 画面コントローラーは`api::StorefrontApi`越しにバックエンドと通信する。
pub mod api;
pub mod auth;
pub mod bookings;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod contact;
