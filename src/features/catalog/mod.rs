/// 車両カタログ（一覧・絞り込み・詳細・トップページ）
pub mod details;
pub mod filter;
pub mod home;
pub mod models;
pub mod page;
pub mod similar;

pub use details::*;
pub use filter::*;
pub use home::*;
pub use models::*;
pub use page::*;
pub use similar::*;
