/// 認証機能のモジュール
pub mod form;
pub mod models;
pub mod page;
pub mod password;
pub mod service;
pub mod session;

pub use form::*;
pub use models::*;
pub use page::*;
pub use password::*;
pub use service::*;
pub use session::*;
