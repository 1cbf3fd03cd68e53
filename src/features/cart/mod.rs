/// 車両選択の受け渡しとカート
pub mod models;
pub mod selection;
pub mod service;

pub use models::*;
pub use selection::*;
pub use service::*;
