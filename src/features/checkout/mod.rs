/// チェックアウト（予約フォームと料金計算）
pub mod form;
pub mod page;
pub mod pricing;

pub use form::*;
pub use page::*;
pub use pricing::*;
