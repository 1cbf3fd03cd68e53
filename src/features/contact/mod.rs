/// お問い合わせフォーム
pub mod form;
pub mod page;

pub use form::*;
pub use page::*;
