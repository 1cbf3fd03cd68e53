/// 一時通知（トースト相当）
///
/// 各画面コントローラーは操作の成否をここに積み、UIシェルが`drain`して表示する。
use crate::shared::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 通知の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

/// 一件の通知
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// 通知キュー
#[derive(Debug, Default, Clone)]
pub struct Notifier {
    pending: Vec<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NotificationKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            NotificationKind::Error => log::warn!("エラー通知: {message}"),
            _ => log::debug!("通知: kind={kind:?}, message={message}"),
        }
        self.pending.push(Notification {
            kind,
            message,
            created_at: Utc::now(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Success, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Info, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Error, message);
    }

    /// エラーからユーザー向けメッセージを取り出して通知する
    ///
    /// # 引数
    /// * `fallback` - バックエンドの詳細を見せない場合の汎用メッセージ
    /// * `error` - 発生したエラー
    pub fn error_from(&mut self, fallback: &str, error: &AppError) {
        log::error!("{fallback}: {}", error.details());
        let message = match error {
            AppError::Validation(msg) | AppError::ExternalService(msg) => msg.clone(),
            _ => fallback.to_string(),
        };
        self.error(message);
    }

    /// 未表示の通知を確認する
    pub fn pending(&self) -> &[Notification] {
        &self.pending
    }

    /// 未表示の通知をすべて取り出す
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    /// 最後に積まれた通知
    pub fn last(&self) -> Option<&Notification> {
        self.pending.last()
    }
}
