use crate::features::contact::form::{ContactForm, ContactMessage};
use crate::shared::notifications::Notifier;

pub const MESSAGE_SENT: &str = "Message sent!";

/// お問い合わせ画面
///
/// 送信内容はログに記録するのみで、バックエンドには送らない
#[derive(Debug, Default)]
pub struct ContactPage {
    pub form: ContactForm,
    notifier: Notifier,
}

impl ContactPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// フォームを送信する
    ///
    /// 成功時は通知を積んでフォームを初期化する
    pub fn submit(&mut self) -> Option<ContactMessage> {
        match self.form.validate() {
            Ok(message) => {
                log::info!(
                    "お問い合わせを受け付けました: subject={:?}, priority={:?}",
                    message.subject,
                    message.priority
                );
                self.notifier.success(MESSAGE_SENT);
                self.form.reset();
                Some(message)
            }
            Err(e) => {
                self.notifier.error(e.user_message());
                None
            }
        }
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }
}
