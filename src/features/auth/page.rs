use crate::features::auth::form::{LoginForm, SignupForm};
use crate::features::auth::service::AuthService;
use crate::shared::notifications::Notifier;
use crate::shared::view_state::{MountGuard, Navigation, Route};

/// 認証失敗時の汎用メッセージ
pub const AUTH_FAILED: &str = "Authentication failed";

/// ログイン画面のタブ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthTab {
    #[default]
    Login,
    Signup,
}

/// ログイン・会員登録画面
pub struct AuthPage {
    service: AuthService,
    pub active_tab: AuthTab,
    pub login_form: LoginForm,
    pub signup_form: SignupForm,
    loading: bool,
    notifier: Notifier,
    guard: MountGuard,
}

impl AuthPage {
    pub fn new(service: AuthService) -> Self {
        Self {
            service,
            active_tab: AuthTab::default(),
            login_form: LoginForm::default(),
            signup_form: SignupForm::default(),
            loading: false,
            notifier: Notifier::new(),
            guard: MountGuard::new(),
        }
    }

    pub fn switch_tab(&mut self, tab: AuthTab) {
        self.active_tab = tab;
    }

    /// 送信中かどうか（送信ボタンの無効化に使う）
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// 現在のタブで送信ボタンを押せるか
    pub fn can_submit(&self) -> bool {
        if self.loading {
            return false;
        }
        match self.active_tab {
            AuthTab::Login => true,
            AuthTab::Signup => self.signup_form.can_submit(),
        }
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    pub fn guard(&self) -> MountGuard {
        self.guard.clone()
    }

    pub fn unmount(&self) {
        self.guard.unmount();
    }

    /// 現在のタブのフォームを送信する
    ///
    /// 成功時はトップページへ遷移する。失敗時は通知を積んで画面に留まる。
    pub async fn submit(&mut self) -> Navigation {
        self.loading = true;
        let guard = self.guard.clone();

        let result = match self.active_tab {
            AuthTab::Login => match self.login_form.validate() {
                Ok(request) => self.service.login(&request).await.map(|_| "Login successful!"),
                Err(e) => Err(e),
            },
            AuthTab::Signup => match self.signup_form.validate() {
                Ok(request) => self
                    .service
                    .register(&request)
                    .await
                    .map(|_| "Account created successfully!"),
                Err(e) => Err(e),
            },
        };

        if guard.apply_if_mounted(()).is_none() {
            return Navigation::Stay;
        }
        self.loading = false;

        match result {
            Ok(message) => {
                self.notifier.success(message);
                Navigation::go(Route::Home)
            }
            Err(e) => {
                self.notifier.error_from(AUTH_FAILED, &e);
                Navigation::Stay
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::api::fake::FakeStorefrontApi;
    use crate::features::auth::form::PASSWORDS_DO_NOT_MATCH;
    use crate::features::auth::session::SessionContext;
    use crate::shared::notifications::NotificationKind;
    use crate::shared::storage::MemoryKeyValueStore;
    use std::sync::Arc;

    fn page_with(api: FakeStorefrontApi) -> (AuthPage, Arc<FakeStorefrontApi>) {
        let api = Arc::new(api);
        let session = SessionContext::new(Arc::new(MemoryKeyValueStore::new()));
        (AuthPage::new(AuthService::new(api.clone(), session)), api)
    }

    fn fill_signup(page: &mut AuthPage) {
        page.switch_tab(AuthTab::Signup);
        page.signup_form = SignupForm {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: "Secret#123".to_string(),
            confirm_password: "Secret#123".to_string(),
            phone: "555-0100".to_string(),
            birth_date: "1990-04-12".to_string(),
            terms: true,
            newsletter: true,
        };
    }

    #[tokio::test]
    async fn test_login_success() {
        let (mut page, _) = page_with(FakeStorefrontApi::default());
        page.login_form.email = "jane@example.com".to_string();
        page.login_form.password = "secret".to_string();

        let navigation = page.submit().await;
        assert_eq!(navigation, Navigation::go(Route::Home));
        assert!(!page.is_loading());

        let last = page.notifier_mut().last().unwrap();
        assert_eq!(last.kind, NotificationKind::Success);
        assert_eq!(last.message, "Login successful!");
    }

    #[tokio::test]
    async fn test_login_failure_shows_backend_message() {
        let (mut page, _) = page_with(FakeStorefrontApi {
            auth_error: Some("Invalid email or password".to_string()),
            ..FakeStorefrontApi::default()
        });
        page.login_form.email = "jane@example.com".to_string();
        page.login_form.password = "wrong".to_string();

        assert_eq!(page.submit().await, Navigation::Stay);
        let last = page.notifier_mut().last().unwrap();
        assert_eq!(last.kind, NotificationKind::Error);
        assert_eq!(last.message, "Invalid email or password");
    }

    #[tokio::test]
    async fn test_signup_success() {
        let (mut page, api) = page_with(FakeStorefrontApi::default());
        fill_signup(&mut page);

        assert_eq!(page.submit().await, Navigation::go(Route::Home));
        assert_eq!(
            page.notifier_mut().last().unwrap().message,
            "Account created successfully!"
        );
        let registrations = api.registrations.lock().unwrap();
        assert_eq!(registrations[0].phone.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn test_signup_mismatch_never_reaches_backend() {
        let (mut page, api) = page_with(FakeStorefrontApi::default());
        fill_signup(&mut page);
        page.signup_form.confirm_password = "Different#1".to_string();

        assert!(!page.can_submit());
        assert_eq!(page.submit().await, Navigation::Stay);
        assert_eq!(
            page.notifier_mut().last().unwrap().message,
            PASSWORDS_DO_NOT_MATCH
        );
        assert!(api.registrations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unmounted_page_ignores_result() {
        let (mut page, _) = page_with(FakeStorefrontApi::default());
        page.login_form.email = "jane@example.com".to_string();
        page.login_form.password = "secret".to_string();
        page.unmount();

        assert_eq!(page.submit().await, Navigation::Stay);
        assert!(page.notifier_mut().pending().is_empty());
    }
}
