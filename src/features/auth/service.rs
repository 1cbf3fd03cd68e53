/// 認証サービス
///
/// ログイン・会員登録・プロフィール更新をAPIサーバーに委譲し、
/// 成功時にセッションをローカルストアへ保存する。
use crate::features::api::StorefrontApi;
use crate::features::auth::models::{
    AuthSession, LoginRequest, ProfileUpdate, RegisterRequest, UserProfile,
};
use crate::features::auth::session::SessionContext;
use crate::shared::errors::{AppError, AppResult};
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn StorefrontApi>,
    session: SessionContext,
}

impl AuthService {
    /// 新しいAuthServiceを作成する
    ///
    /// # 引数
    /// * `api` - ストアフロントAPI
    /// * `session` - セッションの保存先
    pub fn new(api: Arc<dyn StorefrontApi>, session: SessionContext) -> Self {
        Self { api, session }
    }

    /// ログインしてセッションを保存する
    pub async fn login(&self, request: &LoginRequest) -> AppResult<AuthSession> {
        log::info!("ログインを開始します: email={}", request.email);

        let response = self.api.login(request).await.map_err(|e| {
            log::warn!("ログインに失敗しました: {e}");
            e
        })?;

        let session = AuthSession::from(response);
        self.session.save(&session)?;

        log::info!("ログインに成功しました: user_id={}", session.user.id);
        Ok(session)
    }

    /// 会員登録してセッションを保存する
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<AuthSession> {
        log::info!("会員登録を開始します: email={}", request.email);

        let response = self.api.register(request).await.map_err(|e| {
            log::warn!("会員登録に失敗しました: {e}");
            e
        })?;

        let session = AuthSession::from(response);
        self.session.save(&session)?;

        log::info!("会員登録に成功しました: user_id={}", session.user.id);
        Ok(session)
    }

    /// プロフィールを取得する（ログインが必要）
    pub async fn get_profile(&self) -> AppResult<UserProfile> {
        self.require_login()?;
        let user = self.api.get_profile().await?;
        log::debug!("プロフィールを取得しました: user_id={}", user.id);
        Ok(user)
    }

    /// プロフィールを更新し、セッションを保存し直す
    pub async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<UserProfile> {
        self.require_login()?;
        if update.is_empty() {
            return Err(AppError::validation("Nothing to update"));
        }

        let response = self.api.update_profile(update).await?;
        match response.token {
            Some(token) => self.session.save(&AuthSession {
                token,
                user: response.user.clone(),
            })?,
            None => self.session.save_user(&response.user)?,
        }

        log::info!("プロフィールを更新しました: user_id={}", response.user.id);
        Ok(response.user)
    }

    /// ログアウトする（ローカルのセッションを破棄するのみ）
    pub fn logout(&self) -> AppResult<()> {
        self.session.clear()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn current_user(&self) -> AppResult<Option<UserProfile>> {
        self.session.current_user()
    }

    fn require_login(&self) -> AppResult<()> {
        if self.session.is_logged_in() {
            Ok(())
        } else {
            Err(AppError::validation("Please log in first"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::api::fake::FakeStorefrontApi;
    use crate::shared::storage::MemoryKeyValueStore;

    fn service(api: FakeStorefrontApi) -> (AuthService, SessionContext) {
        let session = SessionContext::new(Arc::new(MemoryKeyValueStore::new()));
        (AuthService::new(Arc::new(api), session.clone()), session)
    }

    fn login_request() -> LoginRequest {
        LoginRequest {
            email: "jane@example.com".to_string(),
            password: "Secret#123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_saves_session() {
        let (service, session) = service(FakeStorefrontApi::default());

        let result = service.login(&login_request()).await.unwrap();
        assert_eq!(result.token, "fake-token");
        assert!(service.is_logged_in());
        assert_eq!(session.token().unwrap().as_deref(), Some("fake-token"));
        assert_eq!(
            service.current_user().unwrap().unwrap().email,
            "jane@example.com"
        );
    }

    #[tokio::test]
    async fn test_login_failure_keeps_logged_out() {
        let (service, _) = service(FakeStorefrontApi {
            auth_error: Some("Invalid credentials".to_string()),
            ..FakeStorefrontApi::default()
        });

        let err = service.login(&login_request()).await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(!service.is_logged_in());
    }

    #[tokio::test]
    async fn test_logout() {
        let (service, _) = service(FakeStorefrontApi::default());
        service.login(&login_request()).await.unwrap();

        service.logout().unwrap();
        assert!(!service.is_logged_in());
        assert_eq!(service.current_user().unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_profile_requires_login() {
        let (service, _) = service(FakeStorefrontApi::default());
        let update = ProfileUpdate {
            phone: Some("555-0100".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(service.update_profile(&update).await.is_err());
        assert!(service.get_profile().await.is_err());
    }

    #[tokio::test]
    async fn test_update_profile_resaves_session() {
        let (service, session) = service(FakeStorefrontApi::default());
        service.login(&login_request()).await.unwrap();

        let update = ProfileUpdate {
            phone: Some("555-0100".to_string()),
            ..ProfileUpdate::default()
        };
        let user = service.update_profile(&update).await.unwrap();

        assert_eq!(user.phone.as_deref(), Some("555-0100"));
        assert_eq!(session.token().unwrap().as_deref(), Some("refreshed-token"));
        assert_eq!(
            session.current_user().unwrap().unwrap().phone.as_deref(),
            Some("555-0100")
        );

        assert!(service.update_profile(&ProfileUpdate::default()).await.is_err());
    }
}
