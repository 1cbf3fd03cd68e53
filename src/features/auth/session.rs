/// 認証セッションの保存
///
/// トークンとユーザー情報をローカルストアの`token`/`user`キーに保存する。
/// 画面やAPIクライアントは同じ`SessionContext`を共有して参照する。
use crate::features::auth::models::{AuthSession, UserProfile};
use crate::shared::errors::AppResult;
use crate::shared::storage::{get_json, set_json, KeyValueStore, StorageKeys};
use std::sync::Arc;

#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}

impl SessionContext {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// セッションを保存する
    pub fn save(&self, session: &AuthSession) -> AppResult<()> {
        self.store.set(StorageKeys::TOKEN, &session.token)?;
        set_json(self.store.as_ref(), StorageKeys::USER, &session.user)?;
        log::info!("セッションを保存しました: user_id={}", session.user.id);
        Ok(())
    }

    /// ユーザー情報のみを更新する（トークンは維持）
    pub fn save_user(&self, user: &UserProfile) -> AppResult<()> {
        set_json(self.store.as_ref(), StorageKeys::USER, user)?;
        log::debug!("ユーザー情報を更新しました: user_id={}", user.id);
        Ok(())
    }

    /// 保存済みのトークン
    pub fn token(&self) -> AppResult<Option<String>> {
        Ok(self
            .store
            .get(StorageKeys::TOKEN)?
            .filter(|token| !token.is_empty()))
    }

    /// 保存済みのユーザー情報（壊れている場合はNone）
    pub fn current_user(&self) -> AppResult<Option<UserProfile>> {
        get_json(self.store.as_ref(), StorageKeys::USER)
    }

    /// トークンが保存されているか
    pub fn is_logged_in(&self) -> bool {
        match self.token() {
            Ok(token) => token.is_some(),
            Err(e) => {
                log::warn!("トークンの取得に失敗しました: {e}");
                false
            }
        }
    }

    /// 保存済みのセッション（トークンがない場合はNone）
    pub fn load(&self) -> AppResult<Option<AuthSession>> {
        let Some(token) = self.token()? else {
            return Ok(None);
        };
        let user = self.current_user()?.unwrap_or_default();
        Ok(Some(AuthSession { token, user }))
    }

    /// セッションを破棄する
    pub fn clear(&self) -> AppResult<()> {
        self.store.remove(StorageKeys::TOKEN)?;
        self.store.remove(StorageKeys::USER)?;
        log::info!("セッションを破棄しました");
        Ok(())
    }
}
