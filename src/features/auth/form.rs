use crate::features::auth::models::{LoginRequest, RegisterRequest};
use crate::features::auth::password::{
    password_checklist, password_strength, PasswordCheck, PasswordStrength,
};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{
    non_empty, normalize_string, parse_date_input, validate_email, validate_required_field,
};
use chrono::NaiveDate;

/// パスワード不一致のメッセージ
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";

/// ログインフォーム
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

impl LoginForm {
    /// 入力を検証してログインリクエストを作成する
    pub fn validate(&self) -> AppResult<LoginRequest> {
        validate_email(&self.email)?;
        validate_required_field(&self.password, "Password")?;

        Ok(LoginRequest {
            email: normalize_string(&self.email),
            password: self.password.clone(),
        })
    }
}

/// 会員登録フォーム
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    /// 生年月日（YYYY-MM-DD）
    pub birth_date: String,
    pub terms: bool,
    pub newsletter: bool,
}

impl SignupForm {
    /// 確認用パスワードが入力済みで、パスワードと一致しない
    pub fn passwords_mismatch(&self) -> bool {
        !self.confirm_password.is_empty() && self.confirm_password != self.password
    }

    /// 送信ボタンを有効にできるか
    pub fn can_submit(&self) -> bool {
        !self.passwords_mismatch()
    }

    /// 入力中のパスワード強度（空の場合はNone）
    pub fn strength(&self) -> Option<PasswordStrength> {
        password_strength(&self.password)
    }

    pub fn checklist(&self) -> Vec<PasswordCheck> {
        password_checklist(&self.password)
    }

    /// 生年月日を解析する（必須）
    pub fn parsed_birth_date(&self) -> AppResult<NaiveDate> {
        parse_date_input(&self.birth_date)?
            .ok_or_else(|| AppError::validation("Date of birth is required"))
    }

    /// 入力を検証して登録リクエストを作成する
    ///
    /// パスワードと確認用パスワードが一致しない場合は送信しない
    pub fn validate(&self) -> AppResult<RegisterRequest> {
        validate_required_field(&self.name, "Full name")?;
        validate_email(&self.email)?;
        validate_required_field(&self.password, "Password")?;
        validate_required_field(&self.confirm_password, "Confirm password")?;

        if self.password != self.confirm_password {
            return Err(AppError::validation(PASSWORDS_DO_NOT_MATCH));
        }

        self.parsed_birth_date()?;

        if !self.terms {
            return Err(AppError::validation(
                "Please agree to the Terms & Privacy Policy",
            ));
        }

        Ok(RegisterRequest {
            name: normalize_string(&self.name),
            email: normalize_string(&self.email),
            password: self.password.clone(),
            phone: non_empty(&self.phone),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_signup() -> SignupForm {
        SignupForm {
            name: " Jane Doe ".to_string(),
            email: "jane@example.com".to_string(),
            password: "Secret#123".to_string(),
            confirm_password: "Secret#123".to_string(),
            phone: String::new(),
            birth_date: "1990-04-12".to_string(),
            terms: true,
            newsletter: false,
        }
    }

    #[test]
    fn test_login_validate() {
        let form = LoginForm {
            email: " jane@example.com ".to_string(),
            password: "secret".to_string(),
            remember: true,
        };
        let request = form.validate().unwrap();
        assert_eq!(request.email, "jane@example.com");

        let missing_password = LoginForm {
            password: String::new(),
            ..form
        };
        assert_eq!(
            missing_password.validate().unwrap_err().user_message(),
            "Password is required"
        );
    }

    #[test]
    fn test_signup_validate_success() {
        let request = filled_signup().validate().unwrap();
        assert_eq!(request.name, "Jane Doe");
        assert_eq!(request.phone, None);
    }

    #[test]
    fn test_mismatch_blocks_submit() {
        let mut form = filled_signup();
        form.confirm_password = "Secret#124".to_string();

        assert!(form.passwords_mismatch());
        assert!(!form.can_submit());
        assert_eq!(
            form.validate().unwrap_err().user_message(),
            PASSWORDS_DO_NOT_MATCH
        );
    }

    #[test]
    fn test_empty_confirm_is_not_mismatch() {
        let mut form = filled_signup();
        form.confirm_password = String::new();

        // 入力途中は送信ボタンを無効にしない
        assert!(form.can_submit());
        // 送信時は必須チェックで止める
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_terms_and_birth_date_required() {
        let mut form = filled_signup();
        form.terms = false;
        assert!(form.validate().is_err());

        let mut form = filled_signup();
        form.birth_date = String::new();
        assert_eq!(
            form.validate().unwrap_err().user_message(),
            "Date of birth is required"
        );
    }

    #[test]
    fn test_strength_feedback() {
        let mut form = SignupForm::default();
        assert_eq!(form.strength(), None);

        form.password = "Secret#123".to_string();
        assert_eq!(form.strength(), Some(PasswordStrength::Strong));
        assert!(form.checklist().iter().all(|check| check.passed));
    }
}
