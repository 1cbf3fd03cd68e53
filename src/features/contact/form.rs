use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{
    non_empty, normalize_string, validate_email, validate_required_field, validate_text_length,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 本文の最大文字数
const MESSAGE_MAX_LENGTH: usize = 2000;

/// 問い合わせ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactSubject {
    General,
    Booking,
    Billing,
    Feedback,
    Complaint,
    Partnership,
    Other,
}

impl ContactSubject {
    pub fn tag(&self) -> &'static str {
        match self {
            ContactSubject::General => "general",
            ContactSubject::Booking => "booking",
            ContactSubject::Billing => "billing",
            ContactSubject::Feedback => "feedback",
            ContactSubject::Complaint => "complaint",
            ContactSubject::Partnership => "partnership",
            ContactSubject::Other => "other",
        }
    }

    pub const ALL: [ContactSubject; 7] = [
        ContactSubject::General,
        ContactSubject::Booking,
        ContactSubject::Billing,
        ContactSubject::Feedback,
        ContactSubject::Complaint,
        ContactSubject::Partnership,
        ContactSubject::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContactSubject::General => "General Inquiry",
            ContactSubject::Booking => "Booking Assistance",
            ContactSubject::Billing => "Billing Question",
            ContactSubject::Feedback => "Feedback",
            ContactSubject::Complaint => "Complaint",
            ContactSubject::Partnership => "Partnership",
            ContactSubject::Other => "Other",
        }
    }
}

impl FromStr for ContactSubject {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContactSubject::ALL
            .into_iter()
            .find(|subject| subject.tag() == s.trim())
            .ok_or_else(|| AppError::validation("Please select a subject"))
    }
}

/// 優先度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPriority {
    Low,
    #[default]
    Medium,
    High,
    Emergency,
}

/// 希望する連絡方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    #[default]
    Email,
    Phone,
    Any,
}

/// お問い合わせフォーム
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub subject: Option<ContactSubject>,
    pub priority: ContactPriority,
    pub message: String,
    pub contact_method: ContactMethod,
    pub newsletter: bool,
}

/// 送信内容
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: ContactSubject,
    pub priority: ContactPriority,
    pub message: String,
    pub contact_method: ContactMethod,
    pub newsletter: bool,
}

impl ContactForm {
    /// 入力を検証して送信内容を作成する
    pub fn validate(&self) -> AppResult<ContactMessage> {
        validate_required_field(&self.first_name, "First name")?;
        validate_required_field(&self.last_name, "Last name")?;
        validate_email(&self.email)?;
        let subject = self
            .subject
            .ok_or_else(|| AppError::validation("Please select a subject"))?;
        validate_required_field(&self.message, "Message")?;
        validate_text_length(&self.message, MESSAGE_MAX_LENGTH, "Message")?;

        // 電話での連絡を希望する場合は電話番号が必要
        let phone = non_empty(&self.phone);
        if self.contact_method == ContactMethod::Phone && phone.is_none() {
            return Err(AppError::validation(
                "Phone number is required when contact by phone is preferred",
            ));
        }

        Ok(ContactMessage {
            first_name: normalize_string(&self.first_name),
            last_name: normalize_string(&self.last_name),
            email: normalize_string(&self.email),
            phone,
            subject,
            priority: self.priority,
            message: normalize_string(&self.message),
            contact_method: self.contact_method,
            newsletter: self.newsletter,
        })
    }

    /// 初期状態に戻す
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            subject: Some(ContactSubject::Booking),
            message: "Can I extend my rental?".to_string(),
            ..ContactForm::default()
        }
    }

    #[test]
    fn test_defaults() {
        let form = ContactForm::default();
        assert_eq!(form.priority, ContactPriority::Medium);
        assert_eq!(form.contact_method, ContactMethod::Email);
        assert_eq!(form.subject, None);
    }

    #[test]
    fn test_validate_success() {
        let message = filled().validate().unwrap();
        assert_eq!(message.phone, None);
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("\"subject\":\"booking\""));
        assert!(json.contains("\"contactMethod\":\"email\""));
    }

    #[test]
    fn test_subject_required() {
        let mut form = filled();
        form.subject = None;
        assert_eq!(
            form.validate().unwrap_err().user_message(),
            "Please select a subject"
        );
    }

    #[test]
    fn test_message_required() {
        let mut form = filled();
        form.message = "   ".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_phone_needed_for_phone_contact() {
        let mut form = filled();
        form.contact_method = ContactMethod::Phone;
        assert!(form.validate().is_err());

        form.phone = "555-0100".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_subject_from_str() {
        assert_eq!("billing".parse::<ContactSubject>().unwrap(), ContactSubject::Billing);
        assert!("".parse::<ContactSubject>().is_err());
    }

    #[test]
    fn test_reset() {
        let mut form = filled();
        form.newsletter = true;
        form.reset();
        assert_eq!(form, ContactForm::default());
    }
}
