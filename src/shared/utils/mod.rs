use crate::shared::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// メールアドレスの簡易パターン（ブラウザの`type="email"`相当）
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("メールアドレスの正規表現が不正です")
});

/// 日付入力（YYYY-MM-DD）を解析する
///
/// # 引数
/// * `date_str` - 日付文字列（`<input type="date">`の値）
///
/// # 戻り値
/// 空文字の場合はNone、有効な日付の場合はSome
///
/// # バリデーション規則
/// - YYYY-MM-DD形式であること
/// - 実在する日付であること
/// - 1900年以降、2100年以前であること
pub fn parse_date_input(date_str: &str) -> AppResult<Option<NaiveDate>> {
    let trimmed = date_str.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.len() != 10
        || trimmed.chars().nth(4) != Some('-')
        || trimmed.chars().nth(7) != Some('-')
    {
        return Err(AppError::validation("Dates must use the YYYY-MM-DD format"));
    }

    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| AppError::validation("Please enter a valid date"))?;

    if !(1900..=2100).contains(&date.year()) {
        return Err(AppError::validation(
            "Dates must be between the years 1900 and 2100",
        ));
    }

    Ok(Some(date))
}

/// 日付を入力欄の形式（YYYY-MM-DD）に整形する
pub fn format_date_input(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// 文字列の長さバリデーション
///
/// # 引数
/// * `text` - 検証対象の文字列
/// * `max_length` - 最大文字数
/// * `field_name` - フィールド名（エラーメッセージ用）
pub fn validate_text_length(text: &str, max_length: usize, field_name: &str) -> AppResult<()> {
    let char_count = text.chars().count();
    if char_count > max_length {
        return Err(AppError::validation(format!(
            "{field_name} must be at most {max_length} characters (currently {char_count})"
        )));
    }
    Ok(())
}

/// 必須フィールドのバリデーション
///
/// # 引数
/// * `text` - 検証対象の文字列
/// * `field_name` - フィールド名（エラーメッセージ用）
pub fn validate_required_field(text: &str, field_name: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::validation(format!("{field_name} is required")));
    }
    Ok(())
}

/// メールアドレスのバリデーション（必須）
pub fn validate_email(email: &str) -> AppResult<()> {
    validate_required_field(email, "Email address")?;
    if !EMAIL_PATTERN.is_match(email.trim()) {
        return Err(AppError::validation("Please enter a valid email address"));
    }
    Ok(())
}

/// 文字列の正規化（前後の空白を削除）
pub fn normalize_string(text: &str) -> String {
    text.trim().to_string()
}

/// 空白のみの入力をNoneに変換する
pub fn non_empty(text: &str) -> Option<String> {
    let normalized = normalize_string(text);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// 金額をドル表記でフォーマットする（セント未満は丸め、整数は小数点なし）
pub fn format_dollars(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    format!("${rounded}")
}

/// 日数の表示（単数形/複数形）
pub fn format_days(days: u64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}
