use serde::Serialize;

/// パスワード強度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn label(&self) -> &'static str {
        match self {
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Medium => "Medium",
            PasswordStrength::Strong => "Strong",
        }
    }
}

/// 強度判定のチェック項目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PasswordRule {
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
    MinLength,
}

impl PasswordRule {
    pub const ALL: [PasswordRule; 5] = [
        PasswordRule::Uppercase,
        PasswordRule::Lowercase,
        PasswordRule::Digit,
        PasswordRule::Symbol,
        PasswordRule::MinLength,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PasswordRule::Uppercase => "Uppercase letters",
            PasswordRule::Lowercase => "Lowercase letters",
            PasswordRule::Digit => "Numbers",
            PasswordRule::Symbol => "Special characters",
            PasswordRule::MinLength => "At least 8 characters",
        }
    }

    /// パスワードがこの項目を満たすか
    ///
    /// 記号は英数字（ASCII）以外の文字すべて
    pub fn is_satisfied_by(&self, password: &str) -> bool {
        match self {
            PasswordRule::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            PasswordRule::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            PasswordRule::Digit => password.chars().any(|c| c.is_ascii_digit()),
            PasswordRule::Symbol => password.chars().any(|c| !c.is_ascii_alphanumeric()),
            PasswordRule::MinLength => password.chars().count() >= 8,
        }
    }
}

/// チェックリストの1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordCheck {
    pub rule: PasswordRule,
    pub label: &'static str,
    pub passed: bool,
}

/// 満たしている項目数
pub fn passed_rule_count(password: &str) -> usize {
    PasswordRule::ALL
        .iter()
        .filter(|rule| rule.is_satisfied_by(password))
        .count()
}

/// パスワード強度を判定する（表示専用）
///
/// 空のパスワードは強度を表示しないためNone。
/// 0〜2項目はWeak、3〜4項目はMedium、5項目すべてでStrong。
pub fn password_strength(password: &str) -> Option<PasswordStrength> {
    if password.is_empty() {
        return None;
    }

    Some(match passed_rule_count(password) {
        0..=2 => PasswordStrength::Weak,
        3 | 4 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    })
}

/// 各項目の達成状況
pub fn password_checklist(password: &str) -> Vec<PasswordCheck> {
    PasswordRule::ALL
        .iter()
        .map(|rule| PasswordCheck {
            rule: *rule,
            label: rule.label(),
            passed: rule.is_satisfied_by(password),
        })
        .collect()
}
