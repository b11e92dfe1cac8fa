use serde::Serialize;
use validator::ValidationError;
use zxcvbn::{Score, zxcvbn};

pub const MIN_PASSWORD_LENGTH: usize = 8;
const LONG_PASSWORD_LENGTH: usize = 12;

/// Which of the strong-password rules a candidate satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRequirements {
    pub min_length: bool,
    pub has_lowercase: bool,
    pub has_uppercase: bool,
    pub has_number: bool,
    pub has_special_char: bool,
}

impl PasswordRequirements {
    pub fn check(password: &str) -> Self {
        Self {
            // Length is in characters, so an emoji counts once.
            min_length: password.chars().count() >= MIN_PASSWORD_LENGTH,
            has_lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            has_uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            has_number: password.chars().any(|c| c.is_ascii_digit()),
            has_special_char: password.chars().any(|c| !c.is_ascii_alphanumeric()),
        }
    }

    pub fn all_met(&self) -> bool {
        self.min_length && self.has_lowercase && self.has_uppercase && self.has_number && self.has_special_char
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLabel {
    None,
    VeryWeak,
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

impl StrengthLabel {
    pub fn text(self) -> &'static str {
        match self {
            StrengthLabel::None => "",
            StrengthLabel::VeryWeak => "Very weak",
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Fair => "Fair",
            StrengthLabel::Strong => "Strong",
            StrengthLabel::VeryStrong => "Very strong",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    /// 0 to 5.
    pub score: u8,
    pub label: StrengthLabel,
}

/// Scores a password for the strength meter: one point per length milestone and
/// per character class, capped at 5.
pub fn password_strength(password: &str) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength {
            score: 0,
            label: StrengthLabel::None,
        };
    }

    let requirements = PasswordRequirements::check(password);
    let length = password.chars().count();
    let points = [
        requirements.min_length,
        length >= LONG_PASSWORD_LENGTH,
        requirements.has_lowercase,
        requirements.has_uppercase,
        requirements.has_number,
        requirements.has_special_char,
    ];
    let score = points.iter().filter(|met| **met).count().min(5) as u8;

    let label = match score {
        0 | 1 => StrengthLabel::VeryWeak,
        2 => StrengthLabel::Weak,
        3 => StrengthLabel::Fair,
        4 => StrengthLabel::Strong,
        _ => StrengthLabel::VeryStrong,
    };

    PasswordStrength { score, label }
}

/// `validator` rule for new passwords: every requirement met and not trivially guessable.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let requirements = PasswordRequirements::check(password);
    if !requirements.all_met() {
        let mut error = ValidationError::new("weak_password");
        error.message = Some("Password needs 8+ characters with upper and lower case letters, a number and a symbol".into());
        return Err(error);
    }

    if zxcvbn(password, &[]).score() < Score::Two {
        let mut error = ValidationError::new("guessable_password");
        error.message = Some("Password is too easy to guess".into());
        return Err(error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_has_no_score() {
        let strength = password_strength("");
        assert_eq!(strength.score, 0);
        assert_eq!(strength.label.text(), "");
    }

    #[test]
    fn scores_follow_milestones() {
        assert_eq!(password_strength("abc").label, StrengthLabel::VeryWeak);
        assert_eq!(password_strength("abcdefgh").score, 2);
        assert_eq!(password_strength("Abcdefgh").score, 3);
        assert_eq!(password_strength("Abcdefg1").score, 4);
        assert_eq!(password_strength("Abcdefg1!").label, StrengthLabel::VeryStrong);
        assert_eq!(password_strength("Abcdefghijk1!").score, 5);
    }

    #[test]
    fn requirements_report_each_rule() {
        let requirements = PasswordRequirements::check("abc1");
        assert!(!requirements.min_length);
        assert!(requirements.has_lowercase);
        assert!(!requirements.has_uppercase);
        assert!(requirements.has_number);
        assert!(!requirements.has_special_char);
        assert!(!requirements.all_met());
        assert!(PasswordRequirements::check("Tut0r!ng-Campus").all_met());
    }

    #[test]
    fn length_counts_characters() {
        // Seven characters, but ten UTF-16 code units.
        assert!(!PasswordRequirements::check("Ab1!😀😀😀").min_length);
        assert!(PasswordRequirements::check("Ab1!😀😀😀😀").min_length);
    }

    #[test]
    fn validation_rejects_missing_classes() {
        let err = validate_password_strength("alllowercase1!").unwrap_err();
        assert_eq!(err.code, "weak_password");
    }

    #[test]
    fn validation_accepts_strong_password() {
        assert!(validate_password_strength("Vx7#qLm2!pRz").is_ok());
    }
}
