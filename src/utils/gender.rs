// Normalizes the gender field of third-party profiles
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tri-state gender code stored on accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Gender {
    Female = 0,
    Male = 1,
    Unknown = 2,
}

impl Gender {
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Map a textual label; unrecognized labels are `Unknown`
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        match label {
            "男" => return Gender::Male,
            "女" => return Gender::Female,
            _ => {}
        }

        match label.to_ascii_lowercase().as_str() {
            "man" | "m" | "male" | "0" => Gender::Male,
            "woman" | "f" | "female" | "1" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

/// Normalize a provider's gender value to a `Gender`
///
/// Providers disagree on representation: QQ sends `男`/`女`, GitHub-like APIs
/// send `m`/`f`, and some send numbers where `0` is male and `1` female.
///
/// The number `0` is a real value here, not an absent one: it maps to male
/// exactly like the label `"0"`. `"male"` is accepted to pair with
/// `"female"`. Only a missing, null or unrecognized value is unknown.
#[must_use]
pub fn normalize_gender(value: Option<&Value>) -> Gender {
    match value {
        Some(Value::String(label)) => Gender::from_label(label),
        Some(Value::Number(number)) => match number.as_i64() {
            Some(0) => Gender::Male,
            Some(1) => Gender::Female,
            _ => Gender::Unknown,
        },
        _ => Gender::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_labels() {
        assert_eq!(normalize_gender(Some(&json!("m"))).code(), 1);
        assert_eq!(normalize_gender(Some(&json!("f"))).code(), 0);
        assert_eq!(normalize_gender(Some(&json!("男"))), Gender::Male);
        assert_eq!(normalize_gender(Some(&json!("女"))), Gender::Female);
        assert_eq!(normalize_gender(Some(&json!("Woman"))), Gender::Female);
        assert_eq!(normalize_gender(Some(&json!("MAN"))), Gender::Male);
        assert_eq!(normalize_gender(Some(&json!("female"))), Gender::Female);
    }

    #[test]
    fn test_numeric_codes() {
        assert_eq!(normalize_gender(Some(&json!(0))), Gender::Male);
        assert_eq!(normalize_gender(Some(&json!(1))), Gender::Female);
        assert_eq!(normalize_gender(Some(&json!("0"))), Gender::Male);
        assert_eq!(normalize_gender(Some(&json!("1"))), Gender::Female);
        assert_eq!(normalize_gender(Some(&json!(5))), Gender::Unknown);
    }

    #[test]
    fn test_zero_is_male_not_missing() {
        assert_eq!(normalize_gender(Some(&json!(0))).code(), 1);
        assert_eq!(normalize_gender(Some(&json!(0))), normalize_gender(Some(&json!("0"))));
        assert_eq!(normalize_gender(Some(&json!("male"))), Gender::Male);
        assert_eq!(normalize_gender(Some(&json!("MALE"))), Gender::Male);
    }

    #[test]
    fn test_missing_or_unrecognized() {
        assert_eq!(normalize_gender(None).code(), 2);
        assert_eq!(normalize_gender(Some(&Value::Null)), Gender::Unknown);
        assert_eq!(normalize_gender(Some(&json!(""))), Gender::Unknown);
        assert_eq!(normalize_gender(Some(&json!("n"))), Gender::Unknown);
        assert_eq!(normalize_gender(Some(&json!(true))), Gender::Unknown);
    }
}
