//! Response message localization
//!
//! API responses carry an English `msg`; front ends ask for a language and get
//! the message translated when the dictionary knows it.

use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;

/// Default language for localized responses
pub const DEFAULT_LANGUAGE: &str = "zh_CN";

/// Message dictionary lookup
pub trait Translator: Send + Sync {
    /// Translation of `message` into `language`, if known
    fn translate(&self, message: &str, language: &str) -> Option<&str>;
}

type Dictionary = HashMap<&'static str, HashMap<&'static str, &'static str>>;

static BUILTIN_DICTIONARY: Lazy<Dictionary> = Lazy::new(|| {
    let zh_cn = HashMap::from([
        ("Hello World", "世界，你好"),
        ("Account already exists", "账号已存在"),
        ("System is abnormal", "系统异常，请稍后再试"),
        ("Registration success", "注册成功"),
        ("Registration failed", "注册失败"),
        ("Check failed", "校验未通过"),
        ("Email already exists", "邮箱已存在"),
        ("Invalid verification code", "无效的验证码"),
        (
            "Invalid password: Inconsistent password or length failed twice",
            "无效的密码：两次密码不一致或长度不合格",
        ),
        ("Not support phone number registration", "暂不支持手机号注册"),
        ("Invalid account", "无效的账号"),
        ("Wrong password", "密码错误"),
        (
            "Invalid account: does not exist or has been disabled",
            "无效的账号：不存在或已禁用",
        ),
        ("Invalid password: length unqualified", "无效的密码：长度不合格"),
        ("Temporarily do not support phone number login", "暂不支持手机号登录"),
        (
            "Have sent the verification code, please check the mailbox",
            "已发送过验证码，请查收邮箱",
        ),
        (
            "Sent verification code, valid for 300 seconds",
            "已发送验证码，有效期300秒",
        ),
        (
            "Mail delivery failed, please try again later",
            "邮件发送失败，请稍后重试",
        ),
        ("Third-party login binding failed", "第三方登录绑定失败"),
        ("Has been bound to other accounts", "已经绑定其他账号"),
        ("Operation failed, rolled back", "操作失败，已回滚"),
    ]);

    let zh_hk = HashMap::from([
        ("Hello World", "世界，你好"),
        ("Account already exists", "帳號已存在"),
        ("System is abnormal", "系統异常"),
        ("Registration success", "注册成功"),
        ("Registration failed", "注册失敗"),
        ("Check failed", "校驗未通過"),
        ("Email already exists", "郵箱已存在"),
        ("Invalid verification code", "無效的驗證碼"),
        (
            "Invalid password: Inconsistent password or length failed twice",
            "無效的密碼：兩次密碼不一致或長度不合格",
        ),
        ("Not support phone number registration", "暫不支持手機號注册"),
        ("Invalid account", "無效的帳號"),
        ("Wrong password", "密碼錯誤"),
        (
            "Invalid account: does not exist or has been disabled",
            "無效的帳號：不存在或已禁用",
        ),
        ("Invalid password: length unqualified", "無效的密碼：長度不合格"),
        ("Temporarily do not support phone number login", "暫不支持手機號登入"),
        (
            "Have sent the verification code, please check the mailbox",
            "已發送過驗證碼，請查收郵箱",
        ),
        (
            "Sent verification code, valid for 300 seconds",
            "已發送驗證碼，有效期300秒",
        ),
        (
            "Mail delivery failed, please try again later",
            "郵件發送失敗，請稍後重試",
        ),
        ("Third-party login binding failed", "第三方登錄綁定失敗"),
        ("Has been bound to other accounts", "已經綁定其他賬號"),
        ("Operation failed, rolled back", "操作失敗，已回滾"),
    ]);

    HashMap::from([("zh_CN", zh_cn), ("zh_HK", zh_hk)])
});

/// The dictionary shipped with the service (Simplified and Traditional Chinese)
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTranslations;

impl Translator for StaticTranslations {
    fn translate(&self, message: &str, language: &str) -> Option<&str> {
        BUILTIN_DICTIONARY
            .get(language)
            .and_then(|table| table.get(message))
            .copied()
    }
}

/// Translate the `msg` field of a response object in place
///
/// Anything that is not an object with a non-empty string `msg` is returned
/// untouched. Unknown messages or languages are passed through with a warning.
#[must_use]
pub fn localize_response(
    mut response: Value,
    language: &str,
    translator: &dyn Translator,
) -> Value {
    let Some(msg) = response.get("msg").and_then(Value::as_str) else {
        return response;
    };
    if msg.is_empty() {
        return response;
    }

    match translator.translate(msg, language) {
        Some(translated) => {
            let translated = translated.to_string();
            response["msg"] = Value::String(translated);
        }
        None => log::warn!("No {language} translation for message: {msg:?}"),
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_translates_simplified() {
        let response = json!({"msg": "Registration success", "success": true});
        let localized = localize_response(response, "zh_CN", &StaticTranslations);

        assert_eq!(localized["msg"], "注册成功");
        assert_eq!(localized["success"], true);
    }

    #[test]
    fn test_translates_traditional() {
        let response = json!({"msg": "Wrong password", "success": false});
        let localized = localize_response(response, "zh_HK", &StaticTranslations);

        assert_eq!(localized["msg"], "密碼錯誤");
    }

    #[test]
    fn test_unknown_message_passes_through() {
        let response = json!({"msg": "Something new", "success": false});
        let localized = localize_response(response.clone(), "zh_CN", &StaticTranslations);

        assert_eq!(localized, response);
    }

    #[test]
    fn test_unknown_language_passes_through() {
        let response = json!({"msg": "Registration success"});
        let localized = localize_response(response.clone(), "fr_FR", &StaticTranslations);

        assert_eq!(localized, response);
    }

    #[test]
    fn test_non_objects_and_empty_msg() {
        let response = json!({"msg": null, "success": true});
        assert_eq!(
            localize_response(response.clone(), "zh_CN", &StaticTranslations),
            response
        );

        let response = json!({"msg": ""});
        assert_eq!(
            localize_response(response.clone(), "zh_CN", &StaticTranslations),
            response
        );

        let response = json!("plain string");
        assert_eq!(
            localize_response(response.clone(), "zh_CN", &StaticTranslations),
            response
        );
    }

    #[test]
    fn test_dictionaries_cover_same_messages() {
        let cn = &BUILTIN_DICTIONARY["zh_CN"];
        let hk = &BUILTIN_DICTIONARY["zh_HK"];

        assert_eq!(cn.len(), 21);
        assert!(cn.keys().all(|key| hk.contains_key(key)));
    }
}
