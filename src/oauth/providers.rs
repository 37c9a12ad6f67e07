// Provider code table and built-in endpoint presets
use crate::oauth::client::HttpMethod;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown OAuth provider: {0}")]
pub struct UnknownProvider(pub String);

/// Numeric code stored with each account binding
///
/// # Errors
///
/// Returns `UnknownProvider` for names outside the table
pub fn provider_code(name: &str) -> Result<u8, UnknownProvider> {
    let code = match name {
        "mobile" => 1,
        "email" => 2,
        "github" => 3,
        "qq" => 4,
        "wechat" | "wexin" => 5,
        "baidu" => 6,
        "weibo" | "sinaweibo" => 7,
        "coding" => 8,
        "gitee" => 9,
        _ => return Err(UnknownProvider(name.to_string())),
    };
    Ok(code)
}

/// Endpoints and verbs of a well-known provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderPreset {
    pub authorize_url: &'static str,
    pub access_token_url: &'static str,
    pub get_openid_url: Option<&'static str>,
    pub get_userinfo_url: &'static str,
    pub scope: &'static str,
    pub access_token_method: HttpMethod,
    pub get_openid_method: HttpMethod,
    pub get_userinfo_method: HttpMethod,
    pub client_id_param: Option<&'static str>,
    pub openid_param: Option<&'static str>,
}

impl ProviderPreset {
    /// Preset for a provider name, if one ships with the service
    #[must_use]
    pub fn for_name(name: &str) -> Option<Self> {
        match name {
            "github" => Some(Self {
                authorize_url: "https://github.com/login/oauth/authorize",
                access_token_url: "https://github.com/login/oauth/access_token",
                get_openid_url: None,
                get_userinfo_url: "https://api.github.com/user",
                scope: "user",
                access_token_method: HttpMethod::Post,
                get_openid_method: HttpMethod::Get,
                get_userinfo_method: HttpMethod::Get,
                client_id_param: None,
                openid_param: None,
            }),
            // QQ answers the token call form-encoded and the openid call as JSONP
            "qq" => Some(Self {
                authorize_url: "https://graph.qq.com/oauth2.0/authorize",
                access_token_url: "https://graph.qq.com/oauth2.0/token",
                get_openid_url: Some("https://graph.qq.com/oauth2.0/me"),
                get_userinfo_url: "https://graph.qq.com/user/get_user_info",
                scope: "get_user_info",
                access_token_method: HttpMethod::Get,
                get_openid_method: HttpMethod::Get,
                get_userinfo_method: HttpMethod::Get,
                client_id_param: Some("oauth_consumer_key"),
                openid_param: Some("openid"),
            }),
            "baidu" => Some(Self {
                authorize_url: "https://openapi.baidu.com/oauth/2.0/authorize",
                access_token_url: "https://openapi.baidu.com/oauth/2.0/token",
                get_openid_url: None,
                get_userinfo_url: "https://openapi.baidu.com/rest/2.0/passport/users/getInfo",
                scope: "basic",
                access_token_method: HttpMethod::Get,
                get_openid_method: HttpMethod::Get,
                get_userinfo_method: HttpMethod::Get,
                client_id_param: None,
                openid_param: None,
            }),
            "weibo" | "sinaweibo" => Some(Self {
                authorize_url: "https://api.weibo.com/oauth2/authorize",
                access_token_url: "https://api.weibo.com/oauth2/access_token",
                get_openid_url: Some("https://api.weibo.com/oauth2/get_token_info"),
                get_userinfo_url: "https://api.weibo.com/2/users/show.json",
                scope: "",
                access_token_method: HttpMethod::Post,
                get_openid_method: HttpMethod::Post,
                get_userinfo_method: HttpMethod::Get,
                client_id_param: None,
                openid_param: Some("uid"),
            }),
            "coding" => Some(Self {
                authorize_url: "https://coding.net/oauth_authorize.html",
                access_token_url: "https://coding.net/api/oauth/access_token",
                get_openid_url: None,
                get_userinfo_url: "https://coding.net/api/account/current_user",
                scope: "user",
                access_token_method: HttpMethod::Post,
                get_openid_method: HttpMethod::Get,
                get_userinfo_method: HttpMethod::Get,
                client_id_param: None,
                openid_param: None,
            }),
            "gitee" => Some(Self {
                authorize_url: "https://gitee.com/oauth/authorize",
                access_token_url: "https://gitee.com/oauth/token",
                get_openid_url: None,
                get_userinfo_url: "https://gitee.com/api/v5/user",
                scope: "user_info",
                access_token_method: HttpMethod::Post,
                get_openid_method: HttpMethod::Get,
                get_userinfo_method: HttpMethod::Get,
                client_id_param: None,
                openid_param: None,
            }),
            _ => None,
        }
    }
}
