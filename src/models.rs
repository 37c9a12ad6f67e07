use crate::oauth::client::ProviderResponse;
use crate::utils::gender::{normalize_gender, Gender};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// JSON envelope returned by the API routes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    pub success: bool,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiResponse {
    #[must_use]
    pub fn ok(msg: &str, data: Option<Value>) -> Self {
        Self {
            success: true,
            msg: msg.to_string(),
            data,
        }
    }

    /// As a JSON value, ready for localization
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Normalized third-party profile, as handed to the binding page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThirdPartyProfile {
    pub openid: String,
    pub nick_name: Option<String>,
    pub avatar: Option<String>,
    pub gender: Gender,
}

impl ThirdPartyProfile {
    const NICK_FIELDS: [&'static str; 6] =
        ["nickname", "screen_name", "name", "login", "username", "uname"];
    const AVATAR_FIELDS: [&'static str; 5] = [
        "avatar_url",
        "figureurl_qq_2",
        "figureurl_qq_1",
        "profile_image_url",
        "portrait",
    ];

    /// Pick the common profile fields out of a user-info response
    #[must_use]
    pub fn from_userinfo(openid: &str, userinfo: &ProviderResponse) -> Self {
        let first_of = |fields: &[&str]| {
            fields
                .iter()
                .find_map(|field| userinfo.field(field).filter(|value| !value.is_empty()))
        };

        let gender = userinfo
            .as_json()
            .map_or(Gender::Unknown, |json| {
                normalize_gender(json.get("gender").or_else(|| json.get("sex")))
            });

        Self {
            openid: openid.to_string(),
            nick_name: first_of(&Self::NICK_FIELDS[..]),
            avatar: first_of(&Self::AVATAR_FIELDS[..]),
            gender,
        }
    }
}
