// MyQ API request and response types
//
// The API uses PascalCase field names and is loose about scalar types:
// device ids and attribute values arrive as either JSON strings or numbers.
// Fields use `#[serde(default)]` so unexpected omissions surface as domain
// errors (missing token, device not found) rather than parse failures.

use serde::{Deserialize, Serialize};

/// Device type name of the single controlled opener.
pub const GARAGE_DOOR_OPENER: &str = "GarageDoorOpener";

/// Display name of the attribute carrying the raw door state code.
pub const DOOR_STATE_ATTRIBUTE: &str = "doorstate";

/// Attribute name written to request a door state change.
pub const DESIRED_DOOR_STATE_ATTRIBUTE: &str = "desireddoorstate";

// ── Scalars ──────────────────────────────────────────────────────────

/// A JSON scalar that may be encoded as a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(i64),
}

impl Scalar {
    pub fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

// ── Login ────────────────────────────────────────────────────────────

/// Body of `POST /api/v4/User/Validate`.
#[derive(Debug, Serialize)]
pub struct ValidateRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of `POST /api/v4/User/Validate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidateResponse {
    #[serde(default)]
    pub security_token: Option<String>,
    #[serde(default)]
    pub return_code: Option<Scalar>,
    #[serde(default)]
    pub error_message: Option<String>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// Response of `GET /api/v4/userdevicedetails/get`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceDetailsResponse {
    #[serde(default)]
    pub devices: Vec<MyQDevice>,
}

/// One device on the account.
#[derive(Debug, Clone, Deserialize)]
pub struct MyQDevice {
    #[serde(rename = "MyQDeviceTypeName", default)]
    pub type_name: Option<String>,
    #[serde(rename = "MyQDeviceId", default)]
    pub id: Option<Scalar>,
    #[serde(rename = "Attributes", default)]
    pub attributes: Vec<DeviceAttribute>,
}

impl MyQDevice {
    pub fn is_garage_door_opener(&self) -> bool {
        self.type_name.as_deref() == Some(GARAGE_DOOR_OPENER)
    }

    /// Raw value of the `doorstate` attribute, if reported.
    ///
    /// When the attribute repeats, the last occurrence wins.
    pub fn door_state_code(&self) -> Option<String> {
        self.attributes
            .iter()
            .rev()
            .find(|a| a.display_name.as_deref() == Some(DOOR_STATE_ATTRIBUTE))
            .and_then(|a| a.value.clone())
            .map(Scalar::into_string)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceAttribute {
    #[serde(rename = "AttributeDisplayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "Value", default)]
    pub value: Option<Scalar>,
}

// ── Commands ─────────────────────────────────────────────────────────

/// Body of `PUT /api/v4/deviceattribute/putdeviceattribute`.
#[derive(Debug, Serialize)]
pub struct PutAttributeRequest<'a> {
    #[serde(rename = "ApplicationID")]
    pub application_id: &'a str,
    #[serde(rename = "SecurityToken")]
    pub security_token: &'a str,
    #[serde(rename = "MyQDeviceId")]
    pub device_id: &'a str,
    #[serde(rename = "AttributeName")]
    pub attribute_name: &'a str,
    #[serde(rename = "AttributeValue")]
    pub attribute_value: u8,
}
