//! Request and response bodies for the Call2FA endpoints

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct CallRequest<'a> {
    pub phone_number: &'a str,
    pub callback_url: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PoolCallRequest<'a> {
    pub phone_number: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DictateCodeCallRequest<'a> {
    pub phone_number: &'a str,
    pub code: &'a str,
    pub lang: &'a str,
}

/// Answer to `POST /v1/call/` and `POST /v1/code/call/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResponse {
    pub call_id: String,
}

/// Answer to `POST /v1/pool/{pool_id}/call/`.
///
/// `number` is the pool number that places the call and `code` the digits
/// the user will hear or see as caller ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCallResponse {
    pub call_id: String,
    pub number: String,
    pub code: String,
}

/// Answer to `GET /v1/call/{call_id}/`.
///
/// Timestamps come in two forms: human-readable strings and unix seconds.
/// Stages the call has not reached yet are null or absent and map to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStatus {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone_number: String,
    #[serde(default)]
    pub phone_number_raw: Option<String>,
    #[serde(default)]
    pub callback_url: Option<String>,
    #[serde(default)]
    pub ivr_answer: Option<String>,
    #[serde(default)]
    pub region_code: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_called: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_callback_sent: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_error: bool,
    #[serde(default)]
    pub error_info: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_at_unix: Option<i64>,
    #[serde(default)]
    pub called_at: Option<String>,
    #[serde(default)]
    pub called_at_unix: Option<i64>,
    #[serde(default)]
    pub answer_at: Option<String>,
    #[serde(default)]
    pub answer_at_unix: Option<i64>,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default)]
    pub finished_at_unix: Option<i64>,
}

/// Read an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CallStatus {
    /// The call finished (successfully or not).
    pub fn is_finished(&self) -> bool {
        self.finished_at_unix.is_some_and(|t| t > 0)
    }
}
