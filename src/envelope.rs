use serde::Serialize;

use crate::users::dto::UserView;

/// Caller-visible result codes carried in [`Envelope::code`].
pub mod codes {
    pub const OK: i32 = 0;
    pub const BAD_REQUEST: i32 = 400;
    /// Delete reports a missing id with its own code.
    pub const DELETE_ID_REQUIRED: i32 = 401;
    /// Delete reports an unknown id with its own code.
    pub const DELETE_NOT_FOUND: i32 = 402;
    pub const INTERNAL: i32 = 500;
}

/// Optional success payload of an envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    None,
    User(UserView),
    Users(Vec<UserView>),
}

impl Payload {
    pub fn is_none(&self) -> bool {
        matches!(self, Payload::None)
    }
}

/// Uniform `{code, message, data}` response returned by every user operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Payload::is_none")]
    pub data: Payload,
}

impl Envelope {
    pub fn ok() -> Self {
        Self::with_data(Payload::None)
    }

    pub fn with_data(data: Payload) -> Self {
        Self {
            code: codes::OK,
            message: "OK".into(),
            data,
        }
    }

    pub fn fail(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: Payload::None,
        }
    }

    #[cfg(test)]
    pub fn is_ok(&self) -> bool {
        self.code == codes::OK
    }
}
