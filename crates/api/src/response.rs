//! Small response bodies shared by several handlers.

use serde::Serialize;

/// `{ "success": true }`, returned by deletions and password changes.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// `{ "ok": true }`, returned by the newsletter and contact endpoints.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
