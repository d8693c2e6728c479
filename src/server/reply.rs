// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

use crate::error::ErrorReport;

pub const UPSTREAM_FAILURE: &str = "Failed to fetch Pokemon data";

#[derive(Serialize)]
pub struct ErrorBody {
    error: String,
}

pub type Reply<T> = Result<Json<T>, (StatusCode, Json<ErrorBody>)>;

pub fn error_reply(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Log the underlying error; the client only learns that upstream failed.
pub fn upstream_failure(err: ErrorReport) -> (StatusCode, Json<ErrorBody>) {
    log::error!("{err}");
    error_reply(StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILURE)
}

pub fn database_failure(err: ErrorReport) -> (StatusCode, Json<ErrorBody>) {
    log::error!("{err}");
    error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
}
