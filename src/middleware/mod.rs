// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (security headers, request timing).

pub mod security;
pub mod timing;

pub use timing::track_request_duration;
