//! Capabilities the core uses to talk to the shell.
//!
//! We use Crux's built-in Render capability directly because it provides
//! all necessary functionality for triggering view updates. HTTP goes
//! through `crux_http`; the helpers in `http` validate where requests go
//! and normalize what comes back.
mod http;

pub use self::http::{
    into_body, ApiBaseUrl, ApiConfig, ConfigError, HttpOutput, HttpResult,
    DEFAULT_API_BASE, MAX_URL_LENGTH,
};

pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::event::Event;
// The `Effect` derive wires the capabilities to the app type by this name.
use crate::App;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
}
