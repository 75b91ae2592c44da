pub mod client;
pub mod config;
pub mod form;
pub mod payload;
pub mod render;
pub mod session;

pub use client::{HealthStatus, PredictClient, PredictError};
pub use config::Config;
pub use form::FormData;
pub use payload::{build_payload, normalize, FeaturePayload, FieldValue};
pub use render::{format_usd, render_outcome};
pub use session::{PredictionSession, SessionError, StatusSink};
