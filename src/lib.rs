pub mod api;
pub mod client;
pub mod config;
pub mod console;
pub mod errors;
pub mod events;
pub mod models;
pub mod regions;
pub mod validation;

pub use api::ApiClient;
pub use client::{FormSyncClient, Nudge, Regions, Settled};
pub use config::{ChatFallback, ClientConfig};
pub use errors::{ErrorField, SyncError};
pub use events::{bind_page, Events, FieldId, FormId, RecommendationFields};
