//! Custom request extractors.

mod identity;
mod validated_json;

pub use identity::RequestIdentity;
pub use validated_json::ValidatedJson;
