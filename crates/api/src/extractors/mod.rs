//! Request extractors.

pub mod admin_session;
pub mod device_auth;

pub use admin_session::AdminSession;
pub use device_auth::DeviceAuth;
