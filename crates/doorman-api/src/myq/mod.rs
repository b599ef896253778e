// MyQ v4 API client modules
//
// Hand-written client for the three endpoints the door controller needs:
// user validation, device listing, and the `desireddoorstate` attribute.

pub mod auth;
pub mod client;
pub mod devices;
pub mod models;

pub use auth::Credentials;
pub use client::MyQClient;
