// Internal types - not part of the HTTP surface
pub mod auth;
