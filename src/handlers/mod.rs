//! HTTP handlers: extract, validate, call the service, map to a status.

pub mod leagues;
pub mod memberships;
pub mod players;
pub mod teams;
