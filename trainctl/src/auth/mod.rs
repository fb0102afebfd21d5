//! Credential handling for `users` rows.

pub mod password;
