//! Declarative endpoint catalogue + request dispatch.
//!
//! `courier` turns a YAML catalogue of endpoint definitions (method, URL
//! template, parameter declarations, body template, auth requirement) plus a
//! caller-supplied argument object into a fully-formed request descriptor —
//! or a precise, aggregate error before any network I/O happens.
//!
//! Per invocation: [`catalog::Catalog`] lookup → [`validate::validate`] →
//! [`request::build`] → (outside the core) a [`transport::Transport`].

pub mod catalog;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod request;
pub mod schema;
pub mod template;
pub mod transport;
pub mod validate;
