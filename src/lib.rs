//! Lazily-loaded directory picker.
//!
//! [`listing`] enumerates one directory below a fixed base and sniffs file
//! signatures; [`server`] exposes it over HTTP. [`picker`] is the popup
//! widget as a UI-agnostic state machine, fed through a [`source`].

pub mod error;
pub mod listing;
pub mod logging;
pub mod picker;
pub mod server;
pub mod source;
