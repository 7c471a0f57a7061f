//! Domain types and pure rules for the ViralThumb backend.
//!
//! This crate holds everything the generation pipeline and HTTP layer share
//! that does not touch I/O: the error taxonomy, account plan/role model,
//! generation batch constants and guards, displayable-URL classification,
//! and the templated metadata fallbacks.

pub mod account;
pub mod error;
pub mod generation;
pub mod types;
