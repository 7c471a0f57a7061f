//! Authentication support: JWT claims validation.
//!
//! Session issuance belongs to the external identity provider; this module
//! only validates the tokens it mints.

pub mod jwt;
