//! Service surface exposed to the binary and any embedding host.
//!
//! Versioned modules (currently `v1`) keep the interface stable while the
//! generation pipeline evolves underneath.

pub mod v1;
