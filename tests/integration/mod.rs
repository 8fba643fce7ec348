//! Integration tests for tree fingerprinting and trace mirroring

mod cli_requests;
mod sha256_verification;
mod trace_mirroring;
