//! # Quantum-Chain Test Suite
//!
//! Cross-crate flows: raw transaction bytes through the ante chain into the
//! asset handler and the ledger.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── app.rs            # TestApp: decode, ante, route, commit
//! └── integration/
//!     ├── ante_flows.rs # fees, signatures, sequences, gas
//!     └── asset_flows.rs# coin lifecycle driven by signed txs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qc-tests
//! cargo test -p qc-tests integration::ante_flows
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

pub mod app;
pub mod integration;
