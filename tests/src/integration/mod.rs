//! Integration flows across the ante chain and the asset ledger.

mod ante_flows;
mod asset_flows;
