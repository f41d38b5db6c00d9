// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::api::{DashboardEntry, DashboardResponse};
use crate::errors::NodeError;
use crate::network::DistributionReader;
use crate::persistence::StateStore;

/// Builds the dashboard from persisted state: the last posted scores, the
/// address each identity proved, and its pending distribution when a
/// distribution contract is configured.
///
/// A failed pending lookup drops that one field; it never fails the page.
pub async fn build_dashboard(
    store: &StateStore,
    distribution: Option<&dyn DistributionReader>,
) -> Result<DashboardResponse, NodeError> {
    let history = store.load_history().await?;
    let cache = store.load_cache().await?;

    let mut out = DashboardResponse::new();
    for (identity, score) in history.iter() {
        let address = cache.get(identity);
        let pending = match (address, distribution) {
            (Some(addr), Some(reader)) => match reader.pending(&addr).await {
                Ok(amount) => Some(amount),
                Err(e) => {
                    tracing::warn!("Pending distribution for {} unavailable: {}", addr, e);
                    None
                }
            },
            _ => None,
        };
        out.insert(
            identity.to_string(),
            DashboardEntry {
                score,
                address,
                pending,
            },
        );
    }
    Ok(out)
}
