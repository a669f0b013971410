//! Outbound peer communication.
//!
//! The actual transport (HTTP, WireGuard peers, in-process test routers)
//! lives outside the engine; it plugs in through [`PeerClient`]. The engine
//! only relies on best-effort delivery with a caller-supplied deadline per
//! call.

use crate::{
    state::{slots::ShareKind, NodeParameters},
    wire::{self, PeerShare, ReturnedShare},
};
use async_trait::async_trait;
use num_bigint::BigUint;
use shamir_sharing::party::PartyId;
use std::time::Duration;
use thiserror::Error;

/// The node's view of its peers.
#[async_trait]
pub trait PeerClient: Send + Sync {
    /// Delivers a round share to the peer at `endpoint`.
    async fn send_share(&self, endpoint: &str, kind: ShareKind, share: PeerShare) -> Result<(), PeerError>;

    /// Asks the peer at `endpoint` for its local value of a named share.
    async fn fetch_share(&self, endpoint: &str, name: &str) -> Result<ReturnedShare, PeerError>;
}

/// An error talking to a single peer.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum PeerError {
    /// The peer answered with a protocol-level rejection.
    #[error("peer rejected the request: {0}")]
    Rejected(String),

    /// The transport could not complete the exchange.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The caller-supplied deadline elapsed.
    #[error("peer call timed out")]
    TimedOut,
}

/// The per-peer outcome of a distribution round.
///
/// Individual dispatch failures do not abort the round; the orchestrator
/// reads the report and decides whether to retry after a reset.
#[derive(Debug, Default)]
pub struct DispatchReport {
    failures: Vec<(PartyId, PeerError)>,
}

impl DispatchReport {
    /// Whether every peer received its share.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The peers that did not receive their share, with the cause.
    pub fn failures(&self) -> &[(PartyId, PeerError)] {
        &self.failures
    }
}

/// Sends `values[i]` to party `i + 1` for every peer, skipping this node.
///
/// All sends are dispatched concurrently and gathered; each send races the
/// deadline independently. The caller stores its own point before calling.
pub(crate) async fn distribute_shares(
    peers: &dyn PeerClient,
    parameters: &NodeParameters,
    kind: ShareKind,
    values: &[BigUint],
    deadline: Duration,
) -> DispatchReport {
    let own_index = parameters.id().index();
    let sends = parameters.parties().iter().zip(values.iter()).enumerate().filter(|(index, _)| *index != own_index).map(
        |(index, (endpoint, value))| {
            let share = PeerShare { party_id: parameters.id().get(), value: wire::encode(value) };
            async move {
                let result = tokio::time::timeout(deadline, peers.send_share(endpoint, kind, share))
                    .await
                    .unwrap_or(Err(PeerError::TimedOut));
                (index, result)
            }
        },
    );
    let mut report = DispatchReport::default();
    for (index, result) in futures::future::join_all(sends).await {
        if let Err(error) = result {
            let party = PartyId::new(index as u32 + 1).unwrap_or(parameters.id());
            tracing::warn!(kind = %kind, party = %party, %error, "share dispatch failed");
            report.failures.push((party, error));
        }
    }
    report
}

/// Fetches a named share from a single peer under the deadline.
pub(crate) async fn fetch_share(
    peers: &dyn PeerClient,
    endpoint: &str,
    name: &str,
    deadline: Duration,
) -> Result<ReturnedShare, PeerError> {
    tokio::time::timeout(deadline, peers.fetch_share(endpoint, name)).await.unwrap_or(Err(PeerError::TimedOut))
}
