#![allow(dead_code)]
//! An in-process cluster that drives the protocol the way the external
//! orchestrator does, routing peer traffic between in-memory nodes. No
//! networking is involved; the router simply forwards outbound messages to
//! the addressed node's state.

use async_trait::async_trait;
use math_lib::modular::PrimeField;
use node::{
    ops,
    state::{slots::ShareKind, NodeState},
    transport::{PeerClient, PeerError},
    wire::{self, PeerShare, ReturnedShare},
};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use shamir_sharing::protocol::{PolyDegree, Shamir};
use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

const DEADLINE: Duration = Duration::from_secs(5);

/// Routes peer calls straight into the target node's state.
#[derive(Clone)]
pub struct Router {
    nodes: Vec<Arc<Mutex<NodeState>>>,
    endpoints: Vec<String>,
}

impl Router {
    fn index_of(&self, endpoint: &str) -> Result<usize, PeerError> {
        self.endpoints
            .iter()
            .position(|candidate| candidate == endpoint)
            .ok_or_else(|| PeerError::Transport(format!("unknown endpoint {endpoint}")))
    }
}

#[async_trait]
impl PeerClient for Router {
    async fn send_share(&self, endpoint: &str, kind: ShareKind, share: PeerShare) -> Result<(), PeerError> {
        let index = self.index_of(endpoint)?;
        let mut state = self.nodes[index].lock().unwrap();
        ops::shares::receive_share(&mut state, kind, share.party_id, &share.value, true)
            .map_err(|error| PeerError::Rejected(error.to_string()))
    }

    async fn fetch_share(&self, endpoint: &str, name: &str) -> Result<ReturnedShare, PeerError> {
        let index = self.index_of(endpoint)?;
        let state = self.nodes[index].lock().unwrap();
        ops::reconstruction::return_share_to_reconstruct(&state, name, true)
            .map_err(|error| PeerError::Rejected(error.to_string()))
    }
}

/// A fully initialized `n`-node network.
pub struct Cluster {
    router: Router,
    field: PrimeField,
    threshold: u32,
}

impl Cluster {
    /// Boots `n` nodes sharing the given prime and computes `A` on each.
    pub fn new(prime: u64, n: usize) -> Self {
        let endpoints: Vec<String> = (1..=n).map(|id| format!("mem://node-{id}")).collect();
        let nodes: Vec<Arc<Mutex<NodeState>>> = (0..n).map(|_| Arc::new(Mutex::new(NodeState::new()))).collect();
        let prime_hex = wire::encode(&BigUint::from(prime));
        for (index, node) in nodes.iter().enumerate() {
            let mut state = node.lock().unwrap();
            ops::init::set_initial_values(&mut state, index as u32 + 1, &prime_hex, endpoints.clone()).unwrap();
            ops::init::compute_reduction_matrix(&mut state).unwrap();
        }
        let field = PrimeField::new(BigUint::from(prime)).unwrap();
        let threshold = (n as u32 - 1) / 2;
        Self { router: Router { nodes, endpoints }, field, threshold }
    }

    /// The shared field.
    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    /// The number of nodes.
    pub fn len(&self) -> usize {
        self.router.nodes.len()
    }

    /// Locks one node's state.
    pub fn node(&self, index: usize) -> MutexGuard<'_, NodeState> {
        self.router.nodes[index].lock().unwrap()
    }

    /// The router, usable as the peer client of any node.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// A Shamir instance matching the cluster parameters, for playing client.
    pub fn shamir(&self) -> Shamir {
        Shamir::new(self.threshold, self.len() as u32, self.field.clone()).unwrap()
    }

    /// Shares a client secret to every node under the given client id.
    pub fn submit_bid(&self, client_id: u64, secret: u64) {
        let shares = self.shamir().generate_shares(&BigUint::from(secret), PolyDegree::T).unwrap();
        for (party, value) in shares {
            let mut state = self.node(party.index());
            ops::shares::put_client_share(&mut state, client_id, &wire::encode(&value)).unwrap();
        }
    }

    /// Shares a secret to every node into a named register.
    pub fn share_into_register(&self, name: &str, secret: u64) {
        let shares = self.shamir().generate_shares(&BigUint::from(secret), PolyDegree::T).unwrap();
        for (party, value) in shares {
            let mut state = self.node(party.index());
            ops::shares::set_share(&mut state, name, &wire::encode(&value)).unwrap();
        }
    }

    /// Sets the same clear constant into a named register on every node.
    pub fn set_constant(&self, name: &str, value: &BigUint) {
        for index in 0..self.len() {
            let mut state = self.node(index);
            ops::shares::set_share(&mut state, name, &wire::encode(value)).unwrap();
        }
    }

    pub async fn reset_calculation(&self) {
        for index in 0..self.len() {
            ops::reset::reset_calculation(&mut self.node(index)).unwrap();
        }
    }

    pub async fn redistribute_q(&self) {
        for index in 0..self.len() {
            let mut state = self.node(index);
            let report = ops::multiplication::redistribute_q(&mut state, &self.router, DEADLINE).await.unwrap();
            assert!(report.is_complete(), "q dispatch failed: {:?}", report.failures());
        }
    }

    pub async fn redistribute_r(&self, first: &str, second: &str) {
        for index in 0..self.len() {
            let mut state = self.node(index);
            let report =
                ops::multiplication::redistribute_r(&mut state, &self.router, first, second, DEADLINE).await.unwrap();
            assert!(report.is_complete(), "r dispatch failed: {:?}", report.failures());
        }
    }

    pub async fn finalize_multiplication(&self, out: &str) {
        for index in 0..self.len() {
            let mut state = self.node(index);
            ops::multiplication::calculate_multiplicative_share(&mut state).unwrap();
            ops::multiplication::commit_multiplicative_share(&mut state, out).unwrap();
        }
    }

    /// A full multiplication round group: `[out] = [first] * [second]`.
    pub async fn multiply(&self, first: &str, second: &str, out: &str) {
        self.reset_calculation().await;
        self.redistribute_q().await;
        self.redistribute_r(first, second).await;
        self.finalize_multiplication(out).await;
    }

    /// `[out] = [first] + [second]`.
    pub async fn add(&self, first: &str, second: &str, out: &str) {
        for index in 0..self.len() {
            let mut state = self.node(index);
            ops::additive::calculate_additive_share(&mut state, first, second).unwrap();
            ops::additive::commit_additive_share(&mut state, out).unwrap();
        }
    }

    /// `[out] = [first] ^ [second]` on shared bits.
    ///
    /// The multiplication happens first because its round group resets the
    /// transient primitive outputs; the additive share is recomputed after.
    pub async fn xor(&self, first: &str, second: &str, out: &str) {
        self.reset_calculation().await;
        self.redistribute_q().await;
        self.redistribute_r(first, second).await;
        for index in 0..self.len() {
            let mut state = self.node(index);
            ops::multiplication::calculate_multiplicative_share(&mut state).unwrap();
            ops::additive::calculate_additive_share(&mut state, first, second).unwrap();
            ops::additive::calculate_xor_share(&mut state).unwrap();
            ops::additive::commit_xor_share(&mut state, out).unwrap();
        }
    }

    /// Opens a named share from the given node's perspective.
    pub async fn reconstruct(&self, index: usize, name: &str) -> BigUint {
        let state = self.node(index);
        ops::reconstruction::reconstruct_share(&state, &self.router, name, DEADLINE).await.unwrap()
    }

    /// Generates one shared random bit and stores it at `bit_index`.
    ///
    /// Runs the square-root construction: share a random `u`, square and
    /// open it, and turn `(w^-1 * u + 1) / 2` into the bit share. Retries
    /// whenever the opened square is zero.
    pub async fn random_bit(&self, bit_index: usize) {
        loop {
            self.reset_calculation().await;
            for index in 0..self.len() {
                let mut state = self.node(index);
                let report = ops::random::redistribute_u(&mut state, &self.router, DEADLINE).await.unwrap();
                assert!(report.is_complete(), "u dispatch failed: {:?}", report.failures());
            }
            for index in 0..self.len() {
                ops::random::calculate_shared_u(&mut self.node(index)).unwrap();
            }
            self.multiply("u", "u", "v").await;
            let opened_v = self.reconstruct(0, "v").await;
            if opened_v.is_zero() {
                continue;
            }
            let root = match self.field.sqrt(&opened_v) {
                Ok(root) if !root.is_zero() => root,
                _ => continue,
            };
            let root_inverse = self.field.inverse(&root).unwrap();
            self.set_constant("w_inverse", &root_inverse);
            self.multiply("w_inverse", "u", "scaled_u").await;
            self.set_constant("one", &BigUint::one());
            self.add("scaled_u", "one", "shifted_u").await;
            let half = self.field.inverse(&BigUint::from(2u32)).unwrap();
            self.set_constant("half", &half);
            self.multiply("shifted_u", "half", "temporary_random_bit").await;
            for index in 0..self.len() {
                ops::random::store_random_number_bit(&mut self.node(index), bit_index).unwrap();
            }
            return;
        }
    }

    /// Generates the shared random integer from `bit_count` random bits.
    pub async fn random_number(&self, bit_count: usize) {
        for bit_index in 0..bit_count {
            self.random_bit(bit_index).await;
        }
        for index in 0..self.len() {
            ops::random::calculate_random_number_share(&mut self.node(index)).unwrap();
        }
    }

    /// One per-bit xor pass of the comparison: `z_table[i] = a_i ^ [r_i]`.
    async fn xor_z_table_entry(&self, bit_index: usize) {
        self.reset_calculation().await;
        self.redistribute_q().await;
        for index in 0..self.len() {
            let mut state = self.node(index);
            let report = ops::comparison::redistribute_r_for_z_table(&mut state, &self.router, bit_index, DEADLINE)
                .await
                .unwrap();
            assert!(report.is_complete(), "z-table r dispatch failed: {:?}", report.failures());
        }
        for index in 0..self.len() {
            let mut state = self.node(index);
            ops::multiplication::calculate_multiplicative_share(&mut state).unwrap();
            ops::comparison::calculate_additive_share_of_z_table(&mut state, bit_index).unwrap();
            ops::additive::calculate_xor_share(&mut state).unwrap();
            ops::comparison::set_z_table_to_xor_share(&mut state, bit_index).unwrap();
        }
    }

    /// Runs the full comparison circuit; the reconstructed result is `1`
    /// iff the first client's bid is greater than or equal to the second's.
    pub async fn compare(&self, first_client: u64, second_client: u64, l: u32, k: u32) -> BigUint {
        for index in 0..self.len() {
            ops::reset::reset_comparison(&mut self.node(index)).unwrap();
        }
        self.random_number((l + k + 1) as usize).await;

        for index in 0..self.len() {
            ops::comparison::calculate_comparison_a(&mut self.node(index), first_client, second_client, l, k)
                .unwrap();
        }
        let opened_a = self.reconstruct(0, "comparison_a").await;
        let opened_a_hex = wire::encode(&opened_a);
        for index in 0..self.len() {
            ops::comparison::prepare_z_tables(&mut self.node(index), &opened_a_hex, l as usize, k as usize)
                .unwrap();
        }

        for bit_index in (0..l as usize).rev() {
            self.xor_z_table_entry(bit_index).await;
        }

        for index in 0..self.len() {
            ops::comparison::initialize_z_and_cap_z(&mut self.node(index), l as usize).unwrap();
        }
        for bit_index in (0..l as usize).rev() {
            for index in 0..self.len() {
                ops::comparison::prepare_next_romb(&mut self.node(index), bit_index).unwrap();
            }
            self.multiply("x", "y", "z").await;
            self.xor("X", "Y", "Z").await;
            self.multiply("x", "Z", "Z").await;
            self.xor("Z", "X", "Z").await;
        }

        for index in 0..self.len() {
            ops::comparison::prepare_res_xors(&mut self.node(index), l as usize, l as usize).unwrap();
        }
        self.xor("a_l", "r_l", "res").await;
        self.xor("res", "Z", "res").await;
        self.reconstruct(0, "res").await
    }
}
