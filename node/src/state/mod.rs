//! The process-wide node state.

pub mod registers;
pub mod slots;
pub mod stage;

use crate::errors::NodeError;
use math_lib::{matrix::Matrix, modular::PrimeField};
use num_bigint::BigUint;
use registers::Registers;
use shamir_sharing::{party::PartyId, protocol::Shamir};
use slots::{ShareKind, SlotArray};
use stage::RoundStage;

/// The protocol parameters fixed at initialization time.
#[derive(Clone, Debug)]
pub struct NodeParameters {
    id: PartyId,
    threshold: u32,
    parties: Vec<String>,
    field: PrimeField,
}

impl NodeParameters {
    /// This node's party id.
    pub fn id(&self) -> PartyId {
        self.id
    }

    /// The corruption threshold `t`.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// The number of parties `n = 2t + 1`.
    pub fn party_count(&self) -> u32 {
        self.parties.len() as u32
    }

    /// The ordered peer endpoints.
    pub fn parties(&self) -> &[String] {
        &self.parties
    }

    /// The shared prime field.
    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    /// A Shamir protocol instance over the configured parameters.
    pub fn shamir(&self) -> Result<Shamir, NodeError> {
        Shamir::new(self.threshold, self.party_count(), self.field.clone())
            .map_err(|e| NodeError::Internal(format!("unusable sharing parameters: {e}")))
    }
}

/// The node's entire in-memory protocol state.
///
/// The state is owned by the node process and mutated exclusively through
/// the operations in [`crate::ops`]; the transport layer serializes the
/// requests that reach it.
#[derive(Debug, Default)]
pub struct NodeState {
    parameters: Option<NodeParameters>,
    reduction_matrix: Option<Matrix>,
    pub(crate) client_shares: Vec<(u64, BigUint)>,
    pub(crate) shared_q: SlotArray,
    pub(crate) shared_r: SlotArray,
    pub(crate) shared_u: SlotArray,
    pub(crate) registers: Registers,
    pub(crate) multiplicative_share: Option<BigUint>,
    pub(crate) additive_share: Option<BigUint>,
    pub(crate) xor_share: Option<BigUint>,
    pub(crate) random_number_bit_shares: Vec<Option<BigUint>>,
    pub(crate) random_number_share: Option<BigUint>,
    pub(crate) z_table: Vec<BigUint>,
    pub(crate) cap_z_table: Vec<BigUint>,
    pub(crate) comparison_a_bits: Vec<u8>,
    stage: RoundStage,
}

impl NodeState {
    /// A freshly booted, uninitialized node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the protocol parameters; rejected if any are already set.
    pub(crate) fn initialize(
        &mut self,
        id: PartyId,
        field: PrimeField,
        parties: Vec<String>,
    ) -> Result<(), NodeError> {
        if self.parameters.is_some() {
            return Err(NodeError::AlreadyInitialized("protocol parameters"));
        }
        let n = parties.len() as u32;
        let threshold = (n.saturating_sub(1)) / 2;
        if threshold == 0 || 2 * threshold + 1 != n {
            return Err(NodeError::bad_request("invalid t or n values"));
        }
        if id.get() > n {
            return Err(NodeError::bad_request("invalid party id"));
        }
        self.shared_q = SlotArray::new(n as usize);
        self.shared_r = SlotArray::new(n as usize);
        self.shared_u = SlotArray::new(n as usize);
        self.parameters = Some(NodeParameters { id, threshold, parties, field });
        self.stage = RoundStage::Initialized;
        Ok(())
    }

    /// The configured parameters.
    pub fn parameters(&self) -> Result<&NodeParameters, NodeError> {
        self.parameters.as_ref().ok_or_else(|| NodeError::not_initialized("protocol parameters"))
    }

    /// The degree-reduction matrix `A`.
    pub fn reduction_matrix(&self) -> Result<&Matrix, NodeError> {
        self.reduction_matrix.as_ref().ok_or_else(|| NodeError::not_initialized("A"))
    }

    pub(crate) fn set_reduction_matrix(&mut self, matrix: Matrix) -> Result<(), NodeError> {
        if self.reduction_matrix.is_some() {
            return Err(NodeError::AlreadyInitialized("A"));
        }
        self.reduction_matrix = Some(matrix);
        Ok(())
    }

    /// The current round stage label.
    pub fn stage(&self) -> RoundStage {
        self.stage
    }

    pub(crate) fn set_stage(&mut self, stage: RoundStage) {
        self.stage = stage;
    }

    /// Round guard: the operation is only valid in `expected`.
    pub(crate) fn require_stage(&self, expected: RoundStage) -> Result<(), NodeError> {
        if self.stage != expected {
            return Err(NodeError::BadState(self.stage));
        }
        Ok(())
    }

    /// The register file.
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// The inbound buffer for the given share kind.
    pub fn slots(&self, kind: ShareKind) -> &SlotArray {
        match kind {
            ShareKind::Q => &self.shared_q,
            ShareKind::R => &self.shared_r,
            ShareKind::U => &self.shared_u,
        }
    }

    pub(crate) fn slots_mut(&mut self, kind: ShareKind) -> &mut SlotArray {
        match kind {
            ShareKind::Q => &mut self.shared_q,
            ShareKind::R => &mut self.shared_r,
            ShareKind::U => &mut self.shared_u,
        }
    }

    /// The aggregated random-integer share, once calculated.
    pub fn random_number_share(&self) -> Option<&BigUint> {
        self.random_number_share.as_ref()
    }

    /// The share a client submitted, if any.
    pub fn client_share(&self, client_id: u64) -> Option<&BigUint> {
        self.client_shares.iter().find(|(id, _)| *id == client_id).map(|(_, share)| share)
    }

    /// Clears the transient primitive outputs and the round buffers.
    pub(crate) fn clear_calculation(&mut self) {
        self.multiplicative_share = None;
        self.additive_share = None;
        self.xor_share = None;
        self.shared_q.reset();
        self.shared_r.reset();
        self.shared_u.reset();
        self.stage = RoundStage::Initialized;
    }

    /// Additionally clears the comparison tables and the register file.
    pub(crate) fn clear_comparison(&mut self) {
        self.clear_calculation();
        self.registers.clear();
        self.random_number_bit_shares.clear();
        self.random_number_share = None;
        self.z_table.clear();
        self.cap_z_table.clear();
        self.comparison_a_bits.clear();
    }

    /// Wipes everything, returning the node to its freshly booted state.
    pub(crate) fn wipe(&mut self) {
        *self = Self::default();
    }
}
