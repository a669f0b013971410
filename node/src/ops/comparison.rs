//! The bit-level comparison engine.
//!
//! The orchestrator drives the comparison circuit through these steps: mask
//! and open `a`, expand its bits, xor each low bit against the shared
//! random bits, then sweep the romb recurrence
//! `(x, X) ◇ (y, Y) = (x*y, x*(X^Y) ^ X)` from the top bit down. The final
//! result bit is `a_l ^ [r_l] ^ [Z]`.

use crate::{
    errors::NodeError,
    ops::multiplication::run_round_r,
    state::{registers::ShareName, NodeState},
    transport::{DispatchReport, PeerClient},
    wire,
};
use math_lib::conversions::bits_le;
use num_bigint::BigUint;
use num_traits::Zero;
use std::time::Duration;

/// Computes the masked comparison operand.
///
/// `[a] = 2^(l+k+1) - [r] + 2^l + [x] - [y] mod p`, where `[x]`, `[y]` are
/// the two clients' bid shares and `[r]` is the shared random integer. The
/// mask keeps the opened value from leaking the bid ordering directly.
pub fn calculate_comparison_a(
    state: &mut NodeState,
    first_client_id: u64,
    second_client_id: u64,
    l: u32,
    k: u32,
) -> Result<(), NodeError> {
    let field = state.parameters()?.field().clone();
    let random_share =
        state.random_number_share.clone().ok_or_else(|| NodeError::not_initialized("random_number_share"))?;
    if state.client_shares.len() < 2 {
        return Err(NodeError::bad_request("at least two client shares must be configured"));
    }
    if first_client_id == second_client_id {
        return Err(NodeError::bad_request("client ids must be different"));
    }
    let (first, second) = match (state.client_share(first_client_id), state.client_share(second_client_id)) {
        (Some(first), Some(second)) => (first.clone(), second.clone()),
        _ => return Err(NodeError::bad_request("shares not set for one or both clients")),
    };

    let mut a = field.two_pow(u64::from(l) + u64::from(k) + 1);
    a = field.sub(&a, &random_share);
    a = field.add(&a, &field.two_pow(u64::from(l)));
    a = field.add(&a, &first);
    a = field.sub(&a, &second);
    state.registers.set(&ShareName::ComparisonA, a);
    Ok(())
}

/// Expands the opened `a` and seeds both z-tables with its clear bits.
///
/// The bit expansion is padded to `l + k + 2` entries so the `l`-th bit is
/// always addressable by the final xor.
pub fn prepare_z_tables(state: &mut NodeState, opened_a_hex: &str, l: usize, k: usize) -> Result<(), NodeError> {
    state.parameters()?;
    let opened = wire::decode(opened_a_hex).map_err(|error| NodeError::bad_request(error.to_string()))?;
    let mut bits = bits_le(&opened);
    let padded_len = l + k + 2;
    if bits.len() < padded_len {
        bits.resize(padded_len, 0);
    }
    state.z_table = bits.iter().take(l).map(|bit| BigUint::from(*bit)).collect();
    state.cap_z_table = state.z_table.clone();
    state.comparison_a_bits = bits;
    Ok(())
}

/// Looks up the clear `a` bit and shared `r` bit at `index`.
fn bit_operands(state: &NodeState, index: usize) -> Result<(BigUint, BigUint), NodeError> {
    let a_bit = state
        .comparison_a_bits
        .get(index)
        .ok_or_else(|| NodeError::bad_request("index out of bounds for comparison_a_bits"))?;
    let r_bit = state
        .random_number_bit_shares
        .get(index)
        .ok_or_else(|| NodeError::bad_request("index out of bounds for random_number_bit_shares"))?
        .as_ref()
        .ok_or_else(|| NodeError::not_initialized(format!("random_number_bit_shares[{index}]")))?;
    Ok((BigUint::from(*a_bit), r_bit.clone()))
}

/// Additive step of the per-bit xor: `a_i + [r_i] mod p`.
pub fn calculate_additive_share_of_z_table(state: &mut NodeState, index: usize) -> Result<(), NodeError> {
    let field = state.parameters()?.field().clone();
    let (a_bit, r_bit) = bit_operands(state, index)?;
    state.additive_share = Some(field.add(&a_bit, &r_bit));
    Ok(())
}

/// Round R of the per-bit xor's multiplication: operand product `a_i * [r_i]`.
pub async fn redistribute_r_for_z_table(
    state: &mut NodeState,
    peers: &dyn PeerClient,
    index: usize,
    deadline: Duration,
) -> Result<DispatchReport, NodeError> {
    let field = state.parameters()?.field().clone();
    let (a_bit, r_bit) = bit_operands(state, index)?;
    let product = field.mul(&a_bit, &r_bit);
    run_round_r(state, peers, product, deadline).await
}

/// Replaces the z-table entry at `index` with the computed xor share.
pub fn set_z_table_to_xor_share(state: &mut NodeState, index: usize) -> Result<(), NodeError> {
    let share = state.xor_share.clone().ok_or_else(|| NodeError::not_initialized("xor_share"))?;
    let entry =
        state.z_table.get_mut(index).ok_or_else(|| NodeError::bad_request("index out of bounds for z_table"))?;
    *entry = share;
    Ok(())
}

/// Seeds the romb accumulator from the top of the tables.
pub fn initialize_z_and_cap_z(state: &mut NodeState, l: usize) -> Result<(), NodeError> {
    if l < 1 || l > state.z_table.len() || l > state.cap_z_table.len() {
        return Err(NodeError::bad_request(
            "invalid value for l, it must be between 1 and the z-table length",
        ));
    }
    let z = state.z_table.get(l - 1).cloned().ok_or_else(|| NodeError::bad_request("index out of bounds for z_table"))?;
    let cap_z = state
        .cap_z_table
        .get(l - 1)
        .cloned()
        .ok_or_else(|| NodeError::bad_request("index out of bounds for Z_table"))?;
    state.registers.set(&ShareName::Z, z);
    state.registers.set(&ShareName::CapZ, cap_z);
    Ok(())
}

/// Loads the romb operands for the next sweep step.
///
/// `x, X` take the accumulator; `y, Y` take the table entries below the
/// current index, or zeros once the sweep reaches bit zero.
pub fn prepare_next_romb(state: &mut NodeState, index: usize) -> Result<(), NodeError> {
    let z = state.registers.get(&ShareName::Z).cloned().ok_or_else(|| NodeError::not_initialized("z"))?;
    let cap_z = state.registers.get(&ShareName::CapZ).cloned().ok_or_else(|| NodeError::not_initialized("Z"))?;
    if index > state.z_table.len() || index > state.cap_z_table.len() {
        return Err(NodeError::bad_request("index out of bounds for z_table"));
    }
    let (y, cap_y) = if index == 0 {
        (BigUint::zero(), BigUint::zero())
    } else {
        let y = state
            .z_table
            .get(index - 1)
            .cloned()
            .ok_or_else(|| NodeError::bad_request("index out of bounds for z_table"))?;
        let cap_y = state
            .cap_z_table
            .get(index - 1)
            .cloned()
            .ok_or_else(|| NodeError::bad_request("index out of bounds for Z_table"))?;
        (y, cap_y)
    };
    state.registers.set(&ShareName::X, z);
    state.registers.set(&ShareName::CapX, cap_z);
    state.registers.set(&ShareName::Y, y);
    state.registers.set(&ShareName::CapY, cap_y);
    Ok(())
}

/// Loads the clear `a_l` bit and the `[r_l]` share for the final xors.
pub fn prepare_res_xors(state: &mut NodeState, a_bit_index: usize, r_bit_index: usize) -> Result<(), NodeError> {
    let a_bit = state
        .comparison_a_bits
        .get(a_bit_index)
        .ok_or_else(|| NodeError::bad_request("invalid comparison_a_bit_index"))?;
    let r_bit = state
        .random_number_bit_shares
        .get(r_bit_index)
        .ok_or_else(|| NodeError::bad_request("invalid random_number_bit_share_index"))?
        .as_ref()
        .ok_or_else(|| NodeError::not_initialized(format!("random_number_bit_shares[{r_bit_index}]")))?
        .clone();
    state.registers.set(&ShareName::AL, BigUint::from(*a_bit));
    state.registers.set(&ShareName::RL, r_bit);
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
#[cfg(test)]
mod test {
    use super::*;
    use crate::ops::init;

    fn initialized_state() -> NodeState {
        let mut state = NodeState::new();
        let parties = (1..=3).map(|id| format!("mem://node-{id}")).collect();
        init::set_initial_values(&mut state, 1, "0x35", parties).unwrap();
        state
    }

    #[test]
    fn z_tables_are_seeded_with_padded_bits() {
        let mut state = initialized_state();
        // 0x6 = 110b, little-endian [0, 1, 1], padded to l + k + 2 = 6.
        prepare_z_tables(&mut state, "0x6", 3, 1).unwrap();
        assert_eq!(state.comparison_a_bits, vec![0, 1, 1, 0, 0, 0]);
        let expected: Vec<BigUint> = [0u32, 1, 1].iter().map(|bit| BigUint::from(*bit)).collect();
        assert_eq!(state.z_table, expected);
        assert_eq!(state.cap_z_table, expected);
    }

    #[test]
    fn long_openings_keep_all_their_bits() {
        let mut state = initialized_state();
        prepare_z_tables(&mut state, "0x2f", 3, 1).unwrap();
        // 0x2f = 101111b already exceeds the padding length.
        assert_eq!(state.comparison_a_bits, vec![1, 1, 1, 1, 0, 1]);
    }

    #[test]
    fn masked_operand_uses_the_random_share() {
        let mut state = initialized_state();
        state.client_shares.push((1, BigUint::from(21u32)));
        state.client_shares.push((2, BigUint::from(23u32)));
        state.random_number_share = Some(BigUint::from(11u32));
        calculate_comparison_a(&mut state, 1, 2, 3, 1).unwrap();
        // 2^5 - 11 + 2^3 + 21 - 23 = 27 mod 53.
        let a = state.registers.get(&ShareName::ComparisonA).unwrap();
        assert_eq!(a, &BigUint::from(27u32));
    }

    #[test]
    fn comparison_a_requires_two_distinct_clients() {
        let mut state = initialized_state();
        state.random_number_share = Some(BigUint::from(1u32));
        state.client_shares.push((1, BigUint::from(4u32)));
        state.client_shares.push((2, BigUint::from(5u32)));
        let result = calculate_comparison_a(&mut state, 1, 1, 3, 1);
        assert!(matches!(result, Err(NodeError::BadRequest(_))));
    }

    #[test]
    fn romb_preparation_zeroes_the_bottom_step() {
        let mut state = initialized_state();
        prepare_z_tables(&mut state, "0x6", 3, 1).unwrap();
        state.registers.set(&ShareName::Z, BigUint::from(7u32));
        state.registers.set(&ShareName::CapZ, BigUint::from(9u32));
        prepare_next_romb(&mut state, 0).unwrap();
        assert_eq!(state.registers.get(&ShareName::X), Some(&BigUint::from(7u32)));
        assert_eq!(state.registers.get(&ShareName::CapX), Some(&BigUint::from(9u32)));
        assert_eq!(state.registers.get(&ShareName::Y), Some(&BigUint::zero()));
        assert_eq!(state.registers.get(&ShareName::CapY), Some(&BigUint::zero()));
    }

    #[test]
    fn romb_preparation_reads_the_tables_below() {
        let mut state = initialized_state();
        prepare_z_tables(&mut state, "0x6", 3, 1).unwrap();
        state.registers.set(&ShareName::Z, BigUint::from(7u32));
        state.registers.set(&ShareName::CapZ, BigUint::from(9u32));
        prepare_next_romb(&mut state, 2).unwrap();
        assert_eq!(state.registers.get(&ShareName::Y), Some(&BigUint::from(1u32)));
        assert_eq!(state.registers.get(&ShareName::CapY), Some(&BigUint::from(1u32)));
    }

    #[test]
    fn accumulator_seed_validates_the_length() {
        let mut state = initialized_state();
        prepare_z_tables(&mut state, "0x6", 3, 1).unwrap();
        assert!(matches!(initialize_z_and_cap_z(&mut state, 0), Err(NodeError::BadRequest(_))));
        assert!(matches!(initialize_z_and_cap_z(&mut state, 4), Err(NodeError::BadRequest(_))));
        initialize_z_and_cap_z(&mut state, 3).unwrap();
        assert_eq!(state.registers.get(&ShareName::Z), Some(&BigUint::from(1u32)));
    }

    #[test]
    fn z_table_bit_operands_are_bounds_checked() {
        let mut state = initialized_state();
        prepare_z_tables(&mut state, "0x6", 3, 1).unwrap();
        let result = calculate_additive_share_of_z_table(&mut state, 0);
        assert!(matches!(result, Err(NodeError::BadRequest(_))), "no random bit shares are stored yet");

        state.random_number_bit_shares = vec![Some(BigUint::from(1u32))];
        calculate_additive_share_of_z_table(&mut state, 0).unwrap();
        assert_eq!(state.additive_share, Some(BigUint::from(1u32)));
    }
}
