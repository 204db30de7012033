//! Action payload decoding.
//!
//! Payloads are sequences of 32-byte ABI words (`abi.encode` of static fields). Decoding is
//! strict: short payloads, trailing bytes, dirty address words and oversized `v` words fail.

use alloc::vec::Vec;
use stylus_sdk::alloy_primitives::{Address, FixedBytes, U256};

use crate::{
    errors::DecodeError,
    types::{Action, ActionTag, ModuleCall, VaultRef},
};

const WORD: usize = 32;

/// Decode one `(tag, payload)` pair.
pub fn decode_action(tag: u8, payload: &[u8]) -> Result<Action, DecodeError> {
    let tag = ActionTag::try_from(tag).map_err(|_| DecodeError::UnknownTag(tag))?;
    let mut i = 0usize;

    let action = match tag {
        ActionTag::CreateVault => {
            let recipient = read_address(payload, &mut i)?;
            Action::CreateVault { recipient }
        }
        ActionTag::CloseVault => {
            let vault = read_vault_ref(payload, &mut i)?;
            Action::CloseVault { vault }
        }
        ActionTag::AddCollateral => {
            let vault = read_vault_ref(payload, &mut i)?;
            let amount = read_u256(payload, &mut i)?;
            Action::AddCollateral { vault, amount }
        }
        ActionTag::RemoveCollateral => {
            let vault = read_vault_ref(payload, &mut i)?;
            let amount = read_u256(payload, &mut i)?;
            Action::RemoveCollateral { vault, amount }
        }
        ActionTag::RepayDebt => {
            let vault = read_vault_ref(payload, &mut i)?;
            let amount = read_u256(payload, &mut i)?;
            Action::RepayDebt { vault, amount }
        }
        ActionTag::Borrow => {
            let vault = read_vault_ref(payload, &mut i)?;
            let amount = read_u256(payload, &mut i)?;
            Action::Borrow { vault, amount }
        }
        ActionTag::GetDebtIn => {
            let vault = read_vault_ref(payload, &mut i)?;
            let other_module = read_address(payload, &mut i)?;
            let dst_vault_id = read_u256(payload, &mut i)?;
            let amount = read_u256(payload, &mut i)?;
            Action::GetDebtIn { vault, other_module, dst_vault_id, amount }
        }
        ActionTag::Permit => {
            let owner = read_address(payload, &mut i)?;
            let value = read_u256(payload, &mut i)?;
            let deadline = read_u256(payload, &mut i)?;
            let v = read_u8(payload, &mut i)?;
            let r = read_b32(payload, &mut i)?;
            let s = read_b32(payload, &mut i)?;
            Action::Permit { owner, value, deadline, v, r, s }
        }
    };

    if i != payload.len() {
        return Err(DecodeError::TrailingBytes);
    }
    Ok(action)
}

/// Decode parallel tag/payload lists. Lengths must match.
pub fn decode_calls(tags: &[u8], payloads: &[Vec<u8>]) -> Result<Vec<Action>, DecodeError> {
    if tags.len() != payloads.len() {
        return Err(DecodeError::LengthMismatch {
            tags: tags.len(),
            payloads: payloads.len(),
        });
    }
    tags.iter()
        .zip(payloads)
        .map(|(tag, payload)| decode_action(*tag, payload))
        .collect()
}

/// Decode every call of an envelope.
pub fn decode_module_call(call: &ModuleCall) -> Result<Vec<Action>, DecodeError> {
    decode_calls(&call.tags, &call.payloads)
}

fn read_word<'a>(bytes: &'a [u8], i: &mut usize) -> Result<&'a [u8], DecodeError> {
    if bytes.len() < *i + WORD {
        return Err(DecodeError::Truncated);
    }
    let word = &bytes[*i..*i + WORD];
    *i += WORD;
    Ok(word)
}

fn read_u256(bytes: &[u8], i: &mut usize) -> Result<U256, DecodeError> {
    let word = read_word(bytes, i)?;
    Ok(U256::from_be_slice(word))
}

fn read_vault_ref(bytes: &[u8], i: &mut usize) -> Result<VaultRef, DecodeError> {
    Ok(VaultRef(read_u256(bytes, i)?))
}

fn read_b32(bytes: &[u8], i: &mut usize) -> Result<FixedBytes<32>, DecodeError> {
    let word = read_word(bytes, i)?;
    Ok(FixedBytes::from_slice(word))
}

fn read_address(bytes: &[u8], i: &mut usize) -> Result<Address, DecodeError> {
    let word = read_word(bytes, i)?;
    if word[..12].iter().any(|b| *b != 0) {
        return Err(DecodeError::InvalidAddress);
    }
    Ok(Address::from_slice(&word[12..]))
}

fn read_u8(bytes: &[u8], i: &mut usize) -> Result<u8, DecodeError> {
    let word = read_word(bytes, i)?;
    if word[..31].iter().any(|b| *b != 0) {
        return Err(DecodeError::InvalidUint8);
    }
    Ok(word[31])
}
