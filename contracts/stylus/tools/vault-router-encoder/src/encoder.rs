use alloy_primitives::{Address, FixedBytes, U256};

use vault_router_types::{Action, Call, ModuleCall};

/// Encode one action into its `(tag, payload)` wire form.
pub fn encode_action(action: &Action) -> Call {
    let mut buf = Vec::with_capacity(32 * 6);
    match action {
        Action::CreateVault { recipient } => {
            push_address(&mut buf, *recipient);
        }
        Action::CloseVault { vault } => {
            push_u256(&mut buf, vault.0);
        }
        Action::AddCollateral { vault, amount }
        | Action::RemoveCollateral { vault, amount }
        | Action::RepayDebt { vault, amount }
        | Action::Borrow { vault, amount } => {
            push_u256(&mut buf, vault.0);
            push_u256(&mut buf, *amount);
        }
        Action::GetDebtIn { vault, other_module, dst_vault_id, amount } => {
            push_u256(&mut buf, vault.0);
            push_address(&mut buf, *other_module);
            push_u256(&mut buf, *dst_vault_id);
            push_u256(&mut buf, *amount);
        }
        Action::Permit { owner, value, deadline, v, r, s } => {
            push_address(&mut buf, *owner);
            push_u256(&mut buf, *value);
            push_u256(&mut buf, *deadline);
            push_u256(&mut buf, U256::from(*v));
            push_b32(&mut buf, *r);
            push_b32(&mut buf, *s);
        }
    }
    Call::new(action.tag(), buf)
}

pub fn encode_calls(actions: &[Action]) -> Vec<Call> {
    actions.iter().map(encode_action).collect()
}

/// Envelope for `module` carrying `actions`, everything else defaulted.
pub fn module_call(module: Address, actions: &[Action]) -> ModuleCall {
    ModuleCall::new(module).with_calls(encode_calls(actions))
}

fn push_u256(buf: &mut Vec<u8>, value: U256) {
    buf.extend_from_slice(&value.to_be_bytes::<32>());
}

fn push_address(buf: &mut Vec<u8>, address: Address) {
    let mut word = [0u8; 32];
    word[12..32].copy_from_slice(address.as_slice());
    buf.extend_from_slice(&word);
}

fn push_b32(buf: &mut Vec<u8>, value: FixedBytes<32>) {
    buf.extend_from_slice(value.as_slice());
}
