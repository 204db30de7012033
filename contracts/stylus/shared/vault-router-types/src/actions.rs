use alloc::vec::Vec;

use alloy_primitives::{Address, FixedBytes, U256};

/// Action tags understood by the router. Adding a variant is a protocol version bump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ActionTag {
    CreateVault = 0,
    CloseVault = 1,
    AddCollateral = 2,
    RemoveCollateral = 3,
    RepayDebt = 4,
    Borrow = 5,
    GetDebtIn = 6,
    Permit = 7,
}

impl TryFrom<u8> for ActionTag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use ActionTag::*;
        let tag = match value {
            0 => CreateVault,
            1 => CloseVault,
            2 => AddCollateral,
            3 => RemoveCollateral,
            4 => RepayDebt,
            5 => Borrow,
            6 => GetDebtIn,
            7 => Permit,
            _ => return Err(()),
        };
        Ok(tag)
    }
}

/// Reference to a vault inside a batch.
///
/// `0` is the sentinel: "the vault created by the nearest preceding `CreateVault` of this batch".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct VaultRef(pub U256);

impl VaultRef {
    pub const SENTINEL: VaultRef = VaultRef(U256::ZERO);

    pub fn id(id: u64) -> Self {
        Self(U256::from(id))
    }

    pub fn is_sentinel(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<U256> for VaultRef {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

/// One tagged instruction in wire form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub tag: ActionTag,
    pub payload: Vec<u8>,
}

impl Call {
    pub fn new(tag: ActionTag, payload: Vec<u8>) -> Self {
        Self { tag, payload }
    }
}

/// Decoded representation of a single call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    CreateVault {
        recipient: Address,
    },
    CloseVault {
        vault: VaultRef,
    },
    AddCollateral {
        vault: VaultRef,
        amount: U256,
    },
    RemoveCollateral {
        vault: VaultRef,
        amount: U256,
    },
    RepayDebt {
        vault: VaultRef,
        amount: U256,
    },
    Borrow {
        vault: VaultRef,
        amount: U256,
    },
    GetDebtIn {
        vault: VaultRef,
        other_module: Address,
        dst_vault_id: U256,
        amount: U256,
    },
    /// ERC-2612 permit on the envelope module's collateral token, with the module as spender.
    Permit {
        owner: Address,
        value: U256,
        deadline: U256,
        v: u8,
        r: FixedBytes<32>,
        s: FixedBytes<32>,
    },
}

impl Action {
    pub fn tag(&self) -> ActionTag {
        match self {
            Action::CreateVault { .. } => ActionTag::CreateVault,
            Action::CloseVault { .. } => ActionTag::CloseVault,
            Action::AddCollateral { .. } => ActionTag::AddCollateral,
            Action::RemoveCollateral { .. } => ActionTag::RemoveCollateral,
            Action::RepayDebt { .. } => ActionTag::RepayDebt,
            Action::Borrow { .. } => ActionTag::Borrow,
            Action::GetDebtIn { .. } => ActionTag::GetDebtIn,
            Action::Permit { .. } => ActionTag::Permit,
        }
    }

    /// Vault this action mutates, if any.
    pub fn vault_ref(&self) -> Option<VaultRef> {
        match self {
            Action::CloseVault { vault }
            | Action::AddCollateral { vault, .. }
            | Action::RemoveCollateral { vault, .. }
            | Action::RepayDebt { vault, .. }
            | Action::Borrow { vault, .. }
            | Action::GetDebtIn { vault, .. } => Some(*vault),
            Action::CreateVault { .. } | Action::Permit { .. } => None,
        }
    }
}
