//! JSON batch description.
//!
//! Addresses, `bytes32` and `bytes` are 0x-hex strings; amounts are decimal or 0x-hex strings.
//!
//! ```json
//! {
//!   "transfers": [{ "token": "0x…", "amount": "100" }],
//!   "module_calls": [{
//!     "module": "0x…",
//!     "actions": [
//!       { "type": "create_vault", "recipient": "0x…" },
//!       { "type": "add_collateral", "vault": "0", "amount": "100" }
//!     ]
//!   }]
//! }
//! ```

use std::{fs, path::Path};

use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vault_router_encoder::encoder::encode_calls;
use vault_router_types::{
    Action, Batch, ModuleCall, OperatorPermit, Signature, Swap, TokenPermit, Transfer, VaultRef,
};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BatchFile {
    #[serde(default)]
    pub operator_permits: Vec<OperatorPermitSpec>,
    #[serde(default)]
    pub permits: Vec<PermitSpec>,
    #[serde(default)]
    pub transfers: Vec<TransferSpec>,
    #[serde(default)]
    pub swaps: Vec<SwapSpec>,
    #[serde(default)]
    pub module_calls: Vec<ModuleCallSpec>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PermitSpec {
    pub token: Address,
    pub owner: Address,
    pub spender: Address,
    pub value: U256,
    pub deadline: U256,
    pub v: u8,
    pub r: FixedBytes<32>,
    pub s: FixedBytes<32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OperatorPermitSpec {
    pub module: Address,
    pub owner: Address,
    pub approved: bool,
    pub deadline: U256,
    pub v: u8,
    pub r: FixedBytes<32>,
    pub s: FixedBytes<32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TransferSpec {
    pub token: Address,
    pub amount: U256,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SwapSpec {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub min_amount_out: U256,
    /// Aggregator calldata.
    #[serde(default)]
    pub data: Bytes,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ModuleCallSpec {
    pub module: Address,
    /// Zero keeps module outputs on the router until the sweep.
    #[serde(default)]
    pub recipient: Address,
    /// Zero sends leftovers to the caller.
    #[serde(default)]
    pub sweep_recipient: Address,
    #[serde(default)]
    pub repay_data: Bytes,
    pub actions: Vec<ActionSpec>,
}

/// One vault action. A `vault` of `0` refers to the vault created earlier in the same batch.
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionSpec {
    CreateVault {
        recipient: Address,
    },
    CloseVault {
        vault: U256,
    },
    AddCollateral {
        vault: U256,
        amount: U256,
    },
    RemoveCollateral {
        vault: U256,
        amount: U256,
    },
    RepayDebt {
        vault: U256,
        amount: U256,
    },
    Borrow {
        vault: U256,
        amount: U256,
    },
    GetDebtIn {
        vault: U256,
        other_module: Address,
        dst_vault_id: U256,
        amount: U256,
    },
    /// ERC-2612 permit on the module's collateral token, spender = module.
    Permit {
        owner: Address,
        value: U256,
        deadline: U256,
        v: u8,
        r: FixedBytes<32>,
        s: FixedBytes<32>,
    },
}

impl BatchFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing batch JSON in {}", path.display()))
    }

    pub fn operator_permits(&self) -> Vec<OperatorPermit> {
        self.operator_permits.iter().map(OperatorPermit::from).collect()
    }

    pub fn batch(&self) -> Batch {
        Batch {
            permits: self.permits.iter().map(TokenPermit::from).collect(),
            transfers: self
                .transfers
                .iter()
                .map(|t| Transfer { token: t.token, amount: t.amount })
                .collect(),
            swaps: self
                .swaps
                .iter()
                .map(|s| Swap {
                    token_in: s.token_in,
                    token_out: s.token_out,
                    amount_in: s.amount_in,
                    min_amount_out: s.min_amount_out,
                    data: s.data.to_vec(),
                })
                .collect(),
            module_calls: self.module_calls.iter().map(ModuleCallSpec::to_module_call).collect(),
        }
    }
}

impl ModuleCallSpec {
    fn to_module_call(&self) -> ModuleCall {
        let actions: Vec<Action> = self.actions.iter().map(Action::from).collect();
        ModuleCall {
            recipient: self.recipient,
            sweep_recipient: self.sweep_recipient,
            repay_data: self.repay_data.to_vec(),
            ..ModuleCall::new(self.module)
        }
        .with_calls(encode_calls(&actions))
    }
}

impl From<&ActionSpec> for Action {
    fn from(spec: &ActionSpec) -> Self {
        match *spec {
            ActionSpec::CreateVault { recipient } => Action::CreateVault { recipient },
            ActionSpec::CloseVault { vault } => Action::CloseVault { vault: VaultRef(vault) },
            ActionSpec::AddCollateral { vault, amount } => {
                Action::AddCollateral { vault: VaultRef(vault), amount }
            }
            ActionSpec::RemoveCollateral { vault, amount } => {
                Action::RemoveCollateral { vault: VaultRef(vault), amount }
            }
            ActionSpec::RepayDebt { vault, amount } => {
                Action::RepayDebt { vault: VaultRef(vault), amount }
            }
            ActionSpec::Borrow { vault, amount } => Action::Borrow { vault: VaultRef(vault), amount },
            ActionSpec::GetDebtIn { vault, other_module, dst_vault_id, amount } => Action::GetDebtIn {
                vault: VaultRef(vault),
                other_module,
                dst_vault_id,
                amount,
            },
            ActionSpec::Permit { owner, value, deadline, v, r, s } => {
                Action::Permit { owner, value, deadline, v, r, s }
            }
        }
    }
}

impl From<&PermitSpec> for TokenPermit {
    fn from(p: &PermitSpec) -> Self {
        TokenPermit {
            token: p.token,
            owner: p.owner,
            spender: p.spender,
            value: p.value,
            deadline: p.deadline,
            signature: Signature::new(p.v, p.r, p.s),
        }
    }
}

impl From<&TokenPermit> for PermitSpec {
    fn from(p: &TokenPermit) -> Self {
        PermitSpec {
            token: p.token,
            owner: p.owner,
            spender: p.spender,
            value: p.value,
            deadline: p.deadline,
            v: p.signature.v,
            r: p.signature.r,
            s: p.signature.s,
        }
    }
}

impl From<&OperatorPermitSpec> for OperatorPermit {
    fn from(p: &OperatorPermitSpec) -> Self {
        OperatorPermit {
            module: p.module,
            owner: p.owner,
            approved: p.approved,
            deadline: p.deadline,
            signature: Signature::new(p.v, p.r, p.s),
        }
    }
}

impl From<&OperatorPermit> for OperatorPermitSpec {
    fn from(p: &OperatorPermit) -> Self {
        OperatorPermitSpec {
            module: p.module,
            owner: p.owner,
            approved: p.approved,
            deadline: p.deadline,
            v: p.signature.v,
            r: p.signature.r,
            s: p.signature.s,
        }
    }
}
