use alloy_primitives::{Address, U256};

/// Errors while decoding action payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    UnknownTag(u8),
    Truncated,
    TrailingBytes,
    /// Address word with dirty upper bytes.
    InvalidAddress,
    InvalidUint8,
    LengthMismatch { tags: usize, payloads: usize },
}

/// Why a vault module rejected an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFailure {
    UnknownModule,
    UnknownVault,
    /// The router is not an approved operator of the vault.
    Unauthorized,
    InsufficientCollateral,
    StablecoinMismatch,
    ZeroAddress,
    /// The module reverted; reason not decoded.
    Reverted,
}

/// Every way a batch can fail. Any of these aborts the whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    Decode(DecodeError),
    InvalidSignature { signer: Address },
    Expired { deadline: U256 },
    NotApprovedOrOwner { caller: Address, vault_id: U256 },
    InsufficientOutput { amount_out: U256, min_amount_out: U256 },
    ModuleCallFailed { module: Address, reason: ModuleFailure },
    TransferFailed { token: Address },
}

impl From<DecodeError> for RouterError {
    fn from(err: DecodeError) -> Self {
        RouterError::Decode(err)
    }
}

impl RouterError {
    pub fn module(module: Address, reason: ModuleFailure) -> Self {
        RouterError::ModuleCallFailed { module, reason }
    }
}
