use alloy_sol_types::sol;
use stylus_sdk::stylus_proc::SolidityError;

/// Errors during payload decoding and batch execution.
pub use vault_router_types::{DecodeError, ModuleFailure, RouterError};

sol! {
    error DecodeFailed(uint8 code, uint256 detail);
    error InvalidSignature(address signer);
    error Expired(uint256 deadline);
    error NotApprovedOrOwner(address caller, uint256 vaultId);
    error InsufficientOutput(uint256 amountOut, uint256 minAmountOut);
    error ModuleCallFailed(address module, uint8 reason);
    error TransferFailed(address token);
    error AlreadyInitialized();
    error NotInitialized();
}

/// Revert surface of the router entrypoint.
#[derive(SolidityError)]
pub enum RouterRevert {
    DecodeFailed(DecodeFailed),
    InvalidSignature(InvalidSignature),
    Expired(Expired),
    NotApprovedOrOwner(NotApprovedOrOwner),
    InsufficientOutput(InsufficientOutput),
    ModuleCallFailed(ModuleCallFailed),
    TransferFailed(TransferFailed),
    AlreadyInitialized(AlreadyInitialized),
    NotInitialized(NotInitialized),
}

impl From<RouterError> for RouterRevert {
    fn from(err: RouterError) -> Self {
        use stylus_sdk::alloy_primitives::U256;

        match err {
            RouterError::Decode(decode) => {
                let (code, detail) = decode_code(decode);
                RouterRevert::DecodeFailed(DecodeFailed { code, detail: U256::from(detail) })
            }
            RouterError::InvalidSignature { signer } => {
                RouterRevert::InvalidSignature(InvalidSignature { signer })
            }
            RouterError::Expired { deadline } => RouterRevert::Expired(Expired { deadline }),
            RouterError::NotApprovedOrOwner { caller, vault_id } => {
                RouterRevert::NotApprovedOrOwner(NotApprovedOrOwner { caller, vaultId: vault_id })
            }
            RouterError::InsufficientOutput { amount_out, min_amount_out } => {
                RouterRevert::InsufficientOutput(InsufficientOutput {
                    amountOut: amount_out,
                    minAmountOut: min_amount_out,
                })
            }
            RouterError::ModuleCallFailed { module, reason } => {
                RouterRevert::ModuleCallFailed(ModuleCallFailed { module, reason: reason as u8 })
            }
            RouterError::TransferFailed { token } => {
                RouterRevert::TransferFailed(TransferFailed { token })
            }
        }
    }
}

/// Stable numeric codes for decode failures: `(code, detail)`.
pub fn decode_code(err: DecodeError) -> (u8, u64) {
    match err {
        DecodeError::UnknownTag(tag) => (1, tag as u64),
        DecodeError::Truncated => (2, 0),
        DecodeError::TrailingBytes => (3, 0),
        DecodeError::InvalidAddress => (4, 0),
        DecodeError::InvalidUint8 => (5, 0),
        DecodeError::LengthMismatch { tags, payloads } => {
            // tags in the high half, payloads in the low half
            (6, ((tags as u64) << 32) | (payloads as u64 & 0xffff_ffff))
        }
    }
}
