use alloc::vec::Vec;

use alloy_primitives::{Address, U256};

use crate::{actions::Call, permits::TokenPermit};

/// Pull `amount` of `token` from the caller into the router.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub token: Address,
    pub amount: U256,
}

/// Pull `amount_in` of `token_in` from the caller and swap it through the aggregator.
///
/// `data` is opaque aggregator calldata; the router only measures what comes out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Swap {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub min_amount_out: U256,
    pub data: Vec<u8>,
}

/// Calls addressed to one vault module, plus its settlement parameters.
///
/// Tags and payloads are kept in wire form; their lengths are checked at decode time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleCall {
    pub module: Address,
    /// Receives module outputs. `Address::ZERO` keeps them on the router for the final sweep.
    pub recipient: Address,
    /// Receives leftovers of the module's tokens. `Address::ZERO` falls back to the caller.
    pub sweep_recipient: Address,
    /// Forwarded untouched to the module's settlement call.
    pub repay_data: Vec<u8>,
    pub tags: Vec<u8>,
    pub payloads: Vec<Vec<u8>>,
}

impl ModuleCall {
    pub fn new(module: Address) -> Self {
        Self {
            module,
            ..Self::default()
        }
    }

    pub fn push(&mut self, call: Call) {
        self.tags.push(call.tag as u8);
        self.payloads.push(call.payload);
    }

    pub fn with_calls(mut self, calls: impl IntoIterator<Item = Call>) -> Self {
        for call in calls {
            self.push(call);
        }
        self
    }
}

/// Parameters of the single combined settlement call a module receives after its actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub recipient: Address,
    pub caller: Address,
    pub sweep_recipient: Address,
    pub repay_data: Vec<u8>,
}

/// Everything one `execute` invocation carries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Batch {
    pub permits: Vec<TokenPermit>,
    pub transfers: Vec<Transfer>,
    pub swaps: Vec<Swap>,
    pub module_calls: Vec<ModuleCall>,
}
