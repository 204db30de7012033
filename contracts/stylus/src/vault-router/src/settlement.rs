//! Leftover sweep: after dispatch, whatever the router still holds of a touched token goes
//! back to the caller or to the recipient registered for that token.

use alloc::vec::Vec;

use stylus_sdk::alloy_primitives::{Address, U256};

use crate::{errors::RouterError, types::TokenLedger};

/// One performed sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sweep {
    pub token: Address,
    pub to: Address,
    pub amount: U256,
}

/// Tokens touched by a batch, in first-touch order, with their sweep target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepPlan {
    entries: Vec<(Address, Address)>,
}

impl SweepPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// First registration of a token wins its target.
    pub fn register(&mut self, token: Address, to: Address) {
        if self.target_of(token).is_none() {
            self.entries.push((token, to));
        }
    }

    pub fn target_of(&self, token: Address) -> Option<Address> {
        self.entries
            .iter()
            .find(|(registered, _)| *registered == token)
            .map(|(_, to)| *to)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Transfer out every non-zero router balance in `plan`. Zero balances are skipped.
pub fn sweep<T: TokenLedger + ?Sized>(
    tokens: &mut T,
    router: Address,
    plan: &SweepPlan,
) -> Result<Vec<Sweep>, RouterError> {
    let mut sweeps = Vec::new();
    for (token, to) in plan.entries.iter().copied() {
        let amount = tokens.balance_of(token, router)?;
        if amount.is_zero() || to == router {
            continue;
        }
        tokens.transfer(token, to, amount)?;
        sweeps.push(Sweep { token, to, amount });
    }
    Ok(sweeps)
}
