//! In-memory host: ERC-20 ledgers with ERC-2612 permits, vault modules and a fixed-rate swap
//! aggregator, behind an undo journal so a failed batch can be rolled back.

use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    vec::Vec,
};

use stylus_sdk::alloy_primitives::{Address, FixedBytes, U256};

use crate::types::{
    eip712::domain_separator, Journal, ModuleFailure, OperatorPermit, RouterError, RouterHost,
    Settlement, Swap, SwapAggregator, TokenLedger, TokenPermit, VaultModules,
};

pub const CHAIN_ID: u64 = 412_346;

const BPS: u64 = 10_000;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryToken {
    pub name: String,
    pub balances: BTreeMap<Address, U256>,
    pub allowances: BTreeMap<(Address, Address), U256>,
    pub nonces: BTreeMap<Address, U256>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryVault {
    pub owner: Address,
    pub collateral: U256,
    pub debt: U256,
}

/// Flows a module owes or is owed since its last settlement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingFlows {
    pub collateral_in: U256,
    pub collateral_out: U256,
    pub stable_in: U256,
    pub stable_out: U256,
}

/// Vault manager: collateral priced 1:1 against its stablecoin, debt capped at `max_ltv_bps`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryVaultModule {
    pub name: String,
    pub collateral: Address,
    pub stablecoin: Address,
    pub max_ltv_bps: u64,
    next_id: U256,
    vaults: BTreeMap<U256, MemoryVault>,
    approvals: BTreeMap<U256, Address>,
    operators: BTreeMap<(Address, Address), bool>,
    nonces: BTreeMap<Address, U256>,
    pending: PendingFlows,
}

impl MemoryVaultModule {
    pub fn new(name: &str, collateral: Address, stablecoin: Address) -> Self {
        Self {
            name: name.to_string(),
            collateral,
            stablecoin,
            max_ltv_bps: 5_000,
            next_id: U256::from(1u64),
            vaults: BTreeMap::new(),
            approvals: BTreeMap::new(),
            operators: BTreeMap::new(),
            nonces: BTreeMap::new(),
            pending: PendingFlows::default(),
        }
    }

    fn is_approved_or_owner(&self, spender: Address, vault_id: U256) -> bool {
        let Some(vault) = self.vaults.get(&vault_id) else {
            return false;
        };
        vault.owner == spender
            || self.approvals.get(&vault_id) == Some(&spender)
            || self.operators.get(&(vault.owner, spender)).copied().unwrap_or(false)
    }

    fn is_healthy(&self, vault: &MemoryVault) -> bool {
        vault.debt.saturating_mul(U256::from(BPS))
            <= vault.collateral.saturating_mul(U256::from(self.max_ltv_bps))
    }
}

/// Everything the journal protects. Compared whole by the atomicity tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryState {
    pub tokens: BTreeMap<Address, MemoryToken>,
    pub modules: BTreeMap<Address, MemoryVaultModule>,
}

enum Undo {
    Balance { token: Address, account: Address, prev: Option<U256> },
    Allowance { token: Address, owner: Address, spender: Address, prev: Option<U256> },
    TokenNonce { token: Address, owner: Address, prev: Option<U256> },
    Module { module: Address, prev: MemoryVaultModule },
}

pub struct MemoryHost {
    router: Address,
    now: u64,
    aggregator: Address,
    state: MemoryState,
    /// `(token_in, token_out) -> (numerator, denominator)`
    rates: BTreeMap<(Address, Address), (U256, U256)>,
    journal: Vec<Undo>,
}

impl MemoryHost {
    pub fn new(router: Address, now: u64) -> Self {
        Self {
            router,
            now,
            aggregator: Address::new([0x5a; 20]),
            state: MemoryState::default(),
            rates: BTreeMap::new(),
            journal: Vec::new(),
        }
    }

    pub fn add_token(&mut self, name: &str) -> Address {
        let token = numbered_address(0x70, self.state.tokens.len());
        self.state.tokens.insert(
            token,
            MemoryToken {
                name: name.to_string(),
                ..MemoryToken::default()
            },
        );
        token
    }

    pub fn add_module(&mut self, module: MemoryVaultModule) -> Address {
        let address = numbered_address(0x7e, self.state.modules.len());
        self.state.modules.insert(address, module);
        address
    }

    pub fn aggregator(&self) -> Address {
        self.aggregator
    }

    pub fn set_now(&mut self, now: u64) {
        self.now = now;
    }

    pub fn set_rate(&mut self, token_in: Address, token_out: Address, numerator: u64, denominator: u64) {
        self.rates
            .insert((token_in, token_out), (U256::from(numerator), U256::from(denominator)));
    }

    pub fn mint(&mut self, token: Address, to: Address, amount: U256) {
        if let Some(t) = self.state.tokens.get_mut(&token) {
            let balance = t.balances.entry(to).or_default();
            *balance = balance.saturating_add(amount);
        }
    }

    /// Test-side `approve` from an arbitrary owner.
    pub fn approve_from(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
        if let Some(t) = self.state.tokens.get_mut(&token) {
            t.allowances.insert((owner, spender), amount);
        }
    }

    pub fn balance(&self, token: Address, account: Address) -> U256 {
        self.state
            .tokens
            .get(&token)
            .and_then(|t| t.balances.get(&account).copied())
            .unwrap_or_default()
    }

    pub fn allowance_of(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.state
            .tokens
            .get(&token)
            .and_then(|t| t.allowances.get(&(owner, spender)).copied())
            .unwrap_or_default()
    }

    pub fn token_nonce(&self, token: Address, owner: Address) -> U256 {
        self.state
            .tokens
            .get(&token)
            .and_then(|t| t.nonces.get(&owner).copied())
            .unwrap_or_default()
    }

    pub fn token_domain(&self, token: Address) -> FixedBytes<32> {
        let name = self.state.tokens.get(&token).map(|t| t.name.as_str()).unwrap_or("");
        domain_separator(name, "1", CHAIN_ID, token)
    }

    pub fn module_nonce(&self, module: Address, owner: Address) -> U256 {
        self.state
            .modules
            .get(&module)
            .and_then(|m| m.nonces.get(&owner).copied())
            .unwrap_or_default()
    }

    pub fn module_domain(&self, module: Address) -> FixedBytes<32> {
        let name = self.state.modules.get(&module).map(|m| m.name.as_str()).unwrap_or("");
        domain_separator(name, "1", CHAIN_ID, module)
    }

    pub fn is_operator(&self, module: Address, owner: Address, operator: Address) -> bool {
        self.state
            .modules
            .get(&module)
            .and_then(|m| m.operators.get(&(owner, operator)).copied())
            .unwrap_or(false)
    }

    pub fn set_operator(&mut self, module: Address, owner: Address, operator: Address, approved: bool) {
        if let Some(m) = self.state.modules.get_mut(&module) {
            m.operators.insert((owner, operator), approved);
        }
    }

    /// Per-vault approval, as the vault owner would grant it.
    pub fn approve_vault(&mut self, module: Address, vault_id: U256, spender: Address) {
        if let Some(m) = self.state.modules.get_mut(&module) {
            m.approvals.insert(vault_id, spender);
        }
    }

    pub fn vault(&self, module: Address, vault_id: U256) -> Option<MemoryVault> {
        self.state
            .modules
            .get(&module)
            .and_then(|m| m.vaults.get(&vault_id).copied())
    }

    pub fn snapshot(&self) -> MemoryState {
        self.state.clone()
    }

    fn token(&self, token: Address) -> Result<&MemoryToken, RouterError> {
        self.state
            .tokens
            .get(&token)
            .ok_or(RouterError::TransferFailed { token })
    }

    fn module(&self, module: Address) -> Result<&MemoryVaultModule, RouterError> {
        self.state
            .modules
            .get(&module)
            .ok_or(RouterError::module(module, ModuleFailure::UnknownModule))
    }

    /// Mutable module access; journals the module's prior state first.
    fn module_mut(&mut self, module: Address) -> Result<&mut MemoryVaultModule, RouterError> {
        let entry = self
            .state
            .modules
            .get_mut(&module)
            .ok_or(RouterError::module(module, ModuleFailure::UnknownModule))?;
        self.journal.push(Undo::Module {
            module,
            prev: entry.clone(),
        });
        Ok(entry)
    }

    fn set_balance(&mut self, token: Address, account: Address, value: U256) -> Result<(), RouterError> {
        let t = self
            .state
            .tokens
            .get_mut(&token)
            .ok_or(RouterError::TransferFailed { token })?;
        let prev = t.balances.insert(account, value);
        self.journal.push(Undo::Balance { token, account, prev });
        Ok(())
    }

    fn set_allowance(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        value: U256,
    ) -> Result<(), RouterError> {
        let t = self
            .state
            .tokens
            .get_mut(&token)
            .ok_or(RouterError::TransferFailed { token })?;
        let prev = t.allowances.insert((owner, spender), value);
        self.journal.push(Undo::Allowance { token, owner, spender, prev });
        Ok(())
    }

    fn move_tokens(&mut self, token: Address, from: Address, to: Address, amount: U256) -> Result<(), RouterError> {
        let from_balance = self.token(token)?.balances.get(&from).copied().unwrap_or_default();
        if from_balance < amount {
            return Err(RouterError::TransferFailed { token });
        }
        self.set_balance(token, from, from_balance - amount)?;
        let to_balance = self.balance(token, to);
        self.set_balance(token, to, to_balance.saturating_add(amount))
    }

    fn spend_allowance(&mut self, token: Address, owner: Address, spender: Address, amount: U256) -> Result<(), RouterError> {
        let allowance = self.allowance_of(token, owner, spender);
        if allowance < amount {
            return Err(RouterError::TransferFailed { token });
        }
        if allowance != U256::MAX {
            self.set_allowance(token, owner, spender, allowance - amount)?;
        }
        Ok(())
    }

    fn issue(&mut self, token: Address, to: Address, amount: U256) -> Result<(), RouterError> {
        let balance = self.balance(token, to);
        self.set_balance(token, to, balance.saturating_add(amount))
    }

    /// The router must be an approved operator of the vault for outflows.
    fn require_router(&self, module: Address, vault_id: U256) -> Result<(), RouterError> {
        let m = self.module(module)?;
        if !m.vaults.contains_key(&vault_id) {
            return Err(RouterError::module(module, ModuleFailure::UnknownVault));
        }
        if !m.is_approved_or_owner(self.router, vault_id) {
            return Err(RouterError::module(module, ModuleFailure::Unauthorized));
        }
        Ok(())
    }

    /// Pull `amount` of `token` from the router into `module` through the router's approval.
    fn pull_from_router(&mut self, module: Address, token: Address, amount: U256) -> Result<(), RouterError> {
        if amount.is_zero() {
            return Ok(());
        }
        let router = self.router;
        self.spend_allowance(token, router, module, amount)?;
        self.move_tokens(token, router, module, amount)
    }
}

fn restore<K: Ord>(map: &mut BTreeMap<K, U256>, key: K, prev: Option<U256>) {
    match prev {
        Some(value) => {
            map.insert(key, value);
        }
        None => {
            map.remove(&key);
        }
    }
}

fn numbered_address(prefix: u8, n: usize) -> Address {
    let mut bytes = [prefix; 20];
    bytes[18] = (n >> 8) as u8;
    bytes[19] = n as u8;
    Address::new(bytes)
}

impl TokenLedger for MemoryHost {
    fn balance_of(&self, token: Address, account: Address) -> Result<U256, RouterError> {
        self.token(token)?;
        Ok(self.balance(token, account))
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256, RouterError> {
        self.token(token)?;
        Ok(self.allowance_of(token, owner, spender))
    }

    fn transfer(&mut self, token: Address, to: Address, amount: U256) -> Result<(), RouterError> {
        let router = self.router;
        self.move_tokens(token, router, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), RouterError> {
        let router = self.router;
        self.spend_allowance(token, from, router, amount)?;
        self.move_tokens(token, from, to, amount)
    }

    fn approve(&mut self, token: Address, spender: Address, amount: U256) -> Result<(), RouterError> {
        let router = self.router;
        self.set_allowance(token, router, spender, amount)
    }

    fn permit_nonce(&self, token: Address, owner: Address) -> Result<U256, RouterError> {
        self.token(token)?;
        Ok(self.token_nonce(token, owner))
    }

    fn permit_domain(&self, token: Address) -> Result<FixedBytes<32>, RouterError> {
        self.token(token)?;
        Ok(self.token_domain(token))
    }

    fn permit(&mut self, permit: &TokenPermit) -> Result<(), RouterError> {
        let token = permit.token;
        let owner = permit.owner;
        let t = self
            .state
            .tokens
            .get_mut(&token)
            .ok_or(RouterError::TransferFailed { token })?;
        let prev = t.nonces.get(&owner).copied();
        t.nonces.insert(owner, prev.unwrap_or_default() + U256::from(1u64));
        self.journal.push(Undo::TokenNonce { token, owner, prev });
        self.set_allowance(token, owner, permit.spender, permit.value)
    }
}

impl VaultModules for MemoryHost {
    fn collateral(&self, module: Address) -> Result<Address, RouterError> {
        Ok(self.module(module)?.collateral)
    }

    fn stablecoin(&self, module: Address) -> Result<Address, RouterError> {
        Ok(self.module(module)?.stablecoin)
    }

    fn is_approved_or_owner(
        &self,
        module: Address,
        spender: Address,
        vault_id: U256,
    ) -> Result<bool, RouterError> {
        Ok(self.module(module)?.is_approved_or_owner(spender, vault_id))
    }

    fn operator_nonce(&self, module: Address, owner: Address) -> Result<U256, RouterError> {
        self.module(module)?;
        Ok(self.module_nonce(module, owner))
    }

    fn operator_domain(&self, module: Address) -> Result<FixedBytes<32>, RouterError> {
        self.module(module)?;
        Ok(self.module_domain(module))
    }

    fn operator_permit(&mut self, permit: &OperatorPermit) -> Result<(), RouterError> {
        let router = self.router;
        let m = self.module_mut(permit.module)?;
        let nonce = m.nonces.entry(permit.owner).or_default();
        *nonce += U256::from(1u64);
        m.operators.insert((permit.owner, router), permit.approved);
        Ok(())
    }

    fn create_vault(&mut self, module: Address, to: Address) -> Result<U256, RouterError> {
        if to == Address::ZERO {
            return Err(RouterError::module(module, ModuleFailure::ZeroAddress));
        }
        let m = self.module_mut(module)?;
        let id = m.next_id;
        m.next_id += U256::from(1u64);
        m.vaults.insert(
            id,
            MemoryVault {
                owner: to,
                ..MemoryVault::default()
            },
        );
        Ok(id)
    }

    fn close_vault(&mut self, module: Address, vault_id: U256) -> Result<(), RouterError> {
        self.require_router(module, vault_id)?;
        let m = self.module_mut(module)?;
        let vault = m
            .vaults
            .remove(&vault_id)
            .ok_or(RouterError::module(module, ModuleFailure::UnknownVault))?;
        m.approvals.remove(&vault_id);
        m.pending.stable_in = m.pending.stable_in.saturating_add(vault.debt);
        m.pending.collateral_out = m.pending.collateral_out.saturating_add(vault.collateral);
        Ok(())
    }

    fn add_collateral(&mut self, module: Address, vault_id: U256, amount: U256) -> Result<(), RouterError> {
        let m = self.module_mut(module)?;
        let vault = m
            .vaults
            .get_mut(&vault_id)
            .ok_or(RouterError::module(module, ModuleFailure::UnknownVault))?;
        vault.collateral = vault
            .collateral
            .checked_add(amount)
            .ok_or(RouterError::module(module, ModuleFailure::Reverted))?;
        m.pending.collateral_in = m.pending.collateral_in.saturating_add(amount);
        Ok(())
    }

    fn remove_collateral(
        &mut self,
        module: Address,
        vault_id: U256,
        amount: U256,
    ) -> Result<(), RouterError> {
        self.require_router(module, vault_id)?;
        let m = self.module_mut(module)?;
        let mut vault = m
            .vaults
            .get(&vault_id)
            .copied()
            .ok_or(RouterError::module(module, ModuleFailure::UnknownVault))?;
        if vault.collateral < amount {
            return Err(RouterError::module(module, ModuleFailure::InsufficientCollateral));
        }
        vault.collateral -= amount;
        if !m.is_healthy(&vault) {
            return Err(RouterError::module(module, ModuleFailure::InsufficientCollateral));
        }
        m.vaults.insert(vault_id, vault);
        m.pending.collateral_out = m.pending.collateral_out.saturating_add(amount);
        Ok(())
    }

    fn repay_debt(&mut self, module: Address, vault_id: U256, amount: U256) -> Result<(), RouterError> {
        let m = self.module_mut(module)?;
        let vault = m
            .vaults
            .get_mut(&vault_id)
            .ok_or(RouterError::module(module, ModuleFailure::UnknownVault))?;
        let paid = amount.min(vault.debt);
        vault.debt -= paid;
        m.pending.stable_in = m.pending.stable_in.saturating_add(paid);
        Ok(())
    }

    fn borrow(&mut self, module: Address, vault_id: U256, amount: U256) -> Result<(), RouterError> {
        self.require_router(module, vault_id)?;
        let m = self.module_mut(module)?;
        let mut vault = m
            .vaults
            .get(&vault_id)
            .copied()
            .ok_or(RouterError::module(module, ModuleFailure::UnknownVault))?;
        vault.debt = vault
            .debt
            .checked_add(amount)
            .ok_or(RouterError::module(module, ModuleFailure::InsufficientCollateral))?;
        if !m.is_healthy(&vault) {
            return Err(RouterError::module(module, ModuleFailure::InsufficientCollateral));
        }
        m.vaults.insert(vault_id, vault);
        m.pending.stable_out = m.pending.stable_out.saturating_add(amount);
        Ok(())
    }

    fn get_debt_in(
        &mut self,
        module: Address,
        vault_id: U256,
        other_module: Address,
        dst_vault_id: U256,
        amount: U256,
    ) -> Result<(), RouterError> {
        self.require_router(module, vault_id)?;
        if self.module(module)?.stablecoin != self.module(other_module)?.stablecoin {
            return Err(RouterError::module(module, ModuleFailure::StablecoinMismatch));
        }

        // debt leaves `dst_vault_id` (capped at what it owes) and lands on the gated vault
        let lender = self.module_mut(other_module)?;
        let mut dst = lender
            .vaults
            .get(&dst_vault_id)
            .copied()
            .ok_or(RouterError::module(other_module, ModuleFailure::UnknownVault))?;
        let moved = amount.min(dst.debt);
        dst.debt -= moved;
        lender.vaults.insert(dst_vault_id, dst);

        let source = self.module_mut(module)?;
        let mut vault = source
            .vaults
            .get(&vault_id)
            .copied()
            .ok_or(RouterError::module(module, ModuleFailure::UnknownVault))?;
        vault.debt = vault
            .debt
            .checked_add(moved)
            .ok_or(RouterError::module(module, ModuleFailure::InsufficientCollateral))?;
        if !source.is_healthy(&vault) {
            return Err(RouterError::module(module, ModuleFailure::InsufficientCollateral));
        }
        source.vaults.insert(vault_id, vault);
        Ok(())
    }

    fn settle(&mut self, module: Address, settlement: &Settlement) -> Result<(), RouterError> {
        let m = self.module_mut(module)?;
        let flows = core::mem::take(&mut m.pending);
        let (collateral, stablecoin) = (m.collateral, m.stablecoin);

        if flows.collateral_in >= flows.collateral_out {
            self.pull_from_router(module, collateral, flows.collateral_in - flows.collateral_out)?;
        } else {
            let out = flows.collateral_out - flows.collateral_in;
            self.move_tokens(collateral, module, settlement.recipient, out)?;
        }

        if flows.stable_in >= flows.stable_out {
            self.pull_from_router(module, stablecoin, flows.stable_in - flows.stable_out)?;
        } else {
            // stablecoin is issued by the module
            self.issue(stablecoin, settlement.recipient, flows.stable_out - flows.stable_in)?;
        }
        Ok(())
    }
}

impl SwapAggregator for MemoryHost {
    fn swap(&mut self, swap: &Swap) -> Result<U256, RouterError> {
        let (numerator, denominator) = self
            .rates
            .get(&(swap.token_in, swap.token_out))
            .copied()
            .ok_or(RouterError::module(self.aggregator, ModuleFailure::Reverted))?;
        let (router, aggregator) = (self.router, self.aggregator);

        self.move_tokens(swap.token_in, router, aggregator, swap.amount_in)?;
        let amount_out = swap.amount_in.saturating_mul(numerator) / denominator;
        self.issue(swap.token_out, router, amount_out)?;
        Ok(amount_out)
    }
}

impl Journal for MemoryHost {
    fn checkpoint(&mut self) -> usize {
        self.journal.len()
    }

    fn rollback(&mut self, checkpoint: usize) {
        while self.journal.len() > checkpoint {
            let Some(undo) = self.journal.pop() else {
                break;
            };
            match undo {
                Undo::Balance { token, account, prev } => {
                    if let Some(t) = self.state.tokens.get_mut(&token) {
                        restore(&mut t.balances, account, prev);
                    }
                }
                Undo::Allowance { token, owner, spender, prev } => {
                    if let Some(t) = self.state.tokens.get_mut(&token) {
                        restore(&mut t.allowances, (owner, spender), prev);
                    }
                }
                Undo::TokenNonce { token, owner, prev } => {
                    if let Some(t) = self.state.tokens.get_mut(&token) {
                        restore(&mut t.nonces, owner, prev);
                    }
                }
                Undo::Module { module, prev } => {
                    self.state.modules.insert(module, prev);
                }
            }
        }
    }

    fn commit(&mut self, checkpoint: usize) {
        if checkpoint == 0 {
            self.journal.clear();
        }
    }
}

impl RouterHost for MemoryHost {
    fn router(&self) -> Address {
        self.router
    }

    fn block_timestamp(&self) -> u64 {
        self.now
    }
}
