//! Deterministic in-process execution environment.
//!
//! [`Ledger`] serializes all activity into a single total order, evaluates
//! application calls through the approval and clear-state programs, and
//! commits the effects of a group only when every transaction in it
//! accepts. It stands in for a real node in tests and local runs, with the
//! same all-or-nothing guarantees the core relies on.

use std::collections::{BTreeMap, HashMap};

use handlebox_types::constants::CREATION_APP_ID;
use handlebox_types::primitives::{app_address, Address, Amount, AppId, GroupId, Round};
use handlebox_types::transaction::{
    compute_group_id, ApplicationCall, OnCompletion, Transaction,
};

use crate::error::LedgerError;
use crate::lifecycle::{self, CallContext, CallEffects};
use crate::program::ProgramArtifact;
use crate::state::{AppState, StateSchema};

/// Largest atomic group the environment accepts.
pub const MAX_GROUP_SIZE: usize = 16;

/// One deployed application instance.
#[derive(Debug, Clone)]
pub struct Application {
    pub id: AppId,
    /// The application's own derived ledger address; deposits are paid here.
    pub address: Address,
    pub creator: Address,
    pub schema: StateSchema,
    pub approval: ProgramArtifact,
    pub clear: ProgramArtifact,
    pub state: AppState,
}

/// Confirmation returned for an included group.
#[derive(Debug, Clone)]
pub struct GroupReceipt {
    pub group_id: GroupId,
    pub round: Round,
    /// Log lines emitted by accepted application calls, in order.
    pub logs: Vec<String>,
}

/// A minimal single-threaded ledger: account balances plus deployed
/// applications, applied one group at a time.
#[derive(Debug)]
pub struct Ledger {
    accounts: HashMap<Address, Amount>,
    apps: BTreeMap<AppId, Application>,
    // Starts at 1; the zero id is the creation sentinel.
    next_app_id: AppId,
    round: Round,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            apps: BTreeMap::new(),
            next_app_id: 1,
            round: 0,
        }
    }

    /// Credit an account out of thin air (genesis / test faucet).
    pub fn fund(&mut self, address: Address, amount: Amount) {
        *self.accounts.entry(address).or_insert(0) += amount;
    }

    /// Current balance of an account, zero if never seen.
    pub fn balance(&self, address: &Address) -> Amount {
        self.accounts.get(address).copied().unwrap_or(0)
    }

    /// The current ledger round.
    pub fn round(&self) -> Round {
        self.round
    }

    /// A deployed application by id.
    pub fn application(&self, app_id: AppId) -> Option<&Application> {
        self.apps.get(&app_id)
    }

    /// Deploy a new application: run the creation call through the approval
    /// program and, on acceptance, assign the next id.
    pub fn create_application(
        &mut self,
        creator: Address,
        approval: ProgramArtifact,
        clear: ProgramArtifact,
        schema: StateSchema,
    ) -> Result<AppId, LedgerError> {
        let app_id = self.next_app_id;
        let call = ApplicationCall {
            sender: creator,
            app_id: CREATION_APP_ID,
            on_completion: OnCompletion::NoOp,
            args: vec![],
            boxes: vec![],
        };
        let ctx = CallContext::new(app_id);
        let effects = lifecycle::evaluate(&ctx, &call, None)?;

        let mut state = AppState::new();
        apply_effects(&mut state, &schema, &call, &effects)?;

        self.apps.insert(
            app_id,
            Application {
                id: app_id,
                address: app_address(app_id),
                creator,
                schema,
                approval,
                clear,
                state,
            },
        );
        self.next_app_id += 1;
        self.round += 1;
        tracing::debug!(app_id, round = self.round, "application created");
        Ok(app_id)
    }

    /// Apply an atomic transaction group.
    ///
    /// Either every transaction in the group takes effect, or none does:
    /// all balance movements and application-state writes are staged and
    /// committed only after the whole group validates.
    pub fn submit_group(&mut self, txns: &[Transaction]) -> Result<GroupReceipt, LedgerError> {
        if txns.is_empty() {
            return Err(LedgerError::EmptyGroup);
        }
        if txns.len() > MAX_GROUP_SIZE {
            return Err(LedgerError::GroupTooLarge {
                len: txns.len(),
                max: MAX_GROUP_SIZE,
            });
        }
        let group_id = compute_group_id(txns).map_err(|e| LedgerError::Serialization {
            reason: e.to_string(),
        })?;

        let mut accounts = self.accounts.clone();
        let mut states: HashMap<AppId, AppState> = HashMap::new();
        let mut logs = Vec::new();

        for (index, txn) in txns.iter().enumerate() {
            match txn {
                Transaction::Payment(p) => {
                    move_funds(&mut accounts, p.sender, p.receiver, p.amount)?;
                }
                // Asset balances are not modeled; an asset transfer only
                // participates in grouping.
                Transaction::AssetTransfer(_) => {}
                Transaction::ApplicationCall(call) => {
                    let app = self
                        .apps
                        .get(&call.app_id)
                        .ok_or(LedgerError::UnknownApplication {
                            app_id: call.app_id,
                        })?;
                    let ctx = CallContext::new(app.id);
                    // The companion the deposit handler validates is the
                    // group's first transaction, when the call is not itself
                    // first.
                    let companion = if index > 0 { Some(&txns[0]) } else { None };
                    let effects = match call.on_completion {
                        OnCompletion::ClearState => lifecycle::evaluate_clear_state(call),
                        _ => lifecycle::evaluate(&ctx, call, companion)?,
                    };
                    let state = states
                        .entry(app.id)
                        .or_insert_with(|| app.state.clone());
                    apply_effects(state, &app.schema, call, &effects)?;
                    logs.extend(effects.logs().iter().cloned());
                }
            }
        }

        // Whole group validated: commit.
        self.accounts = accounts;
        for (id, state) in states {
            if let Some(app) = self.apps.get_mut(&id) {
                app.state = state;
            }
        }
        self.round += 1;
        tracing::debug!(
            group = %hex::encode(&group_id[..8]),
            len = txns.len(),
            round = self.round,
            "group committed"
        );
        Ok(GroupReceipt {
            group_id,
            round: self.round,
            logs,
        })
    }

    /// Read a storage slot by application id and box name.
    ///
    /// Fails with an absent-entry error if the box was never written.
    pub fn box_value(&self, app_id: AppId, name: &[u8]) -> Result<&[u8], LedgerError> {
        let app = self
            .apps
            .get(&app_id)
            .ok_or(LedgerError::UnknownApplication { app_id })?;
        app.state
            .boxes
            .get(name)
            .ok_or_else(|| LedgerError::BoxNotFound {
                name: String::from_utf8_lossy(name).into_owned(),
            })
    }
}

fn move_funds(
    accounts: &mut HashMap<Address, Amount>,
    sender: Address,
    receiver: Address,
    amount: Amount,
) -> Result<(), LedgerError> {
    let available = accounts.get(&sender).copied().unwrap_or(0);
    if available < amount {
        return Err(LedgerError::InsufficientBalance {
            address: hex::encode(sender),
            available,
            required: amount,
        });
    }
    accounts.insert(sender, available - amount);
    let credited = accounts
        .get(&receiver)
        .copied()
        .unwrap_or(0)
        .checked_add(amount)
        .ok_or(LedgerError::BalanceOverflow {
            address: hex::encode(receiver),
        })?;
    accounts.insert(receiver, credited);
    Ok(())
}

/// Commit one accepted call's effects into an application state, enforcing
/// the box-declaration and schema disciplines.
fn apply_effects(
    state: &mut AppState,
    schema: &StateSchema,
    call: &ApplicationCall,
    effects: &CallEffects,
) -> Result<(), LedgerError> {
    for (name, _) in effects.box_writes() {
        if !call.boxes.iter().any(|declared| declared == name) {
            return Err(LedgerError::UndeclaredBox {
                name: String::from_utf8_lossy(name).into_owned(),
            });
        }
    }
    for (key, value) in effects.global_writes() {
        state.globals.set(key.clone(), value.clone());
    }
    if !schema.allows(&state.globals) {
        return Err(LedgerError::SchemaExceeded);
    }
    for (name, value) in effects.box_writes() {
        state.boxes.put(name.clone(), value.clone());
    }
    Ok(())
}
