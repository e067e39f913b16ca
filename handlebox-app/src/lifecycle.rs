//! Lifecycle dispatcher: classifies every incoming application call and
//! routes it before any business logic runs.
//!
//! The dispatcher is a pure function from (context, call, companion) to
//! either a set of [`CallEffects`] or an [`ApprovalError`]. It never touches
//! storage itself; the environment commits the effects of an accepted call
//! atomically, so a rejected call has no observable writes.

use handlebox_types::constants::{CREATION_APP_ID, OWNER_GLOBAL};
use handlebox_types::primitives::{app_address, Address, AppId};
use handlebox_types::transaction::{ApplicationCall, OnCompletion, Transaction};

use crate::deposit;
use crate::error::ApprovalError;
use crate::state::GlobalValue;

/// Execution context the environment supplies for one call.
///
/// Carries the id the call executes under — the assigned id even during
/// creation, when the call itself still carries the zero sentinel.
#[derive(Debug, Clone, Copy)]
pub struct CallContext {
    app_id: AppId,
}

impl CallContext {
    pub fn new(app_id: AppId) -> Self {
        Self { app_id }
    }

    pub fn app_id(&self) -> AppId {
        self.app_id
    }

    /// The application's own derived ledger address.
    pub fn app_address(&self) -> Address {
        app_address(self.app_id)
    }
}

/// The writes and log lines of an accepted call.
///
/// Effects become visible all together when the environment commits them,
/// or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallEffects {
    global_writes: Vec<(String, GlobalValue)>,
    box_writes: Vec<(Vec<u8>, Vec<u8>)>,
    logs: Vec<String>,
}

impl CallEffects {
    /// A plain approval with no writes and no logs.
    pub fn none() -> Self {
        Self::default()
    }

    pub(crate) fn set_global(&mut self, key: impl Into<String>, value: GlobalValue) {
        self.global_writes.push((key.into(), value));
    }

    pub(crate) fn put_box(&mut self, name: Vec<u8>, value: Vec<u8>) {
        self.box_writes.push((name, value));
    }

    pub(crate) fn log(&mut self, line: String) {
        self.logs.push(line);
    }

    pub fn global_writes(&self) -> &[(String, GlobalValue)] {
        &self.global_writes
    }

    pub fn box_writes(&self) -> &[(Vec<u8>, Vec<u8>)] {
        &self.box_writes
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }
}

/// The approval program: decide one incoming call.
///
/// `companion` is the first transaction of the call's atomic group, when
/// the call is not the first member; group membership itself is the
/// environment's guarantee.
pub fn evaluate(
    ctx: &CallContext,
    call: &ApplicationCall,
    companion: Option<&Transaction>,
) -> Result<CallEffects, ApprovalError> {
    // Creation call: record the creator as owner and accept. Runs once per
    // application lifetime; the ledger never presents the zero sentinel
    // again afterwards.
    if call.app_id == CREATION_APP_ID {
        let mut effects = CallEffects::none();
        effects.set_global(OWNER_GLOBAL, GlobalValue::Bytes(call.sender.to_vec()));
        return Ok(effects);
    }

    match call.on_completion {
        OnCompletion::NoOp => deposit::route(ctx, call, companion),
        // No per-caller local state exists, so joining and leaving are free.
        OnCompletion::OptIn | OnCompletion::CloseOut => Ok(CallEffects::none()),
        OnCompletion::UpdateApplication => Err(ApprovalError::UpdateForbidden),
        OnCompletion::DeleteApplication => Err(ApprovalError::DeletionForbidden),
        // Fail closed: anything without a handler is a rejection, not a
        // silent approval. ClearState belongs to the clear-state program.
        action => Err(ApprovalError::UnhandledAction { action }),
    }
}

/// The clear-state program: accepts unconditionally.
pub fn evaluate_clear_state(_call: &ApplicationCall) -> CallEffects {
    CallEffects::none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RejectKind;
    use handlebox_types::transaction::Payment;

    const ALICE: Address = [1u8; 20];

    fn creation_call() -> ApplicationCall {
        ApplicationCall {
            sender: ALICE,
            app_id: CREATION_APP_ID,
            on_completion: OnCompletion::NoOp,
            args: vec![],
            boxes: vec![],
        }
    }

    fn call_with(on_completion: OnCompletion) -> ApplicationCall {
        ApplicationCall {
            sender: ALICE,
            app_id: 7,
            on_completion,
            args: vec![],
            boxes: vec![],
        }
    }

    #[test]
    fn test_creation_records_owner() {
        let ctx = CallContext::new(7);
        let effects = evaluate(&ctx, &creation_call(), None).unwrap();

        assert_eq!(
            effects.global_writes(),
            &[(
                OWNER_GLOBAL.to_string(),
                GlobalValue::Bytes(ALICE.to_vec())
            )]
        );
        assert!(effects.box_writes().is_empty());
        assert!(effects.logs().is_empty());
    }

    #[test]
    fn test_creation_ignores_companion() {
        // The creation branch runs before any completion-action routing.
        let ctx = CallContext::new(7);
        let companion = Transaction::Payment(Payment {
            sender: ALICE,
            receiver: [9u8; 20],
            amount: 1,
        });
        assert!(evaluate(&ctx, &creation_call(), Some(&companion)).is_ok());
    }

    #[test]
    fn test_opt_in_and_close_out_approve() {
        let ctx = CallContext::new(7);
        for action in [OnCompletion::OptIn, OnCompletion::CloseOut] {
            let effects = evaluate(&ctx, &call_with(action), None).unwrap();
            assert_eq!(effects, CallEffects::none());
        }
    }

    #[test]
    fn test_update_and_delete_reject() {
        let ctx = CallContext::new(7);

        let err = evaluate(&ctx, &call_with(OnCompletion::UpdateApplication), None).unwrap_err();
        assert_eq!(err, ApprovalError::UpdateForbidden);
        assert_eq!(err.kind(), RejectKind::Immutability);

        let err = evaluate(&ctx, &call_with(OnCompletion::DeleteApplication), None).unwrap_err();
        assert_eq!(err, ApprovalError::DeletionForbidden);
        assert_eq!(err.kind(), RejectKind::Immutability);
    }

    #[test]
    fn test_clear_state_fails_closed_in_approval() {
        let ctx = CallContext::new(7);
        let err = evaluate(&ctx, &call_with(OnCompletion::ClearState), None).unwrap_err();
        assert_eq!(
            err,
            ApprovalError::UnhandledAction {
                action: OnCompletion::ClearState
            }
        );
        assert_eq!(err.kind(), RejectKind::Routing);
    }

    #[test]
    fn test_clear_state_program_approves() {
        let effects = evaluate_clear_state(&call_with(OnCompletion::ClearState));
        assert_eq!(effects, CallEffects::none());
    }

    #[test]
    fn test_noop_without_selector_rejects() {
        let ctx = CallContext::new(7);
        let err = evaluate(&ctx, &call_with(OnCompletion::NoOp), None).unwrap_err();
        assert_eq!(err, ApprovalError::MissingSelector);
    }
}
