//! Method router and deposit handler for normal-operation calls.
//!
//! One method is supported: `deposit`. It validates the grouped funding
//! payment and persists the caller-supplied GitHub handle into the `github`
//! box.

use handlebox_types::constants::{
    DEPOSIT_SELECTOR, GITHUB_BOX, HANDLE_LOG_PREFIX,
};
use handlebox_types::primitives::{app_address, Address, Amount, AppId};
use handlebox_types::transaction::{
    ApplicationCall, OnCompletion, Payment, Transaction,
};

use crate::error::ApprovalError;
use crate::lifecycle::{CallContext, CallEffects};

/// Route a normal-operation call by its method selector.
///
/// Absence of a match is a rejection, never a silent approval.
pub(crate) fn route(
    ctx: &CallContext,
    call: &ApplicationCall,
    companion: Option<&Transaction>,
) -> Result<CallEffects, ApprovalError> {
    let selector = call.args.first().ok_or(ApprovalError::MissingSelector)?;
    if selector.as_slice() == DEPOSIT_SELECTOR {
        deposit(ctx, call, companion)
    } else {
        Err(ApprovalError::UnknownSelector {
            selector: String::from_utf8_lossy(selector).into_owned(),
        })
    }
}

/// The deposit operation.
///
/// Preconditions, checked in order, each terminal on failure:
/// 1. a companion transaction is grouped ahead of this call;
/// 2. the companion is a plain payment;
/// 3. the payment pays the application's own address;
/// 4. the call carries the handle argument.
///
/// No minimum amount is enforced and no caller is privileged: any address
/// may deposit and overwrite the stored handle.
fn deposit(
    ctx: &CallContext,
    call: &ApplicationCall,
    companion: Option<&Transaction>,
) -> Result<CallEffects, ApprovalError> {
    let companion = companion.ok_or(ApprovalError::MissingCompanion)?;

    let payment = match companion {
        Transaction::Payment(p) => p,
        other => {
            return Err(ApprovalError::CompanionNotPayment { kind: other.kind() });
        }
    };

    let expected = ctx.app_address();
    if payment.receiver != expected {
        return Err(ApprovalError::WrongReceiver {
            receiver: hex::encode(payment.receiver),
            expected: hex::encode(expected),
        });
    }

    let handle = call.args.get(1).ok_or(ApprovalError::MissingHandle)?;

    let mut effects = CallEffects::none();
    effects.put_box(GITHUB_BOX.to_vec(), handle.clone());
    effects.log(format!(
        "{}{}",
        HANDLE_LOG_PREFIX,
        String::from_utf8_lossy(handle)
    ));
    Ok(effects)
}

/// Build the two-transaction atomic group a deposit is submitted as:
/// the funding payment first, the application call second, with the
/// `github` box declared.
pub fn deposit_group(
    sender: Address,
    app_id: AppId,
    handle: &[u8],
    amount: Amount,
) -> Vec<Transaction> {
    vec![
        Transaction::Payment(Payment {
            sender,
            receiver: app_address(app_id),
            amount,
        }),
        Transaction::ApplicationCall(ApplicationCall {
            sender,
            app_id,
            on_completion: OnCompletion::NoOp,
            args: vec![DEPOSIT_SELECTOR.to_vec(), handle.to_vec()],
            boxes: vec![GITHUB_BOX.to_vec()],
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RejectKind;
    use crate::lifecycle::evaluate;
    use handlebox_types::transaction::AssetTransfer;
    use handlebox_types::transaction::TxnKind;

    const ALICE: Address = [1u8; 20];
    const BOB: Address = [2u8; 20];
    const APP: AppId = 7;

    fn deposit_call(handle: &[u8]) -> ApplicationCall {
        ApplicationCall {
            sender: BOB,
            app_id: APP,
            on_completion: OnCompletion::NoOp,
            args: vec![DEPOSIT_SELECTOR.to_vec(), handle.to_vec()],
            boxes: vec![GITHUB_BOX.to_vec()],
        }
    }

    fn funding(receiver: Address, amount: Amount) -> Transaction {
        Transaction::Payment(Payment {
            sender: BOB,
            receiver,
            amount,
        })
    }

    #[test]
    fn test_deposit_accepted() {
        let ctx = CallContext::new(APP);
        let companion = funding(ctx.app_address(), 1_000_000);
        let effects = evaluate(&ctx, &deposit_call(b"@alice"), Some(&companion)).unwrap();

        assert_eq!(
            effects.box_writes(),
            &[(GITHUB_BOX.to_vec(), b"@alice".to_vec())]
        );
        assert_eq!(effects.logs(), &["GitHub handle stored: @alice".to_string()]);
    }

    #[test]
    fn test_deposit_accepts_any_amount() {
        // No minimum is enforced; zero passes the type and receiver checks.
        let ctx = CallContext::new(APP);
        for amount in [0, 1, 1_000_000] {
            let companion = funding(ctx.app_address(), amount);
            assert!(evaluate(&ctx, &deposit_call(b"@alice"), Some(&companion)).is_ok());
        }
    }

    #[test]
    fn test_deposit_without_companion_rejected() {
        let ctx = CallContext::new(APP);
        let err = evaluate(&ctx, &deposit_call(b"@alice"), None).unwrap_err();
        assert_eq!(err, ApprovalError::MissingCompanion);
    }

    #[test]
    fn test_asset_transfer_companion_rejected() {
        let ctx = CallContext::new(APP);
        let companion = Transaction::AssetTransfer(AssetTransfer {
            sender: BOB,
            receiver: ctx.app_address(),
            asset: 31566704,
            amount: 1_000_000,
        });
        let err = evaluate(&ctx, &deposit_call(b"@alice"), Some(&companion)).unwrap_err();
        assert_eq!(
            err,
            ApprovalError::CompanionNotPayment {
                kind: TxnKind::AssetTransfer
            }
        );
        assert_eq!(err.kind(), RejectKind::Precondition);
    }

    #[test]
    fn test_app_call_companion_rejected() {
        let ctx = CallContext::new(APP);
        let companion = Transaction::ApplicationCall(deposit_call(b"@alice"));
        let err = evaluate(&ctx, &deposit_call(b"@alice"), Some(&companion)).unwrap_err();
        assert_eq!(
            err,
            ApprovalError::CompanionNotPayment {
                kind: TxnKind::ApplicationCall
            }
        );
    }

    #[test]
    fn test_wrong_receiver_rejected() {
        let ctx = CallContext::new(APP);
        let companion = funding(ALICE, 1_000_000);
        let err = evaluate(&ctx, &deposit_call(b"@alice"), Some(&companion)).unwrap_err();
        match err {
            ApprovalError::WrongReceiver { receiver, expected } => {
                assert_eq!(receiver, hex::encode(ALICE));
                assert_eq!(expected, hex::encode(ctx.app_address()));
            }
            other => panic!("expected WrongReceiver, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_selector_rejected() {
        let ctx = CallContext::new(APP);
        let mut call = deposit_call(b"@alice");
        call.args[0] = b"withdraw".to_vec();
        let companion = funding(ctx.app_address(), 1_000_000);
        let err = evaluate(&ctx, &call, Some(&companion)).unwrap_err();
        assert_eq!(
            err,
            ApprovalError::UnknownSelector {
                selector: "withdraw".to_string()
            }
        );
        assert_eq!(err.kind(), RejectKind::Routing);
    }

    #[test]
    fn test_missing_handle_rejected() {
        let ctx = CallContext::new(APP);
        let mut call = deposit_call(b"@alice");
        call.args.truncate(1);
        let companion = funding(ctx.app_address(), 1_000_000);
        let err = evaluate(&ctx, &call, Some(&companion)).unwrap_err();
        assert_eq!(err, ApprovalError::MissingHandle);
    }

    #[test]
    fn test_handle_stored_verbatim() {
        // Arbitrary bytes are stored untouched, not normalized.
        let ctx = CallContext::new(APP);
        let raw: Vec<u8> = vec![0xff, 0x00, 0x40, 0x61]; // not valid UTF-8
        let companion = funding(ctx.app_address(), 1);
        let effects = evaluate(&ctx, &deposit_call(&raw), Some(&companion)).unwrap();
        assert_eq!(effects.box_writes()[0].1, raw);
    }

    #[test]
    fn test_deposit_group_shape() {
        let group = deposit_group(BOB, APP, b"@alice", 1_000_000);
        assert_eq!(group.len(), 2);

        match &group[0] {
            Transaction::Payment(p) => {
                assert_eq!(p.receiver, app_address(APP));
                assert_eq!(p.amount, 1_000_000);
            }
            other => panic!("expected payment first, got {other:?}"),
        }
        match &group[1] {
            Transaction::ApplicationCall(c) => {
                assert_eq!(c.args[0], DEPOSIT_SELECTOR);
                assert_eq!(c.args[1], b"@alice");
                assert!(c.boxes.contains(&GITHUB_BOX.to_vec()));
            }
            other => panic!("expected application call second, got {other:?}"),
        }
    }
}
