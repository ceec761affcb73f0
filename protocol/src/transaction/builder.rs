//! Transaction assembly via the builder pattern.
//!
//! [`TransactionBuilder`] borrows the source [`Account`] mutably for the
//! duration of the build: a successful `build()` claims the next sequence
//! number and advances the account, so two builds can never share one. A
//! failed build leaves the account untouched.
//!
//! The resulting [`Transaction`] starts in [`TransactionState::Building`]
//! and only becomes signable after [`Transaction::seal`] fixes its body and
//! computes the network-scoped hash.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::{debug, warn};

use super::error::TransactionError;
use super::types::{Memo, TimeBounds, TransactionState};
use crate::account::Account;
use crate::config::{Network, MAX_OPERATIONS, MAX_SIGNATURES};
use crate::crypto::hash::sha256_array;
use crate::operation::{OperationError, OperationSpec};
use crate::strkey;
use crate::xdr::{
    self, AccountId, DecoratedSignature, ReadXdr, TaggedTransaction, TransactionEnvelope,
    TransactionSignaturePayload, WriteXdr,
};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// The canonical body and its signing hash, fixed at seal time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sealed {
    pub(crate) body: xdr::Transaction,
    pub(crate) hash: [u8; 32],
}

/// A transaction for a single source account.
///
/// Operation order is preserved end to end: operations apply on the ledger
/// in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub(crate) source_account: String,
    pub(crate) sequence: u64,
    pub(crate) fee_per_operation: u32,
    pub(crate) time_bounds: Option<TimeBounds>,
    pub(crate) memo: Memo,
    pub(crate) operations: Vec<xdr::Operation>,
    pub(crate) state: TransactionState,
    pub(crate) sealed: Option<Sealed>,
    pub(crate) signatures: Vec<DecoratedSignature>,
}

fn total_fee(per_operation: u32, operations: usize) -> Result<u32, TransactionError> {
    u32::try_from(operations)
        .ok()
        .and_then(|n| per_operation.checked_mul(n))
        .ok_or(TransactionError::FeeOverflow {
            per_operation,
            operations,
        })
}

impl Transaction {
    pub fn source_account(&self) -> &str {
        &self.source_account
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence
    }

    /// Total fee: the sealed fee once sealed, otherwise per-operation fee
    /// times the current operation count.
    pub fn fee(&self) -> u32 {
        match &self.sealed {
            Some(sealed) => sealed.body.fee,
            None => self
                .fee_per_operation
                .saturating_mul(self.operations.len() as u32),
        }
    }

    pub fn time_bounds(&self) -> Option<TimeBounds> {
        self.time_bounds
    }

    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    pub fn signatures(&self) -> &[DecoratedSignature] {
        &self.signatures
    }

    /// Decodes the operation list back into options records.
    pub fn operations(&self) -> Result<Vec<OperationSpec>, TransactionError> {
        self.operations
            .iter()
            .map(|op| OperationSpec::from_wire_object(op).map_err(TransactionError::from))
            .collect()
    }

    /// Appends an operation. Only allowed while [`TransactionState::Building`].
    pub fn add_operation(&mut self, operation: &OperationSpec) -> Result<(), TransactionError> {
        if self.state != TransactionState::Building {
            return Err(TransactionError::SequenceMisuse(format!(
                "cannot add operations to a {} transaction",
                self.state
            )));
        }
        let count = self.operations.len() + 1;
        if count > MAX_OPERATIONS {
            return Err(TransactionError::TooManyOperations {
                max: MAX_OPERATIONS,
                actual: count,
            });
        }
        total_fee(self.fee_per_operation, count)?;
        self.operations.push(operation.build()?);
        Ok(())
    }

    /// Fixes the body and computes the signing hash for `network`.
    ///
    /// The hash covers the network id, so a signature made for one network
    /// never verifies on another.
    pub fn seal(&mut self, network: &Network) -> Result<[u8; 32], TransactionError> {
        if self.state != TransactionState::Building {
            return Err(TransactionError::SequenceMisuse(format!(
                "transaction is already {}",
                self.state
            )));
        }
        if self.operations.is_empty() {
            return Err(TransactionError::SequenceMisuse(
                "cannot seal a transaction with no operations".into(),
            ));
        }

        let source = strkey::decode_ed25519_public_key(&self.source_account)
            .map_err(crate::account::AccountError::InvalidAccountId)?;
        let body = xdr::Transaction {
            source_account: AccountId(source),
            fee: total_fee(self.fee_per_operation, self.operations.len())?,
            seq_num: self.sequence,
            time_bounds: self.time_bounds.map(TimeBounds::to_wire),
            memo: self.memo.to_wire(),
            operations: self.operations.clone(),
        };
        let hash = signing_hash(&body, network)?;

        debug!(
            source = %self.source_account,
            sequence = self.sequence,
            hash = %hex::encode(hash),
            "transaction sealed"
        );
        self.sealed = Some(Sealed { body, hash });
        self.state = TransactionState::Sealed;
        Ok(hash)
    }

    /// The signing hash, available once sealed.
    pub fn hash(&self) -> Option<[u8; 32]> {
        self.sealed.as_ref().map(|s| s.hash)
    }

    pub fn hash_hex(&self) -> Option<String> {
        self.hash().map(hex::encode)
    }

    pub(crate) fn sealed(&self, action: &str) -> Result<&Sealed, TransactionError> {
        self.sealed.as_ref().ok_or_else(|| {
            TransactionError::SequenceMisuse(format!("transaction must be sealed before {action}"))
        })
    }

    /// The sealed body plus every attached signature, in wire encoding.
    pub fn to_envelope(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(self.envelope()?.to_xdr()?)
    }

    pub fn to_envelope_base64(&self) -> Result<String, TransactionError> {
        Ok(self.envelope()?.to_xdr_base64()?)
    }

    fn envelope(&self) -> Result<TransactionEnvelope, TransactionError> {
        let sealed = self.sealed("exporting an envelope")?;
        Ok(TransactionEnvelope {
            tx: sealed.body.clone(),
            signatures: self.signatures.clone(),
        })
    }
}

/// Decodes an envelope, naming the first unknown operation kind when that is
/// what made the codec fail.
fn decode_envelope(bytes: &[u8]) -> Result<TransactionEnvelope, TransactionError> {
    TransactionEnvelope::from_xdr(bytes).map_err(|err| -> TransactionError {
        match xdr::find_unknown_operation_tag(bytes) {
            Ok(Some(tag)) => {
                warn!(tag, "envelope carries unknown operation kind");
                OperationError::UnknownOperationKind(tag).into()
            }
            _ => err.into(),
        }
    })
}

impl Transaction {
    /// Restores a transaction from an envelope received off the wire.
    ///
    /// The hash is recomputed for `network`; the result is Sealed, or Signed
    /// when the envelope carries signatures. Operations are decoded eagerly
    /// so that unknown operation, account or signer types surface here.
    pub fn from_envelope(bytes: &[u8], network: &Network) -> Result<Self, TransactionError> {
        let envelope = decode_envelope(bytes)?;
        Self::from_wire_envelope(envelope, network)
    }

    pub fn from_envelope_base64(encoded: &str, network: &Network) -> Result<Self, TransactionError> {
        let bytes = BASE64.decode(encoded).map_err(xdr::XdrError::from)?;
        Self::from_envelope(&bytes, network)
    }

    fn from_wire_envelope(
        envelope: TransactionEnvelope,
        network: &Network,
    ) -> Result<Self, TransactionError> {
        let TransactionEnvelope { tx: body, signatures } = envelope;
        if body.operations.is_empty() {
            return Err(TransactionError::SequenceMisuse(
                "envelope carries no operations".into(),
            ));
        }
        if body.operations.len() > MAX_OPERATIONS {
            return Err(TransactionError::TooManyOperations {
                max: MAX_OPERATIONS,
                actual: body.operations.len(),
            });
        }
        if signatures.len() > MAX_SIGNATURES {
            return Err(TransactionError::TooManySignatures {
                max: MAX_SIGNATURES,
            });
        }
        for op in &body.operations {
            OperationSpec::from_wire_object(op)?;
        }

        let hash = signing_hash(&body, network)?;
        let state = if signatures.is_empty() {
            TransactionState::Sealed
        } else {
            TransactionState::Signed
        };
        debug!(
            hash = %hex::encode(hash),
            operations = body.operations.len(),
            signatures = signatures.len(),
            "envelope decoded"
        );

        Ok(Self {
            source_account: strkey::encode_ed25519_public_key(&body.source_account.0),
            sequence: body.seq_num,
            fee_per_operation: body.fee / body.operations.len() as u32,
            time_bounds: body.time_bounds.as_ref().map(TimeBounds::from_wire),
            memo: Memo::from_wire(&body.memo),
            operations: body.operations.clone(),
            state,
            sealed: Some(Sealed { body, hash }),
            signatures,
        })
    }
}

pub(crate) fn signing_hash(
    body: &xdr::Transaction,
    network: &Network,
) -> Result<[u8; 32], TransactionError> {
    let payload = TransactionSignaturePayload {
        network_id: network.network_id(),
        tagged_transaction: TaggedTransaction::Tx(body.clone()),
    };
    Ok(sha256_array(&payload.to_xdr()?))
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Transaction`]s.
///
/// # Usage
///
/// ```
/// use ledger_tx::account::Account;
/// use ledger_tx::config::Network;
/// use ledger_tx::operation::{OperationSpec, PaymentOptions};
/// use ledger_tx::transaction::TransactionBuilder;
///
/// let mut account = Account::new(
///     "GCEZWKCA5VLDNRLN3RPRJMRZOX3Z6G5CHCGSNFHEYVXM3XOJMDS674JZ",
///     "100",
/// )
/// .unwrap();
///
/// let mut tx = TransactionBuilder::new(&mut account)
///     .add_operation(OperationSpec::Payment(PaymentOptions {
///         destination: "GCEZWKCA5VLDNRLN3RPRJMRZOX3Z6G5CHCGSNFHEYVXM3XOJMDS674JZ".into(),
///         amount: "10".into(),
///         source: None,
///     }))
///     .build()
///     .unwrap();
///
/// assert_eq!(tx.sequence_number(), 101);
/// assert_eq!(account.sequence_number(), 101);
/// tx.seal(&Network::testnet()).unwrap();
/// ```
///
/// The fee defaults to the account's base fee per operation.
pub struct TransactionBuilder<'a> {
    account: &'a mut Account,
    fee_per_operation: u32,
    operations: Vec<OperationSpec>,
    time_bounds: Option<TimeBounds>,
    memo: Memo,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(account: &'a mut Account) -> Self {
        let fee_per_operation = account.base_fee();
        Self {
            account,
            fee_per_operation,
            operations: Vec::new(),
            time_bounds: None,
            memo: Memo::None,
        }
    }

    /// Sets the fee per operation, in stroops.
    pub fn fee(mut self, fee_per_operation: u32) -> Self {
        self.fee_per_operation = fee_per_operation;
        self
    }

    pub fn add_operation(mut self, operation: OperationSpec) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn operations(mut self, operations: impl IntoIterator<Item = OperationSpec>) -> Self {
        self.operations.extend(operations);
        self
    }

    pub fn time_bounds(mut self, time_bounds: TimeBounds) -> Self {
        self.time_bounds = Some(time_bounds);
        self
    }

    pub fn memo(mut self, memo: Memo) -> Self {
        self.memo = memo;
        self
    }

    /// Validates everything, then claims `account.sequence + 1`.
    pub fn build(self) -> Result<Transaction, TransactionError> {
        if self.operations.is_empty() {
            return Err(TransactionError::SequenceMisuse(
                "a transaction needs at least one operation".into(),
            ));
        }
        if self.operations.len() > MAX_OPERATIONS {
            return Err(TransactionError::TooManyOperations {
                max: MAX_OPERATIONS,
                actual: self.operations.len(),
            });
        }
        total_fee(self.fee_per_operation, self.operations.len())?;
        if let Some(bounds) = &self.time_bounds {
            bounds.validate()?;
        }
        self.memo.validate()?;

        let operations = self
            .operations
            .iter()
            .map(OperationSpec::build)
            .collect::<Result<Vec<_>, _>>()?;

        self.account.increment_sequence_number()?;
        let sequence = self.account.sequence_number();

        debug!(
            source = %self.account.account_id(),
            sequence,
            operations = operations.len(),
            fee_per_operation = self.fee_per_operation,
            "transaction built"
        );

        Ok(Transaction {
            source_account: self.account.account_id().to_string(),
            sequence,
            fee_per_operation: self.fee_per_operation,
            time_bounds: self.time_bounds,
            memo: self.memo,
            operations,
            state: TransactionState::Building,
            sealed: None,
            signatures: Vec::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use crate::operation::SettlementOptions;

    const SOURCE: &str = "GCEZWKCA5VLDNRLN3RPRJMRZOX3Z6G5CHCGSNFHEYVXM3XOJMDS674JZ";

    fn settle(amount: &str) -> OperationSpec {
        OperationSpec::Settlement(SettlementOptions {
            amount: amount.into(),
            source: None,
        })
    }

    fn account() -> Account {
        Account::new(SOURCE, "100").unwrap()
    }

    #[test]
    fn build_claims_next_sequence() {
        let mut account = account();
        let tx1 = TransactionBuilder::new(&mut account)
            .add_operation(settle("1"))
            .build()
            .unwrap();
        let tx2 = TransactionBuilder::new(&mut account)
            .add_operation(settle("1"))
            .build()
            .unwrap();
        assert_eq!(tx1.sequence_number(), 101);
        assert_eq!(tx2.sequence_number(), 102);
        assert_eq!(account.sequence_number(), 102);
    }

    #[test]
    fn empty_build_is_rejected_and_keeps_sequence() {
        let mut account = account();
        let err = TransactionBuilder::new(&mut account).build().unwrap_err();
        assert!(matches!(err, TransactionError::SequenceMisuse(_)));
        assert_eq!(account.sequence_number(), 100);
    }

    #[test]
    fn invalid_operation_keeps_sequence() {
        let mut account = account();
        let err = TransactionBuilder::new(&mut account)
            .add_operation(settle("1"))
            .add_operation(settle("0"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Operation(OperationError::InvalidAmount { .. })
        ));
        assert_eq!(account.sequence_number(), 100);
    }

    #[test]
    fn fee_is_per_operation() {
        let mut account = account();
        let mut tx = TransactionBuilder::new(&mut account)
            .fee(150)
            .operations([settle("1"), settle("2"), settle("3")])
            .build()
            .unwrap();
        assert_eq!(tx.fee(), 450);
        tx.seal(&Network::testnet()).unwrap();
        assert_eq!(tx.fee(), 450);
    }

    #[test]
    fn fee_overflow_detected() {
        let mut account = account();
        let err = TransactionBuilder::new(&mut account)
            .fee(u32::MAX)
            .operations([settle("1"), settle("1")])
            .build()
            .unwrap_err();
        assert!(matches!(err, TransactionError::FeeOverflow { .. }));
    }

    #[test]
    fn operation_limit() {
        let mut account = account();
        let err = TransactionBuilder::new(&mut account)
            .operations((0..101).map(|_| settle("1")))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            TransactionError::TooManyOperations { max: 100, actual: 101 }
        ));

        let mut tx = TransactionBuilder::new(&mut account)
            .operations((0..100).map(|_| settle("1")))
            .build()
            .unwrap();
        assert!(matches!(
            tx.add_operation(&settle("1")),
            Err(TransactionError::TooManyOperations { .. })
        ));
    }

    #[test]
    fn operations_appendable_until_sealed() {
        let mut account = account();
        let mut tx = TransactionBuilder::new(&mut account)
            .add_operation(settle("1"))
            .build()
            .unwrap();
        tx.add_operation(&settle("2")).unwrap();
        assert_eq!(tx.operation_count(), 2);

        tx.seal(&Network::testnet()).unwrap();
        assert_eq!(tx.state(), TransactionState::Sealed);
        assert!(matches!(
            tx.add_operation(&settle("3")),
            Err(TransactionError::SequenceMisuse(_))
        ));
        assert!(matches!(
            tx.seal(&Network::testnet()),
            Err(TransactionError::SequenceMisuse(_))
        ));
    }

    #[test]
    fn operation_order_preserved() {
        let mut account = account();
        let tx = TransactionBuilder::new(&mut account)
            .operations([settle("1"), settle("2"), settle("3")])
            .build()
            .unwrap();
        let amounts: Vec<String> = tx
            .operations()
            .unwrap()
            .into_iter()
            .map(|op| match op {
                OperationSpec::Settlement(o) => o.amount,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(amounts, ["1", "2", "3"]);
    }

    #[test]
    fn hash_depends_on_network() {
        let build = || {
            let mut account = account();
            TransactionBuilder::new(&mut account)
                .add_operation(settle("1"))
                .build()
                .unwrap()
        };
        let mut a = build();
        let mut b = build();
        let mut c = build();
        let ha = a.seal(&Network::testnet()).unwrap();
        let hb = b.seal(&Network::public()).unwrap();
        let hc = c.seal(&Network::testnet()).unwrap();
        assert_ne!(ha, hb);
        assert_eq!(ha, hc);
        assert_eq!(a.hash_hex().unwrap().len(), 64);
    }

    #[test]
    fn hash_is_sha256_of_signature_payload() {
        let mut account = account();
        let mut tx = TransactionBuilder::new(&mut account)
            .memo(Memo::Id(7))
            .add_operation(settle("1"))
            .build()
            .unwrap();
        let network = Network::testnet();
        let hash = tx.seal(&network).unwrap();

        let envelope = TransactionEnvelope::from_xdr(&tx.to_envelope().unwrap()).unwrap();
        let payload = TransactionSignaturePayload {
            network_id: network.network_id(),
            tagged_transaction: TaggedTransaction::Tx(envelope.tx),
        };
        assert_eq!(hash, sha256_array(&payload.to_xdr().unwrap()));
    }

    #[test]
    fn envelope_requires_seal() {
        let mut account = account();
        let tx = TransactionBuilder::new(&mut account)
            .add_operation(settle("1"))
            .build()
            .unwrap();
        assert!(tx.hash().is_none());
        assert!(matches!(
            tx.to_envelope(),
            Err(TransactionError::SequenceMisuse(_))
        ));
    }

    #[test]
    fn envelope_roundtrip_restores_transaction() {
        let mut account = account();
        let mut tx = TransactionBuilder::new(&mut account)
            .fee(200)
            .time_bounds(TimeBounds::new(5, 500).unwrap())
            .memo(Memo::text("invoice 42").unwrap())
            .operations([settle("1.5"), settle("2")])
            .build()
            .unwrap();
        let network = Network::testnet();
        tx.seal(&network).unwrap();

        let restored = Transaction::from_envelope(&tx.to_envelope().unwrap(), &network).unwrap();
        assert_eq!(restored, tx);
        assert_eq!(restored.state(), TransactionState::Sealed);

        let b64 = tx.to_envelope_base64().unwrap();
        let restored = Transaction::from_envelope_base64(&b64, &network).unwrap();
        assert_eq!(restored.operations().unwrap(), tx.operations().unwrap());
        assert_eq!(restored.fee(), 400);
    }

    #[test]
    fn envelope_without_operations_rejected() {
        let envelope = TransactionEnvelope {
            tx: xdr::Transaction {
                source_account: AccountId([1u8; 32]),
                fee: 0,
                seq_num: 1,
                time_bounds: None,
                memo: xdr::Memo::None,
                operations: vec![],
            },
            signatures: vec![],
        };
        assert!(matches!(
            Transaction::from_envelope(&envelope.to_xdr().unwrap(), &Network::testnet()),
            Err(TransactionError::SequenceMisuse(_))
        ));
    }

    fn sealed_settlement() -> Transaction {
        let mut account = account();
        let mut tx = TransactionBuilder::new(&mut account)
            .add_operation(settle("1"))
            .build()
            .unwrap();
        tx.seal(&Network::testnet()).unwrap();
        tx
    }

    #[test]
    fn envelope_with_unknown_operation_kind_is_named() {
        let tx = sealed_settlement();
        let mut bytes = tx.to_envelope().unwrap();
        let op = tx.operations[0].to_xdr().unwrap();
        // The single operation sits right before the empty signature list.
        let start = bytes.len() - 8 - op.len();
        assert_eq!(&bytes[start + 1..start + 5], &[0, 0, 0, 2]);
        bytes[start + 4] = 42;

        let err = Transaction::from_envelope(&bytes, &Network::testnet()).unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Operation(OperationError::UnknownOperationKind(42))
        ));

        let encoded = BASE64.encode(&bytes);
        assert!(matches!(
            Transaction::from_envelope_base64(&encoded, &Network::testnet()),
            Err(TransactionError::Operation(OperationError::UnknownOperationKind(42)))
        ));
    }

    #[test]
    fn truncated_envelope_is_a_codec_error() {
        let bytes = sealed_settlement().to_envelope().unwrap();
        assert!(matches!(
            Transaction::from_envelope(&bytes[..bytes.len() - 3], &Network::testnet()),
            Err(TransactionError::Xdr(_))
        ));
    }

    #[test]
    fn envelope_with_too_many_signatures_rejected() {
        let tx = sealed_settlement();
        let envelope = TransactionEnvelope {
            tx: tx.sealed.clone().unwrap().body,
            signatures: vec![
                DecoratedSignature {
                    hint: [0u8; 4],
                    signature: vec![0u8; 64],
                };
                MAX_SIGNATURES + 1
            ],
        };
        assert!(matches!(
            Transaction::from_envelope(&envelope.to_xdr().unwrap(), &Network::testnet()),
            Err(TransactionError::TooManySignatures { max: MAX_SIGNATURES })
        ));
    }

    #[test]
    fn long_memo_rejected_at_build() {
        let mut account = account();
        let err = TransactionBuilder::new(&mut account)
            .memo(Memo::Text("x".repeat(29)))
            .add_operation(settle("1"))
            .build()
            .unwrap_err();
        assert!(matches!(err, TransactionError::MemoTooLong { .. }));
    }
}
