//! # Wire Records
//!
//! The canonical, schema-level shape of everything that goes on the wire:
//! operations, transactions, signature payloads and envelopes. These are
//! plain `serde` records; the byte layout belongs to the schema codec
//! (`bincode`, big-endian, fixed-width integers), reached only through
//! [`WriteXdr`] and [`ReadXdr`].
//!
//! Enumerations whose set of values may grow between protocol versions
//! (account types, signer types) are carried as raw `i32` tags so that a
//! record from a newer peer still decodes and the unknown value can be
//! reported by name instead of as a generic codec failure.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the schema codec.
#[derive(Debug, Error)]
pub enum XdrError {
    #[error("xdr codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_big_endian()
        .with_fixint_encoding()
}

/// Encoding half of the schema codec.
pub trait WriteXdr: Serialize {
    fn to_xdr(&self) -> Result<Vec<u8>, XdrError> {
        Ok(codec().serialize(self)?)
    }

    fn to_xdr_base64(&self) -> Result<String, XdrError> {
        Ok(BASE64.encode(self.to_xdr()?))
    }
}

/// Decoding half of the schema codec. Trailing bytes are an error.
pub trait ReadXdr: DeserializeOwned {
    fn from_xdr(bytes: &[u8]) -> Result<Self, XdrError> {
        Ok(codec().deserialize(bytes)?)
    }

    fn from_xdr_base64(encoded: &str) -> Result<Self, XdrError> {
        let bytes = BASE64.decode(encoded)?;
        Self::from_xdr(&bytes)
    }
}

macro_rules! impl_xdr {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WriteXdr for $ty {}
            impl ReadXdr for $ty {}
        )*
    };
}

// ---------------------------------------------------------------------------
// Keys & assets
// ---------------------------------------------------------------------------

/// Ed25519 public key identifying an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 32]);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    Native,
    CreditAlphanum4 { code: [u8; 4], issuer: AccountId },
    CreditAlphanum12 { code: [u8; 12], issuer: AccountId },
}

// ---------------------------------------------------------------------------
// Operation bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountOp {
    pub destination: AccountId,
    pub starting_balance: i64,
    pub account_type: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionOp {
    pub destination: AccountId,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOp {
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOp {
    pub destination: AccountId,
    pub asset: Asset,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignerKey {
    Ed25519([u8; 32]),
    PreAuthTx([u8; 32]),
    HashX([u8; 32]),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub key: SignerKey,
    pub weight: u32,
    pub signer_type: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOptionsOp {
    pub inflation_dest: Option<AccountId>,
    pub clear_flags: Option<u32>,
    pub set_flags: Option<u32>,
    pub master_weight: Option<u32>,
    pub low_threshold: Option<u32>,
    pub med_threshold: Option<u32>,
    pub high_threshold: Option<u32>,
    pub home_domain: Option<String>,
    pub signer: Option<Signer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMergeOp {
    pub destination: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManageDataOp {
    pub data_name: String,
    pub data_value: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendFeeOp {
    pub destination: AccountId,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFeeOp {
    pub base_fee: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictAccountOp {
    pub account: AccountId,
    pub clear_flags: Option<u32>,
    pub set_flags: Option<u32>,
}

/// Operation body. Variant order is the wire tag and must never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationBody {
    CreateAccount(CreateAccountOp),
    Emission(EmissionOp),
    Settlement(SettlementOp),
    Payment(PaymentOp),
    SetOptions(SetOptionsOp),
    AccountMerge(AccountMergeOp),
    ManageData(ManageDataOp),
    SpendFee(SpendFeeOp),
    SetFee(SetFeeOp),
    RestrictAccount(RestrictAccountOp),
}

/// Number of operation kinds the codec knows about.
pub const OPERATION_KIND_COUNT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub source_account: Option<AccountId>,
    pub body: OperationBody,
}

/// The fields that precede the body tag of an encoded [`Operation`].
#[derive(Deserialize)]
struct OperationHead {
    _source_account: Option<AccountId>,
    tag: u32,
}

/// Reads the body tag of an encoded operation without decoding the body.
pub fn peek_operation_tag(bytes: &[u8]) -> Result<u32, XdrError> {
    let head: OperationHead = codec().allow_trailing_bytes().deserialize(bytes)?;
    Ok(head.tag)
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Memo {
    None,
    Text(String),
    Id(u64),
    Hash([u8; 32]),
    Return([u8; 32]),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub source_account: AccountId,
    pub fee: u32,
    pub seq_num: u64,
    pub time_bounds: Option<TimeBounds>,
    pub memo: Memo,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaggedTransaction {
    Tx(Transaction),
}

/// What actually gets hashed and signed: the transaction bound to a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignaturePayload {
    pub network_id: [u8; 32],
    pub tagged_transaction: TaggedTransaction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedSignature {
    pub hint: [u8; 4],
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    pub tx: Transaction,
    pub signatures: Vec<DecoratedSignature>,
}

/// The fields that precede the operation list of an encoded envelope.
#[derive(Serialize, Deserialize)]
struct EnvelopeHead {
    source_account: AccountId,
    fee: u32,
    seq_num: u64,
    time_bounds: Option<TimeBounds>,
    memo: Memo,
    operation_count: u64,
}

/// Walks the operation list of an encoded envelope and returns the first
/// body tag the codec does not know, if there is one.
pub fn find_unknown_operation_tag(bytes: &[u8]) -> Result<Option<u32>, XdrError> {
    let head: EnvelopeHead = codec().allow_trailing_bytes().deserialize(bytes)?;
    let mut offset = codec().serialized_size(&head)? as usize;

    for _ in 0..head.operation_count {
        let rest = bytes.get(offset..).unwrap_or_default();
        let tag = peek_operation_tag(rest)?;
        if tag >= OPERATION_KIND_COUNT {
            return Ok(Some(tag));
        }
        let op: Operation = codec().allow_trailing_bytes().deserialize(rest)?;
        offset += codec().serialized_size(&op)? as usize;
    }
    Ok(None)
}

impl_xdr!(
    Operation,
    Transaction,
    TransactionSignaturePayload,
    TransactionEnvelope,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_op(body: OperationBody) -> Operation {
        Operation {
            source_account: None,
            body,
        }
    }

    #[test]
    fn integers_are_big_endian_fixed_width() {
        let op = sample_op(OperationBody::SetFee(SetFeeOp { base_fee: 1 }));
        let bytes = op.to_xdr().unwrap();
        // option tag, body tag (u32 = 8), base fee (u32 = 1)
        assert_eq!(bytes, vec![0, 0, 0, 0, 8, 0, 0, 0, 1]);
    }

    #[test]
    fn peek_reads_body_tag() {
        let op = Operation {
            source_account: Some(AccountId([3u8; 32])),
            body: OperationBody::Settlement(SettlementOp { amount: 5 }),
        };
        let bytes = op.to_xdr().unwrap();
        assert_eq!(peek_operation_tag(&bytes).unwrap(), 2);
    }

    #[test]
    fn unknown_body_tag_fails_decode() {
        let mut bytes = sample_op(OperationBody::SetFee(SetFeeOp { base_fee: 1 }))
            .to_xdr()
            .unwrap();
        bytes[4] = 42;
        assert!(Operation::from_xdr(&bytes).is_err());
        assert_eq!(peek_operation_tag(&bytes).unwrap(), 42);
    }

    fn two_op_envelope() -> Vec<u8> {
        TransactionEnvelope {
            tx: Transaction {
                source_account: AccountId([1u8; 32]),
                fee: 200,
                seq_num: 3,
                time_bounds: Some(TimeBounds {
                    min_time: 0,
                    max_time: 60,
                }),
                memo: Memo::Text("hi".into()),
                operations: vec![
                    sample_op(OperationBody::SetFee(SetFeeOp { base_fee: 1 })),
                    Operation {
                        source_account: Some(AccountId([2u8; 32])),
                        body: OperationBody::Settlement(SettlementOp { amount: 5 }),
                    },
                ],
            },
            signatures: vec![],
        }
        .to_xdr()
        .unwrap()
    }

    #[test]
    fn envelope_scan_finds_no_unknown_tag() {
        assert_eq!(find_unknown_operation_tag(&two_op_envelope()).unwrap(), None);
    }

    #[test]
    fn envelope_scan_reports_unknown_second_tag() {
        let mut bytes = two_op_envelope();
        // Second operation: option tag (1) + account id (32), then body tag.
        let settlement = Operation {
            source_account: Some(AccountId([2u8; 32])),
            body: OperationBody::Settlement(SettlementOp { amount: 5 }),
        }
        .to_xdr()
        .unwrap();
        let start = bytes.len() - 8 - settlement.len();
        assert_eq!(&bytes[start..start + settlement.len()], settlement.as_slice());
        bytes[start + 33 + 3] = 42;
        assert_eq!(find_unknown_operation_tag(&bytes).unwrap(), Some(42));
        assert!(TransactionEnvelope::from_xdr(&bytes).is_err());
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes = sample_op(OperationBody::Settlement(SettlementOp { amount: 1 }))
            .to_xdr()
            .unwrap();
        bytes.push(0);
        assert!(Operation::from_xdr(&bytes).is_err());
    }

    #[test]
    fn base64_envelope_roundtrip() {
        let envelope = TransactionEnvelope {
            tx: Transaction {
                source_account: AccountId([1u8; 32]),
                fee: 100,
                seq_num: 7,
                time_bounds: Some(TimeBounds {
                    min_time: 0,
                    max_time: 1_700_000_000,
                }),
                memo: Memo::Text("hi".into()),
                operations: vec![sample_op(OperationBody::Settlement(SettlementOp {
                    amount: 10,
                }))],
            },
            signatures: vec![DecoratedSignature {
                hint: [1, 2, 3, 4],
                signature: vec![9u8; 64],
            }],
        };
        let encoded = envelope.to_xdr_base64().unwrap();
        assert_eq!(TransactionEnvelope::from_xdr_base64(&encoded).unwrap(), envelope);
        assert!(matches!(
            TransactionEnvelope::from_xdr_base64("***"),
            Err(XdrError::Base64(_))
        ));
    }
}
