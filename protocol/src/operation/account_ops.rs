//! Operations that create, configure, merge or restrict accounts.

use serde::{Deserialize, Serialize};

use super::error::OperationError;
use super::validate::{
    check_account_id, check_amount, check_length, check_optional_unsigned,
    check_optional_weight, check_source, check_weight, render_account_id, NumericLike,
};
use crate::amount::from_ledger_amount;
use crate::config::MAX_HOME_DOMAIN_LENGTH;
use crate::strkey::{self, VersionByte};
use crate::xdr::{
    AccountMergeOp, CreateAccountOp, Operation, OperationBody, RestrictAccountOp, SetOptionsOp,
    Signer, SignerKey,
};

// ---------------------------------------------------------------------------
// Account & signer types
// ---------------------------------------------------------------------------

/// The role an account plays on the ledger. Fixed at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountType {
    Issuer,
    Distribution,
    Settlement,
    Fee,
    Client,
}

impl AccountType {
    pub fn to_i32(self) -> i32 {
        match self {
            AccountType::Issuer => 0,
            AccountType::Distribution => 1,
            AccountType::Settlement => 2,
            AccountType::Fee => 3,
            AccountType::Client => 4,
        }
    }
}

impl TryFrom<i32> for AccountType {
    type Error = OperationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccountType::Issuer),
            1 => Ok(AccountType::Distribution),
            2 => Ok(AccountType::Settlement),
            3 => Ok(AccountType::Fee),
            4 => Ok(AccountType::Client),
            other => Err(OperationError::UnknownAccountType(other)),
        }
    }
}

/// What a signer is allowed to authorize.
///
/// There is no default: a signer without an explicit type is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignerType {
    General,
    Admin,
    Emission,
    Settlement,
}

impl SignerType {
    pub fn to_i32(self) -> i32 {
        match self {
            SignerType::General => 0,
            SignerType::Admin => 1,
            SignerType::Emission => 2,
            SignerType::Settlement => 3,
        }
    }
}

impl TryFrom<i32> for SignerType {
    type Error = OperationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SignerType::General),
            1 => Ok(SignerType::Admin),
            2 => Ok(SignerType::Emission),
            3 => Ok(SignerType::Settlement),
            other => Err(OperationError::UnknownSignerType(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// createAccount
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountOptions {
    pub destination: String,
    /// Zero is allowed.
    pub starting_balance: String,
    pub account_type: AccountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

pub fn create_account(opts: &CreateAccountOptions) -> Result<Operation, OperationError> {
    let destination = check_account_id("destination", &opts.destination)?;
    let starting_balance = check_amount("startingBalance", &opts.starting_balance, true)?;
    Ok(Operation {
        source_account: check_source(opts.source.as_deref())?,
        body: OperationBody::CreateAccount(CreateAccountOp {
            destination,
            starting_balance,
            account_type: opts.account_type.to_i32(),
        }),
    })
}

pub(super) fn decode_create_account(
    source: Option<String>,
    op: &CreateAccountOp,
) -> Result<CreateAccountOptions, OperationError> {
    Ok(CreateAccountOptions {
        destination: render_account_id(&op.destination),
        starting_balance: from_ledger_amount(op.starting_balance),
        account_type: AccountType::try_from(op.account_type)?,
        source,
    })
}

// ---------------------------------------------------------------------------
// accountMerge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMergeOptions {
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

pub fn account_merge(opts: &AccountMergeOptions) -> Result<Operation, OperationError> {
    let destination = check_account_id("destination", &opts.destination)?;
    Ok(Operation {
        source_account: check_source(opts.source.as_deref())?,
        body: OperationBody::AccountMerge(AccountMergeOp { destination }),
    })
}

pub(super) fn decode_account_merge(source: Option<String>, op: &AccountMergeOp) -> AccountMergeOptions {
    AccountMergeOptions {
        destination: render_account_id(&op.destination),
        source,
    }
}

// ---------------------------------------------------------------------------
// setOptions
// ---------------------------------------------------------------------------

/// A signer to add, update or (with weight 0) remove.
///
/// Exactly one of the three key fields must be set. Hash keys are accepted
/// either as StrKeys (`X...` / `T...`) or as 64 hex characters and are
/// always rendered back as StrKeys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ed25519_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_auth_tx: Option<String>,
    pub weight: NumericLike,
    pub signer_type: SignerType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAccountOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_dest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_flags: Option<NumericLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_flags: Option<NumericLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_weight: Option<NumericLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_threshold: Option<NumericLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_threshold: Option<NumericLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_threshold: Option<NumericLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer: Option<SignerOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

fn check_hash_key(
    field: &'static str,
    value: &str,
    kind: VersionByte,
) -> Result<[u8; 32], OperationError> {
    if value.len() == 64 {
        if let Ok(bytes) = hex::decode(value) {
            let mut out = [0u8; 32];
            out.copy_from_slice(&bytes);
            return Ok(out);
        }
    }
    strkey::decode(kind, value).map_err(|reason| OperationError::InvalidAddress { field, reason })
}

fn check_signer(signer: &SignerOptions) -> Result<Signer, OperationError> {
    let key = match (
        &signer.ed25519_public_key,
        &signer.sha256_hash,
        &signer.pre_auth_tx,
    ) {
        (Some(pk), None, None) => {
            SignerKey::Ed25519(check_account_id("signer.ed25519PublicKey", pk)?.0)
        }
        (None, Some(hash), None) => {
            SignerKey::HashX(check_hash_key("signer.sha256Hash", hash, VersionByte::Sha256Hash)?)
        }
        (None, None, Some(hash)) => {
            SignerKey::PreAuthTx(check_hash_key("signer.preAuthTx", hash, VersionByte::PreAuthTx)?)
        }
        (pk, sha, pre) => {
            let populated = [pk.is_some(), sha.is_some(), pre.is_some()]
                .iter()
                .filter(|set| **set)
                .count();
            return Err(OperationError::InvalidSignerSpec(format!(
                "exactly one of ed25519PublicKey, sha256Hash, preAuthTx must be set, got {populated}"
            )));
        }
    };

    Ok(Signer {
        key,
        weight: check_weight("signer.weight", &signer.weight)?,
        signer_type: signer.signer_type.to_i32(),
    })
}

/// Builds a `setOptions` operation. Every field is optional; flag values
/// are not restricted to the bits that currently have a meaning.
pub fn set_options(opts: &SetAccountOptions) -> Result<Operation, OperationError> {
    let inflation_dest = opts
        .inflation_dest
        .as_deref()
        .map(|dest| check_account_id("inflationDest", dest))
        .transpose()?;

    if let Some(domain) = &opts.home_domain {
        check_length("homeDomain", domain.len(), MAX_HOME_DOMAIN_LENGTH)?;
    }

    let body = SetOptionsOp {
        inflation_dest,
        clear_flags: check_optional_unsigned("clearFlags", opts.clear_flags.as_ref())?,
        set_flags: check_optional_unsigned("setFlags", opts.set_flags.as_ref())?,
        master_weight: check_optional_weight("masterWeight", opts.master_weight.as_ref())?,
        low_threshold: check_optional_weight("lowThreshold", opts.low_threshold.as_ref())?,
        med_threshold: check_optional_weight("medThreshold", opts.med_threshold.as_ref())?,
        high_threshold: check_optional_weight("highThreshold", opts.high_threshold.as_ref())?,
        home_domain: opts.home_domain.clone(),
        signer: opts.signer.as_ref().map(check_signer).transpose()?,
    };

    Ok(Operation {
        source_account: check_source(opts.source.as_deref())?,
        body: OperationBody::SetOptions(body),
    })
}

fn integer(value: Option<u32>) -> Option<NumericLike> {
    value.map(NumericLike::from)
}

pub(super) fn decode_set_options(
    source: Option<String>,
    op: &SetOptionsOp,
) -> Result<SetAccountOptions, OperationError> {
    let signer = match &op.signer {
        None => None,
        Some(signer) => {
            let mut decoded = SignerOptions {
                ed25519_public_key: None,
                sha256_hash: None,
                pre_auth_tx: None,
                weight: NumericLike::from(signer.weight),
                signer_type: SignerType::try_from(signer.signer_type)?,
            };
            match &signer.key {
                SignerKey::Ed25519(key) => {
                    decoded.ed25519_public_key = Some(strkey::encode_ed25519_public_key(key))
                }
                SignerKey::HashX(hash) => {
                    decoded.sha256_hash = Some(strkey::encode_sha256_hash(hash))
                }
                SignerKey::PreAuthTx(hash) => {
                    decoded.pre_auth_tx = Some(strkey::encode_pre_auth_tx(hash))
                }
            }
            Some(decoded)
        }
    };

    Ok(SetAccountOptions {
        inflation_dest: op.inflation_dest.as_ref().map(render_account_id),
        clear_flags: integer(op.clear_flags),
        set_flags: integer(op.set_flags),
        master_weight: integer(op.master_weight),
        low_threshold: integer(op.low_threshold),
        med_threshold: integer(op.med_threshold),
        high_threshold: integer(op.high_threshold),
        home_domain: op.home_domain.clone(),
        signer,
        source,
    })
}

// ---------------------------------------------------------------------------
// restrictAccount
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictAccountOptions {
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_flags: Option<NumericLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_flags: Option<NumericLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

pub fn restrict_account(opts: &RestrictAccountOptions) -> Result<Operation, OperationError> {
    let account = check_account_id("account", &opts.account)?;
    Ok(Operation {
        source_account: check_source(opts.source.as_deref())?,
        body: OperationBody::RestrictAccount(RestrictAccountOp {
            account,
            clear_flags: check_optional_unsigned("clearFlags", opts.clear_flags.as_ref())?,
            set_flags: check_optional_unsigned("setFlags", opts.set_flags.as_ref())?,
        }),
    })
}

pub(super) fn decode_restrict_account(
    source: Option<String>,
    op: &RestrictAccountOp,
) -> RestrictAccountOptions {
    RestrictAccountOptions {
        account: render_account_id(&op.account),
        clear_flags: integer(op.clear_flags),
        set_flags: integer(op.set_flags),
        source,
    }
}
