//! Attaching signatures to a sealed transaction.
//!
//! Signing is a separate step from sealing so that several signers, possibly
//! on different machines, can each sign the identical hash. Signatures made
//! elsewhere are attached with [`Transaction::add_signature`].
//!
//! Every signature is stored with a 4-byte hint: the last four bytes of the
//! signer's public key.

use tracing::{debug, trace};

use super::builder::Transaction;
use super::error::TransactionError;
use super::types::TransactionState;
use crate::config::MAX_SIGNATURES;
use crate::crypto::keys::{Keypair, PublicKey};
use crate::crypto::signatures::sign;
use crate::xdr::DecoratedSignature;

impl Transaction {
    /// Signs the sealed hash with `keypair` and appends the signature.
    ///
    /// # Errors
    ///
    /// [`TransactionError::SequenceMisuse`] if the transaction has not been
    /// sealed yet.
    ///
    /// # Example
    ///
    /// ```
    /// use ledger_tx::account::Account;
    /// use ledger_tx::config::Network;
    /// use ledger_tx::crypto::Keypair;
    /// use ledger_tx::operation::{OperationSpec, SettlementOptions};
    /// use ledger_tx::transaction::TransactionBuilder;
    ///
    /// let keypair = Keypair::random();
    /// let mut account = Account::new(&keypair.account_id(), "1").unwrap();
    /// let mut tx = TransactionBuilder::new(&mut account)
    ///     .add_operation(OperationSpec::Settlement(SettlementOptions {
    ///         amount: "5".into(),
    ///         source: None,
    ///     }))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(tx.sign(&keypair).is_err());
    /// tx.seal(&Network::testnet()).unwrap();
    /// tx.sign(&keypair).unwrap();
    /// assert!(tx.verify_signature(&keypair.public_key()));
    /// ```
    pub fn sign(&mut self, keypair: &Keypair) -> Result<(), TransactionError> {
        let hash = self.sealed("signing")?.hash;
        let signature = sign(keypair, &hash);
        self.push_signature(keypair.signature_hint(), signature.into_bytes())?;
        debug!(
            hint = %hex::encode(keypair.signature_hint()),
            signatures = self.signatures.len(),
            "transaction signed"
        );
        Ok(())
    }

    /// Attaches a signature produced out-of-process by the holder of
    /// `public_key` (a `G...` account id). The signature is not verified.
    pub fn add_signature(
        &mut self,
        public_key: &str,
        signature: &[u8],
    ) -> Result<(), TransactionError> {
        self.sealed("adding a signature")?;
        let public_key = PublicKey::from_account_id(public_key)?;
        self.push_signature(public_key.signature_hint(), signature.to_vec())?;
        trace!(
            signer = %public_key,
            len = signature.len(),
            "external signature attached"
        );
        Ok(())
    }

    fn push_signature(&mut self, hint: [u8; 4], signature: Vec<u8>) -> Result<(), TransactionError> {
        if self.signatures.len() >= MAX_SIGNATURES {
            return Err(TransactionError::TooManySignatures {
                max: MAX_SIGNATURES,
            });
        }
        self.signatures.push(DecoratedSignature { hint, signature });
        self.state = TransactionState::Signed;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
