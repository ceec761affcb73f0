//! Assets as callers name them: the native asset, or an issued asset
//! identified by a short alphanumeric code and its issuer's account id.

use serde::{Deserialize, Serialize};

use super::error::OperationError;
use super::validate::{check_account_id, render_account_id};
use crate::xdr;

const MAX_ASSET_CODE_LENGTH: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Asset {
    Native,
    Issued { code: String, issuer: String },
}

impl Asset {
    /// Builds an issued asset, checking the code and the issuer up front.
    pub fn issued(code: &str, issuer: &str) -> Result<Self, OperationError> {
        let asset = Asset::Issued {
            code: code.to_string(),
            issuer: issuer.to_string(),
        };
        asset.to_wire()?;
        Ok(asset)
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }

    /// Codes of 1-4 characters use the short wire form, 5-12 the long one.
    pub fn to_wire(&self) -> Result<xdr::Asset, OperationError> {
        match self {
            Asset::Native => Ok(xdr::Asset::Native),
            Asset::Issued { code, issuer } => {
                let bytes = code.as_bytes();
                if bytes.is_empty()
                    || bytes.len() > MAX_ASSET_CODE_LENGTH
                    || !bytes.iter().all(u8::is_ascii_alphanumeric)
                {
                    return Err(OperationError::InvalidAssetCode(code.clone()));
                }
                let issuer = check_account_id("issuer", issuer)?;
                if bytes.len() <= 4 {
                    let mut buf = [0u8; 4];
                    buf[..bytes.len()].copy_from_slice(bytes);
                    Ok(xdr::Asset::CreditAlphanum4 { code: buf, issuer })
                } else {
                    let mut buf = [0u8; 12];
                    buf[..bytes.len()].copy_from_slice(bytes);
                    Ok(xdr::Asset::CreditAlphanum12 { code: buf, issuer })
                }
            }
        }
    }

    pub fn from_wire(asset: &xdr::Asset) -> Self {
        match asset {
            xdr::Asset::Native => Asset::Native,
            xdr::Asset::CreditAlphanum4 { code, issuer } => Asset::Issued {
                code: trim_code(code),
                issuer: render_account_id(issuer),
            },
            xdr::Asset::CreditAlphanum12 { code, issuer } => Asset::Issued {
                code: trim_code(code),
                issuer: render_account_id(issuer),
            },
        }
    }
}

fn trim_code(code: &[u8]) -> String {
    let end = code.iter().position(|b| *b == 0).unwrap_or(code.len());
    String::from_utf8_lossy(&code[..end]).into_owned()
}
