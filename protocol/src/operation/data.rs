//! `manageData`: attach, replace or delete a named entry on an account.

use serde::{Deserialize, Serialize};

use super::error::OperationError;
use super::validate::{check_length, check_source};
use crate::config::MAX_DATA_ENTRY_LENGTH;
use crate::xdr::{ManageDataOp, Operation, OperationBody};

/// A data entry value. Text and bytes with the same contents are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Text(String),
    Bytes(Vec<u8>),
}

impl DataValue {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            DataValue::Text(s) => s.as_bytes(),
            DataValue::Bytes(b) => b,
        }
    }
}

impl PartialEq for DataValue {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for DataValue {}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}

impl From<Vec<u8>> for DataValue {
    fn from(value: Vec<u8>) -> Self {
        DataValue::Bytes(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageDataOptions {
    pub name: String,
    /// `None` deletes the entry.
    #[serde(default)]
    pub value: Option<DataValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

pub fn manage_data(opts: &ManageDataOptions) -> Result<Operation, OperationError> {
    check_length("name", opts.name.len(), MAX_DATA_ENTRY_LENGTH)?;
    if let Some(value) = &opts.value {
        check_length("value", value.as_bytes().len(), MAX_DATA_ENTRY_LENGTH)?;
    }
    Ok(Operation {
        source_account: check_source(opts.source.as_deref())?,
        body: OperationBody::ManageData(ManageDataOp {
            data_name: opts.name.clone(),
            data_value: opts.value.as_ref().map(|v| v.as_bytes().to_vec()),
        }),
    })
}

pub(super) fn decode_manage_data(source: Option<String>, op: &ManageDataOp) -> ManageDataOptions {
    ManageDataOptions {
        name: op.data_name.clone(),
        value: op.data_value.clone().map(DataValue::Bytes),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_value_stored_as_bytes() {
        let op = manage_data(&ManageDataOptions {
            name: "config".into(),
            value: Some("on".into()),
            source: None,
        })
        .unwrap();
        assert_eq!(
            op.body,
            OperationBody::ManageData(ManageDataOp {
                data_name: "config".into(),
                data_value: Some(b"on".to_vec()),
            })
        );
    }

    #[test]
    fn missing_value_means_delete() {
        let op = manage_data(&ManageDataOptions {
            name: "config".into(),
            value: None,
            source: None,
        })
        .unwrap();
        let OperationBody::ManageData(body) = op.body else {
            panic!("wrong body");
        };
        assert!(body.data_value.is_none());
    }

    #[test]
    fn name_and_value_limited_to_64_bytes() {
        let ok = ManageDataOptions {
            name: "n".repeat(64),
            value: Some(vec![7u8; 64].into()),
            source: None,
        };
        assert!(manage_data(&ok).is_ok());

        let long_name = ManageDataOptions {
            name: "n".repeat(65),
            ..ok.clone()
        };
        assert!(matches!(
            manage_data(&long_name),
            Err(OperationError::InvalidFieldLength { field: "name", .. })
        ));

        let long_value = ManageDataOptions {
            value: Some(vec![7u8; 65].into()),
            ..ok
        };
        assert!(matches!(
            manage_data(&long_value),
            Err(OperationError::InvalidFieldLength { field: "value", max: 64, actual: 65 })
        ));
    }

    #[test]
    fn decoded_bytes_equal_input_text() {
        let opts = ManageDataOptions {
            name: "k".into(),
            value: Some("v".into()),
            source: None,
        };
        let OperationBody::ManageData(body) = manage_data(&opts).unwrap().body else {
            panic!("wrong body");
        };
        assert_eq!(decode_manage_data(None, &body), opts);
    }

    #[test]
    fn json_value_forms() {
        let text: ManageDataOptions =
            serde_json::from_str(r#"{"name":"k","value":"abc"}"#).unwrap();
        let bytes: ManageDataOptions =
            serde_json::from_str(r#"{"name":"k","value":[97,98,99]}"#).unwrap();
        assert_eq!(text, bytes);
    }
}
