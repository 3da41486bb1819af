use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PrefsError;

/// Magic marker identifying a preference blob.
pub const PREFS_MAGIC: &str = "nassh-prefs";

/// Blob format version understood by this implementation.
pub const PREFS_VERSION: u32 = 1;

/// Portable aggregate of one installation's preferences.
///
/// `nassh` holds the primary (connection) preference set; `hterm` maps each
/// terminal profile id to its serialized preferences. The field names are
/// the wire format and must not change. A `None` profile entry only occurs
/// in hand-edited blobs; export always produces fully populated entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefsBlob {
    pub magic: String,
    pub version: u32,
    pub nassh: Value,
    pub hterm: HashMap<String, Option<Value>>,
}

impl PrefsBlob {
    pub fn new(nassh: Value) -> Self {
        Self {
            magic: PREFS_MAGIC.to_string(),
            version: PREFS_VERSION,
            nassh,
            hterm: HashMap::new(),
        }
    }

    /// Check the envelope before any storage I/O is attempted.
    pub fn validate_envelope(&self) -> Result<(), PrefsError> {
        if self.magic != PREFS_MAGIC {
            return Err(PrefsError::BadMagic(self.magic.clone()));
        }
        if self.version != PREFS_VERSION {
            return Err(PrefsError::BadVersion(self.version));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_blob_passes_envelope_validation() {
        let blob = PrefsBlob::new(json!({}));
        assert!(blob.validate_envelope().is_ok());
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut blob = PrefsBlob::new(json!({}));
        blob.magic = "not-prefs".to_string();
        assert!(matches!(
            blob.validate_envelope(),
            Err(PrefsError::BadMagic(m)) if m == "not-prefs"
        ));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut blob = PrefsBlob::new(json!({}));
        blob.version = 2;
        assert!(matches!(
            blob.validate_envelope(),
            Err(PrefsError::BadVersion(2))
        ));
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let mut blob = PrefsBlob::new(json!({"font-size": 14}));
        blob.hterm
            .insert("default".to_string(), Some(json!({"cursor-blink": true})));
        let wire = serde_json::to_value(&blob).unwrap();
        assert_eq!(wire["magic"], "nassh-prefs");
        assert_eq!(wire["version"], 1);
        assert_eq!(wire["nassh"]["font-size"], 14);
        assert_eq!(wire["hterm"]["default"]["cursor-blink"], true);
    }

    #[test]
    fn deserializes_null_profile_entries() {
        let wire = json!({
            "magic": "nassh-prefs",
            "version": 1,
            "nassh": {},
            "hterm": {"default": null}
        });
        let blob: PrefsBlob = serde_json::from_value(wire).unwrap();
        assert_eq!(blob.hterm.get("default"), Some(&None));
    }
}
