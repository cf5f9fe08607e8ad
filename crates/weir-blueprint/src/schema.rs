use serde::{Deserialize, Serialize};

use std::hash::{Hash, Hasher};

/// A named schema carried by a streamlet port.
///
/// The fingerprint is an opaque digest computed by whatever schema tooling
/// produced the descriptor. Two schemas are compatible iff their fingerprints
/// are bytewise equal; the name is informational only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Fully qualified name of the schema (e.g. "sensors.SensorData")
    pub name: String,

    /// Digest identifying the schema contents, serialized as lowercase hex
    #[serde(with = "hex_bytes")]
    pub fingerprint: Vec<u8>,
}

impl SchemaDescriptor {
    /// Create a new schema descriptor
    pub fn new(name: impl Into<String>, fingerprint: impl Into<Vec<u8>>) -> Self {
        SchemaDescriptor {
            name: name.into(),
            fingerprint: fingerprint.into(),
        }
    }

    /// Check whether data written with this schema can be read with `other`
    pub fn compatible_with(&self, other: &SchemaDescriptor) -> bool {
        self.fingerprint == other.fingerprint
    }
}

// Equality is fingerprint equality; the name does not participate.
impl PartialEq for SchemaDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for SchemaDescriptor {}

impl Hash for SchemaDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint.hash(state);
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    use std::fmt::Write;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let mut hex = String::with_capacity(bytes.len() * 2);
        for b in bytes {
            // writing to a String cannot fail
            let _ = write!(hex, "{:02x}", b);
        }
        serializer.serialize_str(&hex)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let hex = String::deserialize(deserializer)?;
        if !hex.is_ascii() || hex.len() % 2 != 0 {
            return Err(serde::de::Error::custom("fingerprint is not valid hex"));
        }
        (0..hex.len())
            .step_by(2)
            .map(|i| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| serde::de::Error::custom("fingerprint is not valid hex"))
            })
            .collect()
    }
}
