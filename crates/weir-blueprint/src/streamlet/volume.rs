use serde::{Deserialize, Serialize};

/// The volume access modes understood by the orchestrator
pub mod access_mode {
    pub const READ_ONLY_MANY: &str = "ReadOnlyMany";
    pub const READ_WRITE_MANY: &str = "ReadWriteMany";
    pub const READ_WRITE_ONCE: &str = "ReadWriteOnce";

    pub const ALL: [&str; 3] = [READ_ONLY_MANY, READ_WRITE_MANY, READ_WRITE_ONCE];
}

/// A volume mounted into the container running a streamlet.
///
/// The access mode is carried as a string so descriptors with unknown modes
/// can be represented and reported by verification instead of failing to
/// deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMountDescriptor {
    /// Mount name, a DNS-1123 label
    pub name: String,

    /// Absolute path the volume is mounted at
    pub path: String,

    /// One of the `access_mode` constants
    pub access_mode: String,
}

impl VolumeMountDescriptor {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        access_mode: impl Into<String>,
    ) -> Self {
        VolumeMountDescriptor {
            name: name.into(),
            path: path.into(),
            access_mode: access_mode.into(),
        }
    }
}
