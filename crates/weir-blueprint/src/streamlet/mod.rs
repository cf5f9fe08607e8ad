mod config;
mod shape;
mod volume;

pub use config::{
    parse_bool, parse_duration, parse_memory_size, ConfigParameterDescriptor, ConfigParameterKind,
};
pub use shape::{Inlet, Outlet, StreamletShape};
pub use volume::{access_mode, VolumeMountDescriptor};

use serde::{Deserialize, Serialize};

/// Immutable description of a streamlet class.
///
/// Descriptors are produced by build tooling that inspects the streamlet
/// libraries of an application and are supplied to the blueprint as a
/// catalog; blueprint refs resolve against them by exact class name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamletDescriptor {
    /// Fully qualified class name, a dotted identifier
    pub class_name: String,

    /// Runtime this streamlet executes on (e.g. "akka")
    pub runtime: String,

    /// Container image the streamlet runs in
    pub image: String,

    /// Inlets and outlets of the streamlet
    #[serde(default)]
    pub shape: StreamletShape,

    /// Configuration parameters accepted by the streamlet
    #[serde(default)]
    pub config_parameters: Vec<ConfigParameterDescriptor>,

    /// Volumes the streamlet requires
    #[serde(default)]
    pub volume_mounts: Vec<VolumeMountDescriptor>,

    /// Whether the streamlet exposes an externally addressable endpoint
    #[serde(default)]
    pub server: bool,

    /// Free-form labels for catalog browsing
    #[serde(default)]
    pub labels: Vec<String>,
}

impl StreamletDescriptor {
    pub fn new(
        class_name: impl Into<String>,
        runtime: impl Into<String>,
        image: impl Into<String>,
        shape: StreamletShape,
    ) -> Self {
        StreamletDescriptor {
            class_name: class_name.into(),
            runtime: runtime.into(),
            image: image.into(),
            shape,
            config_parameters: vec![],
            volume_mounts: vec![],
            server: false,
            labels: vec![],
        }
    }

    pub fn with_config_parameters(mut self, parameters: Vec<ConfigParameterDescriptor>) -> Self {
        self.config_parameters = parameters;
        self
    }

    pub fn with_volume_mounts(mut self, mounts: Vec<VolumeMountDescriptor>) -> Self {
        self.volume_mounts = mounts;
        self
    }

    pub fn with_server(mut self, server: bool) -> Self {
        self.server = server;
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }
}
