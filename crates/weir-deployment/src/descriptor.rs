use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

use weir_blueprint::{VerifiedStreamlet, VolumeMountDescriptor};

/// Canonical name of the durable channel between an upstream outlet and its
/// downstream inlets.
///
/// A savepoint always refers to the outlet side: every inlet connected to
/// the same outlet maps to the same savepoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Savepoint {
    pub app_id: String,
    pub streamlet_ref_name: String,
    pub outlet_name: String,
}

impl Savepoint {
    pub fn new(
        app_id: impl Into<String>,
        streamlet_ref_name: impl Into<String>,
        outlet_name: impl Into<String>,
    ) -> Self {
        Savepoint {
            app_id: app_id.into(),
            streamlet_ref_name: streamlet_ref_name.into(),
            outlet_name: outlet_name.into(),
        }
    }
}

/// Externally addressable port of a server streamlet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub app_id: String,
    pub streamlet_ref_name: String,
    pub container_port: i32,
}

/// A connection carried in the descriptor for documentation; orchestrators
/// derive channels from savepoints alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDescriptor {
    /// Qualified outlet path, e.g. "ingress.out"
    pub from: String,

    /// Qualified inlet path, e.g. "processor.in"
    pub to: String,
}

/// Everything the orchestrator needs to run one streamlet ref as a cluster
/// workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamletDeployment {
    /// Workload name, `<appId>.<refName>`
    pub name: String,

    /// Runtime tag from the descriptor
    pub runtime: String,

    /// Container image from the descriptor
    pub image: String,

    /// Streamlet class name from the descriptor
    pub class_name: String,

    /// The ref name within the blueprint
    pub streamlet_name: String,

    /// Present iff the streamlet is a server streamlet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Endpoint>,

    /// Name of the secret holding this streamlet's configuration
    pub secret_name: String,

    /// Runtime configuration tree
    pub config: serde_json::Map<String, serde_json::Value>,

    /// Savepoint for every port of the streamlet, keyed by port name
    pub port_mappings: BTreeMap<String, Savepoint>,

    /// Volumes from the descriptor
    pub volume_mounts: Vec<VolumeMountDescriptor>,

    /// Optional replica count; unset leaves the choice to the orchestrator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
}

/// The deployable lowering of a verified blueprint.
///
/// The field names of this structure and its parts are a stable contract
/// with the downstream orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDescriptor {
    /// Normalized application id
    pub app_id: String,

    /// Application version as supplied by the caller
    pub app_version: String,

    /// The resolved streamlets of the blueprint
    pub streamlets: Vec<VerifiedStreamlet>,

    /// Advisory connection list
    pub connections: Vec<ConnectionDescriptor>,

    /// One deployment per streamlet ref
    pub deployments: Vec<StreamletDeployment>,

    /// Opaque agent paths threaded through from the caller
    pub agent_paths: BTreeMap<String, String>,

    /// Descriptor format version
    pub version: String,
}
