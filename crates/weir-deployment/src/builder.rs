use thiserror::Error;

use std::collections::BTreeMap;
use std::fmt;

use weir_blueprint::{
    normalize_app_id, secret_name, Blueprint, BlueprintProblem, VerifiedBlueprint,
    VerifiedPortPath,
};

use crate::descriptor::{
    ApplicationDescriptor, ConnectionDescriptor, Endpoint, Savepoint, StreamletDeployment,
};

/// Lowest container port assigned to server streamlet endpoints
pub const MINIMUM_ENDPOINT_CONTAINER_PORT: i32 = 3000;

/// Format version stamped into every application descriptor
pub const DESCRIPTOR_VERSION: &str = "1";

/// Agent-path key for the Prometheus JMX exporter jar
pub const PROMETHEUS_AGENT: &str = "prometheus";

/// Config key through which a server streamlet learns its container port
pub const SERVER_CONTAINER_PORT_KEY: &str = "weir.internal.server.container-port";

/// Errors from building an application descriptor
#[derive(Error, Debug)]
pub enum BuildError {
    /// The blueprint did not verify; building from it is a caller error
    #[error("{}", InvalidBlueprintFormat(.0))]
    InvalidBlueprint(Vec<BlueprintProblem>),

    /// The raw application id normalized to the empty string
    #[error(transparent)]
    InvalidApplicationId(BlueprintProblem),
}

// Helper struct to format the problems preventing a build
struct InvalidBlueprintFormat<'a>(&'a [BlueprintProblem]);

impl fmt::Display for InvalidBlueprintFormat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot build an application descriptor from a blueprint with {} problem(s):",
            self.0.len()
        )?;
        for (i, problem) in self.0.iter().enumerate() {
            write!(f, "\n  {}. {}", i + 1, problem)?;
        }
        Ok(())
    }
}

/// Verify `blueprint` and lower it into an [`ApplicationDescriptor`].
///
/// Fails with [`BuildError::InvalidBlueprint`] when verification finds
/// problems; no partial descriptor is ever produced.
pub fn build_application_descriptor(
    app_id: &str,
    app_version: &str,
    blueprint: &Blueprint,
    agent_paths: &BTreeMap<String, String>,
) -> Result<ApplicationDescriptor, BuildError> {
    let verified = blueprint.verified().map_err(BuildError::InvalidBlueprint)?;
    build_from_verified(app_id, app_version, &verified, agent_paths)
}

/// Lower an already verified blueprint into an [`ApplicationDescriptor`].
///
/// The result is a deterministic function of its inputs: container ports are
/// assigned by ref position, savepoints derive from connection endpoints,
/// and all maps iterate in key order.
pub fn build_from_verified(
    app_id: &str,
    app_version: &str,
    verified: &VerifiedBlueprint,
    agent_paths: &BTreeMap<String, String>,
) -> Result<ApplicationDescriptor, BuildError> {
    let app_id = normalize_app_id(app_id).map_err(BuildError::InvalidApplicationId)?;

    // every inlet maps to the savepoint of the outlet feeding it
    let mut inlet_sources: BTreeMap<VerifiedPortPath, Savepoint> = BTreeMap::new();
    for connection in &verified.connections {
        inlet_sources.insert(
            connection.to.path.clone(),
            Savepoint::new(
                &app_id,
                &connection.from.path.streamlet,
                &connection.from.path.port,
            ),
        );
    }

    let deployments: Vec<StreamletDeployment> = verified
        .streamlets
        .iter()
        .enumerate()
        .map(|(index, streamlet)| {
            let descriptor = &streamlet.descriptor;

            let endpoint = if descriptor.server {
                Some(Endpoint {
                    app_id: app_id.clone(),
                    streamlet_ref_name: streamlet.name.clone(),
                    container_port: MINIMUM_ENDPOINT_CONTAINER_PORT + index as i32,
                })
            } else {
                None
            };

            let mut port_mappings = BTreeMap::new();
            for inlet in &descriptor.shape.inlets {
                let path = VerifiedPortPath {
                    streamlet: streamlet.name.clone(),
                    port: inlet.name.clone(),
                };
                if let Some(savepoint) = inlet_sources.get(&path) {
                    port_mappings.insert(inlet.name.clone(), savepoint.clone());
                }
            }
            for outlet in &descriptor.shape.outlets {
                port_mappings.insert(
                    outlet.name.clone(),
                    Savepoint::new(&app_id, &streamlet.name, &outlet.name),
                );
            }

            let mut config = serde_json::Map::new();
            if let Some(endpoint) = &endpoint {
                config.insert(
                    SERVER_CONTAINER_PORT_KEY.to_string(),
                    serde_json::json!(endpoint.container_port),
                );
            }

            StreamletDeployment {
                name: format!("{}.{}", app_id, streamlet.name),
                runtime: descriptor.runtime.clone(),
                image: descriptor.image.clone(),
                class_name: descriptor.class_name.clone(),
                streamlet_name: streamlet.name.clone(),
                endpoint,
                secret_name: secret_name(&streamlet.name),
                config,
                port_mappings,
                volume_mounts: descriptor.volume_mounts.clone(),
                replicas: None,
            }
        })
        .collect();

    let connections: Vec<ConnectionDescriptor> = verified
        .connections
        .iter()
        .map(|c| ConnectionDescriptor {
            from: c.from.path.to_string(),
            to: c.to.path.to_string(),
        })
        .collect();

    tracing::debug!(
        "built application descriptor '{}': {} deployments, {} connections",
        app_id,
        deployments.len(),
        connections.len()
    );

    Ok(ApplicationDescriptor {
        app_id,
        app_version: app_version.to_string(),
        streamlets: verified.streamlets.clone(),
        connections,
        deployments,
        agent_paths: agent_paths.clone(),
        version: DESCRIPTOR_VERSION.to_string(),
    })
}
