use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;

use crate::blueprint::{Blueprint, Metadata, StreamletConnection, StreamletRef};
use crate::problem::dedup_problems;
use crate::schema::SchemaDescriptor;
use crate::streamlet::StreamletDescriptor;

mod catalog;
mod topology;

pub(crate) use topology::{resolve_inlet, resolve_outlet};

/// A streamlet ref resolved against the descriptor catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedStreamlet {
    /// Instance name of the ref
    pub name: String,

    /// The descriptor the ref's class name resolved to
    pub descriptor: StreamletDescriptor,
}

/// A fully qualified reference to a resolved port
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VerifiedPortPath {
    /// Streamlet ref name
    pub streamlet: String,

    /// Declared port name (positional helpers are already normalized away)
    pub port: String,
}

impl fmt::Display for VerifiedPortPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.streamlet, self.port)
    }
}

/// A resolved port together with its schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedPort {
    pub path: VerifiedPortPath,
    pub schema: SchemaDescriptor,
}

/// A connection whose two sides both resolved to declared ports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedStreamletConnection {
    /// Outlet side
    pub from: VerifiedPort,

    /// Inlet side
    pub to: VerifiedPort,

    /// Metadata carried over from the connection
    pub metadata: Option<Metadata>,
}

/// A blueprint with an empty problem list and every ref and connection
/// resolved; the input of the descriptor builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedBlueprint {
    pub streamlets: Vec<VerifiedStreamlet>,
    pub connections: Vec<VerifiedStreamletConnection>,
}

/// Index verified refs by name for port-path resolution
pub(crate) fn verified_refs(streamlets: &[StreamletRef]) -> HashMap<&str, &VerifiedStreamlet> {
    streamlets
        .iter()
        .filter_map(|r| r.verified.as_ref().map(|v| (r.name.as_str(), v)))
        .collect()
}

/// Run all verification passes over `blueprint`.
///
/// Produces a new blueprint with `global_problems` and the per-ref and
/// per-connection `problems` and `verified` fields recomputed from scratch,
/// which makes the operation idempotent.
pub(crate) fn verify(blueprint: &Blueprint) -> Blueprint {
    let mut global = Vec::new();

    if blueprint.streamlet_descriptors.is_empty() {
        global.push(crate::problem::BlueprintProblem::EmptyStreamletDescriptors);
    }
    if blueprint.streamlets.is_empty() {
        global.push(crate::problem::BlueprintProblem::EmptyStreamlets);
    }

    for descriptor in &blueprint.streamlet_descriptors {
        global.extend(catalog::verify_descriptor(descriptor));
    }

    let streamlets: Vec<StreamletRef> = blueprint
        .streamlets
        .iter()
        .map(|r| topology::verify_ref(r, &blueprint.streamlet_descriptors))
        .collect();

    let connections: Vec<StreamletConnection> = {
        let refs = verified_refs(&streamlets);
        blueprint
            .connections
            .iter()
            .map(|c| topology::verify_connection(c, &refs))
            .collect()
    };

    global.extend(topology::illegal_connections(&connections));

    if let Some(problem) = topology::unconnected_inlets(&streamlets, &connections) {
        global.push(problem);
    }

    let global_problems = dedup_problems(global);

    tracing::debug!(
        "verified blueprint: {} streamlets, {} connections, {} global problems",
        streamlets.len(),
        connections.len(),
        global_problems.len()
    );

    Blueprint {
        streamlet_descriptors: blueprint.streamlet_descriptors.clone(),
        streamlets,
        connections,
        global_problems,
    }
}
