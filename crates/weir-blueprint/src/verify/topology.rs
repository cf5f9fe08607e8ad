use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::blueprint::{PortPath, StreamletConnection, StreamletRef};
use crate::name;
use crate::problem::{dedup_problems, BlueprintProblem, UnconnectedInlet};
use crate::streamlet::StreamletDescriptor;
use crate::verify::{VerifiedPort, VerifiedPortPath, VerifiedStreamlet, VerifiedStreamletConnection};

/// Validate a ref's name and resolve its class name against the catalog
pub(crate) fn verify_ref(
    streamlet_ref: &StreamletRef,
    catalog: &[StreamletDescriptor],
) -> StreamletRef {
    let mut problems = Vec::new();
    let mut verified = None;

    if !name::is_valid_ref_name(&streamlet_ref.name) {
        problems.push(BlueprintProblem::InvalidStreamletName {
            name: streamlet_ref.name.clone(),
        });
    }

    if !name::is_valid_class_name(&streamlet_ref.class_name) {
        problems.push(BlueprintProblem::InvalidStreamletClassName {
            streamlet: streamlet_ref.name.clone(),
            class_name: streamlet_ref.class_name.clone(),
        });
    } else {
        match catalog
            .iter()
            .find(|d| d.class_name == streamlet_ref.class_name)
        {
            Some(descriptor) => {
                verified = Some(VerifiedStreamlet {
                    name: streamlet_ref.name.clone(),
                    descriptor: descriptor.clone(),
                });
            }
            None => {
                problems.push(BlueprintProblem::StreamletDescriptorNotFound {
                    streamlet: streamlet_ref.name.clone(),
                    class_name: streamlet_ref.class_name.clone(),
                });
            }
        }
    }

    StreamletRef {
        problems: dedup_problems(problems),
        verified,
        ..streamlet_ref.clone()
    }
}

/// Resolve the outlet side of a connection.
///
/// A short path designates the sole outlet of the ref; a qualified path must
/// name a declared outlet, with `out` accepted as a positional alias for the
/// sole outlet when no outlet has that literal name.
pub(crate) fn resolve_outlet(
    path: &PortPath,
    refs: &HashMap<&str, &VerifiedStreamlet>,
) -> Result<VerifiedPort, BlueprintProblem> {
    match path {
        PortPath::Short(streamlet) => {
            let verified = refs.get(streamlet.as_str()).ok_or_else(|| {
                BlueprintProblem::PortPathNotFound {
                    path: path.to_string(),
                }
            })?;
            match verified.descriptor.shape.outlets.as_slice() {
                [single] => Ok(verified_port(streamlet, &single.name, &single.schema)),
                [] => Err(BlueprintProblem::InvalidPortPath {
                    path: path.to_string(),
                }),
                _ => Err(BlueprintProblem::AmbiguousOutlet {
                    streamlet: streamlet.clone(),
                }),
            }
        }
        PortPath::Qualified { streamlet, port } => {
            if streamlet.is_empty() || port.is_empty() {
                return Err(BlueprintProblem::InvalidPortPath {
                    path: path.to_string(),
                });
            }
            let verified = refs.get(streamlet.as_str()).ok_or_else(|| {
                BlueprintProblem::PortPathNotFound {
                    path: path.to_string(),
                }
            })?;
            let shape = &verified.descriptor.shape;
            let outlet = shape
                .outlet(port)
                .or_else(|| match port.as_str() {
                    "out" => shape.single_outlet(),
                    _ => None,
                })
                .ok_or_else(|| BlueprintProblem::PortPathNotFound {
                    path: path.to_string(),
                })?;
            Ok(verified_port(streamlet, &outlet.name, &outlet.schema))
        }
    }
}

/// Resolve the inlet side of a connection.
///
/// A short path designates the sole inlet of the ref; a qualified path must
/// name a declared inlet, with `in`, `in0` and `in1` accepted as positional
/// aliases when no inlet has that literal name.
pub(crate) fn resolve_inlet(
    path: &PortPath,
    refs: &HashMap<&str, &VerifiedStreamlet>,
) -> Result<VerifiedPort, BlueprintProblem> {
    match path {
        PortPath::Short(streamlet) => {
            let verified = refs.get(streamlet.as_str()).ok_or_else(|| {
                BlueprintProblem::PortPathNotFound {
                    path: path.to_string(),
                }
            })?;
            let inlet = verified.descriptor.shape.single_inlet().ok_or_else(|| {
                BlueprintProblem::PortPathNotFound {
                    path: path.to_string(),
                }
            })?;
            Ok(verified_port(streamlet, &inlet.name, &inlet.schema))
        }
        PortPath::Qualified { streamlet, port } => {
            if streamlet.is_empty() || port.is_empty() {
                return Err(BlueprintProblem::InvalidPortPath {
                    path: path.to_string(),
                });
            }
            let verified = refs.get(streamlet.as_str()).ok_or_else(|| {
                BlueprintProblem::PortPathNotFound {
                    path: path.to_string(),
                }
            })?;
            let shape = &verified.descriptor.shape;
            let inlet = shape
                .inlet(port)
                .or_else(|| match port.as_str() {
                    "in" => shape.single_inlet(),
                    "in0" => shape.in0(),
                    "in1" => shape.in1(),
                    _ => None,
                })
                .ok_or_else(|| BlueprintProblem::PortPathNotFound {
                    path: path.to_string(),
                })?;
            Ok(verified_port(streamlet, &inlet.name, &inlet.schema))
        }
    }
}

fn verified_port(
    streamlet: &str,
    port: &str,
    schema: &crate::schema::SchemaDescriptor,
) -> VerifiedPort {
    VerifiedPort {
        path: VerifiedPortPath {
            streamlet: streamlet.to_string(),
            port: port.to_string(),
        },
        schema: schema.clone(),
    }
}

/// Resolve both sides of a connection and check schema compatibility.
///
/// The resolution cache is attached whenever both sides resolve, even on a
/// schema mismatch, so later passes and duplicate suppression can reason
/// about the resolved endpoints.
pub(crate) fn verify_connection(
    connection: &StreamletConnection,
    refs: &HashMap<&str, &VerifiedStreamlet>,
) -> StreamletConnection {
    let mut problems = Vec::new();
    let mut verified = None;

    let from = resolve_outlet(&connection.from, refs);
    let to = resolve_inlet(&connection.to, refs);

    match (from, to) {
        (Ok(from), Ok(to)) => {
            if !from.schema.compatible_with(&to.schema) {
                problems.push(BlueprintProblem::IncompatibleSchema {
                    from: from.path.to_string(),
                    to: to.path.to_string(),
                });
            }
            verified = Some(VerifiedStreamletConnection {
                from,
                to,
                metadata: connection.metadata.clone(),
            });
        }
        (from, to) => {
            if let Err(problem) = from {
                problems.push(problem);
            }
            if let Err(problem) = to {
                problems.push(problem);
            }
        }
    }

    StreamletConnection {
        problems: dedup_problems(problems),
        verified,
        ..connection.clone()
    }
}

/// Find inlets that more than one distinct outlet fans in to; one problem is
/// reported per such inlet
pub(crate) fn illegal_connections(connections: &[StreamletConnection]) -> Vec<BlueprintProblem> {
    let mut inbound: BTreeMap<VerifiedPortPath, BTreeSet<VerifiedPortPath>> = BTreeMap::new();
    for connection in connections {
        if let Some(v) = &connection.verified {
            inbound
                .entry(v.to.path.clone())
                .or_default()
                .insert(v.from.path.clone());
        }
    }

    inbound
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(target, sources)| BlueprintProblem::IllegalConnection {
            sources: sources.iter().map(ToString::to_string).collect(),
            target: target.to_string(),
        })
        .collect()
}

/// Report inlets that no resolved connection targets.
///
/// An inlet whose incoming connection resolved but was found illegal or
/// schema-incompatible is already addressed by those problems and is not
/// reported again here.
pub(crate) fn unconnected_inlets(
    streamlets: &[StreamletRef],
    connections: &[StreamletConnection],
) -> Option<BlueprintProblem> {
    let targeted: BTreeSet<VerifiedPortPath> = connections
        .iter()
        .filter_map(|c| c.verified.as_ref().map(|v| v.to.path.clone()))
        .collect();

    let mut unconnected = Vec::new();
    for streamlet_ref in streamlets {
        if let Some(verified) = &streamlet_ref.verified {
            for inlet in &verified.descriptor.shape.inlets {
                let path = VerifiedPortPath {
                    streamlet: streamlet_ref.name.clone(),
                    port: inlet.name.clone(),
                };
                if !targeted.contains(&path) {
                    unconnected.push(UnconnectedInlet::new(
                        streamlet_ref.name.clone(),
                        inlet.name.clone(),
                    ));
                }
            }
        }
    }

    if unconnected.is_empty() {
        None
    } else {
        Some(BlueprintProblem::UnconnectedInlets {
            inlets: unconnected,
        })
    }
}
