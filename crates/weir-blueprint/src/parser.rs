use serde::Deserialize;
use thiserror::Error;

use std::fmt;

use crate::blueprint::{Blueprint, Metadata, PortPath, StreamletConnection, StreamletRef};
use crate::problem::BlueprintProblem;
use crate::streamlet::StreamletDescriptor;
use crate::verify::VerifiedBlueprint;

/// Errors from parsing a blueprint document
#[derive(Error, Debug)]
pub enum ParseError {
    /// The document is not valid YAML or misses required keys
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The document parsed but verification found problems
    #[error("{}", ProblemsFormat(.0))]
    Problems(Vec<BlueprintProblem>),
}

// Helper struct to format a problem list
struct ProblemsFormat<'a>(&'a [BlueprintProblem]);

impl fmt::Display for ProblemsFormat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blueprint has {} problem(s):", self.0.len())?;
        for (i, problem) in self.0.iter().enumerate() {
            write!(f, "\n  {}. {}", i + 1, problem)?;
        }
        Ok(())
    }
}

/// The YAML document shape. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct BlueprintDoc {
    blueprint: BlueprintSection,
}

#[derive(Debug, Default, Deserialize)]
struct BlueprintSection {
    #[serde(default)]
    streamlets: Vec<StreamletDecl>,

    #[serde(default)]
    connections: Vec<ConnectionDecl>,
}

#[derive(Debug, Deserialize)]
struct StreamletDecl {
    name: String,

    class: String,

    #[serde(default)]
    metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
struct ConnectionDecl {
    from: String,

    to: String,

    #[serde(default)]
    metadata: Option<Metadata>,
}

/// Parse a YAML blueprint document into a verified [`Blueprint`].
///
/// The returned blueprint carries whatever problems verification found;
/// callers that only want a fully valid result can use
/// [`parse_and_verify_blueprint`] instead.
pub fn parse_blueprint(
    yaml_str: &str,
    streamlet_descriptors: Vec<StreamletDescriptor>,
) -> Result<Blueprint, ParseError> {
    let document: BlueprintDoc = serde_yaml::from_str(yaml_str)?;

    let mut blueprint = Blueprint::new().define(streamlet_descriptors);

    for decl in document.blueprint.streamlets {
        let mut streamlet_ref = StreamletRef::new(decl.name, decl.class);
        streamlet_ref.metadata = decl.metadata;
        blueprint = blueprint.use_streamlet(streamlet_ref);
    }

    for decl in document.blueprint.connections {
        let mut connection =
            StreamletConnection::new(PortPath::parse(&decl.from), PortPath::parse(&decl.to));
        connection.metadata = decl.metadata;
        blueprint = blueprint.connect_with(connection);
    }

    Ok(blueprint)
}

/// Parse a YAML blueprint document and require it to verify cleanly.
///
/// Returns the resolved blueprint, or [`ParseError::Problems`] listing what
/// verification found.
pub fn parse_and_verify_blueprint(
    yaml_str: &str,
    streamlet_descriptors: Vec<StreamletDescriptor>,
) -> Result<VerifiedBlueprint, ParseError> {
    let blueprint = parse_blueprint(yaml_str, streamlet_descriptors)?;
    blueprint.verified().map_err(ParseError::Problems)
}
