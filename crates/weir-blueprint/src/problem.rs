use thiserror::Error;

use std::fmt;

/// Severity of a blueprint problem.
///
/// Every problem in the current taxonomy is an error; the accessor exists so
/// callers can filter without matching on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The blueprint can still be lowered into a descriptor
    Warning,
    /// The blueprint cannot be lowered into a descriptor
    Error,
}

/// An inlet that no resolved connection targets
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnconnectedInlet {
    /// Name of the streamlet ref declaring the inlet
    pub streamlet: String,

    /// Name of the inlet
    pub inlet: String,
}

impl UnconnectedInlet {
    pub fn new(streamlet: impl Into<String>, inlet: impl Into<String>) -> Self {
        UnconnectedInlet {
            streamlet: streamlet.into(),
            inlet: inlet.into(),
        }
    }
}

impl fmt::Display for UnconnectedInlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.streamlet, self.inlet)
    }
}

/// All problems the verification engine can report.
///
/// The set of variants is the stable contract with callers: two problems are
/// equal iff their variant and payload are equal, and problem lists are
/// deduplicated under that equality.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlueprintProblem {
    /// The blueprint does not use any streamlets
    #[error("the blueprint does not define any streamlets")]
    EmptyStreamlets,

    /// The blueprint has no streamlet descriptors to resolve refs against
    #[error("no streamlet descriptors have been defined")]
    EmptyStreamletDescriptors,

    /// A streamlet ref name violates the naming rules
    #[error("streamlet name '{name}' is invalid; names must consist of lowercase alphanumeric characters or '-', start with an alphanumeric character, and be at most 253 characters")]
    InvalidStreamletName { name: String },

    /// A streamlet class name is not a valid dotted identifier
    #[error("streamlet '{streamlet}' has invalid class name '{class_name}'")]
    InvalidStreamletClassName {
        streamlet: String,
        class_name: String,
    },

    /// An inlet declared by a descriptor has an invalid name
    #[error("'{class_name}' declares invalid inlet name '{name}'")]
    InvalidInletName { class_name: String, name: String },

    /// An outlet declared by a descriptor has an invalid name
    #[error("'{class_name}' declares invalid outlet name '{name}'")]
    InvalidOutletName { class_name: String, name: String },

    /// A ref's class name did not resolve against the descriptor catalog
    #[error("streamlet '{streamlet}' refers to class '{class_name}', which is not defined in this blueprint")]
    StreamletDescriptorNotFound {
        streamlet: String,
        class_name: String,
    },

    /// A port path is malformed or cannot designate any port
    #[error("'{path}' is not a valid port path")]
    InvalidPortPath { path: String },

    /// A port path does not designate an existing port
    #[error("port path '{path}' does not point to a known streamlet port")]
    PortPathNotFound { path: String },

    /// A short outlet path on a streamlet with more than one outlet
    #[error("streamlet '{streamlet}' has more than one outlet; connections from it must name the outlet explicitly")]
    AmbiguousOutlet { streamlet: String },

    /// Two or more distinct outlets fan in to the same inlet
    #[error("inlet '{target}' is connected to more than one outlet: {}", fmt_list(.sources))]
    IllegalConnection {
        sources: Vec<String>,
        target: String,
    },

    /// The schemas on the two sides of a connection differ
    #[error("schema of outlet '{from}' is incompatible with schema of inlet '{to}'")]
    IncompatibleSchema { from: String, to: String },

    /// Inlets that no resolved connection targets
    #[error("unconnected inlets: {}", fmt_inlets(.inlets))]
    UnconnectedInlets { inlets: Vec<UnconnectedInlet> },

    /// A descriptor declares the same config parameter key more than once
    #[error("config parameter key '{key}' is defined more than once")]
    DuplicateConfigParameterKeyFound { key: String },

    /// A config parameter validation pattern does not compile
    #[error("config parameter '{key}' has a validation pattern that is not a valid regular expression")]
    InvalidValidationPatternConfigParameter { key: String },

    /// A config parameter default value does not conform to its declared kind
    #[error("default value '{value}' for config parameter '{key}' is not a valid {kind}")]
    InvalidDefaultValueInConfigParameter {
        key: String,
        kind: crate::streamlet::ConfigParameterKind,
        value: String,
    },

    /// A descriptor declares the same volume mount name more than once
    #[error("volume mount name '{name}' is defined more than once")]
    DuplicateVolumeMountName { name: String },

    /// A descriptor declares the same volume mount path more than once
    #[error("volume mount path '{path}' is used more than once")]
    DuplicateVolumeMountPath { path: String },

    /// A volume mount name is not a valid DNS-1123 label
    #[error("volume mount name '{name}' is invalid; names must be DNS-1123 labels of at most 63 characters")]
    InvalidVolumeMountName { name: String },

    /// A volume mount has an empty path
    #[error("volume mount '{name}' has an empty path")]
    EmptyVolumeMountPath { name: String },

    /// A volume mount path is not absolute
    #[error("volume mount '{name}' must have an absolute path")]
    NonAbsoluteVolumeMountPath { name: String },

    /// A volume mount path contains a `..` segment
    #[error("volume mount '{name}' must not contain '..' in its path")]
    BacktrackingVolumeMountPath { name: String },

    /// A volume mount declares an access mode outside the known set
    #[error("volume mount '{name}' has unknown access mode '{mode}'")]
    InvalidVolumeMountAccessMode { name: String, mode: String },

    /// An application id normalizes to the empty string
    #[error("application id '{raw}' is invalid; it must contain at least one alphanumeric character")]
    InvalidApplicationId { raw: String },
}

impl BlueprintProblem {
    /// Severity of this problem; every variant in the current taxonomy is an error
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

fn fmt_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(", ")
}

fn fmt_inlets(inlets: &[UnconnectedInlet]) -> String {
    inlets
        .iter()
        .map(|i| format!("'{}'", i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Remove structurally equal duplicates, preserving first-occurrence order
pub(crate) fn dedup_problems(problems: Vec<BlueprintProblem>) -> Vec<BlueprintProblem> {
    let mut out: Vec<BlueprintProblem> = Vec::with_capacity(problems.len());
    for problem in problems {
        if !out.contains(&problem) {
            out.push(problem);
        }
    }
    out
}
