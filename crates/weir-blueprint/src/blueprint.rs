use serde::{Deserialize, Deserializer, Serialize, Serializer};

use std::fmt;

use crate::problem::{dedup_problems, BlueprintProblem};
use crate::streamlet::StreamletDescriptor;
use crate::verify::{
    self, VerifiedBlueprint, VerifiedStreamlet, VerifiedStreamletConnection,
};

/// Arbitrary key-value tree attached to refs and connections
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A reference to a streamlet port.
///
/// A short path names only the streamlet ref and designates its sole outlet
/// or inlet, depending on which side of a connection it appears on; a
/// qualified path names the port explicitly. Paths are resolved to qualified
/// form during verification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PortPath {
    /// Ref name only; resolves positionally
    Short(String),

    /// Ref name and port name
    Qualified { streamlet: String, port: String },
}

impl PortPath {
    /// Parse a path string, splitting at the first `.`
    pub fn parse(s: &str) -> PortPath {
        match s.split_once('.') {
            Some((streamlet, port)) => PortPath::Qualified {
                streamlet: streamlet.to_string(),
                port: port.to_string(),
            },
            None => PortPath::Short(s.to_string()),
        }
    }

    /// The streamlet ref name this path points into
    pub fn streamlet(&self) -> &str {
        match self {
            PortPath::Short(streamlet) => streamlet,
            PortPath::Qualified { streamlet, .. } => streamlet,
        }
    }

    /// The port name, if the path is qualified
    pub fn port(&self) -> Option<&str> {
        match self {
            PortPath::Short(_) => None,
            PortPath::Qualified { port, .. } => Some(port),
        }
    }
}

impl fmt::Display for PortPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortPath::Short(streamlet) => write!(f, "{}", streamlet),
            PortPath::Qualified { streamlet, port } => write!(f, "{}.{}", streamlet, port),
        }
    }
}

impl From<&str> for PortPath {
    fn from(s: &str) -> Self {
        PortPath::parse(s)
    }
}

impl From<String> for PortPath {
    fn from(s: String) -> Self {
        PortPath::parse(&s)
    }
}

impl Serialize for PortPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PortPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(PortPath::parse(&s))
    }
}

/// A named use of a streamlet class within a blueprint
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamletRef {
    /// Instance name, unique within the blueprint
    pub name: String,

    /// Class name resolved against the descriptor catalog
    pub class_name: String,

    /// Optional metadata carried through verification untouched
    pub metadata: Option<Metadata>,

    /// Problems found for this ref by the last verification
    pub problems: Vec<BlueprintProblem>,

    /// Resolution cache populated by verification
    pub verified: Option<VerifiedStreamlet>,
}

impl StreamletRef {
    pub fn new(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        StreamletRef {
            name: name.into(),
            class_name: class_name.into(),
            metadata: None,
            problems: vec![],
            verified: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A directed edge from an outlet to an inlet
#[derive(Debug, Clone, PartialEq)]
pub struct StreamletConnection {
    /// Outlet side
    pub from: PortPath,

    /// Inlet side
    pub to: PortPath,

    /// Optional metadata carried through verification untouched
    pub metadata: Option<Metadata>,

    /// Problems found for this connection by the last verification
    pub problems: Vec<BlueprintProblem>,

    /// Resolution cache populated by verification; present when both sides
    /// resolved, even if their schemas turned out to be incompatible
    pub verified: Option<VerifiedStreamletConnection>,
}

impl StreamletConnection {
    pub fn new(from: impl Into<PortPath>, to: impl Into<PortPath>) -> Self {
        StreamletConnection {
            from: from.into(),
            to: to.into(),
            metadata: None,
            problems: vec![],
            verified: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A user-authored declaration of streamlets and the connections between
/// their ports.
///
/// The blueprint is a value: every edit operation returns a new, already
/// verified instance and never fails on structural errors — those are
/// recorded as problems on the blueprint, its refs, and its connections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Blueprint {
    /// Catalog of streamlet classes the refs resolve against
    pub streamlet_descriptors: Vec<StreamletDescriptor>,

    /// Used streamlets, in declaration order
    pub streamlets: Vec<StreamletRef>,

    /// Connections between streamlet ports
    pub connections: Vec<StreamletConnection>,

    /// Problems not attributable to a single ref or connection
    pub global_problems: Vec<BlueprintProblem>,
}

impl Blueprint {
    /// An empty, unverified blueprint
    pub fn new() -> Self {
        Blueprint::default()
    }

    /// Replace the descriptor catalog
    pub fn define(&self, streamlet_descriptors: Vec<StreamletDescriptor>) -> Blueprint {
        Blueprint {
            streamlet_descriptors,
            ..self.clone()
        }
        .verify()
    }

    /// Add a streamlet ref, replacing any existing ref with the same name in
    /// place so list order is preserved
    pub fn use_streamlet(&self, streamlet_ref: StreamletRef) -> Blueprint {
        let mut streamlets = self.streamlets.clone();
        match streamlets.iter().position(|r| r.name == streamlet_ref.name) {
            Some(index) => streamlets[index] = streamlet_ref,
            None => streamlets.push(streamlet_ref),
        }
        Blueprint {
            streamlets,
            ..self.clone()
        }
        .verify()
    }

    /// Insert or update the ref named `name`.
    ///
    /// A missing ref is inserted when a class name is given and left alone
    /// otherwise. For an existing ref, omitted arguments preserve the current
    /// values; when both arguments are omitted the blueprint is returned
    /// unchanged.
    pub fn upsert_streamlet_ref(
        &self,
        name: &str,
        class_name: Option<&str>,
        metadata: Option<Metadata>,
    ) -> Blueprint {
        match self.streamlets.iter().position(|r| r.name == name) {
            Some(index) => {
                if class_name.is_none() && metadata.is_none() {
                    return self.clone();
                }
                let existing = &self.streamlets[index];
                let updated = StreamletRef {
                    name: name.to_string(),
                    class_name: class_name
                        .map(str::to_string)
                        .unwrap_or_else(|| existing.class_name.clone()),
                    metadata: metadata.or_else(|| existing.metadata.clone()),
                    problems: vec![],
                    verified: None,
                };
                let mut streamlets = self.streamlets.clone();
                streamlets[index] = updated;
                Blueprint {
                    streamlets,
                    ..self.clone()
                }
                .verify()
            }
            None => match class_name {
                Some(class_name) => {
                    let mut streamlet_ref = StreamletRef::new(name, class_name);
                    streamlet_ref.metadata = metadata;
                    self.use_streamlet(streamlet_ref)
                }
                None => self.clone(),
            },
        }
    }

    /// Remove the ref named `name` together with every connection that has
    /// it on either side
    pub fn remove(&self, name: &str) -> Blueprint {
        let streamlets = self
            .streamlets
            .iter()
            .filter(|r| r.name != name)
            .cloned()
            .collect();
        let connections = self
            .connections
            .iter()
            .filter(|c| c.from.streamlet() != name && c.to.streamlet() != name)
            .cloned()
            .collect();
        Blueprint {
            streamlets,
            connections,
            ..self.clone()
        }
        .verify()
    }

    /// Connect an outlet to an inlet.
    ///
    /// Both sides accept short or qualified paths. A connection equivalent to
    /// an existing one after resolution is not added again, even when the
    /// existing one carries problems.
    pub fn connect(&self, from: impl Into<PortPath>, to: impl Into<PortPath>) -> Blueprint {
        self.connect_with(StreamletConnection::new(from, to))
    }

    /// Like [`Blueprint::connect`], with metadata on the connection
    pub fn connect_with(&self, connection: StreamletConnection) -> Blueprint {
        let mut connections = self.connections.clone();
        connections.push(connection);
        let candidate = Blueprint {
            connections,
            ..self.clone()
        }
        .verify();

        match candidate.connections.split_last() {
            Some((added, earlier))
                if earlier
                    .iter()
                    .any(|c| endpoint_key(c) == endpoint_key(added)) =>
            {
                self.verify()
            }
            _ => candidate,
        }
    }

    /// Remove every connection with `path` on either side, under the same
    /// normalization `connect` uses; a path matching nothing is a no-op
    pub fn disconnect(&self, path: impl Into<PortPath>) -> Blueprint {
        let path = path.into();
        let current = self.verify();

        let refs = verify::verified_refs(&current.streamlets);
        let as_outlet = verify::resolve_outlet(&path, &refs).ok().map(|p| p.path);
        let as_inlet = verify::resolve_inlet(&path, &refs).ok().map(|p| p.path);

        let connections: Vec<StreamletConnection> = current
            .connections
            .iter()
            .filter(|c| {
                let literal = c.from == path || c.to == path;
                let resolved = c.verified.as_ref().map_or(false, |v| {
                    Some(&v.from.path) == as_outlet.as_ref()
                        || Some(&v.to.path) == as_inlet.as_ref()
                });
                !(literal || resolved)
            })
            .cloned()
            .collect();

        Blueprint {
            connections,
            ..current
        }
        .verify()
    }

    /// Run the verification engine, producing a blueprint with all problem
    /// lists and resolution caches populated. Idempotent.
    pub fn verify(&self) -> Blueprint {
        verify::verify(self)
    }

    /// All problems of the last verification: global, per-ref, and
    /// per-connection, deduplicated by structural equality
    pub fn problems(&self) -> Vec<BlueprintProblem> {
        let mut all = self.global_problems.clone();
        for streamlet_ref in &self.streamlets {
            all.extend(streamlet_ref.problems.iter().cloned());
        }
        for connection in &self.connections {
            all.extend(connection.problems.iter().cloned());
        }
        dedup_problems(all)
    }

    /// The fully resolved blueprint, or the problems preventing it
    pub fn verified(&self) -> Result<VerifiedBlueprint, Vec<BlueprintProblem>> {
        let checked = self.verify();
        let problems = checked.problems();

        let streamlets: Option<Vec<VerifiedStreamlet>> = checked
            .streamlets
            .iter()
            .map(|r| r.verified.clone())
            .collect();
        let connections: Option<Vec<VerifiedStreamletConnection>> = checked
            .connections
            .iter()
            .map(|c| c.verified.clone())
            .collect();

        match (streamlets, connections) {
            (Some(streamlets), Some(connections)) if problems.is_empty() => Ok(VerifiedBlueprint {
                streamlets,
                connections,
            }),
            _ => Err(problems),
        }
    }
}

fn endpoint_key(connection: &StreamletConnection) -> (String, String) {
    match &connection.verified {
        Some(v) => (v.from.path.to_string(), v.to.path.to_string()),
        None => (connection.from.to_string(), connection.to.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_path_parse() {
        assert_eq!(PortPath::parse("ingress"), PortPath::Short("ingress".to_string()));
        assert_eq!(
            PortPath::parse("ingress.out"),
            PortPath::Qualified {
                streamlet: "ingress".to_string(),
                port: "out".to_string(),
            }
        );
        // ref names cannot contain dots, so everything after the first dot is
        // the port segment
        assert_eq!(
            PortPath::parse("a.b.c"),
            PortPath::Qualified {
                streamlet: "a".to_string(),
                port: "b.c".to_string(),
            }
        );
    }

    #[test]
    fn test_port_path_display_round_trips() {
        for path in ["ingress", "ingress.out", "merge.in-1"] {
            assert_eq!(PortPath::parse(path).to_string(), path);
        }
    }

    #[test]
    fn test_port_path_accessors() {
        let short = PortPath::parse("ingress");
        assert_eq!(short.streamlet(), "ingress");
        assert_eq!(short.port(), None);

        let qualified = PortPath::parse("merge.in-0");
        assert_eq!(qualified.streamlet(), "merge");
        assert_eq!(qualified.port(), Some("in-0"));
    }

    #[test]
    fn test_port_path_serde_as_string() {
        let path = PortPath::parse("ingress.out");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"ingress.out\"");

        let back: PortPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn test_empty_blueprint_has_no_problems_until_verified() {
        let blueprint = Blueprint::new();
        assert!(blueprint.problems().is_empty());

        let verified = blueprint.verify();
        assert!(!verified.problems().is_empty());
    }
}
