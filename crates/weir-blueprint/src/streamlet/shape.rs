use serde::{Deserialize, Serialize};

use crate::schema::SchemaDescriptor;

/// An input port of a streamlet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inlet {
    /// Name of the inlet, unique within its shape
    pub name: String,

    /// Schema of the data this inlet consumes
    pub schema: SchemaDescriptor,
}

impl Inlet {
    pub fn new(name: impl Into<String>, schema: SchemaDescriptor) -> Self {
        Inlet {
            name: name.into(),
            schema,
        }
    }
}

/// An output port of a streamlet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outlet {
    /// Name of the outlet, unique within its shape
    pub name: String,

    /// Schema of the data this outlet produces
    pub schema: SchemaDescriptor,
}

impl Outlet {
    pub fn new(name: impl Into<String>, schema: SchemaDescriptor) -> Self {
        Outlet {
            name: name.into(),
            schema,
        }
    }
}

/// The ordered inlets and outlets of a streamlet class.
///
/// Ports are identified by name within their shape; `in0`/`in1` and the
/// single-port accessors are positional conveniences used when resolving
/// short and positional port paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamletShape {
    #[serde(default)]
    pub inlets: Vec<Inlet>,

    #[serde(default)]
    pub outlets: Vec<Outlet>,
}

impl StreamletShape {
    pub fn new(inlets: Vec<Inlet>, outlets: Vec<Outlet>) -> Self {
        StreamletShape { inlets, outlets }
    }

    /// Shape of an ingress: no inlets, one outlet
    pub fn source(outlet: Outlet) -> Self {
        StreamletShape {
            inlets: vec![],
            outlets: vec![outlet],
        }
    }

    /// Shape of an egress: one inlet, no outlets
    pub fn sink(inlet: Inlet) -> Self {
        StreamletShape {
            inlets: vec![inlet],
            outlets: vec![],
        }
    }

    /// Shape of a one-in one-out processor
    pub fn processor(inlet: Inlet, outlet: Outlet) -> Self {
        StreamletShape {
            inlets: vec![inlet],
            outlets: vec![outlet],
        }
    }

    /// First inlet, if any
    pub fn in0(&self) -> Option<&Inlet> {
        self.inlets.first()
    }

    /// Second inlet, if any
    pub fn in1(&self) -> Option<&Inlet> {
        self.inlets.get(1)
    }

    /// The sole inlet, if the shape has exactly one
    pub fn single_inlet(&self) -> Option<&Inlet> {
        match self.inlets.as_slice() {
            [single] => Some(single),
            _ => None,
        }
    }

    /// The sole outlet, if the shape has exactly one
    pub fn single_outlet(&self) -> Option<&Outlet> {
        match self.outlets.as_slice() {
            [single] => Some(single),
            _ => None,
        }
    }

    /// Look up an inlet by name
    pub fn inlet(&self, name: &str) -> Option<&Inlet> {
        self.inlets.iter().find(|i| i.name == name)
    }

    /// Look up an outlet by name
    pub fn outlet(&self, name: &str) -> Option<&Outlet> {
        self.outlets.iter().find(|o| o.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(name: &str) -> SchemaDescriptor {
        SchemaDescriptor::new(name, name.as_bytes().to_vec())
    }

    #[test]
    fn test_positional_accessors() {
        let shape = StreamletShape::new(
            vec![
                Inlet::new("in-0", schema("sensors.Foo")),
                Inlet::new("in-1", schema("sensors.Bar")),
            ],
            vec![Outlet::new("out", schema("sensors.Merged"))],
        );

        assert_eq!(shape.in0().unwrap().name, "in-0");
        assert_eq!(shape.in1().unwrap().name, "in-1");
        assert!(shape.single_inlet().is_none(), "two inlets are not a single inlet");
        assert_eq!(shape.single_outlet().unwrap().name, "out");
    }

    #[test]
    fn test_lookup_by_name() {
        let shape = StreamletShape::processor(
            Inlet::new("in", schema("sensors.Foo")),
            Outlet::new("out", schema("sensors.Foo")),
        );

        assert!(shape.inlet("in").is_some());
        assert!(shape.inlet("out").is_none());
        assert!(shape.outlet("out").is_some());
        assert!(shape.outlet("missing").is_none());
    }

    #[test]
    fn test_source_and_sink_shapes() {
        let source = StreamletShape::source(Outlet::new("out", schema("sensors.Foo")));
        assert!(source.inlets.is_empty());
        assert_eq!(source.outlets.len(), 1);

        let sink = StreamletShape::sink(Inlet::new("in", schema("sensors.Foo")));
        assert_eq!(sink.inlets.len(), 1);
        assert!(sink.outlets.is_empty());
    }
}
