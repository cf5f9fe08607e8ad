//! # Weir Blueprint
//!
//! A weir blueprint declares a streaming application as a set of *streamlets*
//! (typed, reusable stream-processing units) and *connections* between their
//! ports. This crate provides the blueprint document model, an incremental
//! edit API, and the verification engine that checks structural, naming,
//! schema-compatibility, configuration, and volume-mount rules.
//!
//! ## Features
//!
//! * Functional edit API: every operation returns a new, verified blueprint
//! * Structural errors are accumulated as typed problems, never thrown
//! * Port paths in short (`ingress`) and qualified (`ingress.out`) form,
//!   with positional aliases resolved during verification
//! * Schema compatibility by fingerprint equality
//! * YAML document parsing for blueprints loaded by a collaborator
//!
//! ## Example
//!
//! ```
//! use weir_blueprint::{
//!     parse_and_verify_blueprint, Inlet, Outlet, SchemaDescriptor, StreamletDescriptor,
//!     StreamletShape,
//! };
//!
//! let sensor_data = SchemaDescriptor::new("sensors.SensorData", vec![0xab, 0xcd]);
//!
//! let descriptors = vec![
//!     StreamletDescriptor::new(
//!         "sensors.SensorIngress",
//!         "akka",
//!         "registry.example.com/sensors:0.1.0",
//!         StreamletShape::source(Outlet::new("out", sensor_data.clone())),
//!     ),
//!     StreamletDescriptor::new(
//!         "sensors.SensorLogger",
//!         "akka",
//!         "registry.example.com/sensors:0.1.0",
//!         StreamletShape::sink(Inlet::new("in", sensor_data)),
//!     ),
//! ];
//!
//! let yaml = r#"
//! blueprint:
//!   streamlets:
//!     - name: ingress
//!       class: sensors.SensorIngress
//!     - name: logger
//!       class: sensors.SensorLogger
//!   connections:
//!     - from: ingress.out
//!       to: logger.in
//! "#;
//!
//! let verified = parse_and_verify_blueprint(yaml, descriptors).unwrap();
//! assert_eq!(verified.streamlets.len(), 2);
//! ```

mod blueprint;
mod name;
mod parser;
mod problem;
mod schema;
mod streamlet;
mod verify;

pub use blueprint::{Blueprint, Metadata, PortPath, StreamletConnection, StreamletRef};
pub use name::{
    is_valid_class_name, is_valid_port_name, is_valid_ref_name, is_valid_volume_mount_name,
    normalize_app_id, secret_name, MAX_APP_ID, MAX_PORT_NAME, MAX_REF_NAME, MAX_SECRET_NAME,
    MAX_VOLUME_MOUNT_NAME,
};
pub use parser::{parse_and_verify_blueprint, parse_blueprint, ParseError};
pub use problem::{BlueprintProblem, Severity, UnconnectedInlet};
pub use schema::SchemaDescriptor;
pub use streamlet::{
    access_mode, parse_bool, parse_duration, parse_memory_size, ConfigParameterDescriptor,
    ConfigParameterKind, Inlet, Outlet, StreamletDescriptor, StreamletShape,
    VolumeMountDescriptor,
};
pub use verify::{
    VerifiedBlueprint, VerifiedPort, VerifiedPortPath, VerifiedStreamlet,
    VerifiedStreamletConnection,
};

/// Returns the version string of the weir-blueprint crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_function() {
        let ver = version();
        assert!(!ver.is_empty(), "Version string should not be empty");
        assert!(ver.contains('.'), "Version string should contain at least one dot");
    }
}
