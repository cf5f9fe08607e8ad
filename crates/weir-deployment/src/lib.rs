//! # Weir Deployment
//!
//! Lowers a verified [`weir_blueprint::Blueprint`] into an
//! [`ApplicationDescriptor`]: the deterministic, deployable plan an
//! orchestrator translates into cluster workloads.
//!
//! The builder assigns container ports to server streamlets, computes the
//! savepoint mapping for every port, derives secret and deployment names,
//! and threads the caller-supplied agent paths through. It performs no I/O
//! and produces no partial results: a blueprint with problems fails the
//! build with [`BuildError::InvalidBlueprint`].
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use weir_blueprint::{
//!     Blueprint, Inlet, Outlet, SchemaDescriptor, StreamletDescriptor, StreamletRef,
//!     StreamletShape,
//! };
//! use weir_deployment::build_application_descriptor;
//!
//! let data = SchemaDescriptor::new("sensors.SensorData", vec![1, 2, 3]);
//! let blueprint = Blueprint::new()
//!     .define(vec![
//!         StreamletDescriptor::new(
//!             "sensors.SensorIngress",
//!             "akka",
//!             "registry.example.com/sensors:0.1.0",
//!             StreamletShape::source(Outlet::new("out", data.clone())),
//!         ),
//!         StreamletDescriptor::new(
//!             "sensors.SensorLogger",
//!             "akka",
//!             "registry.example.com/sensors:0.1.0",
//!             StreamletShape::sink(Inlet::new("in", data)),
//!         ),
//!     ])
//!     .use_streamlet(StreamletRef::new("ingress", "sensors.SensorIngress"))
//!     .use_streamlet(StreamletRef::new("logger", "sensors.SensorLogger"))
//!     .connect("ingress.out", "logger.in");
//!
//! let descriptor =
//!     build_application_descriptor("sensor-app", "0.1.0", &blueprint, &BTreeMap::new())
//!         .unwrap();
//! assert_eq!(descriptor.deployments.len(), 2);
//! assert_eq!(descriptor.deployments[0].name, "sensor-app.ingress");
//! ```

mod builder;
mod descriptor;

pub use builder::{
    build_application_descriptor, build_from_verified, BuildError, DESCRIPTOR_VERSION,
    MINIMUM_ENDPOINT_CONTAINER_PORT, PROMETHEUS_AGENT, SERVER_CONTAINER_PORT_KEY,
};
pub use descriptor::{
    ApplicationDescriptor, ConnectionDescriptor, Endpoint, Savepoint, StreamletDeployment,
};
