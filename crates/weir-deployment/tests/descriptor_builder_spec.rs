use proptest::prelude::*;

use std::collections::{BTreeMap, HashSet};

use weir_blueprint::{
    Blueprint, Inlet, Outlet, SchemaDescriptor, StreamletDescriptor, StreamletRef, StreamletShape,
};
use weir_deployment::{
    build_application_descriptor, BuildError, Savepoint, DESCRIPTOR_VERSION,
    MINIMUM_ENDPOINT_CONTAINER_PORT, PROMETHEUS_AGENT, SERVER_CONTAINER_PORT_KEY,
};

fn foo() -> SchemaDescriptor {
    SchemaDescriptor::new("sensors.Foo", b"foo-fingerprint".to_vec())
}

fn ingress(server: bool) -> StreamletDescriptor {
    StreamletDescriptor::new(
        "sensors.Ingress",
        "akka",
        "registry.example.com/sensors:0.1.0",
        StreamletShape::source(Outlet::new("out", foo())),
    )
    .with_server(server)
}

fn processor() -> StreamletDescriptor {
    StreamletDescriptor::new(
        "sensors.Processor",
        "akka",
        "registry.example.com/sensors:0.1.0",
        StreamletShape::processor(Inlet::new("in", foo()), Outlet::new("out", foo())),
    )
}

fn egress(server: bool) -> StreamletDescriptor {
    StreamletDescriptor::new(
        "sensors.Egress",
        "akka",
        "registry.example.com/sensors:0.1.0",
        StreamletShape::sink(Inlet::new("in", foo())),
    )
    .with_server(server)
}

fn chain_blueprint(ingress_server: bool, egress_server: bool) -> Blueprint {
    Blueprint::new()
        .define(vec![ingress(ingress_server), processor(), egress(egress_server)])
        .use_streamlet(StreamletRef::new("ingress", "sensors.Ingress"))
        .use_streamlet(StreamletRef::new("processor", "sensors.Processor"))
        .use_streamlet(StreamletRef::new("egress", "sensors.Egress"))
        .connect("ingress.out", "processor.in")
        .connect("processor.out", "egress.in")
}

fn agent_paths() -> BTreeMap<String, String> {
    let mut paths = BTreeMap::new();
    paths.insert(
        PROMETHEUS_AGENT.to_string(),
        "/opt/agents/prometheus-jmx.jar".to_string(),
    );
    paths
}

#[test]
fn test_simple_chain_lowers_to_two_deployments() {
    let blueprint = Blueprint::new()
        .define(vec![ingress(false), processor()])
        .use_streamlet(StreamletRef::new("ingress", "sensors.Ingress"))
        .use_streamlet(StreamletRef::new("processor", "sensors.Processor"))
        .connect("ingress.out", "processor.in");

    let descriptor =
        build_application_descriptor("sensor-app", "0.1.0", &blueprint, &agent_paths()).unwrap();

    assert_eq!(descriptor.deployments.len(), 2);
    assert_eq!(descriptor.app_id, "sensor-app");
    assert_eq!(descriptor.app_version, "0.1.0");
    assert_eq!(descriptor.version, DESCRIPTOR_VERSION);

    let processor_deployment = &descriptor.deployments[1];
    assert_eq!(processor_deployment.name, "sensor-app.processor");
    assert_eq!(
        processor_deployment.port_mappings["in"],
        Savepoint::new("sensor-app", "ingress", "out"),
        "an inlet maps to the savepoint of the outlet feeding it"
    );
    assert_eq!(
        processor_deployment.port_mappings["out"],
        Savepoint::new("sensor-app", "processor", "out"),
        "an outlet maps to its own savepoint"
    );
}

#[test]
fn test_container_ports_follow_blueprint_order() {
    let blueprint = chain_blueprint(true, true);
    let descriptor =
        build_application_descriptor("sensor-app", "0.1.0", &blueprint, &agent_paths()).unwrap();

    let ingress_deployment = &descriptor.deployments[0];
    let processor_deployment = &descriptor.deployments[1];
    let egress_deployment = &descriptor.deployments[2];

    assert_eq!(
        ingress_deployment.endpoint.as_ref().unwrap().container_port,
        MINIMUM_ENDPOINT_CONTAINER_PORT
    );
    assert!(processor_deployment.endpoint.is_none());
    assert_eq!(
        egress_deployment.endpoint.as_ref().unwrap().container_port,
        MINIMUM_ENDPOINT_CONTAINER_PORT + 2
    );
}

#[test]
fn test_server_streamlets_get_the_port_in_their_config() {
    let blueprint = chain_blueprint(true, false);
    let descriptor =
        build_application_descriptor("sensor-app", "0.1.0", &blueprint, &agent_paths()).unwrap();

    let ingress_deployment = &descriptor.deployments[0];
    assert_eq!(
        ingress_deployment.config[SERVER_CONTAINER_PORT_KEY],
        serde_json::json!(MINIMUM_ENDPOINT_CONTAINER_PORT)
    );

    let processor_deployment = &descriptor.deployments[1];
    assert!(processor_deployment.config.is_empty());
}

#[test]
fn test_every_port_appears_exactly_once_in_port_mappings() {
    let blueprint = chain_blueprint(true, true);
    let descriptor =
        build_application_descriptor("sensor-app", "0.1.0", &blueprint, &agent_paths()).unwrap();

    for (deployment, streamlet) in descriptor.deployments.iter().zip(&descriptor.streamlets) {
        let shape = &streamlet.descriptor.shape;
        assert_eq!(
            deployment.port_mappings.len(),
            shape.inlets.len() + shape.outlets.len()
        );
        for inlet in &shape.inlets {
            assert!(deployment.port_mappings.contains_key(&inlet.name));
        }
        for outlet in &shape.outlets {
            assert_eq!(
                deployment.port_mappings[&outlet.name],
                Savepoint::new("sensor-app", &streamlet.name, &outlet.name)
            );
        }
    }
}

#[test]
fn test_outlet_savepoints_are_unique() {
    let blueprint = chain_blueprint(false, false);
    let descriptor =
        build_application_descriptor("sensor-app", "0.1.0", &blueprint, &agent_paths()).unwrap();

    let mut seen = HashSet::new();
    for (deployment, streamlet) in descriptor.deployments.iter().zip(&descriptor.streamlets) {
        for outlet in &streamlet.descriptor.shape.outlets {
            assert!(
                seen.insert(deployment.port_mappings[&outlet.name].clone()),
                "duplicate outlet savepoint"
            );
        }
    }
}

#[test]
fn test_descriptor_is_deterministic() {
    let blueprint = chain_blueprint(true, true);

    let first =
        build_application_descriptor("sensor-app", "0.1.0", &blueprint, &agent_paths()).unwrap();
    let second =
        build_application_descriptor("sensor-app", "0.1.0", &blueprint, &agent_paths()).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_descriptor_json_contract() {
    let blueprint = chain_blueprint(true, false);
    let descriptor =
        build_application_descriptor("sensor-app", "0.1.0", &blueprint, &agent_paths()).unwrap();

    let json = serde_json::to_value(&descriptor).unwrap();
    let object = json.as_object().unwrap();
    for field in [
        "appId",
        "appVersion",
        "streamlets",
        "connections",
        "deployments",
        "agentPaths",
        "version",
    ] {
        assert!(object.contains_key(field), "missing field '{}'", field);
    }

    assert_eq!(json["agentPaths"]["prometheus"], "/opt/agents/prometheus-jmx.jar");
    assert_eq!(json["connections"][0]["from"], "ingress.out");
    assert_eq!(json["connections"][0]["to"], "processor.in");

    let deployment = json["deployments"][0].as_object().unwrap();
    for field in [
        "name",
        "runtime",
        "image",
        "className",
        "streamletName",
        "endpoint",
        "secretName",
        "config",
        "portMappings",
        "volumeMounts",
    ] {
        assert!(deployment.contains_key(field), "missing deployment field '{}'", field);
    }
}

#[test]
fn test_app_id_is_normalized_before_use() {
    let blueprint = chain_blueprint(false, false);
    let descriptor =
        build_application_descriptor("Sensor App", "0.1.0", &blueprint, &agent_paths()).unwrap();

    assert_eq!(descriptor.app_id, "sensor-app");
    assert_eq!(descriptor.deployments[0].name, "sensor-app.ingress");
    assert_eq!(
        descriptor.deployments[1].port_mappings["in"],
        Savepoint::new("sensor-app", "ingress", "out")
    );
}

#[test]
fn test_secret_names_are_derived_from_ref_names() {
    let blueprint = chain_blueprint(false, false);
    let descriptor =
        build_application_descriptor("sensor-app", "0.1.0", &blueprint, &agent_paths()).unwrap();

    for deployment in &descriptor.deployments {
        assert_eq!(deployment.secret_name, deployment.streamlet_name);
    }
}

#[test]
fn test_unverified_blueprint_is_rejected() {
    let blueprint = Blueprint::new()
        .define(vec![ingress(false), processor()])
        .use_streamlet(StreamletRef::new("processor", "sensors.Processor"));

    let result = build_application_descriptor("sensor-app", "0.1.0", &blueprint, &agent_paths());
    match result {
        Err(BuildError::InvalidBlueprint(problems)) => assert!(!problems.is_empty()),
        other => panic!("Expected InvalidBlueprint, got {:?}", other.map(|_| ())),
    }
}

proptest! {
    // container ports stay pairwise distinct for any arrangement of server
    // streamlets along a chain
    #[test]
    fn server_container_ports_are_pairwise_distinct(server_flags in prop::collection::vec(any::<bool>(), 1..6)) {
        let data = foo();
        let mut blueprint_descriptors = Vec::new();
        for (i, server) in server_flags.iter().enumerate() {
            let class = format!("sensors.Stage{}", i);
            let shape = if i == 0 {
                StreamletShape::source(Outlet::new("out", data.clone()))
            } else if i == server_flags.len() - 1 {
                StreamletShape::sink(Inlet::new("in", data.clone()))
            } else {
                StreamletShape::processor(
                    Inlet::new("in", data.clone()),
                    Outlet::new("out", data.clone()),
                )
            };
            let descriptor = StreamletDescriptor::new(
                class,
                "akka",
                "registry.example.com/sensors:0.1.0",
                shape,
            )
            .with_server(*server);
            blueprint_descriptors.push(descriptor);
        }

        let mut blueprint = Blueprint::new().define(blueprint_descriptors);
        for (i, _) in server_flags.iter().enumerate() {
            blueprint = blueprint.use_streamlet(StreamletRef::new(
                format!("stage-{}", i),
                format!("sensors.Stage{}", i),
            ));
        }
        for i in 1..server_flags.len() {
            blueprint = blueprint.connect(
                format!("stage-{}.out", i - 1),
                format!("stage-{}.in", i),
            );
        }

        let descriptor =
            build_application_descriptor("sensor-app", "0.1.0", &blueprint, &BTreeMap::new())
                .unwrap();

        let ports: Vec<i32> = descriptor
            .deployments
            .iter()
            .filter_map(|d| d.endpoint.as_ref().map(|e| e.container_port))
            .collect();
        let distinct: HashSet<i32> = ports.iter().copied().collect();
        prop_assert_eq!(ports.len(), distinct.len());

        let expected_servers = server_flags.iter().filter(|s| **s).count();
        prop_assert_eq!(ports.len(), expected_servers);
    }
}
