use regex::Regex;

use std::collections::HashSet;

use crate::name;
use crate::problem::BlueprintProblem;
use crate::streamlet::{
    access_mode, parse_bool, parse_duration, parse_memory_size, ConfigParameterKind,
    StreamletDescriptor,
};

/// Check one descriptor for well-formedness: class name, port names, config
/// parameters, and volume mounts
pub(crate) fn verify_descriptor(descriptor: &StreamletDescriptor) -> Vec<BlueprintProblem> {
    let mut problems = Vec::new();

    if !name::is_valid_class_name(&descriptor.class_name) {
        problems.push(BlueprintProblem::InvalidStreamletClassName {
            streamlet: descriptor.class_name.clone(),
            class_name: descriptor.class_name.clone(),
        });
    }

    for inlet in &descriptor.shape.inlets {
        if !name::is_valid_port_name(&inlet.name) {
            problems.push(BlueprintProblem::InvalidInletName {
                class_name: descriptor.class_name.clone(),
                name: inlet.name.clone(),
            });
        }
    }

    for outlet in &descriptor.shape.outlets {
        if !name::is_valid_port_name(&outlet.name) {
            problems.push(BlueprintProblem::InvalidOutletName {
                class_name: descriptor.class_name.clone(),
                name: outlet.name.clone(),
            });
        }
    }

    verify_config_parameters(descriptor, &mut problems);
    verify_volume_mounts(descriptor, &mut problems);

    problems
}

fn verify_config_parameters(descriptor: &StreamletDescriptor, problems: &mut Vec<BlueprintProblem>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for parameter in &descriptor.config_parameters {
        if !seen.insert(parameter.key.as_str()) && reported.insert(parameter.key.as_str()) {
            problems.push(BlueprintProblem::DuplicateConfigParameterKeyFound {
                key: parameter.key.clone(),
            });
        }
    }

    for parameter in &descriptor.config_parameters {
        let compiled = match parameter.pattern.as_deref() {
            Some(source) => match Regex::new(source) {
                Ok(re) => Some(re),
                Err(_) => {
                    problems.push(BlueprintProblem::InvalidValidationPatternConfigParameter {
                        key: parameter.key.clone(),
                    });
                    // a string default cannot be checked without its pattern
                    if parameter.kind == ConfigParameterKind::String {
                        continue;
                    }
                    None
                }
            },
            None => None,
        };

        if let Some(value) = &parameter.default_value {
            if !default_value_is_valid(parameter.kind, value, compiled.as_ref()) {
                problems.push(BlueprintProblem::InvalidDefaultValueInConfigParameter {
                    key: parameter.key.clone(),
                    kind: parameter.kind,
                    value: value.clone(),
                });
            }
        }
    }
}

fn default_value_is_valid(kind: ConfigParameterKind, value: &str, pattern: Option<&Regex>) -> bool {
    match kind {
        ConfigParameterKind::String => pattern.map_or(true, |re| matches_fully(re, value)),
        ConfigParameterKind::Int => value.trim().parse::<i64>().is_ok(),
        ConfigParameterKind::Bool => parse_bool(value).is_some(),
        ConfigParameterKind::Double => value.trim().parse::<f64>().is_ok(),
        ConfigParameterKind::Duration => parse_duration(value).is_some(),
        ConfigParameterKind::MemorySize => parse_memory_size(value).is_some(),
        ConfigParameterKind::Regexp => Regex::new(value).is_ok(),
    }
}

// Validation patterns constrain the whole value, not a substring of it
fn matches_fully(re: &Regex, value: &str) -> bool {
    re.find(value)
        .map_or(false, |m| m.start() == 0 && m.end() == value.len())
}

fn verify_volume_mounts(descriptor: &StreamletDescriptor, problems: &mut Vec<BlueprintProblem>) {
    let mut seen_names = HashSet::new();
    let mut reported_names = HashSet::new();
    let mut seen_paths = HashSet::new();
    let mut reported_paths = HashSet::new();

    for mount in &descriptor.volume_mounts {
        if !seen_names.insert(mount.name.as_str()) && reported_names.insert(mount.name.as_str()) {
            problems.push(BlueprintProblem::DuplicateVolumeMountName {
                name: mount.name.clone(),
            });
        }
        if !seen_paths.insert(mount.path.as_str()) && reported_paths.insert(mount.path.as_str()) {
            problems.push(BlueprintProblem::DuplicateVolumeMountPath {
                path: mount.path.clone(),
            });
        }
    }

    for mount in &descriptor.volume_mounts {
        if !name::is_valid_volume_mount_name(&mount.name) {
            problems.push(BlueprintProblem::InvalidVolumeMountName {
                name: mount.name.clone(),
            });
        }

        if mount.path.is_empty() {
            problems.push(BlueprintProblem::EmptyVolumeMountPath {
                name: mount.name.clone(),
            });
        } else {
            if !mount.path.starts_with('/') {
                problems.push(BlueprintProblem::NonAbsoluteVolumeMountPath {
                    name: mount.name.clone(),
                });
            }
            if mount.path.contains("..") {
                problems.push(BlueprintProblem::BacktrackingVolumeMountPath {
                    name: mount.name.clone(),
                });
            }
        }

        if !access_mode::ALL.contains(&mount.access_mode.as_str()) {
            problems.push(BlueprintProblem::InvalidVolumeMountAccessMode {
                name: mount.name.clone(),
                mode: mount.access_mode.clone(),
            });
        }
    }
}
