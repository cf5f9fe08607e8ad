use serde::{Deserialize, Serialize};

use std::fmt;

/// The value kind of a config parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigParameterKind {
    /// Free-form string, optionally constrained by a validation pattern
    String,
    /// 64-bit signed integer
    Int,
    /// Boolean (`true`/`false`/`yes`/`no`/`on`/`off`)
    Bool,
    /// 64-bit floating point number
    Double,
    /// Time duration with unit (e.g. "1 minute", "250 ms")
    Duration,
    /// Byte size with unit (e.g. "20 M", "512 KiB")
    MemorySize,
    /// Regular expression
    Regexp,
}

impl fmt::Display for ConfigParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigParameterKind::String => "string",
            ConfigParameterKind::Int => "int",
            ConfigParameterKind::Bool => "bool",
            ConfigParameterKind::Double => "double",
            ConfigParameterKind::Duration => "duration",
            ConfigParameterKind::MemorySize => "memorysize",
            ConfigParameterKind::Regexp => "regexp",
        };
        write!(f, "{}", name)
    }
}

/// Describes one configuration parameter accepted by a streamlet class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigParameterDescriptor {
    /// Key under which the parameter is configured
    pub key: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Value kind of the parameter
    pub kind: ConfigParameterKind,

    /// Optional validation pattern; only meaningful for string parameters
    #[serde(default)]
    pub pattern: Option<String>,

    /// Optional default value, validated against `kind` during verification
    #[serde(default)]
    pub default_value: Option<String>,
}

impl ConfigParameterDescriptor {
    pub fn new(
        key: impl Into<String>,
        description: impl Into<String>,
        kind: ConfigParameterKind,
    ) -> Self {
        ConfigParameterDescriptor {
            key: key.into(),
            description: description.into(),
            kind,
            pattern: None,
            default_value: None,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Parse a duration value of the form `<digits> [unit]` into nanoseconds.
///
/// Accepted units are the short and word forms of nanoseconds through days;
/// a bare number is interpreted as milliseconds.
pub fn parse_duration(s: &str) -> Option<u128> {
    let (value, unit) = split_value_and_unit(s)?;
    let factor: u128 = match unit {
        "ns" | "nano" | "nanos" | "nanosecond" | "nanoseconds" => 1,
        "us" | "micro" | "micros" | "microsecond" | "microseconds" => 1_000,
        "" | "ms" | "milli" | "millis" | "millisecond" | "milliseconds" => 1_000_000,
        "s" | "second" | "seconds" => 1_000_000_000,
        "m" | "minute" | "minutes" => 60 * 1_000_000_000,
        "h" | "hour" | "hours" => 3_600 * 1_000_000_000,
        "d" | "day" | "days" => 86_400 * 1_000_000_000,
        _ => return None,
    };
    value.checked_mul(factor)
}

/// Parse a memory size value of the form `<digits> [unit]` into bytes.
///
/// Both powers-of-ten (kB, MB, ...) and powers-of-two (K, Ki, KiB, ...)
/// units are accepted; a bare number is interpreted as bytes.
pub fn parse_memory_size(s: &str) -> Option<u128> {
    let (value, unit) = split_value_and_unit(s)?;
    let factor: u128 = match unit {
        "" | "B" | "b" | "byte" | "bytes" => 1,
        "kB" | "kilobyte" | "kilobytes" => 1_000,
        "MB" | "megabyte" | "megabytes" => 1_000_000,
        "GB" | "gigabyte" | "gigabytes" => 1_000_000_000,
        "TB" | "terabyte" | "terabytes" => 1_000_000_000_000,
        "PB" | "petabyte" | "petabytes" => 1_000_000_000_000_000,
        "K" | "k" | "Ki" | "KiB" | "kibibyte" | "kibibytes" => 1 << 10,
        "M" | "m" | "Mi" | "MiB" | "mebibyte" | "mebibytes" => 1 << 20,
        "G" | "g" | "Gi" | "GiB" | "gibibyte" | "gibibytes" => 1 << 30,
        "T" | "t" | "Ti" | "TiB" | "tebibyte" | "tebibytes" => 1 << 40,
        "P" | "p" | "Pi" | "PiB" | "pebibyte" | "pebibytes" => 1 << 50,
        _ => return None,
    };
    value.checked_mul(factor)
}

/// Parse a boolean the way config files spell them
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_value_and_unit(s: &str) -> Option<(u128, &str)> {
    let s = s.trim();
    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if digits_end == 0 {
        return None;
    }
    let value: u128 = s[..digits_end].parse().ok()?;
    let unit = s[digits_end..].trim();
    if unit.contains(char::is_whitespace) {
        return None;
    }
    Some((value, unit))
}
