use lazy_static::lazy_static;
use regex::Regex;

use crate::problem::BlueprintProblem;

/// Maximum length of a streamlet ref name
pub const MAX_REF_NAME: usize = 253;

/// Maximum length of a port name
pub const MAX_PORT_NAME: usize = 253;

/// Maximum length of a volume mount name (DNS-1123 label)
pub const MAX_VOLUME_MOUNT_NAME: usize = 63;

/// Maximum length of a normalized application id (DNS-1123 label)
pub const MAX_APP_ID: usize = 63;

/// Maximum length of a derived secret name (DNS-1123 subdomain)
pub const MAX_SECRET_NAME: usize = 253;

lazy_static! {
    // Streamlet ref and port names: lowercase alphanumerics and '-', starting
    // with an alphanumeric
    static ref REF_NAME_REGEX: Regex = Regex::new(r"^[a-z0-9][a-z0-9-]*$").unwrap();

    // DNS-1123 label: must also end with an alphanumeric
    static ref DNS_LABEL_REGEX: Regex = Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").unwrap();

    // Dotted class name: segments of identifier characters; the first segment
    // must start with a letter, later segments may start with '_'
    static ref CLASS_NAME_REGEX: Regex =
        Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap();
}

/// Check whether `s` is a valid streamlet ref name.
///
/// Valid names consist of lowercase alphanumeric characters and `-`, start
/// with an alphanumeric character, and are at most 253 characters long.
pub fn is_valid_ref_name(s: &str) -> bool {
    s.len() <= MAX_REF_NAME && REF_NAME_REGEX.is_match(s)
}

/// Check whether `s` is a valid port name.
///
/// The character rules are those of ref names, with the extra requirement
/// that a port name does not end with `-`.
pub fn is_valid_port_name(s: &str) -> bool {
    s.len() <= MAX_PORT_NAME && REF_NAME_REGEX.is_match(s) && !s.ends_with('-')
}

/// Check whether `s` is a valid volume mount name (DNS-1123 label, max 63)
pub fn is_valid_volume_mount_name(s: &str) -> bool {
    s.len() <= MAX_VOLUME_MOUNT_NAME && DNS_LABEL_REGEX.is_match(s)
}

/// Check whether `s` is a valid dotted streamlet class name
pub fn is_valid_class_name(s: &str) -> bool {
    CLASS_NAME_REGEX.is_match(s)
}

/// Normalize a raw application id into a DNS-1123 label.
///
/// Lowercases the input, folds Latin letters with diacritics to their base
/// ASCII letter, replaces every remaining character outside `[a-z0-9-]` with
/// `-`, collapses runs of `-`, truncates to 63 characters and strips leading
/// and trailing `-` and `.`. Fails when nothing is left.
pub fn normalize_app_id(raw: &str) -> Result<String, BlueprintProblem> {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .map(fold_diacritic)
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();

    let mut collapsed = String::with_capacity(cleaned.len());
    for c in cleaned.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }

    let truncated: String = collapsed.chars().take(MAX_APP_ID).collect();
    let trimmed = truncated.trim_matches(|c| c == '-' || c == '.');

    if trimmed.is_empty() {
        Err(BlueprintProblem::InvalidApplicationId {
            raw: raw.to_string(),
        })
    } else {
        Ok(trimmed.to_string())
    }
}

/// Derive the secret name for a streamlet ref.
///
/// The secret name is used verbatim as a cluster resource name: the ref name
/// truncated to 253 characters with trailing `-` stripped.
pub fn secret_name(ref_name: &str) -> String {
    let truncated: String = ref_name.chars().take(MAX_SECRET_NAME).collect();
    truncated.trim_end_matches('-').to_string()
}

/// Fold a lowercase Latin letter with diacritics to its base ASCII letter.
///
/// Covers the Latin-1 supplement and Latin Extended-A ranges; anything else
/// passes through unchanged and is handled by the `-` replacement.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' | 'ß' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ref_names() {
        assert!(is_valid_ref_name("ingress"));
        assert!(is_valid_ref_name("sensor-data-ingress"));
        assert!(is_valid_ref_name("0egress"));
        assert!(is_valid_ref_name(&"a".repeat(253)));
    }

    #[test]
    fn test_invalid_ref_names() {
        assert!(!is_valid_ref_name(""));
        assert!(!is_valid_ref_name("-ingress"));
        assert!(!is_valid_ref_name("in_gress"));
        assert!(!is_valid_ref_name("in/gress"));
        assert!(!is_valid_ref_name("in+gress"));
        assert!(!is_valid_ref_name("Ingress"));
        assert!(!is_valid_ref_name("ingréss"));
        assert!(!is_valid_ref_name(&"a".repeat(254)));
    }

    #[test]
    fn test_port_names_must_not_end_with_dash() {
        assert!(is_valid_port_name("in-0"));
        assert!(is_valid_port_name("out"));
        assert!(!is_valid_port_name("in-"));
        assert!(!is_valid_port_name("-in"));
    }

    #[test]
    fn test_volume_mount_names() {
        assert!(is_valid_volume_mount_name("source-data"));
        assert!(is_valid_volume_mount_name(&"a".repeat(63)));
        assert!(!is_valid_volume_mount_name(&"a".repeat(64)));
        assert!(!is_valid_volume_mount_name("data-"));
        assert!(!is_valid_volume_mount_name("Data"));
    }

    #[test]
    fn test_class_names() {
        assert!(is_valid_class_name("SensorIngress"));
        assert!(is_valid_class_name("sensors.SensorIngress"));
        assert!(is_valid_class_name("com.acme.sensors.Sensor_Ingress"));
        assert!(is_valid_class_name("a.b._Inner"));
        assert!(!is_valid_class_name(""));
        assert!(!is_valid_class_name("_sensors.Ingress"));
        assert!(!is_valid_class_name("sensors..Ingress"));
        assert!(!is_valid_class_name("sensors.Ingress."));
        assert!(!is_valid_class_name("sensors.Sensor-Ingress"));
    }

    #[test]
    fn test_normalize_app_id_passthrough() {
        assert_eq!(normalize_app_id("call-aggregator").unwrap(), "call-aggregator");
    }

    #[test]
    fn test_normalize_app_id_folds_and_truncates() {
        let raw = "-monstrous-some-very-long-NAME-with-ü-in-the-middle-that-still-needs-more-characters-mite-12345.";
        assert_eq!(
            normalize_app_id(raw).unwrap(),
            "monstrous-some-very-long-name-with-u-in-the-middle-that-still"
        );
    }

    #[test]
    fn test_normalize_app_id_collapses_runs() {
        assert_eq!(normalize_app_id("my__app!!name").unwrap(), "my-app-name");
        assert_eq!(normalize_app_id("My App").unwrap(), "my-app");
    }

    #[test]
    fn test_normalize_app_id_rejects_empty_results() {
        assert!(normalize_app_id("").is_err());
        assert!(normalize_app_id("---").is_err());
        assert!(normalize_app_id("!!!").is_err());

        match normalize_app_id("...") {
            Err(BlueprintProblem::InvalidApplicationId { raw }) => assert_eq!(raw, "..."),
            other => panic!("Expected InvalidApplicationId, got {:?}", other),
        }
    }

    #[test]
    fn test_secret_name_strips_trailing_dashes() {
        assert_eq!(secret_name("ingress"), "ingress");

        let long = "a".repeat(250) + "----";
        assert_eq!(secret_name(&long), "a".repeat(250));
    }
}
