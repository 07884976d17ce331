//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! Overrides > Environment variables > Config file > Defaults

use geoshapes_core::config::{
    parse_foreign_members, parse_validity_mode, ConfigOverrides, ConfigSource, LayeredConfig,
    FOREIGN_MEMBERS_ENV, MULTIPOLYGON_VALIDITY_ENV,
};
use geoshapes_core::{
    ForeignMembers, FromGeoJson, GeoshapesError, MultiPolygon, Point, ValidationOptions,
    ValidityMode,
};
use serde_json::json;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_env() {
    env::remove_var(FOREIGN_MEMBERS_ENV);
    env::remove_var(MULTIPOLYGON_VALIDITY_ENV);
}

#[test]
fn test_default_configuration() {
    let config = LayeredConfig::with_defaults();

    assert_eq!(config.foreign_members.value, ForeignMembers::Ignore);
    assert_eq!(config.foreign_members.source, ConfigSource::Default);
    assert_eq!(config.multipolygon_validity.value, ValidityMode::Lenient);
    assert_eq!(config.multipolygon_validity.source, ConfigSource::Default);
}

#[test]
fn test_partial_file_configuration() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
multipolygon_validity = "Strict"
# foreign_members stays at its default
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.multipolygon_validity.value, ValidityMode::Strict);
    assert_eq!(config.multipolygon_validity.source, ConfigSource::File);
    assert_eq!(config.foreign_members.value, ForeignMembers::Ignore);
    assert_eq!(config.foreign_members.source, ConfigSource::Default);
}

#[test]
fn test_missing_file_is_a_config_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/geoshapes.toml");

    match result {
        Err(GeoshapesError::ConfigInvalid { key, .. }) => assert_eq!(key, "file"),
        other => panic!("expected ConfigInvalid, got {:?}", other),
    }
}

#[test]
fn test_malformed_file_is_a_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "multipolygon_validity = \"Sometimes\"").unwrap();

    let result = LayeredConfig::with_defaults().load_from_file(file.path());
    assert!(matches!(result, Err(GeoshapesError::ConfigInvalid { .. })));
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var(FOREIGN_MEMBERS_ENV, "reject");
    env::set_var(MULTIPOLYGON_VALIDITY_ENV, "lenient");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
foreign_members = "Ignore"
multipolygon_validity = "Strict"
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.foreign_members.value, ForeignMembers::Reject);
    assert_eq!(config.foreign_members.source, ConfigSource::Environment);
    assert_eq!(config.multipolygon_validity.value, ValidityMode::Lenient);
    assert_eq!(config.multipolygon_validity.source, ConfigSource::Environment);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var(FOREIGN_MEMBERS_ENV, "allow");
    env::set_var(MULTIPOLYGON_VALIDITY_ENV, "STRICT");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.foreign_members.value, ForeignMembers::Ignore);
    assert_eq!(config.foreign_members.source, ConfigSource::Default);
    assert_eq!(config.multipolygon_validity.value, ValidityMode::Strict);
    assert_eq!(config.multipolygon_validity.source, ConfigSource::Environment);

    clear_env();
}

#[test]
#[serial]
fn test_overrides_win_over_everything() {
    clear_env();
    env::set_var(MULTIPOLYGON_VALIDITY_ENV, "strict");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "foreign_members = \"Reject\"").unwrap();

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.multipolygon_validity.source, ConfigSource::Environment);

    config.apply_overrides(ConfigOverrides {
        foreign_members: Some(ForeignMembers::Ignore),
        multipolygon_validity: Some(ValidityMode::Lenient),
    });

    assert_eq!(config.foreign_members.value, ForeignMembers::Ignore);
    assert_eq!(config.foreign_members.source, ConfigSource::Override);
    assert_eq!(config.multipolygon_validity.value, ValidityMode::Lenient);
    assert_eq!(config.multipolygon_validity.source, ConfigSource::Override);

    assert!(ConfigSource::Override.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());

    clear_env();
}

#[test]
#[serial]
fn test_loaded_options_drive_validation() {
    clear_env();
    env::set_var(FOREIGN_MEMBERS_ENV, "reject");
    env::set_var(MULTIPOLYGON_VALIDITY_ENV, "strict");

    let options = LayeredConfig::with_defaults().load_from_env().validation_options();
    clear_env();

    assert_eq!(options, ValidationOptions::strict());

    let with_title = json!({"type": "Point", "coordinates": [0, 0], "title": "origin"});
    assert!(Point::from_value(&with_title).is_ok());
    assert!(Point::from_value_with(&with_title, &options).is_err());

    let with_bbox = json!({"type": "Point", "coordinates": [0, 0], "bbox": [0, 0, 0, 0]});
    assert!(Point::from_value_with(&with_bbox, &options).is_ok());

    let open_rings = json!({"type": "MultiPolygon", "coordinates": [[[[0, 0], [1, 0], [1, 1]]]]});
    assert!(MultiPolygon::from_value(&open_rings).is_ok());
    assert!(MultiPolygon::from_value_with(&open_rings, &options).is_err());
}

#[test]
fn test_configuration_source_tracking() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "foreign_members = \"Reject\"").unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();
    let inspection_map = config.to_inspection_map();

    let (policy, policy_source) = &inspection_map["foreign_members"];
    assert_eq!(policy, "Reject");
    assert_eq!(*policy_source, ConfigSource::File);

    let (validity, validity_source) = &inspection_map["multipolygon_validity"];
    assert_eq!(validity, "Lenient");
    assert_eq!(*validity_source, ConfigSource::Default);
}

#[test]
fn test_parse_variations() {
    assert_eq!(parse_foreign_members("Ignore").unwrap(), ForeignMembers::Ignore);
    assert_eq!(parse_foreign_members("reject").unwrap(), ForeignMembers::Reject);
    assert!(parse_foreign_members("").is_err());

    assert_eq!(parse_validity_mode("Strict").unwrap(), ValidityMode::Strict);
    assert_eq!(parse_validity_mode("lenient").unwrap(), ValidityMode::Lenient);
    assert!(parse_validity_mode("loose").is_err());
}
