mod common;

use construct_engine::core::{ConstructLevel, InstanceSpec};
use construct_engine::error::EngineError;
use serde_json::json;

use common::*;

#[test]
fn test_compose_assigns_deterministic_id_and_grid() {
    let catalog = api_and_database_catalog();
    let composition = fixed_composer()
        .compose(
            "My Web App",
            vec![
                InstanceSpec::new("aws-l1-api", "api").connect("db", "sync"),
                InstanceSpec::new("aws-l1-db", "db"),
            ],
            &catalog,
        )
        .unwrap();

    assert_eq!(composition.id, "comp-my-web-app-loyw3v28");
    assert_eq!(composition.instances.len(), 2);
    assert_eq!(composition.instances[0].position.x, 100.0);
    assert_eq!(composition.instances[1].position.x, 400.0);
    assert_eq!(composition.instances[1].position.y, 100.0);
}

#[test]
fn test_compose_keeps_explicit_position() {
    let catalog = api_and_database_catalog();
    let composition = fixed_composer()
        .compose("app", vec![InstanceSpec::new("aws-l1-api", "api").at(5.0, 7.0)], &catalog)
        .unwrap();

    assert_eq!(composition.instances[0].position.x, 5.0);
    assert_eq!(composition.instances[0].position.y, 7.0);
}

#[test]
fn test_compose_fails_on_unknown_construct() {
    let catalog = api_and_database_catalog();
    let err = fixed_composer()
        .compose("app", vec![InstanceSpec::new("gcp-l1-missing", "ghost")], &catalog)
        .unwrap_err();

    match err {
        EngineError::ConstructNotFound {
            construct_id,
            instance_name,
        } => {
            assert_eq!(construct_id, "gcp-l1-missing");
            assert_eq!(instance_name, "ghost");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_simple_composition_is_valid() {
    let catalog = api_and_database_catalog();
    let composer = fixed_composer();
    let composition = composer
        .compose(
            "app",
            vec![
                InstanceSpec::new("aws-l1-api", "api").connect("db", "sync"),
                InstanceSpec::new("aws-l1-db", "db"),
            ],
            &catalog,
        )
        .unwrap();

    let result = composer.validate(&composition, &catalog);
    assert!(result.valid, "{:?}", result.errors);
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_duplicate_instance_names_reported() {
    let catalog = api_and_database_catalog();
    let composer = fixed_composer();
    let composition = composer
        .compose(
            "app",
            vec![
                InstanceSpec::new("aws-l1-api", "api"),
                InstanceSpec::new("aws-l1-db", "api"),
            ],
            &catalog,
        )
        .unwrap();

    let result = composer.validate(&composition, &catalog);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, "instances[1].instanceName");
}

#[test]
fn test_unknown_target_reported_with_path() {
    let catalog = api_and_database_catalog();
    let composer = fixed_composer();
    let composition = composer
        .compose(
            "app",
            vec![
                InstanceSpec::new("aws-l1-api", "api").connect("db", "sync"),
                InstanceSpec::new("aws-l1-db", "db").connect("cache", "sync"),
            ],
            &catalog,
        )
        .unwrap();

    let result = composer.validate(&composition, &catalog);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].path,
        "instances[1].connections[0].targetInstance"
    );
}

#[test]
fn test_missing_construct_reported_after_catalog_change() {
    let catalog = api_and_database_catalog();
    let composer = fixed_composer();
    let mut composition = composer
        .compose("app", vec![InstanceSpec::new("aws-l1-api", "api")], &catalog)
        .unwrap();
    composition.instances[0].construct_id = "aws-l1-removed".to_string();

    let result = composer.validate(&composition, &catalog);
    assert!(!result.valid);
    assert_eq!(result.errors[0].path, "instances[0].constructId");
}

#[test]
fn test_three_node_cycle_reported_once() {
    let catalog = catalog_of([definition("aws-l1-fn", ConstructLevel::L1, "aws", "compute")]);
    let composer = fixed_composer();
    let composition = composer
        .compose(
            "ring",
            vec![
                InstanceSpec::new("aws-l1-fn", "a").connect("b", "sync"),
                InstanceSpec::new("aws-l1-fn", "b").connect("c", "sync"),
                InstanceSpec::new("aws-l1-fn", "c").connect("a", "sync"),
            ],
            &catalog,
        )
        .unwrap();

    let result = composer.validate(&composition, &catalog);
    assert!(!result.valid);
    let cycle_errors: Vec<_> = result
        .errors
        .iter()
        .filter(|e| e.message.to_lowercase().contains("cycl"))
        .collect();
    assert_eq!(cycle_errors.len(), 1);
    assert_eq!(cycle_errors[0].path, "instances[2].connections[0]");
}

#[test]
fn test_acyclic_subsets_of_cycle_are_valid() {
    let catalog = catalog_of([definition("aws-l1-fn", ConstructLevel::L1, "aws", "compute")]);
    let composer = fixed_composer();
    let edges = [("a", "b"), ("b", "c"), ("c", "a")];

    for skip in 0..edges.len() {
        let specs = ["a", "b", "c"]
            .iter()
            .map(|name| {
                edges
                    .iter()
                    .enumerate()
                    .filter(|(i, (from, _))| *i != skip && from == name)
                    .fold(InstanceSpec::new("aws-l1-fn", *name), |spec, (_, (_, to))| {
                        spec.connect(*to, "sync")
                    })
            })
            .collect();

        let composition = composer.compose("chain", specs, &catalog).unwrap();
        let result = composer.validate(&composition, &catalog);
        assert!(result.valid, "skipping edge {} gave {:?}", skip, result.errors);
    }
}

#[test]
fn test_missing_required_input_reported() {
    let catalog = catalog_of([with_required_input(
        definition("aws-l1-bucket", ConstructLevel::L1, "aws", "storage"),
        "bucketName",
    )]);
    let composer = fixed_composer();

    let missing = composer
        .compose("app", vec![InstanceSpec::new("aws-l1-bucket", "files")], &catalog)
        .unwrap();
    let result = composer.validate(&missing, &catalog);
    assert!(!result.valid);
    assert_eq!(result.errors[0].path, "instances[0].config.bucketName");

    let supplied = composer
        .compose(
            "app",
            vec![InstanceSpec::new("aws-l1-bucket", "files").with_config("bucketName", json!("assets"))],
            &catalog,
        )
        .unwrap();
    assert!(composer.validate(&supplied, &catalog).valid);
}

#[test]
fn test_mixed_levels_and_providers_warn_but_stay_valid() {
    let catalog = catalog_of([
        definition("aws-l0-a", ConstructLevel::L0, "aws", "compute"),
        definition("aws-l1-b", ConstructLevel::L1, "aws", "compute"),
        definition("gcp-l2-c", ConstructLevel::L2, "gcp", "compute"),
    ]);
    let composer = fixed_composer();
    let composition = composer
        .compose(
            "mixed",
            vec![
                InstanceSpec::new("aws-l0-a", "a"),
                InstanceSpec::new("aws-l1-b", "b"),
                InstanceSpec::new("gcp-l2-c", "c"),
            ],
            &catalog,
        )
        .unwrap();

    let result = composer.validate(&composition, &catalog);
    assert!(result.valid);
    assert_eq!(result.warnings.len(), 2);
    assert!(result.warnings.iter().any(|w| w.contains("aws") && w.contains("gcp")));
}

#[test]
fn test_suggestions_for_security_and_cost() {
    let catalog = api_and_database_catalog();
    let composer = fixed_composer();
    let composition = composer
        .compose("app", vec![InstanceSpec::new("aws-l1-api", "api")], &catalog)
        .unwrap();

    let result = composer.validate(&composition, &catalog);
    assert_eq!(result.suggestions.len(), 2);

    let tagged = catalog_of([
        with_tags(
            definition("aws-l1-auth", ConstructLevel::L1, "aws", "security"),
            &["cost-optimized"],
        ),
    ]);
    let composition = composer
        .compose("app", vec![InstanceSpec::new("aws-l1-auth", "auth")], &tagged)
        .unwrap();
    let result = composer.validate(&composition, &tagged);
    assert!(result.suggestions.is_empty(), "{:?}", result.suggestions);
}
