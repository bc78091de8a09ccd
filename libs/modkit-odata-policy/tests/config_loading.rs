use figment::{
    Figment,
    providers::{Format, Serialized, Yaml},
};
use modkit_odata_policy::{
    AllowedFunctions, AllowedLogicalOperators, AllowedQueryOptions, ConfigError, PolicyError,
    QueryOptionsConfig, QueryRequest, QueryValidator, ValidationError,
};

const CONFIG: &str = r#"
query_options:
  defaults:
    max_top: 500
  resources:
    orders:
      defaults:
        filter: 50
      operations:
        list:
          query_options: "SELECT | COUNT"
          top: 100
          skip: 0
          any_all: 2
          order_by:
            max_node_count: 2
            properties: ["Name", "Id"]
          functions: "CONTAINS | STARTS_WITH"
          logical_operators: "AND | EQUAL"
        get:
          expand: 3
"#;

fn load() -> QueryOptionsConfig {
    let figment = Figment::new().merge(Yaml::string(CONFIG));
    QueryOptionsConfig::from_figment(&figment).unwrap()
}

#[test]
fn yaml_config_builds_expected_policy() {
    let cfg = load();
    assert_eq!(cfg.defaults.max_top, 500);

    let policy = cfg.build_registry().unwrap().freeze();

    let list = policy.settings_for("orders", "list").unwrap();
    assert_eq!(
        list.allowed_query_options,
        AllowedQueryOptions::SELECT
            | AllowedQueryOptions::COUNT
            | AllowedQueryOptions::TOP
            | AllowedQueryOptions::SKIP
            | AllowedQueryOptions::FILTER
            | AllowedQueryOptions::ORDER_BY
    );
    assert_eq!(list.max_top, Some(100));
    assert_eq!(list.max_skip, None);
    assert_eq!(list.max_any_all_expression_depth, Some(2));
    assert_eq!(list.max_order_by_node_count, Some(2));
    assert_eq!(list.allowed_order_by_properties, ["Name", "Id"]);
    assert_eq!(
        list.allowed_functions,
        AllowedFunctions::CONTAINS
            | AllowedFunctions::STARTS_WITH
            | AllowedFunctions::ANY
            | AllowedFunctions::ALL
    );
    assert_eq!(
        list.allowed_logical_operators,
        AllowedLogicalOperators::AND | AllowedLogicalOperators::EQUAL
    );

    let get = policy.settings_for("orders", "get").unwrap();
    assert_eq!(get.allowed_query_options, AllowedQueryOptions::EXPAND);
    assert_eq!(get.max_expansion_depth, Some(3));

    let fallback = policy.settings_for("orders", "count").unwrap();
    assert_eq!(fallback.allowed_query_options, AllowedQueryOptions::FILTER);
    assert_eq!(fallback.max_node_count, Some(50));
}

#[test]
fn yaml_config_drives_validation() {
    let cfg = load();
    let validator = QueryValidator::new(cfg.defaults.clone());
    let policy = cfg.build_registry().unwrap().freeze();
    let list = policy.settings_for("orders", "list").unwrap();

    let ok = QueryRequest::new()
        .with_top(100)
        .with_filter(12)
        .with_functions(AllowedFunctions::CONTAINS)
        .with_logical_operators(AllowedLogicalOperators::AND)
        .with_order_by(["Name"]);
    assert_eq!(validator.validate(list, &ok), Ok(()));

    assert!(matches!(
        validator.validate(list, &QueryRequest::new().with_top(101)),
        Err(ValidationError::LimitExceeded { limit: "$top", .. })
    ));
    assert_eq!(
        validator.validate(list, &QueryRequest::new().with_expand(1)),
        Err(ValidationError::QueryOptionNotAllowed("EXPAND".to_owned()))
    );
    assert_eq!(
        validator.validate(list, &QueryRequest::new().with_order_by(["Total"])),
        Err(ValidationError::OrderByPropertyNotAllowed("Total".to_owned()))
    );
}

#[test]
fn later_providers_override_earlier_ones() {
    let figment = Figment::new()
        .merge(Yaml::string(CONFIG))
        .merge(Serialized::default("query_options.defaults.max_top", 25));

    let cfg = QueryOptionsConfig::from_figment(&figment).unwrap();
    assert_eq!(cfg.defaults.max_top, 25);
}

#[test]
fn negative_limit_aborts_with_location() {
    let yaml = r"
query_options:
  resources:
    orders:
      operations:
        list:
          expand: -2
";
    let figment = Figment::new().merge(Yaml::string(yaml));
    let cfg = QueryOptionsConfig::from_figment(&figment).unwrap();

    let err = cfg.build_registry().unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid query options for 'orders/list': invalid argument 'max_depth': must be non-negative, got -2"
    );
    assert!(matches!(
        err,
        ConfigError::Policy {
            source: PolicyError::InvalidArgument { .. },
            ..
        }
    ));
}

#[test]
fn unknown_flag_name_is_a_config_error() {
    let yaml = r#"
query_options:
  resources:
    orders:
      operations:
        list:
          query_options: "FILTER | SORT"
"#;
    let figment = Figment::new().merge(Yaml::string(yaml));
    assert!(matches!(
        QueryOptionsConfig::from_figment(&figment),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn zero_limit_means_default_in_both_config_forms() {
    let yaml = r#"
query_options:
  resources:
    orders:
      operations:
        by_builder:
          top: 0
        by_settings:
          use_settings:
            allowed_query_options: "TOP"
            max_top: 0
"#;
    let figment = Figment::new().merge(Yaml::string(yaml));
    let policy = QueryOptionsConfig::from_figment(&figment)
        .unwrap()
        .build_registry()
        .unwrap()
        .freeze();
    let validator = QueryValidator::default();
    let request = QueryRequest::new().with_top(1);

    for operation in ["by_builder", "by_settings"] {
        let settings = policy.settings_for("orders", operation).unwrap();
        assert_eq!(settings.max_top, None, "{operation}");
        assert_eq!(validator.validate(settings, &request), Ok(()), "{operation}");
    }
}
