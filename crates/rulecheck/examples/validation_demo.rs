//! Validation demo: individual validators, rule sets, custom bundles

use std::sync::Arc;

use rulecheck::{
    record_from_json, CustomRuleRegistry, DataType, FieldRule, FieldValue, LengthValidator, ListValidator,
    RuleFailure, RuleSet, ValidationRule, Validator,
};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rulecheck=debug".into()),
        )
        .init();

    println!("🦀 rulecheck Demo");
    println!("=================\n");

    demo_individual_validators();
    demo_rule_sets();
    demo_custom_rules()?;

    println!("✅ All validation demos completed successfully!");
    Ok(())
}

fn demo_individual_validators() {
    println!("📝 Demo 1: Individual Validators");
    println!("---------------------------------");

    let length = LengthValidator::new(Some(3.0), Some(10.0));
    for name in ["Al", "Alice"] {
        match length.validate(&FieldValue::from(name), "name") {
            Ok(()) => println!("  ✅ '{}' has a valid length", name),
            Err(RuleFailure::Invalid(error)) => println!("  ❌ {}", error.message),
            Err(RuleFailure::Config(error)) => println!("  ⚠️ rule error: {}", error),
        }
    }

    let roles = ListValidator::new(vec!["user".into(), "admin".into()]);
    match roles.validate(&FieldValue::from("root"), "role") {
        Ok(()) => println!("  ❌ 'root' should not be accepted"),
        Err(RuleFailure::Invalid(error)) => println!("  ✅ rejected: {}", error.message),
        Err(RuleFailure::Config(error)) => println!("  ⚠️ rule error: {}", error),
    }
    println!();
}

fn demo_rule_sets() {
    println!("📋 Demo 2: Rule Sets");
    println!("--------------------");

    let rules = RuleSet::new()
        .field("name", FieldRule::new().required(true).data_type(DataType::String).len(2, 50))
        .field("age", FieldRule::new().data_type(DataType::Number).range(18, 65))
        .field(
            "status",
            FieldRule::new()
                .list(["active", "inactive"])
                .message("list", "{field} must be one of {list}"),
        );

    let validator = Validator::default();
    let records = [
        json!({"name": "Ann", "age": 30, "status": "active"}),
        json!({"name": "Ann", "age": 15}),
        json!({"age": 40}),
        json!({"name": "Ann", "status": "archived"}),
    ];

    for record in &records {
        let fields = record_from_json(record).unwrap_or_default();
        let outcome = validator.validate(&fields, &rules, None);
        println!("  {} -> {}", record, outcome);
    }
    println!();
}

fn demo_custom_rules() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔧 Demo 3: Custom Rule Bundles");
    println!("------------------------------");

    let registry = CustomRuleRegistry::from_yaml_str(
        r#"
postcode:
  dataType: string
  regex: "^\\d{5}$"
  message:
    regex: "{value} is not a valid {field}"
"#,
    )?;
    let validator = Validator::new(Arc::new(registry));

    let rules = json!({"zip": {"custom": "postcode", "required": true}});
    let allowed = json!(["zip"]);

    let records = [
        json!({"zip": "12345"}),
        json!({"zip": "1234a"}),
        json!({}),
        json!({"zip": "12345", "extra": 1}),
    ];

    for record in records {
        let outcome = validator.validate_json(&record, &rules, Some(&allowed));
        println!("  {} -> {}", record, outcome);
    }
    println!();
    Ok(())
}
