//! End-to-end pipeline tests: parse, index, lint, render.

use oaslint::config::LintConfig;
use oaslint::document::DocumentLocation;
use oaslint::index::{Index, IndexOptions};
use oaslint::lint::{Engine, HumanFormatter, LintFormatter, RuleRegistry, Severity};
use oaslint::resolver::Resolver;

const SAMPLE: &str = r#"openapi: 3.0.3
info:
  title: Example
  description: A worked example
tags:
  - name: users
  - name: auth
servers:
  - url: https://api.example.com/
paths:
  /users:
    post:
      operationId: createUser
      security:
        - api_key: []
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/User'
components:
  securitySchemes:
    api_key:
      type: apiKey
      in: header
      name: X-Api-Key
  schemas:
    User:
      type: object
      additionalProperties: true
      maxProperties: 12
      properties:
        status:
          type: string
          enum:
            - active
            - inactive
            - active
"#;

fn lint(source: &str) -> Vec<String> {
    let resolver = Resolver::new();
    let document = resolver
        .register(DocumentLocation::local("api.yml"), source)
        .unwrap();
    let index = Index::build(&document, &resolver, &IndexOptions::default());
    let registry = RuleRegistry::with_builtins();
    let config = LintConfig::default();
    let diagnostics = Engine::new(&registry, &config).run(&document, &index);
    diagnostics.iter().map(|d| d.to_string()).collect()
}

#[test]
fn identical_input_produces_identical_output() {
    assert_eq!(lint(SAMPLE), lint(SAMPLE));
}

#[test]
fn duplicate_enum_is_reported_at_the_repeating_position() {
    let lines = lint(SAMPLE);
    let line = lines
        .iter()
        .find(|l| l.contains("semantics-duplicate-enum"))
        .expect("duplicate enum diagnostic");
    assert!(line.contains("`active` at position 2 repeats position 0"));
}

#[test]
fn bounded_open_schema_is_not_flagged() {
    let lines = lint(SAMPLE);
    assert!(!lines
        .iter()
        .any(|l| l.contains("security-additional-properties")));
}

#[test]
fn unordered_tags_are_flagged_once() {
    let lines = lint(SAMPLE);
    let hits: Vec<_> = lines
        .iter()
        .filter(|l| l.contains("style-tag-order"))
        .collect();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].contains("`auth` should come before `users`"));
}

#[test]
fn trailing_slash_server_is_flagged() {
    let lines = lint(SAMPLE);
    assert!(lines
        .iter()
        .any(|l| l.contains("style-server-trailing-slash")));
}

#[test]
fn secured_operation_without_401_is_flagged() {
    let lines = lint(SAMPLE);
    assert!(lines
        .iter()
        .any(|l| l.contains("semantics-unauthorized-response")));
}

#[test]
fn referenced_schema_is_not_reported_unused() {
    let lines = lint(SAMPLE);
    assert!(!lines.iter().any(|l| l.contains("`schemas/User`")));
}

#[test]
fn diagnostics_are_sorted_by_position() {
    let resolver = Resolver::new();
    let document = resolver
        .register(DocumentLocation::local("api.yml"), SAMPLE)
        .unwrap();
    let index = Index::build(&document, &resolver, &IndexOptions::default());
    let registry = RuleRegistry::with_builtins();
    let config = LintConfig::default();
    let diagnostics = Engine::new(&registry, &config).run(&document, &index);
    let keys: Vec<_> = diagnostics.iter().map(|d| d.sort_key()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn human_rendering_matches_the_stable_line_shape() {
    let source = concat!(
        "openapi: 3.0.3\n",
        "servers:\n",
        "  - url: https://api.example.com\n",
        "paths:\n",
        "  /users:\n",
        "    post:\n",
        "      operationId: createUser\n",
        "      summary: Create a user\n",
        "      responses:\n",
        "        \"200\":\n",
        "          description: ok\n",
    );
    let resolver = Resolver::new();
    let document = resolver
        .register(DocumentLocation::local("api.yml"), source)
        .unwrap();
    let index = Index::build(&document, &resolver, &IndexOptions::default());
    let registry = RuleRegistry::with_builtins();
    let config = LintConfig::default();
    let diagnostics = Engine::new(&registry, &config).run(&document, &index);

    let mut output = Vec::new();
    HumanFormatter::new(false)
        .format(&diagnostics, &mut output)
        .unwrap();
    let output = String::from_utf8(output).unwrap();
    let tags_line = output
        .lines()
        .find(|l| l.contains("style-operation-tags"))
        .expect("operation tags diagnostic");
    // [line:column] severity rule-id message
    assert!(tags_line.starts_with('['));
    assert!(tags_line.contains("] warning style-operation-tags the `POST` /users is missing tags"));
}

#[test]
fn disabled_rule_is_silent_and_override_is_applied() {
    let resolver = Resolver::new();
    let document = resolver
        .register(DocumentLocation::local("api.yml"), SAMPLE)
        .unwrap();
    let index = Index::build(&document, &resolver, &IndexOptions::default());
    let registry = RuleRegistry::with_builtins();
    let config: LintConfig = serde_yaml::from_str(concat!(
        "severity:\n",
        "  style-tag-order: error\n",
        "disabled:\n",
        "  - semantics-duplicate-enum\n",
    ))
    .unwrap();
    let diagnostics = Engine::new(&registry, &config).run(&document, &index);
    assert!(!diagnostics
        .iter()
        .any(|d| d.rule_id.as_str() == "semantics-duplicate-enum"));
    let tag_order = diagnostics
        .iter()
        .find(|d| d.rule_id.as_str() == "style-tag-order")
        .unwrap();
    assert_eq!(tag_order.severity, Severity::Error);
}
