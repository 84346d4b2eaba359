//! Deterministic rendering of directives into store command lines
//!
//! For each registry operation: base verb, positional arguments where the
//! descriptor declares them, `--flag value` pairs for every present
//! optional, free-text strings double-quoted and task IDs bare. Absent
//! optionals and explicit nulls are omitted entirely.

use crate::core::error::{PilotError, Result};
use crate::directive::Directive;
use crate::ops::registry::{OperationDescriptor, RenderStyle, ValueRole};
use serde_json::Value;

/// Render a reconciled, resolved directive into a single command line
pub fn render(bin: &str, directive: &Directive, descriptor: &OperationDescriptor) -> Result<String> {
    let mut parts: Vec<String> = vec![bin.to_string()];
    if !descriptor.verb.is_empty() {
        parts.push(descriptor.verb.to_string());
    }

    for param in descriptor.params {
        let value = match directive.parameters.get(param.name) {
            Some(Value::Null) | None => {
                if param.required {
                    return Err(PilotError::ExternalCommandFailure(format!(
                        "cannot render {}: required parameter {} absent",
                        descriptor.name, param.name
                    )));
                }
                continue;
            }
            Some(v) => v,
        };

        match param.render {
            // Task IDs go to the store bare; only free text is quoted
            RenderStyle::Positional if param.role == ValueRole::TaskRef => {
                parts.push(bare_scalar(value)?)
            }
            RenderStyle::Positional => parts.push(quoted_scalar(value)?),
            RenderStyle::PositionalList => parts.extend(bare_list(value)?),
            RenderStyle::Flag => {
                parts.push(flag_name(param.name));
                parts.push(quoted_scalar(value)?);
            }
            RenderStyle::MultiFlag => {
                let items = bare_list(value)?;
                if !items.is_empty() {
                    parts.push(flag_name(param.name));
                    parts.extend(items);
                }
            }
            RenderStyle::Switch => {
                if value.as_bool().unwrap_or(false) {
                    parts.push(flag_name(param.name));
                }
            }
        }
    }

    Ok(parts.join(" "))
}

fn flag_name(param: &str) -> String {
    format!("--{}", param.replace('_', "-"))
}

/// Scalar value, strings double-quoted
fn quoted_scalar(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(format!("\"{}\"", s.replace('"', "\\\""))),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(PilotError::ExternalCommandFailure(format!(
            "unrenderable argument value: {}",
            other
        ))),
    }
}

fn bare_scalar(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(PilotError::ExternalCommandFailure(format!(
            "unrenderable argument value: {}",
            other
        ))),
    }
}

/// List of bare items (task IDs); a lone scalar counts as a one-item list
fn bare_list(value: &Value) -> Result<Vec<String>> {
    let items = match value {
        Value::Array(items) => items.iter().collect(),
        scalar => vec![scalar],
    };
    items
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(PilotError::ExternalCommandFailure(format!(
                "unrenderable list item: {}",
                other
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::registry;
    use serde_json::json;

    fn directive(operation: &str, params: &[(&str, Value)]) -> (Directive, &'static OperationDescriptor) {
        let directive = Directive {
            operation: operation.into(),
            parameters: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            rationale: String::new(),
            needs_confirmation: None,
        };
        (directive, registry::lookup(operation).unwrap())
    }

    #[test]
    fn test_render_add_full() {
        let (d, desc) = directive(
            "add",
            &[
                ("title", json!("Elden Ring")),
                ("context", json!("games")),
                ("priority", json!(5)),
                ("deadline", json!("2025-03-15")),
                ("front", json!(true)),
            ],
        );
        assert_eq!(
            render("todo", &d, desc).unwrap(),
            "todo add \"Elden Ring\" --deadline \"2025-03-15\" --context \"games\" --priority 5 --front"
        );
    }

    #[test]
    fn test_render_rm_ids() {
        let (d, desc) = directive("rm", &[("ids", json!(["1", "b"]))]);
        assert_eq!(render("todo", &d, desc).unwrap(), "todo rm 1 b");
    }

    #[test]
    fn test_render_lone_id_as_list() {
        let (d, desc) = directive("done", &[("ids", json!("3"))]);
        assert_eq!(render("todo", &d, desc).unwrap(), "todo done 3");
    }

    #[test]
    fn test_render_skips_null_optionals() {
        let (d, desc) = directive(
            "add",
            &[("title", json!("x")), ("deadline", json!(null))],
        );
        assert_eq!(render("todo", &d, desc).unwrap(), "todo add \"x\"");
    }

    #[test]
    fn test_render_switch_false_omitted() {
        let (d, desc) = directive("purge", &[("force", json!(false))]);
        assert_eq!(render("todo", &d, desc).unwrap(), "todo purge");
    }

    #[test]
    fn test_render_mv_positionals_in_order() {
        let (d, desc) = directive(
            "mv",
            &[("destination", json!("best_games")), ("source", json!("games"))],
        );
        assert_eq!(
            render("todo", &d, desc).unwrap(),
            "todo mv \"games\" \"best_games\""
        );
    }

    #[test]
    fn test_render_multi_flag() {
        let (d, desc) = directive(
            "task",
            &[("id", json!("4")), ("depends_on", json!(["1", "2"]))],
        );
        assert_eq!(
            render("todo", &d, desc).unwrap(),
            "todo task 4 --depends-on 1 2"
        );
    }

    #[test]
    fn test_render_task_ref_positional_unquoted() {
        let (d, desc) = directive("task", &[("id", json!("4")), ("priority", json!(2))]);
        assert_eq!(render("todo", &d, desc).unwrap(), "todo task 4 --priority 2");
    }

    #[test]
    fn test_render_bare_listing() {
        let (d, desc) = directive("list", &[]);
        assert_eq!(render("todo", &d, desc).unwrap(), "todo");
    }

    #[test]
    fn test_render_location_flag_verb() {
        let (d, desc) = directive("location", &[]);
        assert_eq!(render("todo", &d, desc).unwrap(), "todo --location");
    }

    #[test]
    fn test_render_missing_required_is_error() {
        let (d, desc) = directive("add", &[]);
        assert!(render("todo", &d, desc).is_err());
    }

    #[test]
    fn test_render_escapes_embedded_quotes() {
        let (d, desc) = directive("add", &[("title", json!("say \"hi\""))]);
        assert_eq!(
            render("todo", &d, desc).unwrap(),
            "todo add \"say \\\"hi\\\"\""
        );
    }
}
