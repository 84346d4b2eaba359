//! Prompt assembly for the directive-planning request
//!
//! The system prompt spells out the operation vocabulary (generated from
//! the registry so prompt and validator can never drift apart), the
//! sentinel contract, and a few worked examples. The user prompt couples
//! the request with the current task listing so the model can ground its
//! references.

use crate::ops::registry;
use std::fmt::Write;

/// Build the system prompt for a planning request
pub fn system_prompt() -> String {
    let mut vocabulary = String::new();
    for op in registry::all() {
        let params: Vec<String> = op
            .params
            .iter()
            .map(|p| {
                if p.required {
                    format!("{} (required)", p.name)
                } else {
                    p.name.to_string()
                }
            })
            .collect();
        let _ = writeln!(
            vocabulary,
            "- {}: {}{}",
            op.name,
            if params.is_empty() {
                "no parameters".to_string()
            } else {
                params.join(", ")
            },
            if op.destructive { " [destructive]" } else { "" }
        );
    }

    format!(
        r#"You are a task-management assistant driving the `todo` command-line tool.
Translate the user's request into zero or more operations from this fixed vocabulary:

{vocabulary}
Rules:
- Respond with prose if you like, but place the machine-readable plan exactly once
  between the markers <JSON> and <JSON/>.
- The plan is a JSON array of objects: {{"operation": ..., "parameters": {{...}},
  "rationale": "...", "needs_confirmation": true|false}}.
- Refer to tasks by their title as the user said it, or by ID if you know it.
  Never invent IDs.
- Use lowercase true/false/null and dates as YYYY-MM-DD.
- Set needs_confirmation to true for anything that deletes or merges data.
- If the request needs no operation, emit an empty array.

Example:
USER: can you remove elden ring from my list and add sekiro to my games wish list?
<JSON>
[
  {{"operation": "rm", "parameters": {{"ids": ["elden ring"]}},
   "rationale": "user asked to remove Elden Ring", "needs_confirmation": true}},
  {{"operation": "add", "parameters": {{"title": "sekiro", "context": "games_wishlist"}},
   "rationale": "user asked to add Sekiro"}}
]
<JSON/>
"#
    )
}

/// Build the user prompt: the request plus the current task listing
pub fn user_prompt(input: &str, listing: &str) -> String {
    let listing = if listing.trim().is_empty() {
        "(no tasks)"
    } else {
        listing.trim()
    };
    format!("CURRENT TASKS:\n{}\n\nUSER: {}\n", listing, input)
}
