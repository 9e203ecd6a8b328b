//! The state document embedded in each rendered shell.
//!
//! The document lives in `<script type="application/json" id="atrium-state">`.
//! Clients read it through `window.atrium.state()`; Rust code (tests, crawlers)
//! reads it with [`EmbeddedState::extract`].

use std::collections::BTreeMap;

use atrium_core::{Params, StatePayload};
use serde::{Deserialize, Serialize};

use crate::error::{ViewError, ViewResult};

/// Element id of the embedded state script.
pub const STATE_ELEMENT_ID: &str = "atrium-state";

const STATE_OPEN_TAG: &str = r#"<script type="application/json" id="atrium-state">"#;
const SCRIPT_CLOSE_TAG: &str = "</script>";

/// Everything the client needs to mount the resolved component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedState {
    /// Component to mount.
    pub component: String,
    /// Output of the state function.
    pub state: StatePayload,
    /// Matched path parameters.
    pub path_params: BTreeMap<String, String>,
    /// Query string parameters.
    pub query_params: BTreeMap<String, String>,
}

impl EmbeddedState {
    /// Assembles the document for one render.
    pub fn new(
        component: impl Into<String>,
        state: StatePayload,
        path_params: &Params,
        query_params: &Params,
    ) -> Self {
        Self {
            component: component.into(),
            state,
            path_params: to_map(path_params),
            query_params: to_map(query_params),
        }
    }

    /// Returns a path parameter.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Returns a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Serializes to JSON that is safe inside a `<script>` element.
    pub fn to_script_json(&self) -> ViewResult<String> {
        let json = serde_json::to_string(self)?;
        Ok(escape_script_json(&json))
    }

    /// Renders the full `<script>` element.
    pub fn to_script_element(&self) -> ViewResult<String> {
        Ok(format!(
            "{STATE_OPEN_TAG}{}{SCRIPT_CLOSE_TAG}",
            self.to_script_json()?
        ))
    }

    /// Reads the embedded document back out of a rendered shell.
    ///
    /// # Example
    ///
    /// ```
    /// use atrium_core::{Params, StatePayload};
    /// use atrium_view::EmbeddedState;
    ///
    /// let state = StatePayload::new().with("currentUser", "dave");
    /// let embedded = EmbeddedState::new("home", state, &Params::new(), &Params::new());
    /// let html = format!("<body>{}</body>", embedded.to_script_element().unwrap());
    ///
    /// assert_eq!(EmbeddedState::extract(&html).unwrap(), embedded);
    /// ```
    pub fn extract(html: &str) -> ViewResult<Self> {
        let start = html
            .find(STATE_OPEN_TAG)
            .ok_or(ViewError::MissingEmbeddedState)?
            + STATE_OPEN_TAG.len();
        let len = html[start..]
            .find(SCRIPT_CLOSE_TAG)
            .ok_or(ViewError::MissingEmbeddedState)?;
        Ok(serde_json::from_str(&html[start..start + len])?)
    }
}

fn to_map(params: &Params) -> BTreeMap<String, String> {
    params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Escapes serialized JSON so it cannot terminate or confuse a script element.
///
/// `<`, `>` and `&` can only occur inside JSON strings, so replacing them with
/// `\uXXXX` escapes keeps the document equivalent. U+2028 and U+2029 are
/// escaped for older JavaScript parsers.
pub fn escape_script_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_current_user_round_trip() {
        let state = StatePayload::new().with("currentUser", "dave");
        let embedded = EmbeddedState::new("user-list", state, &Params::new(), &Params::new());
        let html = embedded.to_script_element().unwrap();

        let parsed = EmbeddedState::extract(&html).unwrap();
        assert_eq!(
            serde_json::to_value(&parsed.state).unwrap(),
            json!({"currentUser": "dave"})
        );
    }

    #[test]
    fn test_params_are_embedded() {
        let embedded = EmbeddedState::new(
            "user-profile",
            StatePayload::new(),
            &params(&[("user-id", "2")]),
            &params(&[("tab", "posts")]),
        );
        let parsed = EmbeddedState::extract(&embedded.to_script_element().unwrap()).unwrap();
        assert_eq!(parsed.path_param("user-id"), Some("2"));
        assert_eq!(parsed.query_param("tab"), Some("posts"));
        assert_eq!(parsed.component, "user-profile");
    }

    #[test]
    fn test_escaping_blocks_script_breakout() {
        let state = StatePayload::new().with("bio", "</script><script>alert(1)</script>");
        let embedded = EmbeddedState::new("x", state.clone(), &Params::new(), &Params::new());
        let json = embedded.to_script_json().unwrap();

        assert!(!json.contains('<'));
        assert!(!json.contains('>'));
        assert!(json.contains("\\u003c/script\\u003e"));
        assert_eq!(EmbeddedState::extract(&embedded.to_script_element().unwrap()).unwrap().state, state);
    }

    #[test]
    fn test_escape_line_separators() {
        assert_eq!(escape_script_json("\"a\u{2028}b\u{2029}\""), "\"a\\u2028b\\u2029\"");
        assert_eq!(escape_script_json("\"a&b\""), "\"a\\u0026b\"");
    }

    #[test]
    fn test_extract_missing() {
        assert!(matches!(
            EmbeddedState::extract("<html></html>"),
            Err(ViewError::MissingEmbeddedState)
        ));
        assert!(matches!(
            EmbeddedState::extract(r#"<script type="application/json" id="atrium-state">{}"#),
            Err(ViewError::MissingEmbeddedState)
        ));
    }

    proptest! {
        #[test]
        fn prop_any_string_survives_embedding(value in any::<String>()) {
            let state = StatePayload::new().with("value", value.clone());
            let embedded = EmbeddedState::new("c", state, &Params::new(), &Params::new());
            let element = embedded.to_script_element().unwrap();

            prop_assert_eq!(element.matches(SCRIPT_CLOSE_TAG).count(), 1);
            let parsed = EmbeddedState::extract(&element).unwrap();
            prop_assert_eq!(parsed.state.get("value").and_then(|v| v.as_str()), Some(value.as_str()));
        }
    }
}
