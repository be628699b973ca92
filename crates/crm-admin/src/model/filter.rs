//! List filters and their URL query encoding.
//!
//! The URL is the durable representation of a [`FilterState`]: `q` carries the search
//! substring and `color` the exact color. A parameter is omitted when its value is empty,
//! so the cleared state encodes to an empty query.

use super::product::Product;
use serde::{Deserialize, Serialize};

pub const SEARCH_PARAM: &str = "q";
pub const COLOR_PARAM: &str = "color";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    /// Case-insensitive title substring.
    pub search: String,
    /// Exact color label.
    pub color: String,
}

impl FilterState {
    pub fn new(search: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            color: color.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.color.is_empty()
    }

    pub fn matches(&self, product: &Product) -> bool {
        let search_ok = self.search.is_empty()
            || product
                .display_title()
                .to_lowercase()
                .contains(&self.search.to_lowercase());
        let color_ok = self.color.is_empty() || product.color.as_deref() == Some(self.color.as_str());
        search_ok && color_ok
    }

    /// Encodes as a query string without the leading `?`.
    pub fn to_query(&self) -> String {
        let mut params = Vec::new();
        if !self.search.is_empty() {
            params.push(format!("{SEARCH_PARAM}={}", encode(&self.search)));
        }
        if !self.color.is_empty() {
            params.push(format!("{COLOR_PARAM}={}", encode(&self.color)));
        }
        params.join("&")
    }

    /// Parses a query string, with or without the leading `?`. Unknown parameters are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut state = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                SEARCH_PARAM => state.search = decode(value),
                COLOR_PARAM => state.color = decode(value),
                _ => {}
            }
        }
        state
    }

    /// `route` plus the encoded query, if any.
    pub fn location(&self, route: &str) -> String {
        let query = self.to_query();
        if query.is_empty() {
            route.to_string()
        } else {
            format!("{route}?{query}")
        }
    }
}

fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Form-style decoding: `+` is a space; malformed escapes pass through unchanged.
fn decode(value: &str) -> String {
    let spaced = value.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_omitted() {
        assert_eq!(FilterState::default().to_query(), "");
        assert_eq!(FilterState::new("", "blue").to_query(), "color=blue");
        assert_eq!(FilterState::new("mug", "").location("/inventory"), "/inventory?q=mug");
        assert_eq!(FilterState::default().location("/inventory"), "/inventory");
    }

    #[test]
    fn test_reserved_characters_survive_the_url() {
        let state = FilterState::new("caf\u{e9} & tea", "navy/blue");

        let query = state.to_query();
        assert_eq!(query, "q=caf%C3%A9%20%26%20tea&color=navy%2Fblue");
        assert_eq!(FilterState::from_query(&query), state);
    }

    #[test]
    fn test_from_query_tolerates_noise() {
        let state = FilterState::from_query("?page=2&q=red+mug&color=&x");
        assert_eq!(state, FilterState::new("red mug", ""));

        assert_eq!(FilterState::from_query("q=100%"), FilterState::new("100%", ""));
        assert_eq!(FilterState::from_query("q=1%2B1"), FilterState::new("1+1", ""));
    }

    #[test]
    fn test_matches_is_case_insensitive_on_title_exact_on_color() {
        let mug = Product::new(1, "Blue Mug").with_color("blue");

        assert!(FilterState::new("mug", "").matches(&mug));
        assert!(FilterState::new("MUG", "blue").matches(&mug));
        assert!(!FilterState::new("", "Blue").matches(&mug));
        assert!(!FilterState::new("cap", "").matches(&mug));
    }
}
