// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search parameter normalization
//!
//! Every outgoing request carries a [`SearchParams`] built here. The same
//! ordered list is serialized for URL-length measurement, for signing and for
//! transmission, so the three always agree byte-for-byte.

use url::form_urlencoded;

/// Forced response format, sent on every select and ping
pub const RESPONSE_WRITER: &str = "json";

/// Forced named-list layout for select responses
pub const JSON_NAMED_LIST: &str = "json";

/// Query parser used when the caller does not choose one
pub const DEFAULT_DEF_TYPE: &str = "edismax";

/// Match-all query used when the caller sends no `q`
pub const DEFAULT_QUERY: &str = "*:*";

/// Default page size
pub const DEFAULT_ROWS: u32 = 10;

/// Default page offset
pub const DEFAULT_START: u32 = 0;

/// Ordered multimap of search parameters
///
/// Insertion order is preserved and is the canonical serialization order.
/// Keys may repeat (Solr multi-valued parameters such as `fq`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Set `key` to a single value
    ///
    /// An existing key keeps its position; any repeated occurrences are removed.
    /// A new key is appended.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();

        match self.pairs.iter().position(|(k, _)| *k == key) {
            Some(index) => {
                self.pairs[index].1 = value;
                let mut seen = false;
                self.pairs.retain(|(k, _)| {
                    if *k != key {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.pairs.push((key, value)),
        }
    }

    /// Append `key=value` only when `key` is not present yet
    pub fn set_default(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        if !self.contains(&key) {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append another value for `key`, keeping existing ones
    pub fn append(&mut self, key: impl Into<String>, value: impl ToString) {
        self.pairs.push((key.into(), value.to_string()));
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values for `key`, in order
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `key` is present
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Number of key/value pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no pairs
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as `application/x-www-form-urlencoded`, in canonical order
    ///
    /// This string is used verbatim as the GET query string or the POST body.
    pub fn to_form_encoded(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for SearchParams
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = SearchParams::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}

/// Caller input for a select: a bare query string or a structured parameter set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    /// Sent as `q`
    Text(String),
    /// Used as the starting parameter set
    Params(SearchParams),
}

impl From<&str> for QueryInput {
    fn from(query: &str) -> Self {
        QueryInput::Text(query.to_string())
    }
}

impl From<String> for QueryInput {
    fn from(query: String) -> Self {
        QueryInput::Text(query)
    }
}

impl From<SearchParams> for QueryInput {
    fn from(params: SearchParams) -> Self {
        QueryInput::Params(params)
    }
}

impl Default for QueryInput {
    fn default() -> Self {
        QueryInput::Params(SearchParams::new())
    }
}

/// Canonical parameters for a select request
///
/// `wt` and `json.nl` are forced; `defType`, `q`, `rows` and `start` are only
/// filled in when the caller left them out. Values are not validated.
pub fn normalize_select(input: QueryInput) -> SearchParams {
    let mut params = match input {
        QueryInput::Text(query) => SearchParams::new().with("q", query),
        QueryInput::Params(params) => params,
    };

    params.set("wt", RESPONSE_WRITER);
    params.set("json.nl", JSON_NAMED_LIST);

    params.set_default("defType", DEFAULT_DEF_TYPE);
    params.set_default("q", DEFAULT_QUERY);
    params.set_default("rows", DEFAULT_ROWS);
    params.set_default("start", DEFAULT_START);

    params
}

/// Canonical parameters for a ping request: only `wt` is defaulted
pub fn normalize_ping(mut params: SearchParams) -> SearchParams {
    params.set_default("wt", RESPONSE_WRITER);
    params
}
