// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Path templates and URL resolution
//!
//! Only the resource path goes through template expansion. Search parameters
//! are encoded separately by [`SearchParams::to_form_encoded`], so Solr local
//! params such as `{!tag=x}` are never mistaken for template expressions.

use url::{form_urlencoded, Url};

use super::params::SearchParams;
use super::types::{Result, SearchError};

/// Select handler path template
pub const SELECT_TEMPLATE: &str = "{+base_path}/select";

/// Ping handler path template
pub const PING_TEMPLATE: &str = "{+base_path}/admin/ping";

/// Expand `{name}` and `{+name}` expressions in a path template
///
/// `{+name}` inserts the value verbatim (reserved expansion); `{name}`
/// percent-encodes it. Unknown variables and unterminated expressions are
/// configuration errors.
pub fn expand_template(template: &str, vars: &[(&str, &str)]) -> Result<String> {
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        expanded.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            SearchError::configuration(format!("unterminated expression in template '{}'", template))
        })?;

        let expression = &after[..close];
        let (reserved, name) = match expression.strip_prefix('+') {
            Some(name) => (true, name),
            None => (false, expression),
        };

        let value = vars
            .iter()
            .find(|(var, _)| *var == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| {
                SearchError::configuration(format!(
                    "template variable '{}' is not defined",
                    name
                ))
            })?;

        if reserved {
            expanded.push_str(value);
        } else {
            expanded.extend(form_urlencoded::byte_serialize(value.as_bytes()));
        }

        rest = &after[close + 1..];
    }

    expanded.push_str(rest);
    Ok(expanded)
}

/// Resolve `resource_path` against `base_url`, optionally attaching `params`
/// as the query string
///
/// An absolute resource path replaces any path on the base URL. The query
/// string is exactly [`SearchParams::to_form_encoded`]; an empty parameter set
/// produces no `?`.
pub fn resolve_url(base_url: &Url, resource_path: &str, params: Option<&SearchParams>) -> Result<Url> {
    let mut url = base_url.join(resource_path).map_err(|e| {
        SearchError::configuration(format!(
            "cannot resolve '{}' against '{}': {}",
            resource_path, base_url, e
        ))
    })?;

    url.set_query(None);
    url.set_fragment(None);

    if let Some(params) = params {
        if !params.is_empty() {
            url.set_query(Some(&params.to_form_encoded()));
        }
    }

    Ok(url)
}

/// Default base path for an index: `/solr/{index_id}`
pub fn default_base_path(index_id: &str) -> String {
    format!("/solr/{}", index_id)
}
