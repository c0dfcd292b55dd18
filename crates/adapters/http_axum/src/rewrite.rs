//! Path rewriting applied before routing.
//!
//! A rule maps a pattern to a target: each `*` in `from` captures a run of
//! characters, and `$1`, `$2`, … in `to` are replaced by the captures. The
//! request query string is kept, appended to any query the target already
//! carries. Requests matching no rule pass unchanged.

use axum::extract::Request;
use axum::http::Uri;
use axum::http::uri::PathAndQuery;
use serde::Deserialize;

/// One `from → to` rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RewriteRule {
    pub from: String,
    pub to: String,
}

impl RewriteRule {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// `/api/* → /$1`: serve every route under the `/api` prefix.
    #[must_use]
    pub fn api_prefix() -> Self {
        Self::new("/api/*", "/$1")
    }

    /// Rewrite `path`, or `None` when the rule does not match.
    #[must_use]
    pub fn apply(&self, path: &str) -> Option<String> {
        let captures = capture(&self.from, path)?;
        Some(substitute(&self.to, &captures))
    }
}

/// Rewrite `path` with the first matching rule.
#[must_use]
pub fn rewrite_path(rules: &[RewriteRule], path: &str) -> Option<String> {
    rules.iter().find_map(|rule| rule.apply(path))
}

/// Rewrite the URI of `request` in place.
pub fn rewrite_request(rules: &[RewriteRule], mut request: Request) -> Request {
    let Some(path) = rewrite_path(rules, request.uri().path()) else {
        return request;
    };
    let target = match request.uri().query() {
        Some(query) if path.contains('?') => format!("{path}&{query}"),
        Some(query) => format!("{path}?{query}"),
        None => path,
    };
    match rebuild(request.uri(), &target) {
        Some(uri) => {
            tracing::trace!(from = %request.uri(), to = %uri, "request rewritten");
            *request.uri_mut() = uri;
        }
        None => tracing::warn!(path = %target, "rewritten path is not a valid URI"),
    }
    request
}

fn rebuild(uri: &Uri, path_and_query: &str) -> Option<Uri> {
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}

fn capture<'a>(pattern: &str, path: &'a str) -> Option<Vec<&'a str>> {
    let mut literals = pattern.split('*');
    let head = literals.next().unwrap_or_default();
    let mut rest = path.strip_prefix(head)?;
    let literals: Vec<&str> = literals.collect();
    if literals.is_empty() {
        return rest.is_empty().then(Vec::new);
    }

    let mut captures = Vec::with_capacity(literals.len());
    for (index, literal) in literals.iter().enumerate() {
        if index + 1 == literals.len() {
            let end = rest.strip_suffix(literal)?.len();
            captures.push(&rest[..end]);
            rest = "";
        } else {
            let at = rest.find(literal)?;
            captures.push(&rest[..at]);
            rest = &rest[at + literal.len()..];
        }
    }
    Some(captures)
}

fn substitute(template: &str, captures: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let mut digits = String::new();
        while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
            digits.push(*d);
            chars.next();
        }
        match digits.parse::<usize>() {
            Ok(n) if n >= 1 => out.push_str(captures.get(n - 1).copied().unwrap_or_default()),
            _ => {
                out.push('$');
                out.push_str(&digits);
            }
        }
    }
    out
}
