//! The ordered guard set.
//!
//! Each guard is a pure predicate over normalized values: no I/O, no state
//! retained between calls, never raises. Worst case for malformed input is a
//! failed match (a false negative), which is exactly why the CRITICAL guard
//! runs first and why normalization always runs before matching.

use crate::catalog;
use crate::config::GateConfig;
use crate::normalize::normalize_bounded;
use crate::request::Request;
use crate::signal::{GuardId, Signal};
use crate::walk::walk_bounded;

/// Run one guard against a request. Dispatch is exhaustive over the closed
/// [`GuardId`] enumeration.
pub(crate) fn check(guard: GuardId, request: &Request, config: &GateConfig) -> Signal {
    match guard {
        GuardId::Critical => check_critical(request, config),
        GuardId::Source => check_source(request),
        GuardId::Boundary => check_boundary(request, config),
        GuardId::Action => check_action(request, config),
    }
}

/// Every content value plus the request's own field values, normalized.
fn normalized_values<'a>(
    request: &'a Request,
    config: &'a GateConfig,
) -> impl Iterator<Item = String> + 'a {
    walk_bounded(&request.content, config.max_walk_depth)
        .map(|w| w.text)
        .chain(request.source.tool.clone())
        .chain(std::iter::once(request.source.origin.clone()))
        .map(move |text| normalize_bounded(&text, config.max_decode_rounds))
}

/// Content values only, normalized.
fn normalized_content<'a>(
    request: &'a Request,
    config: &'a GateConfig,
) -> impl Iterator<Item = String> + 'a {
    walk_bounded(&request.content, config.max_walk_depth)
        .map(move |w| normalize_bounded(&w.text, config.max_decode_rounds))
}

/// CRITICAL: destructive operation signatures in any surfaced value,
/// including the tool name and origin themselves.
fn check_critical(request: &Request, config: &GateConfig) -> Signal {
    for value in normalized_values(request, config) {
        if let Some(hit) = catalog::first_match(&catalog::CRITICAL, &value) {
            return Signal::blocked(
                GuardId::Critical,
                hit.label,
                "This could cause irreversible damage. Use safer alternatives.",
            );
        }
    }
    Signal::Flows
}

/// SOURCE: an unverifiable origin never reaches the boundary/action checks
/// with the benefit of the doubt.
fn check_source(request: &Request) -> Signal {
    let origin = request.source.origin.to_lowercase();
    if origin.is_empty() || origin.contains("unknown") {
        return Signal::blocked(
            GuardId::Source,
            "unknown origin",
            "Cannot verify where this request came from. Check the source.",
        );
    }
    Signal::Flows
}

/// Segment-aware prefix check: `/ws/project` contains `/ws/project/src` but
/// not the path-confusable sibling `/ws/project-evil`.
fn within_workspace(path: &str, workspace: &str) -> bool {
    let workspace = workspace.trim_end_matches('/');
    if workspace.is_empty() {
        return false;
    }
    match path.strip_prefix(workspace) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// BOUNDARY: traversal is always-deny - it can escape any declared
/// workspace. Absolute sensitive-root paths are deniable but exempted when
/// they fall inside the workspace; UNC and /proc shapes never are.
fn check_boundary(request: &Request, config: &GateConfig) -> Signal {
    let workspace = request
        .source
        .workspace
        .as_deref()
        .map(|w| normalize_bounded(w, config.max_decode_rounds));

    for value in normalized_content(request, config) {
        if let Some(hit) = catalog::first_match(&catalog::TRAVERSAL, &value) {
            return Signal::blocked(
                GuardId::Boundary,
                hit.label,
                "Path contains a traversal sequence that could escape any workspace. Remove it.",
            );
        }

        if let Some(hit) = catalog::first_match(&catalog::NEVER_EXEMPT_PATH, &value) {
            return Signal::blocked(
                GuardId::Boundary,
                hit.label,
                "This path shape is never permitted, regardless of workspace.",
            );
        }

        if let Some(hit) = catalog::first_match(&catalog::ABSOLUTE_PATH, &value) {
            if let Some(ws) = workspace.as_deref() {
                if within_workspace(&value, ws) {
                    continue;
                }
            }
            return Signal::blocked(
                GuardId::Boundary,
                hit.label,
                "Path is outside the declared workspace. Use relative paths or confirm intent.",
            );
        }
    }
    Signal::Flows
}

/// ACTION: dangerous modification verbs in values (whole-word or compound),
/// the natural-language imperative form, and the invoked tool name.
fn check_action(request: &Request, config: &GateConfig) -> Signal {
    for value in normalized_content(request, config) {
        if let Some(hit) = catalog::first_match(&catalog::ACTION_VERBS, &value) {
            return Signal::blocked(
                GuardId::Action,
                hit.label,
                "This action modifies data. Confirm this is what you intended.",
            );
        }
        if catalog::IMPERATIVE_ACTION.is_match(&value) {
            return Signal::blocked(
                GuardId::Action,
                "dangerous request",
                "Potentially dangerous action in natural language. Verify intent.",
            );
        }
    }

    if let Some(tool) = request.source.tool.as_deref() {
        let tool = normalize_bounded(tool, config.max_decode_rounds).to_lowercase();
        for verb in catalog::DANGEROUS_VERBS {
            if tool.contains(verb) {
                return Signal::blocked(
                    GuardId::Action,
                    *verb,
                    "This tool modifies data. Verify the operation is safe.",
                );
            }
        }
    }
    Signal::Flows
}
