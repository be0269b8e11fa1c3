//! Query-parameter translation for the simplified gateway surface.
//!
//! # Responsibilities
//! - Split `scenario:session` references the way the legacy surface expects
//! - Partition inbound query parameters into upstream headers and a
//!   forwarded argument string
//! - Locate the session reference in query or headers
//!
//! # Design Decisions
//! - The header hoist list is a per-route data table, not inline
//!   conditionals; adding an allow-listed key is a data change
//! - Parameter order is preserved: the forwarded argument string keeps the
//!   relative order in which parameters arrived

use std::collections::HashMap;

use axum::http::HeaderMap;

/// Query keys API v2 expects as headers rather than URL arguments when
/// putting a stub.
pub const HOISTED_QUERY_KEYS: &[&str] = &["ext_module", "delay_policy", "stateful", "stub_created_date"];

/// No keys are hoisted on the stub-response lookup route.
pub const NO_HOISTED_KEYS: &[&str] = &[];

/// Header carrying the session reference when the query string cannot
/// (e.g. clients behind a proxy that strips queries).
pub const SESSION_HEADER: &str = "stubo-request-session";

/// A `scenario:session` pair supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRef {
    pub scenario: String,
    pub session: String,
}

/// Split a raw session reference on `:`.
///
/// The first segment is the scenario, the second the session; anything after
/// a second separator is ignored. Returns `None` when no separator is
/// present, which callers must answer with a 400 before touching upstream.
pub fn parse_session_ref(raw: &str) -> Option<SessionRef> {
    let mut segments = raw.split(':');
    let scenario = segments.next()?;
    let session = segments.next()?;
    Some(SessionRef {
        scenario: scenario.to_string(),
        session: session.to_string(),
    })
}

/// Decode a raw query string into ordered key/value pairs.
pub fn parse_query(raw: Option<&str>) -> Vec<(String, String)> {
    match raw {
        Some(raw) => url::form_urlencoded::parse(raw.as_bytes())
            .into_owned()
            .collect(),
        None => Vec::new(),
    }
}

/// First value for a key, the way the legacy surface picked parameters.
pub fn first_param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Partition query pairs into upstream headers and a forwarded argument
/// string.
///
/// Keys in `hoisted` become headers; everything else is serialized back into
/// a `key=value&` argument string in the order received (trailing `&`
/// included, as the legacy gateway emitted it).
pub fn split_query(
    pairs: &[(String, String)],
    hoisted: &[&str],
) -> (HashMap<String, String>, String) {
    let mut headers = HashMap::new();
    let mut args = String::new();
    for (key, value) in pairs {
        if hoisted.contains(&key.as_str()) {
            headers.insert(key.clone(), value.clone());
        } else {
            args.push_str(key);
            args.push('=');
            args.push_str(value);
            args.push('&');
        }
    }
    (headers, args)
}

/// Find the session reference in the query string or, failing that, in the
/// request headers. The query wins when both are present.
pub fn session_from(pairs: &[(String, String)], headers: &HeaderMap) -> Option<String> {
    if let Some(session) = first_param(pairs, "session") {
        return Some(session.to_string());
    }
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

/// Assemble a JSON object from query pairs, first value per key winning.
/// Used to build the delay-policy creation body.
pub fn query_to_json(pairs: &[(String, String)]) -> serde_json::Map<String, serde_json::Value> {
    let mut object = serde_json::Map::new();
    for (key, value) in pairs {
        if !object.contains_key(key) {
            object.insert(key.clone(), serde_json::Value::String(value.clone()));
        }
    }
    object
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ref_splits_deterministically() {
        let parsed = parse_session_ref("scenarioA:sessionB").unwrap();
        assert_eq!(parsed.scenario, "scenarioA");
        assert_eq!(parsed.session, "sessionB");
    }

    #[test]
    fn test_session_ref_without_separator_is_rejected() {
        assert_eq!(parse_session_ref("just_a_session"), None);
    }

    #[test]
    fn test_session_ref_extra_segments_ignored() {
        let parsed = parse_session_ref("a:b:c").unwrap();
        assert_eq!(parsed.scenario, "a");
        assert_eq!(parsed.session, "b");
    }

    #[test]
    fn test_empty_session_segment_is_allowed() {
        let parsed = parse_session_ref("scenario:").unwrap();
        assert_eq!(parsed.scenario, "scenario");
        assert_eq!(parsed.session, "");
    }

    #[test]
    fn test_split_query_hoists_allow_listed_keys() {
        let pairs = vec![
            ("valued".to_string(), "2".to_string()),
            ("ext_module".to_string(), "some_module".to_string()),
            ("value".to_string(), "4".to_string()),
            ("stateful".to_string(), "true".to_string()),
        ];
        let (headers, args) = split_query(&pairs, HOISTED_QUERY_KEYS);

        assert_eq!(headers.get("ext_module").unwrap(), "some_module");
        assert_eq!(headers.get("stateful").unwrap(), "true");
        assert_eq!(args, "valued=2&value=4&");
        assert!(!args.contains("ext_module"));
    }

    #[test]
    fn test_split_query_preserves_received_order() {
        let pairs = vec![
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
            ("c".to_string(), "3".to_string()),
        ];
        let (_, args) = split_query(&pairs, HOISTED_QUERY_KEYS);
        assert_eq!(args, "b=2&a=1&c=3&");
    }

    #[test]
    fn test_split_query_with_no_hoist_list_forwards_everything() {
        let pairs = vec![("stateful".to_string(), "true".to_string())];
        let (headers, args) = split_query(&pairs, NO_HOISTED_KEYS);
        assert!(headers.is_empty());
        assert_eq!(args, "stateful=true&");
    }

    #[test]
    fn test_session_prefers_query_over_header() {
        let pairs = vec![("session".to_string(), "from_query".to_string())];
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, "from_header".parse().unwrap());

        assert_eq!(session_from(&pairs, &headers).unwrap(), "from_query");
        assert_eq!(session_from(&[], &headers).unwrap(), "from_header");
        assert_eq!(session_from(&[], &HeaderMap::new()), None);
    }

    #[test]
    fn test_query_to_json_first_value_wins() {
        let pairs = vec![
            ("name".to_string(), "slow".to_string()),
            ("delay_type".to_string(), "fixed".to_string()),
            ("name".to_string(), "other".to_string()),
        ];
        let object = query_to_json(&pairs);
        assert_eq!(object.get("name").unwrap(), "slow");
        assert_eq!(object.get("delay_type").unwrap(), "fixed");
    }

    #[test]
    fn test_parse_query_decodes_in_order() {
        let pairs = parse_query(Some("name=slow&milliseconds=1000"));
        assert_eq!(
            pairs,
            vec![
                ("name".to_string(), "slow".to_string()),
                ("milliseconds".to_string(), "1000".to_string()),
            ]
        );
        assert!(parse_query(None).is_empty());
    }
}
