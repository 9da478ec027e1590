//! Response header codec.
//!
//! Headers are persisted as one flat string: `name=v1,v2;name2=v3`.
//! Groups are separated by `;`, the name from its values by the first `=`,
//! and values by `,`. A header with no values is dropped on serialization;
//! `name=` carries a single empty value.

use super::entry::ResponseHeaders;

const HEADER_SEPARATOR: char = ';';
const NAME_VALUE_SEPARATOR: char = '=';
const VALUE_SEPARATOR: char = ',';

/// Flattens `headers` into the persisted form. An empty map yields `""`.
pub fn serialize_response_headers(headers: &ResponseHeaders) -> String {
    headers
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(name, values)| {
            format!(
                "{name}{NAME_VALUE_SEPARATOR}{}",
                values.join(&VALUE_SEPARATOR.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join(&HEADER_SEPARATOR.to_string())
}

/// Parses the persisted form back into a header map.
///
/// Groups without `=` or with an empty name are skipped. `name=` parses to
/// one empty value.
pub fn deserialize_response_headers(serialized: &str) -> ResponseHeaders {
    let mut headers = ResponseHeaders::new();
    for group in serialized.split(HEADER_SEPARATOR) {
        let Some((name, values)) = group.split_once(NAME_VALUE_SEPARATOR) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        headers
            .entry(name.to_string())
            .or_default()
            .extend(values.split(VALUE_SEPARATOR).map(str::to_string));
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &[&str])]) -> ResponseHeaders {
        pairs
            .iter()
            .map(|(name, values)| {
                (
                    name.to_string(),
                    values.iter().map(|v| v.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_serialize_format() {
        let map = headers(&[("header1", &["v1", "v2"]), ("header2", &["v3"])]);
        assert_eq!(serialize_response_headers(&map), "header1=v1,v2;header2=v3");
    }

    #[test]
    fn test_serialize_empty_map() {
        assert_eq!(serialize_response_headers(&ResponseHeaders::new()), "");
    }

    #[test]
    fn test_serialize_skips_empty_values() {
        let map = headers(&[("empty", &[]), ("kept", &["x"])]);
        assert_eq!(serialize_response_headers(&map), "kept=x");
    }

    #[test]
    fn test_deserialize_format() {
        let parsed = deserialize_response_headers("header1=v1,v2;header2=v3");
        assert_eq!(
            parsed,
            headers(&[("header1", &["v1", "v2"]), ("header2", &["v3"])])
        );
    }

    #[test]
    fn test_deserialize_empty_string() {
        assert!(deserialize_response_headers("").is_empty());
    }

    #[test]
    fn test_deserialize_skips_malformed_groups() {
        let parsed = deserialize_response_headers("novalue;=orphan;ok=1");
        assert_eq!(parsed, headers(&[("ok", &["1"])]));
    }

    #[test]
    fn test_deserialize_name_without_values() {
        let parsed = deserialize_response_headers("X-Empty=;ok=1");
        assert_eq!(parsed, headers(&[("X-Empty", &[""]), ("ok", &["1"])]));
    }

    #[test]
    fn test_round_trip_drops_empty_value_lists() {
        let map = headers(&[("a", &["1"]), ("b", &[])]);
        let round_tripped = deserialize_response_headers(&serialize_response_headers(&map));
        assert_eq!(round_tripped, headers(&[("a", &["1"])]));
    }

    #[test]
    fn test_round_trip_keeps_empty_string_values() {
        let map = headers(&[("X-Empty", &[""]), ("X-Mixed", &["a", ""])]);
        let serialized = serialize_response_headers(&map);

        assert_eq!(serialized, "X-Empty=;X-Mixed=a,");
        assert_eq!(deserialize_response_headers(&serialized), map);
    }
}
