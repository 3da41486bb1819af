use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::base64url::{self, CodecError};

/// Relay endpoint recovered from a bootstrap fragment.
///
/// `port` is empty when the fragment did not carry one; the connection
/// layer applies its own default in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayEndpoint {
    pub host: String,
    pub port: String,
}

#[derive(Debug, Error)]
pub enum FragmentError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("fragment payload is not valid JSON: {0}")]
    Payload(String),
    #[error("fragment payload has no endpoint field")]
    MissingEndpoint,
    #[error("relay fragment has an empty host")]
    EmptyHost,
}

/// Parse a bootstrap fragment into a relay endpoint.
///
/// Fragments containing `@` use the legacy `@host[:port]` grammar; anything
/// else is treated as a base64url JSON payload carrying an `endpoint` field
/// formatted as `host:port`. No recovery is attempted on malformed input.
pub fn parse(fragment: &str) -> Result<RelayEndpoint, FragmentError> {
    let endpoint = match fragment.split_once('@') {
        Some((_, rest)) => parse_legacy(rest)?,
        None => parse_encoded(fragment)?,
    };
    trace!(host = %endpoint.host, port = %endpoint.port, "parsed relay fragment");
    Ok(endpoint)
}

/// Legacy grammar: host runs to the first `:`, the port is the digit run
/// after it. A missing or non-numeric port yields an empty string.
fn parse_legacy(rest: &str) -> Result<RelayEndpoint, FragmentError> {
    let (host, port) = match rest.split_once(':') {
        Some((host, tail)) => (host, digit_prefix(tail)),
        None => (rest, ""),
    };
    if host.is_empty() {
        return Err(FragmentError::EmptyHost);
    }
    Ok(RelayEndpoint {
        host: host.to_string(),
        port: port.to_string(),
    })
}

fn parse_encoded(fragment: &str) -> Result<RelayEndpoint, FragmentError> {
    let bytes = base64url::decode(fragment)?;
    let text =
        String::from_utf8(bytes).map_err(|err| FragmentError::Payload(err.to_string()))?;
    let params: serde_json::Value =
        serde_json::from_str(&text).map_err(|err| FragmentError::Payload(err.to_string()))?;
    let endpoint = params
        .get("endpoint")
        .and_then(serde_json::Value::as_str)
        .ok_or(FragmentError::MissingEndpoint)?;

    let (host, port) = endpoint.split_once(':').unwrap_or((endpoint, ""));
    if host.is_empty() {
        return Err(FragmentError::EmptyHost);
    }
    Ok(RelayEndpoint {
        host: host.to_string(),
        port: port.to_string(),
    })
}

fn digit_prefix(tail: &str) -> &str {
    let end = tail
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(tail.len());
    &tail[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    fn encode_fragment(json: &str) -> String {
        crate::base64url::from_standard(&STANDARD.encode(json))
    }

    #[test]
    fn legacy_fragment_with_port() {
        let endpoint = parse("@example.com:2222").unwrap();
        assert_eq!(endpoint.host, "example.com");
        assert_eq!(endpoint.port, "2222");
    }

    #[test]
    fn legacy_fragment_without_port() {
        let endpoint = parse("@example.com").unwrap();
        assert_eq!(endpoint.host, "example.com");
        assert_eq!(endpoint.port, "");
    }

    #[test]
    fn legacy_fragment_with_non_numeric_port_yields_empty_port() {
        let endpoint = parse("@example.com:ssh").unwrap();
        assert_eq!(endpoint.host, "example.com");
        assert_eq!(endpoint.port, "");
    }

    #[test]
    fn legacy_fragment_with_empty_host_is_rejected() {
        assert!(matches!(parse("@:22"), Err(FragmentError::EmptyHost)));
    }

    #[test]
    fn encoded_fragment_with_port() {
        let fragment = encode_fragment(r#"{"endpoint":"example.com:22"}"#);
        let endpoint = parse(&fragment).unwrap();
        assert_eq!(endpoint.host, "example.com");
        assert_eq!(endpoint.port, "22");
    }

    #[test]
    fn encoded_fragment_without_port() {
        let fragment = encode_fragment(r#"{"endpoint":"example.com"}"#);
        let endpoint = parse(&fragment).unwrap();
        assert_eq!(endpoint.host, "example.com");
        assert_eq!(endpoint.port, "");
    }

    #[test]
    fn encoded_fragment_missing_endpoint_is_rejected() {
        let fragment = encode_fragment(r#"{"proxy":"example.com"}"#);
        assert!(matches!(
            parse(&fragment),
            Err(FragmentError::MissingEndpoint)
        ));
    }

    #[test]
    fn undecodable_fragment_is_rejected() {
        assert!(matches!(parse("%%%%"), Err(FragmentError::Codec(_))));
    }

    #[test]
    fn non_json_payload_is_rejected() {
        let fragment = encode_fragment("not json");
        assert!(matches!(parse(&fragment), Err(FragmentError::Payload(_))));
    }
}
