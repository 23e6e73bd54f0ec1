use std::net::Ipv6Addr;
use thiserror::Error;

/// Reasons for rejecting a scrape target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("target is empty")]
    Empty,

    #[error("target has no host")]
    MissingAuthority,

    #[error("target must not include a scheme")]
    Scheme,

    #[error("target must not include a path")]
    Path,

    #[error("target must not include path parameters")]
    Params,

    #[error("target must not include a query string")]
    Query,

    #[error("target must not include a fragment")]
    Fragment,

    #[error("invalid IPv6 host")]
    InvalidIpv6,

    #[error("invalid port `{0}`, expected a number between 0 and 65535")]
    InvalidPort(String),
}

/// The components of a URI reference, borrowed from the input.
#[derive(Debug, Default, PartialEq, Eq)]
struct UriParts<'a> {
    scheme: &'a str,
    authority: &'a str,
    path: &'a str,
    params: &'a str,
    query: &'a str,
    fragment: &'a str,
}

/// Validates a single scrape target and returns it unchanged.
///
/// A target has to be in the `host:port` (or bare `host`) format. The input is
/// parsed as the authority of a URI reference, which means that:
/// - a scheme (`https://foo:1234`), a path (`foo:1234/metrics`), path
///   parameters, a query string or a fragment are rejected,
/// - the port, if present, has to be a number between 0 and 65535,
/// - the host is not resolved nor normalized in any way.
///
/// Surrounding whitespace is not trimmed, that is the responsibility of the
/// caller.
pub fn validate_address(address: &str) -> Result<String, AddressError> {
    if address.is_empty() {
        return Err(AddressError::Empty);
    }

    // Without the leading `//`, `foo:1234` would be read as the scheme `foo`
    // followed by the path `1234`.
    let input = if address.starts_with("//") {
        address.to_owned()
    } else {
        format!("//{address}")
    };

    let parts = split_uri(&input)?;

    if parts.authority.is_empty() {
        return Err(AddressError::MissingAuthority);
    }
    if !parts.scheme.is_empty() {
        return Err(AddressError::Scheme);
    }
    if !parts.path.is_empty() {
        return Err(AddressError::Path);
    }
    if !parts.params.is_empty() {
        return Err(AddressError::Params);
    }
    if !parts.query.is_empty() {
        return Err(AddressError::Query);
    }
    if !parts.fragment.is_empty() {
        return Err(AddressError::Fragment);
    }

    parse_port(parts.authority)?;

    Ok(parts.authority.to_owned())
}

/// Extracts the port from an authority (`[userinfo@]host[:port]`).
///
/// Returns `Ok(None)` when no port is given, including the `host:` case.
pub fn parse_port(authority: &str) -> Result<Option<u16>, AddressError> {
    let host_port = match authority.rsplit_once('@') {
        Some((_, host_port)) => host_port,
        None => authority,
    };

    // Everything after the first `:` of the host is the port, so an
    // unbracketed IPv6 literal never has a valid port.
    let port = match host_port.strip_prefix('[') {
        Some(rest) => match rest.split_once(']') {
            Some((host, after)) => {
                check_bracketed_host(host)?;
                if after.is_empty() {
                    None
                } else {
                    Some(after.strip_prefix(':').ok_or(AddressError::InvalidIpv6)?)
                }
            }
            None => return Err(AddressError::InvalidIpv6),
        },
        None => host_port.split_once(':').map(|(_, port)| port),
    };

    match port {
        None | Some("") => Ok(None),
        Some(port) if port.bytes().all(|b| b.is_ascii_digit()) => port
            .parse::<u16>()
            .map(Some)
            .map_err(|_| AddressError::InvalidPort(port.to_owned())),
        Some(port) => Err(AddressError::InvalidPort(port.to_owned())),
    }
}

/// A bracketed host is either an IPv6 address, optionally with a zone id, or
/// an IPvFuture literal (`v1.foo`). IPv4 addresses are not allowed.
fn check_bracketed_host(host: &str) -> Result<(), AddressError> {
    if let Some(future) = host.strip_prefix(['v', 'V']) {
        let valid = match future.split_once('.') {
            Some((version, rest)) => {
                !version.is_empty()
                    && version.bytes().all(|b| b.is_ascii_hexdigit())
                    && !rest.is_empty()
            }
            None => false,
        };
        return if valid {
            Ok(())
        } else {
            Err(AddressError::InvalidIpv6)
        };
    }

    let address = match host.split_once('%') {
        Some((address, zone)) if !zone.is_empty() => address,
        Some(_) => return Err(AddressError::InvalidIpv6),
        None => host,
    };

    address
        .parse::<Ipv6Addr>()
        .map(|_| ())
        .map_err(|_| AddressError::InvalidIpv6)
}

/// Splits a URI reference into its components.
///
/// A scheme is only recognized when the input does not start with `//`, and
/// path parameters are only split off the last path segment.
fn split_uri(input: &str) -> Result<UriParts<'_>, AddressError> {
    let mut parts = UriParts::default();
    let mut rest = input;

    if let Some(colon) = rest.find(':') {
        let candidate = &rest[..colon];
        let mut chars = candidate.chars();
        let is_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if is_scheme {
            parts.scheme = candidate;
            rest = &rest[colon + 1..];
        }
    }

    if let Some(after_slashes) = rest.strip_prefix("//") {
        let end = after_slashes
            .find(['/', '?', '#'])
            .unwrap_or(after_slashes.len());
        parts.authority = &after_slashes[..end];
        rest = &after_slashes[end..];

        let has_open = parts.authority.contains('[');
        let has_close = parts.authority.contains(']');
        if has_open != has_close {
            return Err(AddressError::InvalidIpv6);
        }
    }

    if let Some((before, fragment)) = rest.split_once('#') {
        parts.fragment = fragment;
        rest = before;
    }
    if let Some((before, query)) = rest.split_once('?') {
        parts.query = query;
        rest = before;
    }

    let last_segment = rest.rfind('/').map_or(0, |i| i + 1);
    match rest[last_segment..].find(';') {
        Some(semicolon) => {
            parts.path = &rest[..last_segment + semicolon];
            parts.params = &rest[last_segment + semicolon + 1..];
        }
        None => parts.path = rest,
    }

    Ok(parts)
}
