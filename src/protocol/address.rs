//! PORT/PASV address encoding
//!
//! Converts between an IPv4 endpoint and the six comma-separated numbers
//! used on the wire: `h1,h2,h3,h4,p1,p2` with `port = p1 * 256 + p2`.

use std::net::{Ipv4Addr, SocketAddrV4};

use crate::error::MalformedAddressError;

/// Characters servers wrap around the PASV 6-tuple.
const PASSIVE_NOISE: &[char] = &['(', ')', '.', ' ', '\t'];

/// Encodes an endpoint as PORT command parameters.
pub fn encode_port(ip: Ipv4Addr, port: u16) -> String {
    let [o1, o2, o3, o4] = ip.octets();
    let p1 = port / 256;
    let p2 = port % 256;
    format!("{},{},{},{},{},{}", o1, o2, o3, o4, p1, p2)
}

/// Decodes PASV reply parameters into an endpoint.
pub fn decode_passive(params: &str) -> Result<SocketAddrV4, MalformedAddressError> {
    let trimmed = params.trim_matches(PASSIVE_NOISE);
    let fields: Vec<&str> = trimmed.split(',').collect();
    if fields.len() != 6 {
        return Err(MalformedAddressError::WrongFieldCount(fields.len()));
    }

    let mut bytes = [0u8; 6];
    for (slot, field) in bytes.iter_mut().zip(&fields) {
        *slot = field
            .trim()
            .parse::<u8>()
            .map_err(|_| MalformedAddressError::InvalidField(field.to_string()))?;
    }

    let ip = Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]);
    let port = u16::from(bytes[4]) * 256 + u16::from(bytes[5]);
    Ok(SocketAddrV4::new(ip, port))
}

/// Picks the 6-tuple out of a 227 reply line.
///
/// The tuple is the last parenthesized list, as in
/// `227 Entering Passive Mode (h1,h2,h3,h4,p1,p2).`. Servers that drop the
/// parentheses put it in the last whitespace-separated token.
pub fn extract_passive_params(line: &str) -> Result<&str, MalformedAddressError> {
    if let Some(open) = line.rfind('(') {
        if let Some(len) = line[open + 1..].find(')') {
            let inner = &line[open + 1..open + 1 + len];
            if inner.contains(',') {
                return Ok(inner);
            }
        }
    }

    line.split_whitespace()
        .skip(1)
        .last()
        .map(|token| token.trim_matches(PASSIVE_NOISE))
        .filter(|token| token.contains(','))
        .ok_or_else(|| MalformedAddressError::MissingParameters(line.to_string()))
}
