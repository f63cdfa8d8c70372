//! Network utilities
//!
//! Picks the local IPv4 address advertised in PORT commands.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::NoLocalAddressError;

/// Parse an IPv4 address from configuration text
pub fn parse_ipv4(addr: &str) -> Result<Ipv4Addr, NoLocalAddressError> {
    addr.trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| NoLocalAddressError::InvalidOverride(addr.to_string()))
}

/// Selects the local IPv4 address for an active-mode listener.
///
/// An explicit override wins. Otherwise the control connection's own local
/// address is used, since the server already reaches this host through it.
/// Loopback only qualifies when the server is on loopback too.
pub fn select_local_ipv4(
    control_local: SocketAddr,
    control_peer: SocketAddr,
    configured: Option<Ipv4Addr>,
) -> Result<Ipv4Addr, NoLocalAddressError> {
    if let Some(ip) = configured {
        return Ok(ip);
    }

    let local = match control_local.ip() {
        IpAddr::V4(ip) => ip,
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(ip) => ip,
            None => return Err(NoLocalAddressError::NotIpv4(control_local)),
        },
    };

    if local.is_loopback() && !control_peer.ip().is_loopback() {
        return Err(NoLocalAddressError::LoopbackOnly(local));
    }
    if local.is_unspecified() {
        return Err(NoLocalAddressError::NotIpv4(control_local));
    }

    Ok(local)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> SocketAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_uses_control_local_address() {
        let ip = select_local_ipv4(addr("192.168.1.20:50000"), addr("10.0.0.5:21"), None);
        assert_eq!(ip, Ok(Ipv4Addr::new(192, 168, 1, 20)));
    }

    #[test]
    fn test_configured_address_wins() {
        let configured = Some(Ipv4Addr::new(203, 0, 113, 7));
        let ip = select_local_ipv4(addr("192.168.1.20:50000"), addr("10.0.0.5:21"), configured);
        assert_eq!(ip, Ok(Ipv4Addr::new(203, 0, 113, 7)));
    }

    #[test]
    fn test_loopback_allowed_for_loopback_server() {
        let ip = select_local_ipv4(addr("127.0.0.1:50000"), addr("127.0.0.1:21"), None);
        assert_eq!(ip, Ok(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_loopback_rejected_for_remote_server() {
        let ip = select_local_ipv4(addr("127.0.0.1:50000"), addr("10.0.0.5:21"), None);
        assert_eq!(ip, Err(NoLocalAddressError::LoopbackOnly(Ipv4Addr::LOCALHOST)));
    }

    #[test]
    fn test_ipv6_control_connection_has_no_ipv4() {
        let local = addr("[2001:db8::1]:50000");
        let ip = select_local_ipv4(local, addr("[2001:db8::2]:21"), None);
        assert_eq!(ip, Err(NoLocalAddressError::NotIpv4(local)));
    }

    #[test]
    fn test_parse_ipv4() {
        assert_eq!(parse_ipv4(" 10.1.2.3 "), Ok(Ipv4Addr::new(10, 1, 2, 3)));
        assert!(parse_ipv4("not-an-ip").is_err());
        assert!(parse_ipv4("::1").is_err());
    }
}
