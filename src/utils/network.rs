use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener};
use tracing::warn;

/// How many ports above the preferred one are tried before giving up.
pub const PORT_SEARCH_SPAN: u16 = 100;

/// Check whether `host:port` can be bound right now.
pub fn is_port_available(host: IpAddr, port: u16) -> bool {
    TcpListener::bind(SocketAddr::new(host, port)).is_ok()
}

/// Preferred port if free, otherwise the first free one above it.
///
/// Falls back to the preferred port when nothing is free; binding will then
/// fail with a proper error.
pub fn available_port_or_default(host: IpAddr, preferred: u16) -> u16 {
    if is_port_available(host, preferred) {
        return preferred;
    }

    warn!("Port {} is not available, searching for alternative...", preferred);
    let upper = preferred.saturating_add(PORT_SEARCH_SPAN);
    match (preferred.saturating_add(1)..=upper).find(|&port| is_port_available(host, port)) {
        Some(port) => {
            warn!("Using alternative port: {}", port);
            port
        }
        None => {
            warn!("No available ports found, returning preferred port {}", preferred);
            preferred
        }
    }
}

/// Parse the configured host, falling back to loopback.
pub fn parse_host(host: &str) -> IpAddr {
    host.parse().unwrap_or_else(|_| {
        warn!("Invalid host {:?}, using 127.0.0.1", host);
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    })
}

/// URL people should open. A wildcard bind is shown with the LAN address.
pub fn server_url(host: IpAddr, port: u16) -> String {
    let shown = if host.is_unspecified() {
        local_ip_address::local_ip().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
    } else {
        host
    };
    match shown {
        IpAddr::V6(v6) => format!("http://[{}]:{}", v6, port),
        IpAddr::V4(v4) => format!("http://{}:{}", v4, port),
    }
}
