//! Sources for the `@source` address stamped on every record.

use crate::internal;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::OnceLock;

/// Used when the host has no IPv4 address at all.
pub const FALLBACK_ADDRESS: &str = "localhost";

/// Interface preferred over the others when no route is found.
pub const PRIMARY_INTERFACE: &str = "eth0";

/// Supplies the local address used as the default `@source`.
///
/// Called once per constructed record, so implementations should cache.
pub trait AddressSource: Send + Sync {
    fn local_address(&self) -> String;
}

impl<F> AddressSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn local_address(&self) -> String {
        self()
    }
}

/// Always reports the same address. Useful for tests and for hosts whose
/// routable address is known from deployment config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedAddress(pub String);

impl FixedAddress {
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }
}

impl AddressSource for FixedAddress {
    fn local_address(&self) -> String {
        self.0.clone()
    }
}

/// One IPv4 address bound to a named interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddr {
    pub name: String,
    pub ip: Ipv4Addr,
}

impl InterfaceAddr {
    #[must_use]
    pub fn new(name: impl Into<String>, ip: Ipv4Addr) -> Self {
        Self {
            name: name.into(),
            ip,
        }
    }
}

fn external(ip: Ipv4Addr) -> bool {
    !ip.is_loopback() && !ip.is_unspecified()
}

/// Picks the `@source` address.
///
/// Order: the routed address, then an external address on [`PRIMARY_INTERFACE`],
/// then the first external address on any interface, then the first loopback
/// address, then [`FALLBACK_ADDRESS`].
#[must_use]
pub fn choose_address(routed: Option<Ipv4Addr>, interfaces: &[InterfaceAddr]) -> String {
    if let Some(ip) = routed.filter(|ip| external(*ip)) {
        return ip.to_string();
    }
    interfaces
        .iter()
        .find(|iface| iface.name == PRIMARY_INTERFACE && external(iface.ip))
        .or_else(|| interfaces.iter().find(|iface| external(iface.ip)))
        .or_else(|| interfaces.iter().find(|iface| iface.ip.is_loopback()))
        .map_or_else(|| FALLBACK_ADDRESS.to_string(), |iface| iface.ip.to_string())
}

/// Best-effort IPv4 address of this host, resolved once.
///
/// Connecting a UDP socket sends no packets but makes the kernel pick the
/// interface it would route through. Without a route the bound interface
/// addresses are searched instead (see [`choose_address`]).
#[derive(Debug)]
pub struct LocalAddress {
    route: fn() -> Option<Ipv4Addr>,
    interfaces: fn() -> Vec<InterfaceAddr>,
    cached: OnceLock<String>,
}

impl Default for LocalAddress {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalAddress {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_lookups(routed_ipv4, interface_ipv4s)
    }

    /// Replaces the route and interface lookups.
    #[must_use]
    pub const fn with_lookups(
        route: fn() -> Option<Ipv4Addr>,
        interfaces: fn() -> Vec<InterfaceAddr>,
    ) -> Self {
        Self {
            route,
            interfaces,
            cached: OnceLock::new(),
        }
    }

    fn discover(&self) -> String {
        let routed = (self.route)();
        let interfaces = if routed.is_some_and(external) {
            Vec::new()
        } else {
            (self.interfaces)()
        };
        let address = choose_address(routed, &interfaces);
        internal::debug(
            "ADDRESS",
            &format!(
                "Local address: {address} (routed={routed:?}, interfaces={})",
                interfaces.len()
            ),
        );
        address
    }
}

impl AddressSource for LocalAddress {
    fn local_address(&self) -> String {
        self.cached.get_or_init(|| self.discover()).clone()
    }
}

fn routed_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))).ok()?;
    // TEST-NET-1; never actually contacted
    socket
        .connect(SocketAddr::from((Ipv4Addr::new(192, 0, 2, 1), 9)))
        .ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(_) => None,
    }
}

#[cfg(unix)]
fn interface_ipv4s() -> Vec<InterfaceAddr> {
    let addrs = match nix::ifaddrs::getifaddrs() {
        Ok(addrs) => addrs,
        Err(e) => {
            internal::debug("ADDRESS", &format!("Interface lookup failed: {e}"));
            return Vec::new();
        }
    };
    addrs
        .filter_map(|ifaddr| {
            let sin = *ifaddr.address?.as_sockaddr_in()?;
            let ip = *std::net::SocketAddrV4::from(sin).ip();
            Some(InterfaceAddr::new(ifaddr.interface_name, ip))
        })
        .collect()
}

#[cfg(not(unix))]
const fn interface_ipv4s() -> Vec<InterfaceAddr> {
    Vec::new()
}
