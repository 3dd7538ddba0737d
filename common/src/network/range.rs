use std::fmt;
use std::net::Ipv4Addr;

/// An IPv4 block expressed as a `(network, mask)` pair in host order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrivateRange {
    pub network: u32,
    pub mask: u32,
}

/// Address blocks that are never reachable from outside the host's own network.
///
/// Link-local (169.254.0.0/16) and carrier-grade NAT (100.64.0.0/10) are not
/// listed; addresses in them are treated as public.
pub const PRIVATE_RANGES: &[PrivateRange] = &[
    // loopback, rfc3330
    PrivateRange::new(Ipv4Addr::new(127, 0, 0, 0), Ipv4Addr::new(255, 0, 0, 0)),
    // rfc1918
    PrivateRange::new(Ipv4Addr::new(192, 168, 0, 0), Ipv4Addr::new(255, 255, 0, 0)),
    PrivateRange::new(Ipv4Addr::new(172, 16, 0, 0), Ipv4Addr::new(255, 240, 0, 0)),
    PrivateRange::new(Ipv4Addr::new(10, 0, 0, 0), Ipv4Addr::new(255, 0, 0, 0)),
];

impl PrivateRange {
    pub const fn new(network: Ipv4Addr, mask: Ipv4Addr) -> Self {
        Self {
            network: network.to_bits(),
            mask: mask.to_bits(),
        }
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        (addr.to_bits() & self.mask) == self.network
    }

    pub const fn prefix_len(&self) -> u32 {
        self.mask.leading_ones()
    }

    pub fn first(&self) -> Ipv4Addr {
        Ipv4Addr::from_bits(self.network)
    }

    pub fn last(&self) -> Ipv4Addr {
        Ipv4Addr::from_bits(self.network | !self.mask)
    }
}

impl fmt::Display for PrivateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.first(), self.prefix_len())
    }
}
