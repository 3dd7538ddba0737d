use std::net::Ipv4Addr;

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::IpNetwork;

pub trait NetworkInterfaceExtension {
    fn get_ipv4_addrs(&self) -> Vec<Ipv4Addr>;
    fn is_candidate(&self) -> bool;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn get_ipv4_addrs(&self) -> Vec<Ipv4Addr> {
        self.ips
            .iter()
            .filter_map(|ip| {
                if let IpNetwork::V4(ipv4) = ip {
                    Some(ipv4.ip())
                } else {
                    None
                }
            })
            .collect()
    }

    fn is_candidate(&self) -> bool {
        self.is_up() && !self.is_loopback()
    }
}

/// Lists this machine's IPv4 addresses the same way `hostname -I` does on a
/// remote host: every address of every non-loopback interface that is up,
/// in interface order.
pub fn local_candidates() -> Vec<Ipv4Addr> {
    candidates_from(&pnet::datalink::interfaces())
}

fn candidates_from(interfaces: &[NetworkInterface]) -> Vec<Ipv4Addr> {
    interfaces
        .iter()
        .filter(|interface| interface.is_candidate())
        .flat_map(|interface| interface.get_ipv4_addrs())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::ipnetwork::{Ipv4Network, Ipv6Network};
    use std::net::Ipv6Addr;

    const IFF_UP: u32 = 1;
    const IFF_LOOPBACK: u32 = 1 << 3;

    fn ni(name: &str, index: u32, ips: &[IpNetwork], flags: u32) -> NetworkInterface {
        NetworkInterface {
            name: name.into(),
            description: "".into(),
            index,
            mac: None,
            ips: ips.to_vec(),
            flags: flags.into(),
        }
    }

    fn v4(a: u8, b: u8, c: u8, d: u8, p: u8) -> IpNetwork {
        IpNetwork::V4(Ipv4Network::new(Ipv4Addr::new(a, b, c, d), p).unwrap())
    }

    fn v6(s: &str, p: u8) -> IpNetwork {
        IpNetwork::V6(Ipv6Network::new(s.parse::<Ipv6Addr>().unwrap(), p).unwrap())
    }

    #[test]
    fn skips_loopback_and_down_interfaces() {
        let interfaces = vec![
            ni("lo", 1, &[v4(127, 0, 0, 1, 8)], IFF_UP | IFF_LOOPBACK),
            ni("eth0", 2, &[v4(10, 0, 2, 15, 24), v6("fe80::1", 64)], IFF_UP),
            ni("eth1", 3, &[v4(203, 0, 113, 7, 24)], 0),
            ni("eth2", 4, &[v4(192, 168, 56, 10, 24)], IFF_UP),
        ];

        assert_eq!(
            candidates_from(&interfaces),
            [Ipv4Addr::new(10, 0, 2, 15), Ipv4Addr::new(192, 168, 56, 10)]
        );
    }

    #[test]
    fn ipv6_only_interface_contributes_nothing() {
        let interface = ni("eth0", 1, &[v6("2001:db8::1", 64)], IFF_UP);
        assert!(interface.get_ipv4_addrs().is_empty());
    }
}
