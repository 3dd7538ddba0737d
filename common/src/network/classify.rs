//! # Address Classification
//!
//! Picks the address of a host most likely to be reachable from outside its
//! private network.
//!
//! Hosts report every interface address they have (`hostname -I`). Test VMs
//! usually sit behind NAT, so the list often contains nothing but private
//! addresses. Selection therefore never fails on an all-private list: it falls
//! back to the first candidate and says so through [`PublicIp::fallback`].

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use thiserror::Error;

use crate::network::range::PRIVATE_RANGES;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The input is not a dotted-quad IPv4 address.
    #[error("invalid IPv4 address: {input:?}")]
    Format { input: String },
    /// There was nothing to choose from.
    #[error("no candidate addresses to choose from")]
    EmptyInput,
}

/// The address chosen by [`select_public_ip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicIp {
    pub addr: Ipv4Addr,
    /// Set when every candidate was private and the first one was used instead.
    pub fallback: bool,
}

impl fmt::Display for PublicIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.addr.fmt(f)
    }
}

/// Parses a dotted-quad string.
pub fn parse_addr(input: &str) -> Result<Ipv4Addr, AddressError> {
    Ipv4Addr::from_str(input).map_err(|_| AddressError::Format {
        input: input.to_string(),
    })
}

/// Returns `true` if `addr` falls in one of the [`PRIVATE_RANGES`].
pub fn is_private_addr(addr: Ipv4Addr) -> bool {
    PRIVATE_RANGES.iter().any(|range| range.contains(addr))
}

/// Returns `true` if the dotted-quad `address` is private.
///
/// Malformed input is an error, never `false`.
pub fn is_private(address: &str) -> Result<bool, AddressError> {
    parse_addr(address).map(is_private_addr)
}

/// Returns the first non-private candidate, or the first candidate when all of
/// them are private.
///
/// Candidates are checked in order, so a malformed entry after the chosen one
/// is never looked at.
pub fn select_public_ip<S: AsRef<str>>(candidates: &[S]) -> Result<PublicIp, AddressError> {
    let Some(first) = candidates.first() else {
        return Err(AddressError::EmptyInput);
    };

    for candidate in candidates {
        let addr = parse_addr(candidate.as_ref())?;
        if !is_private_addr(addr) {
            return Ok(PublicIp {
                addr,
                fallback: false,
            });
        }
    }

    Ok(PublicIp {
        addr: parse_addr(first.as_ref())?,
        fallback: true,
    })
}

/// Splits the whitespace separated output of an interface listing.
pub fn parse_candidates(output: &str) -> Vec<&str> {
    output.split_whitespace().collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_private_addresses() {
        for addr in ["127.0.0.1", "192.168.1.1", "172.16.5.5", "10.0.0.1"] {
            assert_eq!(is_private(addr), Ok(true), "{addr} should be private");
        }
    }

    #[test]
    fn public_address() {
        assert_eq!(is_private("8.8.8.8"), Ok(false));
    }

    #[test]
    fn range_boundaries() {
        assert_eq!(is_private("172.31.255.255"), Ok(true));
        assert_eq!(is_private("172.32.0.0"), Ok(false));
        assert_eq!(is_private("172.15.255.255"), Ok(false));
        assert_eq!(is_private("10.255.255.255"), Ok(true));
        assert_eq!(is_private("11.0.0.0"), Ok(false));
        assert_eq!(is_private("192.169.0.0"), Ok(false));
    }

    #[test]
    fn unlisted_special_ranges_count_as_public() {
        assert_eq!(is_private("169.254.10.1"), Ok(false));
        assert_eq!(is_private("100.64.0.1"), Ok(false));
    }

    #[test]
    fn malformed_input_is_an_error() {
        for input in ["999.1.1.1", "not-an-ip", "", "1.2.3", "1.2.3.4.5", " 8.8.8.8"] {
            assert_eq!(
                is_private(input),
                Err(AddressError::Format {
                    input: input.to_string()
                })
            );
        }
    }

    #[test]
    fn selects_first_public_in_order() {
        let picked = select_public_ip(&["10.0.0.5", "8.8.8.8", "192.168.1.1"]).unwrap();
        assert_eq!(picked.addr, Ipv4Addr::new(8, 8, 8, 8));
        assert!(!picked.fallback);
    }

    #[test]
    fn falls_back_to_first_when_all_private() {
        let picked = select_public_ip(&["10.0.0.5", "192.168.1.1"]).unwrap();
        assert_eq!(picked.addr, Ipv4Addr::new(10, 0, 0, 5));
        assert!(picked.fallback);
    }

    #[test]
    fn single_public_candidate() {
        let picked = select_public_ip(&["8.8.8.8"]).unwrap();
        assert_eq!(picked.to_string(), "8.8.8.8");
        assert!(!picked.fallback);
    }

    #[test]
    fn empty_candidates_fail_fast() {
        let empty: [&str; 0] = [];
        assert_eq!(select_public_ip(&empty), Err(AddressError::EmptyInput));
    }

    #[test]
    fn malformed_candidate_before_public_is_an_error() {
        assert!(matches!(
            select_public_ip(&["10.0.0.5", "bogus", "8.8.8.8"]),
            Err(AddressError::Format { .. })
        ));
    }

    #[test]
    fn candidates_after_the_choice_are_not_parsed() {
        let picked = select_public_ip(&["8.8.4.4", "bogus"]).unwrap();
        assert_eq!(picked.addr, Ipv4Addr::new(8, 8, 4, 4));
    }

    #[test]
    fn hostname_output_is_split_on_whitespace() {
        let output = "10.0.2.15 192.168.56.10 \n";
        assert_eq!(parse_candidates(output), ["10.0.2.15", "192.168.56.10"]);
        assert!(parse_candidates("  \n").is_empty());
    }
}
