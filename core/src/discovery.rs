//! # Public Address Discovery
//!
//! Asks a host for its interface addresses and picks the one to advertise.

use authbench_common::network::classify::{self, PublicIp};
use authbench_common::warn;
use tracing::debug;

use crate::Result;
use crate::remote::{CommandRunner, Shell};

/// Lists every configured address of every interface, loopback excluded.
pub const INTERFACE_QUERY: &str = "hostname -I";

pub async fn discover_public_ip(runner: &dyn CommandRunner) -> Result<PublicIp> {
    let output = runner.run(Shell::new(INTERFACE_QUERY)).await?;
    let candidates = classify::parse_candidates(&output.stdout);
    debug!(host = runner.host(), ?candidates, "interface addresses");

    let public_ip = classify::select_public_ip(candidates.as_slice())?;
    if public_ip.fallback {
        warn!(
            "{} has no public address, using {}",
            runner.host(),
            public_ip.addr
        );
    }
    Ok(public_ip)
}
