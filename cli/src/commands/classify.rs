use anyhow::Context;
use authbench_common::config::Config;
use authbench_common::network::classify::{self, PublicIp};
use authbench_common::network::range::PRIVATE_RANGES;
use authbench_common::utils::interface;
use authbench_common::{success, warn};
use colored::*;

use crate::mprint;
use crate::terminal::{colors, format, print};

pub fn classify(addrs: &[String], local: bool, cfg: &Config) -> anyhow::Result<()> {
    let candidates: Vec<String> = if local {
        interface::local_candidates()
            .iter()
            .map(ToString::to_string)
            .collect()
    } else {
        addrs.to_vec()
    };

    print::header("address classification", cfg.quiet);
    let mut details: Vec<format::Detail> = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        let addr = classify::parse_addr(candidate)
            .with_context(|| format!("cannot classify {candidate:?}"))?;
        details.push(format::addr_to_detail(addr));
    }
    print::as_tree_one_level(details);

    let chosen: PublicIp = classify::select_public_ip(candidates.as_slice())
        .context("nothing to classify; pass addresses or --local")?;
    print_choice(chosen, cfg);
    Ok(())
}

fn print_choice(chosen: PublicIp, cfg: &Config) {
    let addr: ColoredString = chosen.addr.to_string().color(colors::PUBLIC_ADDR).bold();
    if chosen.fallback {
        warn!("No public address, falling back to {addr}");
        return;
    }
    match cfg.quiet {
        0 => {
            mprint!();
            print::centerln(&format!("Public address: {addr}"));
        }
        _ => success!("Public address: {addr}"),
    }
}

pub fn ranges(cfg: &Config) {
    print::header("private ranges", cfg.quiet);
    for (idx, range) in PRIVATE_RANGES.iter().enumerate() {
        print::tree_head(idx, &range.to_string());
        print::as_tree_one_level(format::range_to_details(range));
        if idx + 1 != PRIVATE_RANGES.len() {
            mprint!();
        }
    }
    print::end_of_program(cfg.quiet);
}
