use std::time::Duration;

use authbench_common::network::classify::is_private_addr;
use authbench_common::network::range::PrivateRange;
use authbench_core::tasks::Outcome;
use colored::*;
use std::net::Ipv4Addr;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn addr_to_detail(addr: Ipv4Addr) -> Detail {
    if is_private_addr(addr) {
        (String::from("private"), addr.to_string().color(colors::PRIVATE_ADDR))
    } else {
        (String::from("public"), addr.to_string().color(colors::PUBLIC_ADDR))
    }
}

pub fn range_to_details(range: &PrivateRange) -> Vec<Detail> {
    vec![
        (String::from("first"), range.first().to_string().normal()),
        (String::from("last"), range.last().to_string().normal()),
        (
            String::from("mask"),
            Ipv4Addr::from_bits(range.mask).to_string().normal(),
        ),
    ]
}

pub fn outcome_to_str(outcome: Outcome) -> ColoredString {
    match outcome {
        Outcome::Done => "done".green().bold(),
        Outcome::Skipped => "already in place".yellow().bold(),
        Outcome::RebootScheduled => "rebooting".yellow().bold(),
    }
}

pub fn elapsed_to_str(elapsed: Duration) -> ColoredString {
    format!("{:.2}s", elapsed.as_secs_f64()).bold().yellow()
}
