use std::io::Write;
use std::net::Ipv4Addr;

use anyhow::Context;
use authbench_common::config::Config;
use authbench_common::render::ecosystem::EcosystemConfig;
use authbench_common::render::group::GroupSpec;

use crate::commands::RenderTarget;

/// Writes the file to stdout, bypassing the log formatter.
pub fn render(target: RenderTarget, ip: Ipv4Addr, cfg: &Config) -> anyhow::Result<()> {
    let text = match target {
        RenderTarget::Ecosystem => EcosystemConfig::for_service(&cfg.service, ip).render()?,
        RenderTarget::Group => GroupSpec::no_timeout(&cfg.server.super_user).render()?,
    };
    std::io::stdout()
        .write_all(text.as_bytes())
        .context("failed to write to stdout")?;
    Ok(())
}
