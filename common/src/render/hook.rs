//! Environment for the extension hook installer (`node hook.js`).

use std::net::{Ipv4Addr, SocketAddrV4};

use crate::render::ecosystem::service_base_uri;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookEnv {
    /// Server address the hook is installed into.
    pub p4port: String,
    /// Service URL users are sent to for login.
    pub auth_url: String,
}

impl HookEnv {
    pub fn for_host(ip: Ipv4Addr, server_port: u16, service_port: u16) -> Self {
        Self {
            p4port: SocketAddrV4::new(ip, server_port).to_string(),
            auth_url: service_base_uri(ip, service_port),
        }
    }

    pub fn vars(&self) -> [(&'static str, &str); 2] {
        [("P4PORT", self.p4port.as_str()), ("AUTH_URL", self.auth_url.as_str())]
    }
}
