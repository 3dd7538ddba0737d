//! pm2 `ecosystem.config.js` generation.

use std::net::{Ipv4Addr, SocketAddrV4};

use serde::Serialize;

use crate::config::ServiceConfig;
use crate::render::RenderError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EcosystemConfig {
    pub apps: Vec<AppConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub name: String,
    pub script: String,
    pub env: ServiceEnv,
}

/// Environment of the authentication service process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ServiceEnv {
    pub node_env: String,
    pub oidc_client_id: String,
    pub oidc_client_secret: String,
    pub oidc_issuer_uri: String,
    pub svc_base_uri: String,
    pub default_protocol: String,
    pub ca_cert_file: String,
    pub idp_cert_file: String,
    pub idp_key_file: String,
    pub saml_idp_sso_url: String,
    pub saml_idp_slo_url: String,
    pub saml_sp_issuer: String,
    pub sp_cert_file: String,
    pub sp_key_file: String,
}

/// Base URI the service advertises for a host.
pub fn service_base_uri(ip: Ipv4Addr, port: u16) -> String {
    format!("https://{}", SocketAddrV4::new(ip, port))
}

impl ServiceEnv {
    /// Development settings pointing at the local test identity providers.
    pub fn for_host(ip: Ipv4Addr, port: u16) -> Self {
        Self {
            node_env: "development".to_string(),
            oidc_client_id: "client_id".to_string(),
            oidc_client_secret: "client_secret".to_string(),
            oidc_issuer_uri: "http://localhost:3001/".to_string(),
            svc_base_uri: service_base_uri(ip, port),
            default_protocol: "oidc".to_string(),
            ca_cert_file: "certs/sp.crt".to_string(),
            idp_cert_file: "certs/sp.crt".to_string(),
            idp_key_file: "certs/sp.key".to_string(),
            saml_idp_sso_url: "http://localhost:7000/saml/sso".to_string(),
            saml_idp_slo_url: "http://localhost:7000/saml/slo".to_string(),
            saml_sp_issuer: "urn:example:sp".to_string(),
            sp_cert_file: "certs/sp.crt".to_string(),
            sp_key_file: "certs/sp.key".to_string(),
        }
    }
}

impl EcosystemConfig {
    pub fn for_service(service: &ServiceConfig, ip: Ipv4Addr) -> Self {
        Self {
            apps: vec![AppConfig {
                name: service.app_name.clone(),
                script: "./bin/www".to_string(),
                env: ServiceEnv::for_host(ip, service.port),
            }],
        }
    }

    /// Renders a CommonJS module exporting this configuration.
    pub fn render(&self) -> Result<String, RenderError> {
        let body = serde_json::to_string_pretty(self).map_err(|source| RenderError::Json {
            what: "pm2 ecosystem",
            source,
        })?;
        let name = self.apps.first().map_or("service", |app| app.name.as_str());
        // The header is a line comment, so a newline in the name would end it.
        let name = name.replace(['\r', '\n'], " ");
        Ok(format!("// {name} configuration for pm2\nmodule.exports = {body};\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_uri_uses_service_port() {
        assert_eq!(
            service_base_uri(Ipv4Addr::new(203, 0, 113, 7), 3000),
            "https://203.0.113.7:3000"
        );
    }

    #[test]
    fn renders_module_with_screaming_keys() {
        let service = ServiceConfig::default();
        let rendered = EcosystemConfig::for_service(&service, Ipv4Addr::new(10, 0, 2, 15))
            .render()
            .unwrap();

        assert!(rendered.starts_with("// auth-svc configuration for pm2\nmodule.exports = {"));
        assert!(rendered.ends_with("};\n"));
        assert!(rendered.contains(r#""SVC_BASE_URI": "https://10.0.2.15:3000""#));
        assert!(rendered.contains(r#""NODE_ENV": "development""#));
        assert!(rendered.contains(r#""OIDC_ISSUER_URI": "http://localhost:3001/""#));
        assert!(rendered.contains(r#""SAML_IDP_SSO_URL": "http://localhost:7000/saml/sso""#));
        assert!(rendered.contains(r#""script": "./bin/www""#));
    }

    #[test]
    fn body_is_valid_json() {
        let rendered = EcosystemConfig::for_service(&ServiceConfig::default(), Ipv4Addr::LOCALHOST)
            .render()
            .unwrap();
        let body = rendered
            .split_once("module.exports = ")
            .and_then(|(_, rest)| rest.strip_suffix(";\n"))
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(value["apps"][0]["name"], "auth-svc");
        assert_eq!(value["apps"][0]["env"]["DEFAULT_PROTOCOL"], "oidc");
    }

    #[test]
    fn hostile_values_stay_inside_strings() {
        let mut config = EcosystemConfig::for_service(&ServiceConfig::default(), Ipv4Addr::LOCALHOST);
        config.apps[0].env.oidc_client_secret = "x', evil: require('child_process')//\n".to_string();
        config.apps[0].name = "svc\nprocess.exit()".to_string();

        let rendered = config.render().unwrap();
        assert!(rendered.contains(r#""OIDC_CLIENT_SECRET": "x', evil: require('child_process')//\n""#));
        assert!(rendered.starts_with("// svc process.exit() configuration for pm2\n"));
    }
}
