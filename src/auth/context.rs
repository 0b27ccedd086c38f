//! The installed identity-provider connection.

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::auth::bootstrap::BootstrapError;
use crate::config::AuthConfig;

/// Validated auth configuration plus the provider URLs derived from it.
///
/// Built once by [`AuthBootstrap::initialize`](crate::auth::AuthBootstrap::initialize)
/// and shared by `Arc` with the components that make authenticated calls.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    config: AuthConfig,
    issuer: Url,
    jwks_uri: Url,
    discovery_uri: Url,
}

impl AuthContext {
    pub(crate) fn from_config(config: &AuthConfig) -> Result<Self, BootstrapError> {
        let region = config.region.trim();
        let pool_id = config.user_pool_id.trim();
        let base = match &config.endpoint {
            Some(endpoint) => endpoint.trim().trim_end_matches('/').to_string(),
            None => format!("https://cognito-idp.{region}.amazonaws.com"),
        };

        let parse = |raw: String| {
            Url::parse(&raw).map_err(|e| BootstrapError::InvalidEndpoint {
                url: raw.clone(),
                reason: e.to_string(),
            })
        };
        let issuer = parse(format!("{base}/{pool_id}"))?;
        let jwks_uri = parse(format!("{base}/{pool_id}/.well-known/jwks.json"))?;
        let discovery_uri = parse(format!("{base}/{pool_id}/.well-known/openid-configuration"))?;

        let mut config = config.clone();
        config.region = region.to_string();
        config.user_pool_id = pool_id.to_string();
        config.user_pool_web_client_id = config.user_pool_web_client_id.trim().to_string();

        Ok(Self {
            config,
            issuer,
            jwks_uri,
            discovery_uri,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn region(&self) -> &str {
        &self.config.region
    }

    pub fn user_pool_id(&self) -> &str {
        &self.config.user_pool_id
    }

    pub fn client_id(&self) -> &str {
        &self.config.user_pool_web_client_id
    }

    /// Token issuer for this user pool.
    pub fn issuer(&self) -> &Url {
        &self.issuer
    }

    pub fn jwks_uri(&self) -> &Url {
        &self.jwks_uri
    }

    pub fn discovery_uri(&self) -> &Url {
        &self.discovery_uri
    }

    /// Settings for the browser-side identity client.
    pub fn client_settings(&self) -> ClientSettings {
        let config = &self.config;
        ClientSettings {
            aws_project_region: config.region.clone(),
            aws_cognito_region: config.region.clone(),
            aws_user_pools_id: config.user_pool_id.clone(),
            aws_user_pools_web_client_id: config.user_pool_web_client_id.clone(),
            oauth: config.oauth.clone(),
            auth: ClientAuthSettings {
                region: config.region.clone(),
                user_pool_id: config.user_pool_id.clone(),
                user_pool_web_client_id: config.user_pool_web_client_id.clone(),
                identity_pool_id: config.identity_pool_id.clone(),
                endpoint: config.endpoint.clone(),
            },
        }
    }
}

/// Identity client settings in the shape the browser SDK expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientSettings {
    pub aws_project_region: String,
    pub aws_cognito_region: String,
    pub aws_user_pools_id: String,
    pub aws_user_pools_web_client_id: String,
    pub oauth: Map<String, Value>,
    #[serde(rename = "Auth")]
    pub auth: ClientAuthSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAuthSettings {
    pub region: String,
    pub user_pool_id: String,
    pub user_pool_web_client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> AuthConfig {
        AuthConfig {
            region: "us-east-1".into(),
            user_pool_id: "us-east-1_KFMpUSnP5".into(),
            user_pool_web_client_id: "64s0p05ggkhfa6a8ni2ak9djf5".into(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_default_endpoints() {
        let context = AuthContext::from_config(&config()).unwrap();
        assert_eq!(
            context.issuer().as_str(),
            "https://cognito-idp.us-east-1.amazonaws.com/us-east-1_KFMpUSnP5"
        );
        assert_eq!(
            context.jwks_uri().as_str(),
            "https://cognito-idp.us-east-1.amazonaws.com/us-east-1_KFMpUSnP5/.well-known/jwks.json"
        );
    }

    #[test]
    fn test_endpoint_override() {
        let mut config = config();
        config.endpoint = Some("http://127.0.0.1:9229/".into());
        let context = AuthContext::from_config(&config).unwrap();
        assert_eq!(
            context.discovery_uri().as_str(),
            "http://127.0.0.1:9229/us-east-1_KFMpUSnP5/.well-known/openid-configuration"
        );
    }

    #[test]
    fn test_client_settings_shape() {
        let settings = AuthContext::from_config(&config()).unwrap().client_settings();
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({
                "aws_project_region": "us-east-1",
                "aws_cognito_region": "us-east-1",
                "aws_user_pools_id": "us-east-1_KFMpUSnP5",
                "aws_user_pools_web_client_id": "64s0p05ggkhfa6a8ni2ak9djf5",
                "oauth": {},
                "Auth": {
                    "region": "us-east-1",
                    "userPoolId": "us-east-1_KFMpUSnP5",
                    "userPoolWebClientId": "64s0p05ggkhfa6a8ni2ak9djf5"
                }
            })
        );
    }
}
