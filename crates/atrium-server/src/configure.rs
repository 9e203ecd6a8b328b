//! Builds framework components from loaded configuration.

use std::sync::Arc;

use atrium_authz::{AccessPolicy, CredentialVerifier, PolicyConfig, PresenceOnly, StaticCredentials};
use atrium_config::{AccessConfig, VerifierKind, ViewSection};
use atrium_view::{LayoutTemplate, ViewConfig, ViewConfigBuilder};

use crate::error::ServerResult;

/// Builds the access policy described by the `[access]` section.
pub fn access_policy(access: &AccessConfig) -> ServerResult<AccessPolicy> {
    let config = PolicyConfig::new().with_realm(access.realm.clone());
    let verifier: Arc<dyn CredentialVerifier> = match access.verifier {
        VerifierKind::Presence => Arc::new(PresenceOnly),
        VerifierKind::Static => Arc::new(
            access
                .users
                .iter()
                .map(|(user, password)| (user.clone(), password.clone()))
                .collect::<StaticCredentials>(),
        ),
    };
    Ok(AccessPolicy::with_verifier(config, verifier)?)
}

/// Starts a view configuration from the `[view]` section.
///
/// Components and the state function are added by the application.
pub fn view_builder(section: &ViewSection) -> ServerResult<ViewConfigBuilder> {
    let mut builder = ViewConfig::builder();
    if let Some(title) = &section.title {
        builder = builder.title(title.clone());
    }
    if let Some(path) = &section.layout_path {
        builder = builder.layout(LayoutTemplate::from_file(path)?);
    }
    for script in &section.scripts {
        builder = builder.script(script.clone());
    }
    Ok(builder)
}
