//! Request authentication
//!
//! Every mutating operation takes the caller's request token and asks an
//! [`Authenticator`] for the acting operator before touching the campaign.

use crate::error::{BuilderError, Result};
use campaign_builder_config::AuthConfig;
use std::collections::HashMap;
use std::fmt;

/// Something an operator may be allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Render previews and settings panels
    ViewCampaign,
    /// Add, configure and delete fields
    EditCampaign,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::ViewCampaign => "view campaigns",
            Capability::EditCampaign => "edit campaigns",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    capabilities: Vec<Capability>,
}

impl Actor {
    pub fn new(
        name: impl Into<String>,
        capabilities: impl IntoIterator<Item = Capability>,
    ) -> Self {
        Self {
            name: name.into(),
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// An operator with every capability
    pub fn editor(name: impl Into<String>) -> Self {
        Self::new(name, [Capability::ViewCampaign, Capability::EditCampaign])
    }

    /// An operator who may only look
    pub fn viewer(name: impl Into<String>) -> Self {
        Self::new(name, [Capability::ViewCampaign])
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Fail with [`BuilderError::Forbidden`] unless the actor has `capability`
    pub fn require(&self, capability: Capability) -> Result<()> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(BuilderError::Forbidden {
                actor: self.name.clone(),
                action: capability.to_string(),
            })
        }
    }
}

/// Verifies a request token and resolves the acting operator
pub trait Authenticator: Send + Sync {
    /// `token` is `None` when the request carried none
    fn authenticate(&self, token: Option<&str>) -> Result<Actor>;
}

/// Fixed token table, typically loaded from configuration
#[derive(Debug, Default, Clone)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, Actor>,
}

impl StaticTokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, actor: Actor) -> Self {
        self.tokens.insert(token.into(), actor);
        self
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        config
            .tokens
            .iter()
            .fold(Self::new(), |authenticator, entry| {
                let actor = if entry.read_only {
                    Actor::viewer(&entry.actor)
                } else {
                    Actor::editor(&entry.actor)
                };
                authenticator.with_token(&entry.token, actor)
            })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn authenticate(&self, token: Option<&str>) -> Result<Actor> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(BuilderError::Unauthorized)?;
        match self.tokens.get(token) {
            Some(actor) => Ok(actor.clone()),
            None => {
                tracing::warn!("rejected request with unknown token");
                Err(BuilderError::Unauthorized)
            }
        }
    }
}
