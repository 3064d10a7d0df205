//! BuilderContext - everything a workflow or render needs
//!
//! The context owns the field registry, the extension points and the
//! configuration, and holds shared handles to the state provider and the
//! authenticator. It is built once at startup and then only read.

use crate::auth::{Actor, Authenticator, Capability, StaticTokenAuthenticator};
use crate::campaign::{Campaign, FieldId};
use crate::error::Result;
use crate::hooks::ExtensionPoints;
use crate::panel;
use crate::registry::{FieldRegistry, PaletteEntry};
use crate::render::{PageRenderer, RenderMode, RenderedPage};
use crate::state::{NoStateProvider, StateProvider};
use campaign_builder_config::{load_configuration, BuilderConfig};
use campaign_builder_templating::Markup;
use std::path::Path;
use std::sync::Arc;

pub struct BuilderContext {
    registry: FieldRegistry,
    hooks: ExtensionPoints,
    config: BuilderConfig,
    state_provider: Arc<dyn StateProvider>,
    authenticator: Arc<dyn Authenticator>,
}

impl BuilderContext {
    /// Every built-in field type, no extension points, no live state, and the
    /// tokens listed in `config.auth`
    pub fn new(config: BuilderConfig) -> Self {
        let authenticator = StaticTokenAuthenticator::from_config(&config.auth);
        Self {
            registry: FieldRegistry::with_builtin_fields(),
            hooks: ExtensionPoints::new(),
            config,
            state_provider: Arc::new(NoStateProvider),
            authenticator: Arc::new(authenticator),
        }
    }

    /// Load configuration from defaults, `file` and the environment, then
    /// build a context from it
    pub fn from_config_file(file: Option<&Path>) -> Result<Self> {
        let config = load_configuration(file)?;
        tracing::debug!(?file, "loaded builder configuration");
        Ok(Self::new(config))
    }

    pub fn with_registry(mut self, registry: FieldRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_hooks(mut self, hooks: ExtensionPoints) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_state_provider(mut self, provider: impl StateProvider + 'static) -> Self {
        self.state_provider = Arc::new(provider);
        self
    }

    pub fn with_authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticator = Arc::new(authenticator);
        self
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FieldRegistry {
        &mut self.registry
    }

    pub fn hooks(&self) -> &ExtensionPoints {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut ExtensionPoints {
        &mut self.hooks
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn state_provider(&self) -> &dyn StateProvider {
        self.state_provider.as_ref()
    }

    /// Resolve the request token and check the actor may do `capability`
    pub fn authenticate(&self, token: Option<&str>, capability: Capability) -> Result<Actor> {
        let actor = self.authenticator.authenticate(token)?;
        actor.require(capability)?;
        Ok(actor)
    }

    pub fn renderer(&self) -> PageRenderer<'_> {
        PageRenderer::new(
            &self.registry,
            &self.hooks,
            &self.config,
            self.state_provider.as_ref(),
        )
    }

    pub fn render_page(&self, campaign: &Campaign, mode: RenderMode) -> RenderedPage {
        self.renderer().render_page(campaign, mode)
    }

    /// The "add block" palette after every palette transform has run
    pub fn palette(&self, campaign: &Campaign) -> Vec<PaletteEntry> {
        self.hooks
            .apply_palette(self.registry.palette(campaign), campaign)
    }

    pub fn render_settings_panel(&self, campaign: &Campaign, field_id: FieldId) -> Result<Markup> {
        panel::render_settings_panel(&self.registry, campaign, field_id, &self.config)
    }
}

impl std::fmt::Debug for BuilderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuilderContext")
            .field("registry", &self.registry)
            .field("hooks", &self.hooks)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
