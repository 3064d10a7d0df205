use super::{placeholder, PHOTO};
use crate::fields::{FieldDefinition, FieldType, RenderContext, ValidationResult};
use crate::panel::SettingsPanel;
use crate::settings::{FieldSettings, SettingsView};
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{safe_url, Element, Markup};

const IMAGE_URL: &str = "image_url";
const ALT: &str = "alt";
const CAPTION: &str = "caption";
const LINK_URL: &str = "link_url";

/// A single image with optional caption and link
pub struct PhotoField {
    definition: FieldDefinition,
}

impl PhotoField {
    pub fn new() -> Self {
        Self {
            definition: FieldDefinition::new(PHOTO, "Photo")
                .icon("image")
                .order(50)
                .min_width(10),
        }
    }

    fn figure(&self, settings: &SettingsView<'_>) -> Option<Element> {
        let src = settings.string(IMAGE_URL).and_then(|url| safe_url(&url))?;
        let image = Element::new("img")
            .class("cb-photo-image")
            .attr("src", src)
            .attr("alt", settings.string(ALT).unwrap_or_default())
            .attr("loading", "lazy");
        let image = match settings.string(LINK_URL).and_then(|url| safe_url(&url)) {
            Some(href) => Element::new("a").attr("href", href).child(image),
            None => image,
        };
        let caption = settings
            .string(CAPTION)
            .map(|caption| Element::new("figcaption").class("cb-photo-caption").text(caption));
        Some(
            Element::new("figure")
                .class("cb-photo")
                .child(image)
                .child_opt(caption),
        )
    }
}

impl Default for PhotoField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for PhotoField {
    fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn render_preview(&self, settings: &SettingsView<'_>, _ctx: &RenderContext<'_>) -> Markup {
        self.figure(settings)
            .unwrap_or_else(|| {
                Element::new("figure")
                    .class("cb-photo cb-photo-empty")
                    .child(placeholder("Select an image"))
            })
            .render()
    }

    fn render_display(&self, settings: &SettingsView<'_>, _ctx: &RenderContext<'_>) -> Markup {
        self.figure(settings)
            .map(|figure| figure.render())
            .unwrap_or_default()
    }

    fn settings_controls(
        &self,
        panel: &mut SettingsPanel,
        settings: &SettingsView<'_>,
        _config: &BuilderConfig,
    ) {
        panel
            .text_with_placeholder(
                IMAGE_URL,
                "Image URL",
                settings.string(IMAGE_URL).unwrap_or_default(),
                "https://",
            )
            .text(ALT, "Alternative text", settings.string(ALT).unwrap_or_default())
            .text(CAPTION, "Caption", settings.string(CAPTION).unwrap_or_default())
            .text(LINK_URL, "Link", settings.string(LINK_URL).unwrap_or_default());
    }

    fn prepare_settings(&self, settings: &mut FieldSettings) -> ValidationResult {
        [(IMAGE_URL, "Image URL"), (LINK_URL, "Link")]
            .into_iter()
            .filter_map(|(key, label)| {
                let url = settings.string(key)?;
                (!url.trim().is_empty() && safe_url(&url).is_none())
                    .then(|| ValidationResult::invalid(format!("{label}: unsupported URL")))
            })
            .fold(ValidationResult::Valid, ValidationResult::and)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::Campaign;
    use crate::fields::kinds::test_support::render;
    use crate::render::RenderMode;
    use crate::state::CampaignState;

    fn render_photo(settings: Option<&FieldSettings>, mode: RenderMode) -> String {
        render(
            &PhotoField::new(),
            settings,
            &Campaign::default(),
            &CampaignState::default(),
            mode,
        )
    }

    #[test]
    fn test_linked_image_with_caption() {
        let settings = FieldSettings::new()
            .with(IMAGE_URL, "https://cdn.example.org/well.jpg")
            .with(ALT, "A new well")
            .with(CAPTION, "Finished in May")
            .with(LINK_URL, "https://example.org/report");
        let html = render_photo(Some(&settings), RenderMode::Display);
        assert_eq!(
            html,
            "<figure class=\"cb-photo\"><a href=\"https://example.org/report\">\
             <img class=\"cb-photo-image\" src=\"https://cdn.example.org/well.jpg\" alt=\"A new well\" loading=\"lazy\"></a>\
             <figcaption class=\"cb-photo-caption\">Finished in May</figcaption></figure>"
        );
    }

    #[test]
    fn test_unsafe_image_url_is_not_rendered() {
        let settings = FieldSettings::new().with(IMAGE_URL, "javascript:alert(1)");
        assert_eq!(render_photo(Some(&settings), RenderMode::Display), "");
        assert!(render_photo(Some(&settings), RenderMode::Preview).contains("Select an image"));
    }

    #[test]
    fn test_prepare_reports_each_bad_url() {
        let mut settings = FieldSettings::new()
            .with(IMAGE_URL, "data:image/png;base64,AAAA")
            .with(LINK_URL, "javascript:void(0)");
        let result = PhotoField::new().prepare_settings(&mut settings);
        assert_eq!(result.errors().len(), 2);
    }
}
