//! Built-in field types

mod campaign_description;
mod campaign_summary;
mod campaign_title;
mod donate_amount;
mod donate_button;
mod donor_wall;
mod html;
mod organizer;
mod photo;
mod progress_bar;
mod social_links;
mod social_sharing;
mod spacer;
mod text;

pub use campaign_description::CampaignDescriptionField;
pub use campaign_summary::CampaignSummaryField;
pub use campaign_title::CampaignTitleField;
pub use donate_amount::DonateAmountField;
pub use donate_button::DonateButtonField;
pub use donor_wall::DonorWallField;
pub use html::HtmlField;
pub use organizer::OrganizerField;
pub use photo::PhotoField;
pub use progress_bar::ProgressBarField;
pub use social_links::SocialLinksField;
pub use social_sharing::SocialSharingField;
pub use spacer::SpacerField;
pub use text::TextField;

use crate::fields::FieldType;
use campaign_builder_templating::Element;

pub const CAMPAIGN_TITLE: &str = "campaign-title";
pub const CAMPAIGN_DESCRIPTION: &str = "campaign-description";
pub const TEXT: &str = "text";
pub const HTML: &str = "html";
pub const PHOTO: &str = "photo";
pub const SPACER: &str = "spacer";
pub const PROGRESS_BAR: &str = "progress-bar";
pub const CAMPAIGN_SUMMARY: &str = "campaign-summary";
pub const DONATE_AMOUNT: &str = "donate-amount";
pub const DONATE_BUTTON: &str = "donate-button";
pub const DONOR_WALL: &str = "donor-wall";
pub const ORGANIZER: &str = "organizer";
pub const SOCIAL_LINKS: &str = "social-links";
pub const SOCIAL_SHARING: &str = "social-sharing";

/// Every built-in type id
pub const BUILTIN_TYPE_IDS: [&str; 14] = [
    CAMPAIGN_TITLE,
    CAMPAIGN_DESCRIPTION,
    TEXT,
    HTML,
    PHOTO,
    SPACER,
    PROGRESS_BAR,
    CAMPAIGN_SUMMARY,
    DONATE_AMOUNT,
    DONATE_BUTTON,
    DONOR_WALL,
    ORGANIZER,
    SOCIAL_LINKS,
    SOCIAL_SHARING,
];

/// One instance of every built-in field type
pub fn builtin_fields() -> Vec<Box<dyn FieldType>> {
    vec![
        Box::new(CampaignTitleField::new()),
        Box::new(CampaignDescriptionField::new()),
        Box::new(TextField::new()),
        Box::new(HtmlField::new()),
        Box::new(PhotoField::new()),
        Box::new(SpacerField::new()),
        Box::new(ProgressBarField::new()),
        Box::new(CampaignSummaryField::new()),
        Box::new(DonateAmountField::new()),
        Box::new(DonateButtonField::new()),
        Box::new(DonorWallField::new()),
        Box::new(OrganizerField::new()),
        Box::new(SocialLinksField::new()),
        Box::new(SocialSharingField::new()),
    ]
}

/// Muted placeholder text shown in the builder where content is missing
pub(crate) fn placeholder(text: &str) -> Element {
    Element::new("div").class("cb-placeholder").text(text)
}
