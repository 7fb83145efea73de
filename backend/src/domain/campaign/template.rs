//! Campaign objectives and the template library.
//!
//! The catalogue is static. Templates that support WhatsApp carousels are
//! blocked for tenants without a WhatsApp sender header.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reward attached to a campaign offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RewardType {
    Percentage,
    Flat,
    FreeItem,
    NoDiscount,
}

impl RewardType {
    /// Label used by the template library filter chips.
    #[must_use]
    pub fn library_label(self) -> &'static str {
        match self {
            Self::NoDiscount => "No Discount",
            Self::FreeItem => "Free Item",
            Self::Flat => "₹ Discount",
            Self::Percentage => "% Discount",
        }
    }

    /// Label used by the campaign performance filter.
    #[must_use]
    pub fn performance_label(self) -> &'static str {
        match self {
            Self::NoDiscount => "No Discount",
            Self::FreeItem => "Free Item",
            Self::Flat => "Flat Discount",
            Self::Percentage => "% Discount",
        }
    }

    /// Parse a library filter label; `None` means no filter (`All`).
    #[must_use]
    pub fn from_library_label(label: &str) -> Option<Self> {
        [Self::NoDiscount, Self::FreeItem, Self::Flat, Self::Percentage]
            .into_iter()
            .find(|kind| kind.library_label() == label)
    }

    /// Stable identifier stored with campaigns.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Flat => "flat",
            Self::FreeItem => "free-item",
            Self::NoDiscount => "no-discount",
        }
    }

    /// Inverse of [`RewardType::as_str`].
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        [Self::Percentage, Self::Flat, Self::FreeItem, Self::NoDiscount]
            .into_iter()
            .find(|kind| kind.as_str() == raw)
    }
}

/// Reward pre-filled by a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DefaultReward {
    #[serde(rename = "type")]
    pub kind: RewardType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

/// Campaign goal grouping related templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Objective {
    pub id: String,
    pub title: String,
    pub icon: String,
}

/// Pre-designed campaign starting point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub objective: String,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub image: String,
    pub hero_image: String,
    pub brand_color: String,
    pub headline: String,
    pub subtitle: String,
    pub has_whatsapp: bool,
    pub default_reward: DefaultReward,
}

impl Template {
    /// Whether the template carries an offer.
    #[must_use]
    pub fn has_offer(&self) -> bool {
        self.default_reward.kind != RewardType::NoDiscount
    }

    /// Whether a tenant without a WhatsApp header may not open it.
    #[must_use]
    pub fn is_blocked(&self, has_whatsapp_header: bool) -> bool {
        self.has_whatsapp && !has_whatsapp_header
    }
}

/// Message returned when opening a blocked template.
pub const BLOCKED_TEMPLATE_MESSAGE: &str =
    "Upload a WhatsApp header in Settings to unlock carousel templates";

const OBJECTIVES: [(&str, &str, &str); 14] = [
    ("sushi-day", "International Sushi Day", "🍣"),
    ("matcha", "Matcha Specials 💚", "🍵"),
    ("bogo", "Buy One Get One (BOGO)", "🎁"),
    ("events", "Celebrate Events", "🎉"),
    ("offers", "Exciting Offers", "⚡"),
    ("happy-hour", "Happy Hour Offers", "🍻"),
    ("live-events", "Live Events & Entertainment", "🎵"),
    ("new-menu", "New Menu Launch", "📋"),
    ("online-orders", "Drive Online Orders & Takeaway", "📱"),
    ("new-items", "Promote New Items", "✨"),
    ("new-location", "Promote New Location", "📍"),
    ("romantic", "Romantic Dinner", "💕"),
    ("weekday", "Weekday Special", "📅"),
    ("weekend", "Weekend Special", "🎊"),
];

const SUSHI_IMAGE: &str =
    "https://images.pexels.com/photos/357756/pexels-photo-357756.jpeg?auto=compress&cs=tinysrgb&w=400";
const PLATTER_IMAGE: &str =
    "https://images.pexels.com/photos/2098085/pexels-photo-2098085.jpeg?auto=compress&cs=tinysrgb&w=400";
const MATCHA_IMAGE: &str =
    "https://images.pexels.com/photos/4226876/pexels-photo-4226876.jpeg?auto=compress&cs=tinysrgb&w=400";
const BOGO_IMAGE: &str =
    "https://images.pexels.com/photos/1126728/pexels-photo-1126728.jpeg?auto=compress&cs=tinysrgb&w=400";

struct TemplateSeed {
    id: &'static str,
    objective: &'static str,
    title: &'static str,
    description: &'static str,
    slug: &'static str,
    image: &'static str,
    has_whatsapp: bool,
    brand_color: &'static str,
    headline: &'static str,
    subtitle: &'static str,
    reward: (RewardType, Option<u32>, Option<&'static str>),
}

const TEMPLATES: [TemplateSeed; 8] = [
    TemplateSeed {
        id: "sushi-1",
        objective: "sushi-day",
        title: "International Sushi Day Special Menu",
        description: "Celebrate with our exclusive sushi selection and special pricing",
        slug: "sushi-day-special",
        image: SUSHI_IMAGE,
        has_whatsapp: true,
        brand_color: "#e74c3c",
        headline: "International Sushi Day Special!",
        subtitle: "Celebrate with authentic Japanese flavors",
        reward: (RewardType::Percentage, Some(20), None),
    },
    TemplateSeed {
        id: "sushi-2",
        objective: "sushi-day",
        title: "Premium Sushi Platter Offer",
        description: "Indulge in our premium sushi platters with special discounts",
        slug: "premium-sushi-platter",
        image: PLATTER_IMAGE,
        has_whatsapp: false,
        brand_color: "#3498db",
        headline: "Premium Sushi Platter Deal",
        subtitle: "Save big on our chef's special selection",
        reward: (RewardType::Flat, Some(500), None),
    },
    TemplateSeed {
        id: "sushi-3",
        objective: "sushi-day",
        title: "Sushi Master Class Experience",
        description: "Learn from our master chefs while enjoying fresh sushi",
        slug: "sushi-master-class",
        image: PLATTER_IMAGE,
        has_whatsapp: true,
        brand_color: "#2ecc71",
        headline: "Sushi Master Class Experience",
        subtitle: "Learn the art of sushi making",
        reward: (RewardType::NoDiscount, None, None),
    },
    TemplateSeed {
        id: "sushi-4",
        objective: "sushi-day",
        title: "Free Miso Soup with Sushi",
        description: "Complimentary miso soup with any sushi order today",
        slug: "free-miso-soup",
        image: SUSHI_IMAGE,
        has_whatsapp: true,
        brand_color: "#f39c12",
        headline: "Free Miso Soup Today!",
        subtitle: "Complimentary with any sushi order",
        reward: (RewardType::FreeItem, None, Some("Miso Soup")),
    },
    TemplateSeed {
        id: "matcha-1",
        objective: "matcha",
        title: "Matcha Latte Weekend Special",
        description: "Premium matcha lattes with authentic Japanese flavors",
        slug: "matcha-latte-special",
        image: MATCHA_IMAGE,
        has_whatsapp: true,
        brand_color: "#27ae60",
        headline: "Matcha Latte Weekend Special 💚",
        subtitle: "Authentic Japanese matcha experience",
        reward: (RewardType::Percentage, Some(15), None),
    },
    TemplateSeed {
        id: "matcha-2",
        objective: "matcha",
        title: "Matcha Dessert Collection",
        description: "Explore our exclusive matcha-flavored dessert menu",
        slug: "matcha-desserts",
        image: MATCHA_IMAGE,
        has_whatsapp: false,
        brand_color: "#16a085",
        headline: "Matcha Dessert Collection",
        subtitle: "Sweet treats with a green tea twist",
        reward: (RewardType::Flat, Some(200), None),
    },
    TemplateSeed {
        id: "bogo-1",
        objective: "bogo",
        title: "Buy One Get One Free Desserts",
        description: "Double the sweetness with our BOGO dessert offer",
        slug: "bogo-desserts",
        image: BOGO_IMAGE,
        has_whatsapp: true,
        brand_color: "#e67e22",
        headline: "Buy One Get One Free!",
        subtitle: "Double the sweetness on all desserts",
        reward: (RewardType::FreeItem, None, Some("Second Dessert")),
    },
    TemplateSeed {
        id: "bogo-2",
        objective: "bogo",
        title: "BOGO Coffee Special",
        description: "Share the perfect cup with our buy one get one coffee deal",
        slug: "bogo-coffee",
        image: BOGO_IMAGE,
        has_whatsapp: false,
        brand_color: "#8e44ad",
        headline: "BOGO Coffee Special",
        subtitle: "Perfect for sharing with friends",
        reward: (RewardType::FreeItem, None, Some("Second Coffee")),
    },
];

impl From<&TemplateSeed> for Template {
    fn from(seed: &TemplateSeed) -> Self {
        let (kind, value, item) = seed.reward;
        Self {
            id: seed.id.to_owned(),
            objective: seed.objective.to_owned(),
            title: seed.title.to_owned(),
            description: seed.description.to_owned(),
            slug: seed.slug.to_owned(),
            image: seed.image.to_owned(),
            hero_image: seed.image.to_owned(),
            brand_color: seed.brand_color.to_owned(),
            headline: seed.headline.to_owned(),
            subtitle: seed.subtitle.to_owned(),
            has_whatsapp: seed.has_whatsapp,
            default_reward: DefaultReward {
                kind,
                value,
                item: item.map(str::to_owned),
            },
        }
    }
}

static OBJECTIVE_LIST: OnceLock<Vec<Objective>> = OnceLock::new();
static TEMPLATE_LIST: OnceLock<Vec<Template>> = OnceLock::new();

/// Every campaign objective in display order.
pub fn objectives() -> &'static [Objective] {
    OBJECTIVE_LIST.get_or_init(|| {
        OBJECTIVES
            .iter()
            .map(|(id, title, icon)| Objective {
                id: (*id).to_owned(),
                title: (*title).to_owned(),
                icon: (*icon).to_owned(),
            })
            .collect()
    })
}

/// Every template in the library.
pub fn templates() -> &'static [Template] {
    TEMPLATE_LIST.get_or_init(|| TEMPLATES.iter().map(Template::from).collect())
}

/// Look up a template by identifier.
#[must_use]
pub fn find_template(id: &str) -> Option<&'static Template> {
    templates().iter().find(|template| template.id == id)
}

/// Filters applied within one objective's template list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemplateFilter {
    pub offer: Option<RewardType>,
    pub whatsapp_only: bool,
}

impl TemplateFilter {
    fn matches(self, template: &Template) -> bool {
        self.offer.is_none_or(|kind| template.default_reward.kind == kind)
            && (!self.whatsapp_only || template.has_whatsapp)
    }
}

/// Templates for `objective` that satisfy `filter`.
///
/// # Examples
/// ```
/// use muncho_crm::domain::campaign::{templates_for, RewardType, TemplateFilter};
///
/// let filter = TemplateFilter { offer: Some(RewardType::FreeItem), whatsapp_only: false };
/// let ids: Vec<_> = templates_for("bogo", filter).iter().map(|t| t.id.as_str()).collect();
/// assert_eq!(ids, ["bogo-1", "bogo-2"]);
/// ```
#[must_use]
pub fn templates_for(objective: &str, filter: TemplateFilter) -> Vec<&'static Template> {
    templates()
        .iter()
        .filter(|template| template.objective == objective && filter.matches(template))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn catalogue_has_fourteen_objectives() {
        assert_eq!(objectives().len(), 14);
        assert_eq!(objectives().first().map(|o| o.id.as_str()), Some("sushi-day"));
    }

    #[rstest]
    fn every_template_belongs_to_a_known_objective() {
        for template in templates() {
            assert!(
                objectives().iter().any(|o| o.id == template.objective),
                "{} has unknown objective",
                template.id
            );
        }
    }

    #[rstest]
    #[case(TemplateFilter::default(), &["sushi-1", "sushi-2", "sushi-3", "sushi-4"])]
    #[case(TemplateFilter { offer: Some(RewardType::Flat), whatsapp_only: false }, &["sushi-2"])]
    #[case(TemplateFilter { offer: None, whatsapp_only: true }, &["sushi-1", "sushi-3", "sushi-4"])]
    #[case(TemplateFilter { offer: Some(RewardType::Flat), whatsapp_only: true }, &[])]
    fn filters_sushi_templates(#[case] filter: TemplateFilter, #[case] expected: &[&str]) {
        let ids: Vec<&str> = templates_for("sushi-day", filter)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, expected);
    }

    #[rstest]
    #[case("No Discount", Some(RewardType::NoDiscount))]
    #[case("₹ Discount", Some(RewardType::Flat))]
    #[case("% Discount", Some(RewardType::Percentage))]
    #[case("All", None)]
    fn parses_library_labels(#[case] label: &str, #[case] expected: Option<RewardType>) {
        assert_eq!(RewardType::from_library_label(label), expected);
    }

    #[rstest]
    fn whatsapp_templates_block_without_header() {
        let template = find_template("sushi-1").expect("known template");
        assert!(template.is_blocked(false));
        assert!(!template.is_blocked(true));
        let plain = find_template("sushi-2").expect("known template");
        assert!(!plain.is_blocked(false));
    }

    #[rstest]
    fn empty_objectives_have_no_templates() {
        assert!(templates_for("weekend", TemplateFilter::default()).is_empty());
    }
}
