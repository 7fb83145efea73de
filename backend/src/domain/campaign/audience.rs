//! Audience targeting for a campaign.
//!
//! An audience is either every customer, a union of predefined groups, or
//! a conjunction of advanced filter rules. Counts are estimates served to
//! the wizard; the rules themselves are persisted with the campaign.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Customers reached when targeting everyone.
pub const ALL_CUSTOMERS_COUNT: u64 = 1234;
/// Base count estimated for an advanced filter set.
pub const ADVANCED_BASE_COUNT: u64 = 567;
/// Group selected by default.
pub const DEFAULT_GROUP: &str = "all-customers";

/// Predefined customer group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct AudienceGroup {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub count: u64,
}

const GROUPS: [AudienceGroup; 7] = [
    AudienceGroup {
        id: "all-customers",
        name: "All Customers",
        description: "All customers in your database",
        count: 1234,
    },
    AudienceGroup {
        id: "new-customers",
        name: "New Customers",
        description: "Recently visited for the first time",
        count: 156,
    },
    AudienceGroup {
        id: "loyal-customers",
        name: "Loyal Customers",
        description: "Frequent visitors who spend the most",
        count: 89,
    },
    AudienceGroup {
        id: "vip-customers",
        name: "VIP Customers",
        description: "Frequent recent visitors with high spend",
        count: 45,
    },
    AudienceGroup {
        id: "at-risk",
        name: "At Risk Customers",
        description: "Average spenders who haven't visited recently",
        count: 234,
    },
    AudienceGroup {
        id: "promising",
        name: "Promising Customers",
        description: "Recent visitors with low spend",
        count: 123,
    },
    AudienceGroup {
        id: "need-attention",
        name: "Need Attention",
        description: "Occasional visitors with average spend",
        count: 67,
    },
];

/// Every predefined group.
#[must_use]
pub fn groups() -> &'static [AudienceGroup] {
    &GROUPS
}

/// Groups whose name or description contains `term`, ignoring case.
#[must_use]
pub fn search_groups(term: &str) -> Vec<AudienceGroup> {
    let needle = term.to_lowercase();
    GROUPS
        .iter()
        .filter(|g| {
            g.name.to_lowercase().contains(&needle)
                || g.description.to_lowercase().contains(&needle)
        })
        .copied()
        .collect()
}

/// Customer attribute a rule tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FilterField {
    #[serde(rename = "Total Visits")]
    TotalVisits,
    #[serde(rename = "Last Visit Date")]
    LastVisitDate,
    #[serde(rename = "Average Spend")]
    AverageSpend,
    #[serde(rename = "Loyalty Points")]
    LoyaltyPoints,
    #[serde(rename = "Birthday Month")]
    BirthdayMonth,
    #[serde(rename = "Customer Tags")]
    CustomerTags,
    #[serde(rename = "Location")]
    Location,
    #[serde(rename = "Gender")]
    Gender,
}

/// Comparison applied by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FilterOperator {
    #[serde(rename = "is greater than")]
    GreaterThan,
    #[serde(rename = "is less than")]
    LessThan,
    #[serde(rename = "equals")]
    Equals,
    #[serde(rename = "is in the last")]
    InTheLast,
    #[serde(rename = "is before")]
    Before,
    #[serde(rename = "is after")]
    After,
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "is not")]
    IsNot,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "does not contain")]
    DoesNotContain,
}

/// Time unit for relative rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FilterUnit {
    Days,
    Weeks,
    Months,
}

/// Field order offered when adding a rule.
pub const FILTER_FIELDS: [FilterField; 8] = [
    FilterField::TotalVisits,
    FilterField::LastVisitDate,
    FilterField::AverageSpend,
    FilterField::LoyaltyPoints,
    FilterField::BirthdayMonth,
    FilterField::CustomerTags,
    FilterField::Location,
    FilterField::Gender,
];

/// Month names accepted by birthday rules.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Gender values accepted by gender rules.
pub const GENDERS: [&str; 4] = ["Male", "Female", "Non-binary", "Prefer not to say"];

impl FilterField {
    /// Display label, also used in the rule narrative.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::TotalVisits => "Total Visits",
            Self::LastVisitDate => "Last Visit Date",
            Self::AverageSpend => "Average Spend",
            Self::LoyaltyPoints => "Loyalty Points",
            Self::BirthdayMonth => "Birthday Month",
            Self::CustomerTags => "Customer Tags",
            Self::Location => "Location",
            Self::Gender => "Gender",
        }
    }

    /// Operators valid for this field; the first is the default.
    #[must_use]
    pub fn operators(self) -> &'static [FilterOperator] {
        use FilterOperator as Op;
        match self {
            Self::TotalVisits | Self::AverageSpend | Self::LoyaltyPoints => {
                &[Op::GreaterThan, Op::LessThan, Op::Equals]
            }
            Self::LastVisitDate => &[Op::InTheLast, Op::Before, Op::After],
            Self::BirthdayMonth => &[Op::Is, Op::IsNot, Op::InTheLast],
            Self::CustomerTags => &[Op::Contains, Op::DoesNotContain],
            Self::Location => &[Op::Contains, Op::DoesNotContain, Op::Equals],
            Self::Gender => &[Op::Is],
        }
    }

    /// Units allowed with [`FilterOperator::InTheLast`].
    #[must_use]
    pub fn units(self) -> &'static [FilterUnit] {
        match self {
            Self::BirthdayMonth => &[FilterUnit::Months],
            _ => &[FilterUnit::Days, FilterUnit::Weeks, FilterUnit::Months],
        }
    }

    fn is_monetary(self) -> bool {
        matches!(self, Self::AverageSpend | Self::LoyaltyPoints)
    }

    fn default_operator(self) -> FilterOperator {
        self.operators()
            .first()
            .copied()
            .unwrap_or(FilterOperator::Equals)
    }
}

impl FilterOperator {
    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::GreaterThan => "is greater than",
            Self::LessThan => "is less than",
            Self::Equals => "equals",
            Self::InTheLast => "is in the last",
            Self::Before => "is before",
            Self::After => "is after",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::Contains => "contains",
            Self::DoesNotContain => "does not contain",
        }
    }
}

impl FilterUnit {
    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
        }
    }
}

/// One advanced filter rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedFilter {
    pub id: String,
    pub field: FilterField,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<FilterUnit>,
}

/// Partial update applied to a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterUpdate {
    pub field: Option<FilterField>,
    pub operator: Option<FilterOperator>,
    pub value: Option<String>,
    pub value2: Option<String>,
    pub unit: Option<FilterUnit>,
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl AdvancedFilter {
    /// New rule with the first field and its default operator.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let field = FilterField::TotalVisits;
        Self {
            id: id.into(),
            field,
            operator: field.default_operator(),
            value: String::new(),
            value2: None,
            unit: None,
        }
    }

    /// Apply `update`; a field change resets the operator and values.
    pub fn apply(&mut self, update: FilterUpdate) {
        if let Some(field) = update.field.filter(|f| *f != self.field) {
            self.field = field;
            self.operator = field.default_operator();
            self.value.clear();
            self.value2 = None;
            self.unit = None;
        }
        if let Some(operator) = update.operator {
            self.operator = operator;
        }
        if let Some(value) = update.value {
            self.value = value;
        }
        if let Some(value2) = update.value2 {
            self.value2 = Some(value2);
        }
        if let Some(unit) = update.unit {
            self.unit = Some(unit);
        }
    }

    /// Whether the rule is complete enough to evaluate.
    ///
    /// Relative rules need a number and a unit the field accepts; every
    /// other rule needs a value and an operator the field offers.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if !self.field.operators().contains(&self.operator) {
            return false;
        }
        if self.operator == FilterOperator::InTheLast {
            return present(self.value2.as_deref())
                && self.unit.is_some_and(|u| self.field.units().contains(&u));
        }
        present(Some(&self.value))
    }

    /// Human-readable rule, e.g. `Average Spend is greater than ₹500`.
    #[must_use]
    pub fn narrative(&self) -> String {
        let head = format!("{} {}", self.field.label(), self.operator.label());
        if self.operator == FilterOperator::InTheLast {
            format!(
                "{head} {} {}",
                self.value2.as_deref().unwrap_or_default(),
                self.unit.map(FilterUnit::label).unwrap_or_default()
            )
        } else if self.field.is_monetary() && !self.value.is_empty() {
            format!("{head} ₹{}", self.value)
        } else {
            format!("{head} {}", self.value)
        }
    }
}

/// How the audience is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AudienceMode {
    All,
    Groups,
    Advanced,
}

/// Estimated recipients per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LiveCounts {
    pub whatsapp: u64,
    pub sms: u64,
    pub email: u64,
}

impl LiveCounts {
    /// Counts for a filter set of `base` matches.
    ///
    /// Skipping invalid numbers trims WhatsApp to 80% and SMS to 90%.
    #[must_use]
    pub fn from_base(base: u64, skip_invalid_numbers: bool) -> Self {
        if skip_invalid_numbers {
            Self {
                whatsapp: base * 8 / 10,
                sms: base * 9 / 10,
                email: base,
            }
        } else {
            Self {
                whatsapp: base,
                sms: base,
                email: base,
            }
        }
    }
}

/// Audience chosen in the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Audience {
    pub mode: AudienceMode,
    #[serde(default)]
    pub selected_groups: Vec<String>,
    #[serde(default)]
    pub advanced_filters: Vec<AdvancedFilter>,
    pub skip_invalid_numbers: bool,
}

impl Default for Audience {
    fn default() -> Self {
        Self {
            mode: AudienceMode::Groups,
            selected_groups: vec![DEFAULT_GROUP.to_owned()],
            advanced_filters: Vec::new(),
            skip_invalid_numbers: true,
        }
    }
}

impl Audience {
    /// Switch mode, dropping the selection that belongs to other modes.
    pub fn set_mode(&mut self, mode: AudienceMode) {
        self.mode = mode;
        if mode != AudienceMode::Groups {
            self.selected_groups.clear();
        }
        if mode != AudienceMode::Advanced {
            self.advanced_filters.clear();
        }
    }

    /// Toggle a group; deselecting the last one falls back to everyone.
    pub fn toggle_group(&mut self, group_id: &str) {
        if let Some(pos) = self.selected_groups.iter().position(|g| g == group_id) {
            self.selected_groups.remove(pos);
        } else {
            self.selected_groups.push(group_id.to_owned());
        }
        self.mode = if self.selected_groups.is_empty() {
            AudienceMode::All
        } else {
            AudienceMode::Groups
        };
    }

    /// Append a default rule.
    pub fn add_filter(&mut self, id: impl Into<String>) {
        self.advanced_filters.push(AdvancedFilter::new(id));
    }

    /// Remove the rule with `id`; returns whether one was removed.
    pub fn remove_filter(&mut self, id: &str) -> bool {
        let before = self.advanced_filters.len();
        self.advanced_filters.retain(|f| f.id != id);
        before != self.advanced_filters.len()
    }

    /// Update the rule with `id`; returns whether one matched.
    pub fn update_filter(&mut self, id: &str, update: FilterUpdate) -> bool {
        match self.advanced_filters.iter_mut().find(|f| f.id == id) {
            Some(filter) => {
                filter.apply(update);
                true
            }
            None => false,
        }
    }

    /// Whether at least one rule exists and every rule is valid.
    #[must_use]
    pub fn filters_valid(&self) -> bool {
        !self.advanced_filters.is_empty() && self.advanced_filters.iter().all(AdvancedFilter::is_valid)
    }

    /// Rule narratives joined with ` AND `.
    #[must_use]
    pub fn narrative(&self) -> String {
        self.advanced_filters
            .iter()
            .map(AdvancedFilter::narrative)
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Per-channel estimate; zero until an advanced rule exists.
    #[must_use]
    pub fn live_counts(&self) -> LiveCounts {
        if self.mode == AudienceMode::Advanced && !self.advanced_filters.is_empty() {
            LiveCounts::from_base(ADVANCED_BASE_COUNT, self.skip_invalid_numbers)
        } else {
            LiveCounts::default()
        }
    }

    /// Estimated number of customers reached.
    ///
    /// Advanced mode always reports the filtered base, even before the first
    /// rule exists; [`Audience::live_counts`] stays at zero until then.
    ///
    /// # Examples
    /// ```
    /// use muncho_crm::domain::campaign::Audience;
    ///
    /// let mut audience = Audience::default();
    /// audience.toggle_group("vip-customers");
    /// assert_eq!(audience.estimated_total(), 1234 + 45);
    /// ```
    #[must_use]
    pub fn estimated_total(&self) -> u64 {
        match self.mode {
            AudienceMode::All => ALL_CUSTOMERS_COUNT,
            AudienceMode::Groups => self
                .selected_groups
                .iter()
                .filter_map(|id| GROUPS.iter().find(|g| g.id == id))
                .map(|g| g.count)
                .sum(),
            AudienceMode::Advanced => ADVANCED_BASE_COUNT,
        }
    }
}
