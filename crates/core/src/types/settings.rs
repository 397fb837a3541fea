//! Storefront settings document: announcement banner and hero section.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::id::ProductId;
use super::price::Price;

/// Announcement banner shown above the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub text: String,
    pub active: bool,
    /// Scroll the text as a marquee instead of showing it statically.
    pub is_marquee: bool,
}

/// Hero banner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroConfig {
    pub title: String,
    pub subtitle: String,
    /// Price shown on the hero card.
    pub price: Price,
    pub image: String,
    /// Product added to the cart by the hero call-to-action.
    ///
    /// Serialized as `null` when unset so a cleared link survives the merge
    /// with the defaults.
    #[serde(default)]
    pub linked_product_id: Option<ProductId>,
}

impl HeroConfig {
    /// The linked product, ignoring the empty "no link" value.
    #[must_use]
    pub fn linked_product(&self) -> Option<&ProductId> {
        self.linked_product_id.as_ref().filter(|id| !id.is_empty())
    }

    /// Split the title at its first comma for two-tone rendering.
    #[must_use]
    pub fn title_parts(&self) -> (&str, &str) {
        let title = if self.title.trim().is_empty() {
            DEFAULT_HERO_TITLE
        } else {
            self.title.as_str()
        };
        match title.split_once(',') {
            Some((head, tail)) => (head, tail),
            None => (title, ""),
        }
    }
}

/// The singleton settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub announcement: Announcement,
    pub hero: HeroConfig,
}

const DEFAULT_HERO_TITLE: &str = "Sweetness, Elevated.";

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            announcement: Announcement {
                text: "GRAND OPENING SPECIAL: 20% OFF ALL ORDERS".to_owned(),
                active: true,
                is_marquee: true,
            },
            hero: HeroConfig {
                title: DEFAULT_HERO_TITLE.to_owned(),
                subtitle: "Experience the art of baking.".to_owned(),
                price: Price::from_rupees(250),
                image: "https://images.unsplash.com/photo-1614707267537-b85aaf00c4b7?auto=format&fit=crop&q=80&w=800".to_owned(),
                linked_product_id: Some(ProductId::new("c2")),
            },
        }
    }
}

impl AppSettings {
    /// Section keys that are merged independently.
    const SECTIONS: [&'static str; 2] = ["announcement", "hero"];

    /// Build settings from a possibly partial stored document.
    ///
    /// Each section starts from the defaults and is overlaid key-by-key with
    /// whatever the stored document provides. A document that still fails to
    /// decode after merging yields the defaults.
    #[must_use]
    pub fn merged_with_defaults(stored: &Value) -> Self {
        let defaults = Self::default();
        let Ok(mut merged) = serde_json::to_value(&defaults) else {
            return defaults;
        };

        for section in Self::SECTIONS {
            let overrides = stored.get(section).and_then(Value::as_object);
            let target = merged.get_mut(section).and_then(Value::as_object_mut);
            if let (Some(overrides), Some(target)) = (overrides, target) {
                for (key, value) in overrides {
                    target.insert(key.clone(), value.clone());
                }
            }
        }

        serde_json::from_value(merged).unwrap_or(defaults)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_merge_keeps_defaults_for_missing_keys() {
        let stored = json!({ "hero": { "title": "Fresh, Daily." } });
        let settings = AppSettings::merged_with_defaults(&stored);

        assert_eq!(settings.hero.title, "Fresh, Daily.");
        assert_eq!(settings.hero.subtitle, "Experience the art of baking.");
        assert_eq!(settings.announcement, AppSettings::default().announcement);
    }

    #[test]
    fn test_merge_overrides_announcement() {
        let stored = json!({ "announcement": { "active": false, "text": "Closed Monday" } });
        let settings = AppSettings::merged_with_defaults(&stored);

        assert!(!settings.announcement.active);
        assert_eq!(settings.announcement.text, "Closed Monday");
        assert!(settings.announcement.is_marquee);
    }

    #[test]
    fn test_merge_wrong_types_fall_back_to_defaults() {
        let stored = json!({ "hero": { "price": "not a number" } });
        assert_eq!(AppSettings::merged_with_defaults(&stored), AppSettings::default());
    }

    #[test]
    fn test_merge_empty_document() {
        assert_eq!(AppSettings::merged_with_defaults(&Value::Null), AppSettings::default());
    }

    #[test]
    fn test_linked_product_ignores_empty() {
        let mut hero = AppSettings::default().hero;
        assert_eq!(hero.linked_product().map(ProductId::as_str), Some("c2"));
        hero.linked_product_id = Some(ProductId::new(""));
        assert!(hero.linked_product().is_none());
    }

    #[test]
    fn test_cleared_link_survives_merge() {
        let mut settings = AppSettings::default();
        settings.hero.linked_product_id = None;
        let stored = serde_json::to_value(&settings).unwrap_or_default();

        let merged = AppSettings::merged_with_defaults(&stored);
        assert!(merged.hero.linked_product().is_none());
    }

    #[test]
    fn test_title_parts() {
        let mut hero = AppSettings::default().hero;
        assert_eq!(hero.title_parts(), ("Sweetness", " Elevated."));
        hero.title = "Cakes".to_owned();
        assert_eq!(hero.title_parts(), ("Cakes", ""));
        hero.title = "  ".to_owned();
        assert_eq!(hero.title_parts(), ("Sweetness", " Elevated."));
    }
}
