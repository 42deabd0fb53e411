//! Site settings stored as key/value rows.
//!
//! The settings table is a flat `key -> value` store. [`SiteSettings`] is the
//! typed view over the well-known keys; the admin menu preferences document
//! lives under [`ADMIN_MENU_PREFS_KEY`] as serialized JSON.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Settings key holding the admin menu preferences JSON document.
pub const ADMIN_MENU_PREFS_KEY: &str = "adminMenuPrefs";

pub const DEFAULT_TITLE_FORMAT: &str = "%page% | %site%";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Typed site settings. Missing keys fall back to their defaults on read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    #[validate(length(min = 1, message = "siteTitle is required"))]
    pub site_title: String,
    pub tagline: String,
    #[validate(length(min = 1, message = "titleFormat is required"))]
    pub title_format: String,
    pub meta_description: String,
    pub site_icon_url: String,
    pub sidebar_logo_url: String,
    pub favicon_url: String,
    #[validate(length(min = 1, message = "language is required"))]
    pub language: String,
    #[validate(length(min = 1, message = "timezone is required"))]
    pub timezone: String,
    pub footer_text: String,
}

impl SiteSettings {
    /// Build the typed view from stored rows, applying defaults.
    pub fn from_pairs<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map: HashMap<String, String> = rows.into_iter().collect();
        let mut take = |key: &str, default: &str| map.remove(key).unwrap_or_else(|| default.into());

        Self {
            site_title: take("siteTitle", ""),
            tagline: take("tagline", ""),
            title_format: take("titleFormat", DEFAULT_TITLE_FORMAT),
            meta_description: take("metaDescription", ""),
            site_icon_url: take("siteIconUrl", ""),
            sidebar_logo_url: take("sidebarLogoUrl", ""),
            favicon_url: take("faviconUrl", ""),
            language: take("language", DEFAULT_LANGUAGE),
            timezone: take("timezone", DEFAULT_TIMEZONE),
            footer_text: take("footerText", ""),
        }
    }

    /// Flatten into `(key, value)` pairs for upserting.
    pub fn to_pairs(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("siteTitle", self.site_title.as_str()),
            ("tagline", self.tagline.as_str()),
            ("titleFormat", self.title_format.as_str()),
            ("metaDescription", self.meta_description.as_str()),
            ("siteIconUrl", self.site_icon_url.as_str()),
            ("sidebarLogoUrl", self.sidebar_logo_url.as_str()),
            ("faviconUrl", self.favicon_url.as_str()),
            ("language", self.language.as_str()),
            ("timezone", self.timezone.as_str()),
            ("footerText", self.footer_text.as_str()),
        ]
    }
}

/// Per-site ordering and visibility of the admin navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminMenuPrefs {
    pub group_order: Vec<String>,
    pub item_order: BTreeMap<String, Vec<String>>,
    pub hidden: Vec<String>,
    #[serde(default)]
    pub hidden_groups: Vec<String>,
}
