//! Site-wide metadata.

use serde::Serialize;

use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteLinks {
    pub github: &'static str,
    pub twitter: &'static str,
    pub linkedin: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    pub name: &'static str,
    pub description: &'static str,
    pub url: String,
    pub links: SiteLinks,
}

impl SiteConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            name: "Starter Kit",
            description: "빠른 웹 개발을 위한 모던 스타터킷",
            url: settings.site_url.clone(),
            links: SiteLinks {
                github: "https://github.com",
                twitter: "https://twitter.com",
                linkedin: "https://linkedin.com",
            },
        }
    }
}
