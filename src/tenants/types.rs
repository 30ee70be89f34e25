//! Tenant content types.

use serde::{Deserialize, Serialize};

/// A tenant's published site, addressed by its subdomain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funnel {
    /// Subdomain under the base domain (e.g. "shop" for shop.example.com).
    pub subdomain: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Unpublished funnels are never served.
    #[serde(default)]
    pub published: bool,

    #[serde(default)]
    pub pages: Vec<FunnelPage>,
}

/// One page of a funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelPage {
    pub name: String,

    /// Path segment the page is served under; empty for the landing page.
    #[serde(default)]
    pub path_name: String,

    /// Position in the funnel; the lowest order is the landing page.
    #[serde(default)]
    pub order: u32,

    /// Rendered HTML served as-is.
    #[serde(default)]
    pub content: String,
}

impl Funnel {
    /// The page with the lowest `order`, first one on ties.
    pub fn landing_page(&self) -> Option<&FunnelPage> {
        self.pages.iter().min_by_key(|page| page.order)
    }

    /// The page served under `path_name`.
    pub fn page(&self, path_name: &str) -> Option<&FunnelPage> {
        self.pages.iter().find(|page| page.path_name == path_name)
    }
}
