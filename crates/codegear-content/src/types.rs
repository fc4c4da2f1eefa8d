//! Domain types for the content store.
//!
//! These types mirror the persisted JSON document. Field names are
//! camelCase on the wire to stay compatible with existing
//! `admin-data.json` files.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::ContentError;

/// Identifier of a notice, unique within the `notices` partition.
pub type NoticeId = u64;

// ── Records ────────────────────────────────────────────────────────

/// A notice/announcement shown on the public notices board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: NoticeId,
    pub category: String,
    pub title: String,
    pub content: String,
    /// Publication date, `YYYY-MM-DD` on the wire.
    pub date: NaiveDate,
    #[serde(default)]
    pub views: u64,
}

/// Landing page hero copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeroConfig {
    pub main_copy: String,
    pub sub_copy: String,
    pub cta_text: String,
}

/// Company contact and registration details shown in the footer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub name: String,
    pub name_en: String,
    pub ceo: String,
    pub address: String,
    pub address_detail: String,
    pub business_number: String,
    pub phone: String,
    pub fax: String,
    pub email: String,
    pub copyright_year: i32,
}

/// Social profile URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    pub github: String,
    pub linkedin: String,
    pub twitter: String,
}

/// A technology card on the landing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Technology {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub icon: String,
    /// CSS gradient classes, e.g. `from-blue-500 to-cyan-500`.
    pub gradient: String,
}

// ── Document ───────────────────────────────────────────────────────

/// The single persisted aggregate. Missing keys in a stored file are
/// filled from the seed values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentDocument {
    pub notices: Vec<Notice>,
    pub hero: HeroConfig,
    pub company: CompanyInfo,
    pub social: SocialLinks,
    pub technologies: Vec<Technology>,
    pub last_updated: DateTime<Utc>,
}

impl Default for ContentDocument {
    fn default() -> Self {
        Self {
            notices: defaults::notices(),
            hero: defaults::hero(),
            company: defaults::company(),
            social: defaults::social(),
            technologies: defaults::technologies(),
            last_updated: Utc::now(),
        }
    }
}

impl ContentDocument {
    /// Current value of one partition.
    pub fn partition(&self, name: PartitionName) -> Partition {
        match name {
            PartitionName::Notices => Partition::Notices(self.notices.clone()),
            PartitionName::Hero => Partition::Hero(self.hero.clone()),
            PartitionName::Company => Partition::Company(self.company.clone()),
            PartitionName::Social => Partition::Social(self.social.clone()),
            PartitionName::Technologies => Partition::Technologies(self.technologies.clone()),
        }
    }

    /// Restore one partition to its built-in value. `last_updated` is
    /// left to the caller.
    pub fn reset_partition(&mut self, name: PartitionName) {
        match name {
            PartitionName::Notices => self.notices = defaults::notices(),
            PartitionName::Hero => self.hero = defaults::hero(),
            PartitionName::Company => self.company = defaults::company(),
            PartitionName::Social => self.social = defaults::social(),
            PartitionName::Technologies => self.technologies = defaults::technologies(),
        }
    }

    pub fn notice(&self, id: NoticeId) -> Option<&Notice> {
        self.notices.iter().find(|n| n.id == id)
    }
}

// ── Partitions ─────────────────────────────────────────────────────

/// The fixed set of partition names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionName {
    Notices,
    Hero,
    Company,
    Social,
    Technologies,
}

impl PartitionName {
    pub const ALL: [PartitionName; 5] = [
        PartitionName::Notices,
        PartitionName::Hero,
        PartitionName::Company,
        PartitionName::Social,
        PartitionName::Technologies,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PartitionName::Notices => "notices",
            PartitionName::Hero => "hero",
            PartitionName::Company => "company",
            PartitionName::Social => "social",
            PartitionName::Technologies => "technologies",
        }
    }

    /// Singleton partitions merge on update; collections are replaced.
    pub fn is_singleton(self) -> bool {
        matches!(
            self,
            PartitionName::Hero | PartitionName::Company | PartitionName::Social
        )
    }
}

impl fmt::Display for PartitionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartitionName {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartitionName::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ContentError::InvalidPartition(s.to_string()))
    }
}

/// The value of a single partition. Serializes as the bare record or list.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Partition {
    Notices(Vec<Notice>),
    Hero(HeroConfig),
    Company(CompanyInfo),
    Social(SocialLinks),
    Technologies(Vec<Technology>),
}
