//! Typed partition updates.
//!
//! A [`PartitionUpdate`] carries the payload for exactly one partition.
//! Singleton partitions take a patch whose fields are all optional and
//! are merged over the stored record; collection partitions take the
//! complete replacement list.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ContentError, ContentResult};
use crate::types::*;

/// Declare a patch struct for a singleton record. Every field becomes
/// optional; `apply_to` overwrites only the fields that are present.
macro_rules! singleton_patch {
    ($(#[$meta:meta])* $patch:ident => $target:ident { $($field:ident: $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $patch {
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl $patch {
            /// Merge the present fields into `target`.
            pub fn apply_to(self, target: &mut $target) {
                $(
                    if let Some(value) = self.$field {
                        target.$field = value;
                    }
                )*
            }

            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())*
            }
        }
    };
}

singleton_patch! {
    /// Partial update of [`HeroConfig`].
    HeroPatch => HeroConfig {
        main_copy: String,
        sub_copy: String,
        cta_text: String,
    }
}

singleton_patch! {
    /// Partial update of [`CompanyInfo`].
    CompanyPatch => CompanyInfo {
        name: String,
        name_en: String,
        ceo: String,
        address: String,
        address_detail: String,
        business_number: String,
        phone: String,
        fax: String,
        email: String,
        copyright_year: i32,
    }
}

singleton_patch! {
    /// Partial update of [`SocialLinks`].
    SocialPatch => SocialLinks {
        github: String,
        linkedin: String,
        twitter: String,
    }
}

/// An update to exactly one partition.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionUpdate {
    Notices(Vec<Notice>),
    Hero(HeroPatch),
    Company(CompanyPatch),
    Social(SocialPatch),
    Technologies(Vec<Technology>),
}

impl PartitionUpdate {
    /// Decode an untyped request payload for the given partition.
    ///
    /// A `null` payload counts as missing. Singleton partitions require a
    /// JSON object, collections a JSON array of complete records.
    pub fn from_json(name: PartitionName, data: Value) -> ContentResult<Self> {
        if data.is_null() {
            return Err(ContentError::MissingField("data"));
        }
        if name.is_singleton() && !data.is_object() {
            return Err(invalid(name, "expected an object"));
        }
        if !name.is_singleton() && !data.is_array() {
            return Err(invalid(name, "expected an array"));
        }

        let update = match name {
            PartitionName::Notices => Self::Notices(decode(name, data)?),
            PartitionName::Hero => Self::Hero(decode(name, data)?),
            PartitionName::Company => Self::Company(decode(name, data)?),
            PartitionName::Social => Self::Social(decode(name, data)?),
            PartitionName::Technologies => Self::Technologies(decode(name, data)?),
        };
        Ok(update)
    }

    pub fn partition(&self) -> PartitionName {
        match self {
            Self::Notices(_) => PartitionName::Notices,
            Self::Hero(_) => PartitionName::Hero,
            Self::Company(_) => PartitionName::Company,
            Self::Social(_) => PartitionName::Social,
            Self::Technologies(_) => PartitionName::Technologies,
        }
    }

    /// Apply the update to the document. Does not touch `last_updated`.
    pub fn apply(self, doc: &mut ContentDocument) {
        match self {
            Self::Notices(notices) => doc.notices = notices,
            Self::Hero(patch) => patch.apply_to(&mut doc.hero),
            Self::Company(patch) => patch.apply_to(&mut doc.company),
            Self::Social(patch) => patch.apply_to(&mut doc.social),
            Self::Technologies(technologies) => doc.technologies = technologies,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(name: PartitionName, data: Value) -> ContentResult<T> {
    serde_json::from_value(data).map_err(|e| invalid(name, &e.to_string()))
}

fn invalid(name: PartitionName, reason: &str) -> ContentError {
    ContentError::InvalidPatch {
        partition: name.to_string(),
        reason: reason.to_string(),
    }
}
