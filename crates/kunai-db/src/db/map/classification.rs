//! Open classification values over the closed access-level column.
//!
//! Values the column cannot hold exactly keep their original text in a
//! `CLASS` side record.

use kunai_rfc::rfc::ical::core::{Classification, ClassificationKind, UnknownProperty};

use super::side_record::SideRecord;
use crate::db::enums::AccessLevel;

/// Property name of the classification side record.
pub const CLASS_PROPERTY: &str = "CLASS";

/// Row form of a classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedClassification {
    pub access_level: Option<AccessLevel>,
    pub side_record: SideRecord,
}

/// ## Summary
/// Maps a classification onto the access-level code and its side record.
///
/// Public and private fit the column exactly. Confidential and extension
/// tokens store the original value in a side record; extension tokens take
/// the private code.
#[must_use]
pub fn encode_classification(classification: Option<&Classification>) -> EncodedClassification {
    let (access_level, needs_record) = match classification {
        None => (None, false),
        Some(Classification::Known(ClassificationKind::Public)) => (Some(AccessLevel::Public), false),
        Some(Classification::Known(ClassificationKind::Private)) => (Some(AccessLevel::Private), false),
        Some(Classification::Known(ClassificationKind::Confidential)) => {
            (Some(AccessLevel::Confidential), true)
        }
        Some(Classification::Extension(_)) => (Some(AccessLevel::Private), true),
    };

    let side_record = match classification {
        Some(value) if needs_record => {
            SideRecord::Write(UnknownProperty::new(CLASS_PROPERTY, value.as_str()))
        }
        _ => SideRecord::Clear,
    };

    EncodedClassification {
        access_level,
        side_record,
    }
}

/// ## Summary
/// Recovers a classification from the access-level code and the `CLASS` side record.
///
/// Restricted codes prefer the side record. A missing code with no side
/// record means no classification; unknown codes read as private.
#[must_use]
pub fn decode_classification(
    code: Option<i64>,
    side_record: Option<&UnknownProperty>,
) -> Option<Classification> {
    let recorded = side_record.map(|property| Classification::parse(&property.value));

    match code {
        None => recorded,
        Some(code) => match AccessLevel::from_code(code) {
            Some(AccessLevel::Public) => Some(Classification::PUBLIC),
            Some(AccessLevel::Private) => recorded.or(Some(Classification::PRIVATE)),
            Some(AccessLevel::Confidential) => recorded.or(Some(Classification::CONFIDENTIAL)),
            None => {
                tracing::warn!(code, "Unknown access level code, reading as private");
                recorded.or(Some(Classification::PRIVATE))
            }
        },
    }
}
