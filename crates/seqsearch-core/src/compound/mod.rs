//! Module: compound
//! Responsibility: the hierarchical opaque-identifier scheme — one typed
//! variant per addressable entity, each a fixed-arity ordered list of
//! local-id segments behind a self-describing type tag.
//! Does not own: repository lookup (callers resolve segments) or token
//! cursors (`paging::cursor`).
//!
//! Invariants:
//! - Parsing is deterministic and lossless: `encode(parse(id)) == id`.
//! - A wrong tag, wrong segment count, or empty segment is malformed.
//! - A parsed child identifier exposes its ancestors without extra lookups.

#[cfg(test)]
mod tests;

use crate::error::ServerError;
use std::fmt::{self, Display};

/// Separates the type tag and local-id segments of an encoded identifier.
pub const SEPARATOR: char = ':';

// Defines one compound identifier variant: a typed fixed-arity segment list
// with its tag, lossless parse/encode, and Display producing the encoded form.
macro_rules! compound_id {
    ($(
        $(#[$meta:meta])*
        $name:ident {
            tag: $tag:literal,
            fields: [$($field:ident),+ $(,)?]
        }
    )+) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Debug, Eq, Hash, PartialEq)]
            pub struct $name {
                $(pub $field: String,)+
            }

            impl $name {
                /// Self-describing type tag leading every encoded form.
                pub const TAG: &'static str = $tag;

                /// Number of local-id segments following the tag.
                pub const ARITY: usize = [$(stringify!($field)),+].len();

                #[must_use]
                pub fn new($($field: impl Into<String>),+) -> Self {
                    Self {
                        $($field: $field.into(),)+
                    }
                }

                /// Parse an encoded identifier into this variant.
                pub fn parse(text: &str) -> Result<Self, ServerError> {
                    let malformed = || ServerError::MalformedId {
                        id: text.to_string(),
                        expected: Self::TAG,
                    };

                    let mut parts = text.split(SEPARATOR);
                    if parts.next() != Some(Self::TAG) {
                        return Err(malformed());
                    }

                    let segments: Vec<&str> = parts.collect();
                    if segments.len() != Self::ARITY
                        || segments.iter().any(|segment| segment.is_empty())
                    {
                        return Err(malformed());
                    }

                    let mut segments = segments.into_iter();
                    Ok(Self {
                        $($field: segments.next().unwrap_or_default().to_string(),)+
                    })
                }
            }

            impl Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", Self::TAG)?;
                    $(write!(f, "{SEPARATOR}{}", self.$field)?;)+
                    Ok(())
                }
            }
        )+
    };
}

compound_id! {
    ///
    /// DatasetId
    ///
    DatasetId {
        tag: "dataset",
        fields: [dataset]
    }

    ///
    /// ReferenceSetId
    ///
    ReferenceSetId {
        tag: "referenceset",
        fields: [reference_set]
    }

    ///
    /// ReferenceId
    ///
    ReferenceId {
        tag: "reference",
        fields: [reference_set, reference]
    }

    ///
    /// ReadGroupSetId
    ///
    ReadGroupSetId {
        tag: "readgroupset",
        fields: [dataset, read_group_set]
    }

    ///
    /// ReadGroupId
    ///
    ReadGroupId {
        tag: "readgroup",
        fields: [dataset, read_group_set, read_group]
    }

    ///
    /// VariantSetId
    ///
    VariantSetId {
        tag: "variantset",
        fields: [dataset, variant_set]
    }

    ///
    /// VariantAnnotationSetId
    ///
    VariantAnnotationSetId {
        tag: "variantannotationset",
        fields: [dataset, variant_set, annotation_set]
    }

    ///
    /// VariantId
    ///
    VariantId {
        tag: "variant",
        fields: [dataset, variant_set, variant]
    }

    ///
    /// CallSetId
    ///
    CallSetId {
        tag: "callset",
        fields: [dataset, variant_set, call_set]
    }

    ///
    /// FeatureSetId
    ///
    FeatureSetId {
        tag: "featureset",
        fields: [dataset, feature_set]
    }

    ///
    /// FeatureId
    ///
    FeatureId {
        tag: "feature",
        fields: [dataset, feature_set, feature]
    }

    ///
    /// ContinuousSetId
    ///
    ContinuousSetId {
        tag: "continuousset",
        fields: [dataset, continuous_set]
    }

    ///
    /// BiosampleId
    ///
    BiosampleId {
        tag: "biosample",
        fields: [dataset, biosample]
    }

    ///
    /// IndividualId
    ///
    IndividualId {
        tag: "individual",
        fields: [dataset, individual]
    }

    ///
    /// RnaQuantificationSetId
    ///
    RnaQuantificationSetId {
        tag: "rnaquantificationset",
        fields: [dataset, rna_quantification_set]
    }

    ///
    /// RnaQuantificationId
    ///
    RnaQuantificationId {
        tag: "rnaquantification",
        fields: [dataset, rna_quantification_set, rna_quantification]
    }

    ///
    /// ExpressionLevelId
    ///
    ExpressionLevelId {
        tag: "expressionlevel",
        fields: [dataset, rna_quantification_set, rna_quantification, expression_level]
    }

    ///
    /// PhenotypeAssociationSetId
    ///
    PhenotypeAssociationSetId {
        tag: "phenotypeassociationset",
        fields: [dataset, phenotype_association_set]
    }
}

// Ancestor accessors: a parsed child identifier already carries its ancestor
// path, so deriving a container id never needs a second lookup round-trip.

impl ReadGroupId {
    #[must_use]
    pub fn read_group_set_id(&self) -> ReadGroupSetId {
        ReadGroupSetId::new(self.dataset.clone(), self.read_group_set.clone())
    }
}

impl VariantAnnotationSetId {
    #[must_use]
    pub fn variant_set_id(&self) -> VariantSetId {
        VariantSetId::new(self.dataset.clone(), self.variant_set.clone())
    }
}

impl VariantId {
    #[must_use]
    pub fn variant_set_id(&self) -> VariantSetId {
        VariantSetId::new(self.dataset.clone(), self.variant_set.clone())
    }
}

impl CallSetId {
    #[must_use]
    pub fn variant_set_id(&self) -> VariantSetId {
        VariantSetId::new(self.dataset.clone(), self.variant_set.clone())
    }
}

impl FeatureId {
    #[must_use]
    pub fn feature_set_id(&self) -> FeatureSetId {
        FeatureSetId::new(self.dataset.clone(), self.feature_set.clone())
    }

    #[must_use]
    pub fn dataset_id(&self) -> DatasetId {
        DatasetId::new(self.dataset.clone())
    }
}

impl RnaQuantificationId {
    #[must_use]
    pub fn rna_quantification_set_id(&self) -> RnaQuantificationSetId {
        RnaQuantificationSetId::new(self.dataset.clone(), self.rna_quantification_set.clone())
    }
}

impl ExpressionLevelId {
    #[must_use]
    pub fn rna_quantification_id(&self) -> RnaQuantificationId {
        RnaQuantificationId::new(
            self.dataset.clone(),
            self.rna_quantification_set.clone(),
            self.rna_quantification.clone(),
        )
    }
}
