//! Module: repo
//! Responsibility: the narrow repository contract this engine consumes, and
//! the container records it navigates — each record couples a protocol
//! element with its local identity, filter metadata, and child collections.
//! Does not own: pagination, response bounding, or identifier parsing.
//!
//! The repository is read-only for the lifetime of a dispatch; no locking is
//! performed here.

pub mod interval;
pub mod memory;

use crate::{
    compound::{
        BiosampleId, CallSetId, ContinuousSetId, DatasetId, FeatureSetId, IndividualId,
        PhenotypeAssociationSetId, ReadGroupId, ReadGroupSetId, ReferenceId, ReferenceSetId,
        RnaQuantificationId, RnaQuantificationSetId, VariantAnnotationSetId, VariantSetId,
    },
    error::ServerError,
};
use seqsearch_protocol::entities::*;

///
/// DataRepository
///
/// Synchronous, side-effect-free access to the top level of the data
/// hierarchy. Everything below a dataset or reference set is navigated
/// through the records themselves.
///

pub trait DataRepository {
    fn num_datasets(&self) -> usize;

    fn dataset_by_index(&self, index: usize) -> &DatasetRecord;

    fn get_dataset(&self, local_id: &str) -> Result<&DatasetRecord, ServerError>;

    fn num_experiments(&self) -> usize;

    fn experiment_by_index(&self, index: usize) -> &ExperimentRecord;

    fn get_experiment(&self, local_id: &str) -> Result<&ExperimentRecord, ServerError>;

    fn reference_sets(&self) -> &[ReferenceSetRecord];

    fn get_reference_set(&self, local_id: &str) -> Result<&ReferenceSetRecord, ServerError>;
}

///
/// ExperimentRecord
///

#[derive(Clone, Debug)]
pub struct ExperimentRecord {
    pub local_id: String,
    pub element: Experiment,
}

impl ExperimentRecord {
    pub fn new(local_id: impl Into<String>) -> Self {
        let local_id = local_id.into();
        let element = Experiment {
            id: local_id.clone(),
            name: local_id.clone(),
            description: String::new(),
        };

        Self { local_id, element }
    }
}

///
/// DatasetRecord
///

#[derive(Clone, Debug, Default)]
pub struct DatasetRecord {
    pub local_id: String,
    pub element: Dataset,
    pub biosamples: Vec<BiosampleRecord>,
    pub individuals: Vec<IndividualRecord>,
    pub read_group_sets: Vec<ReadGroupSetRecord>,
    pub variant_sets: Vec<VariantSetRecord>,
    pub feature_sets: Vec<FeatureSetRecord>,
    pub continuous_sets: Vec<ContinuousSetRecord>,
    pub rna_quantification_sets: Vec<RnaQuantificationSetRecord>,
    pub phenotype_association_sets: Vec<PhenotypeAssociationSetRecord>,
}

impl DatasetRecord {
    pub fn new(local_id: impl Into<String>) -> Self {
        let local_id = local_id.into();
        let element = Dataset {
            id: DatasetId::new(local_id.clone()).to_string(),
            name: local_id.clone(),
            description: String::new(),
        };

        Self {
            local_id,
            element,
            ..Self::default()
        }
    }

    pub fn get_biosample(&self, local_id: &str) -> Result<&BiosampleRecord, ServerError> {
        self.biosamples
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| {
                ServerError::not_found(
                    BiosampleId::new(self.local_id.clone(), local_id).to_string(),
                )
            })
    }

    pub fn get_individual(&self, local_id: &str) -> Result<&IndividualRecord, ServerError> {
        self.individuals
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| {
                ServerError::not_found(
                    IndividualId::new(self.local_id.clone(), local_id).to_string(),
                )
            })
    }

    pub fn get_read_group_set(&self, local_id: &str) -> Result<&ReadGroupSetRecord, ServerError> {
        self.read_group_sets
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| {
                ServerError::not_found(
                    ReadGroupSetId::new(self.local_id.clone(), local_id).to_string(),
                )
            })
    }

    pub fn get_variant_set(&self, local_id: &str) -> Result<&VariantSetRecord, ServerError> {
        self.variant_sets
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| {
                ServerError::not_found(
                    VariantSetId::new(self.local_id.clone(), local_id).to_string(),
                )
            })
    }

    pub fn get_feature_set(&self, local_id: &str) -> Result<&FeatureSetRecord, ServerError> {
        self.feature_sets
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| {
                ServerError::not_found(
                    FeatureSetId::new(self.local_id.clone(), local_id).to_string(),
                )
            })
    }

    pub fn get_continuous_set(&self, local_id: &str) -> Result<&ContinuousSetRecord, ServerError> {
        self.continuous_sets
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| {
                ServerError::not_found(
                    ContinuousSetId::new(self.local_id.clone(), local_id).to_string(),
                )
            })
    }

    pub fn get_rna_quantification_set(
        &self,
        local_id: &str,
    ) -> Result<&RnaQuantificationSetRecord, ServerError> {
        self.rna_quantification_sets
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| {
                ServerError::not_found(
                    RnaQuantificationSetId::new(self.local_id.clone(), local_id).to_string(),
                )
            })
    }

    pub fn get_phenotype_association_set(
        &self,
        local_id: &str,
    ) -> Result<&PhenotypeAssociationSetRecord, ServerError> {
        self.phenotype_association_sets
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| {
                ServerError::not_found(
                    PhenotypeAssociationSetId::new(self.local_id.clone(), local_id).to_string(),
                )
            })
    }
}

///
/// BiosampleRecord
///

#[derive(Clone, Debug)]
pub struct BiosampleRecord {
    pub local_id: String,
    pub element: Biosample,
}

impl BiosampleRecord {
    /// `individual_local_id` may be empty for samples without a donor link.
    pub fn new(
        dataset_local_id: &str,
        local_id: impl Into<String>,
        individual_local_id: &str,
    ) -> Self {
        let local_id = local_id.into();
        let individual_id = if individual_local_id.is_empty() {
            String::new()
        } else {
            IndividualId::new(dataset_local_id, individual_local_id).to_string()
        };
        let element = Biosample {
            id: BiosampleId::new(dataset_local_id, local_id.clone()).to_string(),
            dataset_id: DatasetId::new(dataset_local_id).to_string(),
            name: local_id.clone(),
            individual_id,
        };

        Self { local_id, element }
    }
}

///
/// IndividualRecord
///

#[derive(Clone, Debug)]
pub struct IndividualRecord {
    pub local_id: String,
    pub element: Individual,
}

impl IndividualRecord {
    pub fn new(dataset_local_id: &str, local_id: impl Into<String>) -> Self {
        let local_id = local_id.into();
        let element = Individual {
            id: IndividualId::new(dataset_local_id, local_id.clone()).to_string(),
            dataset_id: DatasetId::new(dataset_local_id).to_string(),
            name: local_id.clone(),
        };

        Self { local_id, element }
    }
}

///
/// ReferenceSetRecord
///

#[derive(Clone, Debug)]
pub struct ReferenceSetRecord {
    pub local_id: String,
    pub element: ReferenceSet,
    pub references: Vec<ReferenceRecord>,
}

impl ReferenceSetRecord {
    pub fn new(local_id: impl Into<String>) -> Self {
        let local_id = local_id.into();
        let element = ReferenceSet {
            id: ReferenceSetId::new(local_id.clone()).to_string(),
            name: local_id.clone(),
            ..ReferenceSet::default()
        };

        Self {
            local_id,
            element,
            references: Vec::new(),
        }
    }

    pub fn get_reference(&self, local_id: &str) -> Result<&ReferenceRecord, ServerError> {
        self.references
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| {
                ServerError::not_found(
                    ReferenceId::new(self.local_id.clone(), local_id).to_string(),
                )
            })
    }
}

///
/// ReferenceRecord
///
/// Holds the full base-pair text of one reference sequence; range retrieval
/// slices it by byte offset.
///

#[derive(Clone, Debug)]
pub struct ReferenceRecord {
    pub local_id: String,
    pub element: Reference,
    pub bases: String,
}

impl ReferenceRecord {
    pub fn new(
        reference_set_local_id: &str,
        local_id: impl Into<String>,
        bases: impl Into<String>,
    ) -> Self {
        let local_id = local_id.into();
        let bases = bases.into();
        let element = Reference {
            id: ReferenceId::new(reference_set_local_id, local_id.clone()).to_string(),
            name: local_id.clone(),
            length: bases.len() as u64,
            ..Reference::default()
        };

        Self {
            local_id,
            element,
            bases,
        }
    }

    #[must_use]
    pub fn length(&self) -> u64 {
        self.bases.len() as u64
    }

    /// Slice `[start, end)` of the base text. Bases are ASCII, so byte
    /// offsets and base positions coincide.
    pub fn get_bases(&self, start: u64, end: u64) -> Result<&str, ServerError> {
        if start > end || end > self.length() {
            return Err(ServerError::bad_request(format!(
                "base range [{start}, {end}) is outside reference '{}' of length {}",
                self.element.id,
                self.length()
            )));
        }

        Ok(&self.bases[start as usize..end as usize])
    }
}

///
/// ReadGroupSetRecord
///

#[derive(Clone, Debug)]
pub struct ReadGroupSetRecord {
    pub local_id: String,
    /// Local id of the reference set this set's reads are mapped against.
    /// `None` models an unmapped read group set.
    pub reference_set_local_id: Option<String>,
    pub element: ReadGroupSet,
    pub read_groups: Vec<ReadGroupRecord>,
}

impl ReadGroupSetRecord {
    pub fn new(
        dataset_local_id: &str,
        local_id: impl Into<String>,
        reference_set_local_id: Option<String>,
    ) -> Self {
        let local_id = local_id.into();
        let element = ReadGroupSet {
            id: ReadGroupSetId::new(dataset_local_id, local_id.clone()).to_string(),
            dataset_id: DatasetId::new(dataset_local_id).to_string(),
            name: local_id.clone(),
            read_groups: Vec::new(),
        };

        Self {
            local_id,
            reference_set_local_id,
            element,
            read_groups: Vec::new(),
        }
    }

    /// Attach a read group, keeping the embedded protocol list in sync.
    pub fn push_read_group(&mut self, record: ReadGroupRecord) {
        self.element.read_groups.push(record.element.clone());
        self.read_groups.push(record);
    }

    pub fn get_read_group(&self, local_id: &str) -> Result<&ReadGroupRecord, ServerError> {
        self.read_groups
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| ServerError::not_found(format!("{}:{local_id}", self.element.id)))
    }

    /// Compound ids of every member read group, in order.
    #[must_use]
    pub fn read_group_ids(&self) -> Vec<String> {
        self.read_groups
            .iter()
            .map(|record| record.element.id.clone())
            .collect()
    }
}

///
/// ReadGroupRecord
///

#[derive(Clone, Debug)]
pub struct ReadGroupRecord {
    pub local_id: String,
    pub element: ReadGroup,
    /// Alignments sorted by `(alignment_start, id)` within each reference.
    pub reads: Vec<ReadAlignment>,
}

impl ReadGroupRecord {
    /// `biosample_local_id` may be empty for groups without a sample link.
    pub fn new(
        dataset_local_id: &str,
        read_group_set_local_id: &str,
        local_id: impl Into<String>,
        biosample_local_id: &str,
    ) -> Self {
        let local_id = local_id.into();
        let biosample_id = if biosample_local_id.is_empty() {
            String::new()
        } else {
            BiosampleId::new(dataset_local_id, biosample_local_id).to_string()
        };
        let element = ReadGroup {
            id: ReadGroupId::new(dataset_local_id, read_group_set_local_id, local_id.clone())
                .to_string(),
            name: local_id.clone(),
            biosample_id,
        };

        Self {
            local_id,
            element,
            reads: Vec::new(),
        }
    }
}

///
/// VariantSetRecord
///

#[derive(Clone, Debug)]
pub struct VariantSetRecord {
    pub local_id: String,
    pub element: VariantSet,
    /// Variants sorted by `(reference_name, start, id)`.
    pub variants: Vec<Variant>,
    pub call_sets: Vec<CallSetRecord>,
    pub annotation_sets: Vec<VariantAnnotationSetRecord>,
}

impl VariantSetRecord {
    pub fn new(
        dataset_local_id: &str,
        local_id: impl Into<String>,
        reference_set_local_id: &str,
    ) -> Self {
        let local_id = local_id.into();
        let element = VariantSet {
            id: VariantSetId::new(dataset_local_id, local_id.clone()).to_string(),
            dataset_id: DatasetId::new(dataset_local_id).to_string(),
            name: local_id.clone(),
            reference_set_id: ReferenceSetId::new(reference_set_local_id).to_string(),
        };

        Self {
            local_id,
            element,
            variants: Vec::new(),
            call_sets: Vec::new(),
            annotation_sets: Vec::new(),
        }
    }

    pub fn get_call_set(&self, local_id: &str) -> Result<&CallSetRecord, ServerError> {
        self.call_sets
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| ServerError::not_found(format!("{}:{local_id}", self.element.id)))
    }

    pub fn get_annotation_set(
        &self,
        local_id: &str,
    ) -> Result<&VariantAnnotationSetRecord, ServerError> {
        self.annotation_sets
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| ServerError::not_found(format!("{}:{local_id}", self.element.id)))
    }

    pub fn get_variant(&self, variant_id: &str) -> Result<&Variant, ServerError> {
        self.variants
            .iter()
            .find(|variant| variant.id == variant_id)
            .ok_or_else(|| ServerError::not_found(variant_id))
    }
}

///
/// CallSetRecord
///

#[derive(Clone, Debug)]
pub struct CallSetRecord {
    pub local_id: String,
    pub element: CallSet,
}

impl CallSetRecord {
    pub fn new(
        dataset_local_id: &str,
        variant_set_local_id: &str,
        local_id: impl Into<String>,
        biosample_local_id: &str,
    ) -> Self {
        let local_id = local_id.into();
        let biosample_id = if biosample_local_id.is_empty() {
            String::new()
        } else {
            BiosampleId::new(dataset_local_id, biosample_local_id).to_string()
        };
        let element = CallSet {
            id: CallSetId::new(dataset_local_id, variant_set_local_id, local_id.clone())
                .to_string(),
            name: local_id.clone(),
            biosample_id,
            variant_set_ids: vec![
                VariantSetId::new(dataset_local_id, variant_set_local_id).to_string(),
            ],
        };

        Self { local_id, element }
    }
}

///
/// VariantAnnotationSetRecord
///

#[derive(Clone, Debug)]
pub struct VariantAnnotationSetRecord {
    pub local_id: String,
    pub element: VariantAnnotationSet,
    /// Annotations sorted by `(reference_name, start, id)`.
    pub annotations: Vec<VariantAnnotation>,
}

impl VariantAnnotationSetRecord {
    pub fn new(
        dataset_local_id: &str,
        variant_set_local_id: &str,
        local_id: impl Into<String>,
    ) -> Self {
        let local_id = local_id.into();
        let element = VariantAnnotationSet {
            id: VariantAnnotationSetId::new(
                dataset_local_id,
                variant_set_local_id,
                local_id.clone(),
            )
            .to_string(),
            variant_set_id: VariantSetId::new(dataset_local_id, variant_set_local_id).to_string(),
            name: local_id.clone(),
        };

        Self {
            local_id,
            element,
            annotations: Vec::new(),
        }
    }
}

///
/// FeatureSetRecord
///

#[derive(Clone, Debug)]
pub struct FeatureSetRecord {
    pub local_id: String,
    pub element: FeatureSet,
    /// Features sorted by `(reference_name, start, id)`.
    pub features: Vec<Feature>,
}

impl FeatureSetRecord {
    pub fn new(dataset_local_id: &str, local_id: impl Into<String>) -> Self {
        let local_id = local_id.into();
        let element = FeatureSet {
            id: FeatureSetId::new(dataset_local_id, local_id.clone()).to_string(),
            dataset_id: DatasetId::new(dataset_local_id).to_string(),
            name: local_id.clone(),
            reference_set_id: String::new(),
        };

        Self {
            local_id,
            element,
            features: Vec::new(),
        }
    }

    pub fn get_feature(&self, feature_id: &str) -> Result<&Feature, ServerError> {
        self.features
            .iter()
            .find(|feature| feature.id == feature_id)
            .ok_or_else(|| ServerError::not_found(feature_id))
    }
}

///
/// ContinuousSetRecord
///

#[derive(Clone, Debug)]
pub struct ContinuousSetRecord {
    pub local_id: String,
    pub element: ContinuousSet,
    /// Signal runs sorted by `(reference_name, start)`.
    pub values: Vec<Continuous>,
}

impl ContinuousSetRecord {
    pub fn new(dataset_local_id: &str, local_id: impl Into<String>) -> Self {
        let local_id = local_id.into();
        let element = ContinuousSet {
            id: ContinuousSetId::new(dataset_local_id, local_id.clone()).to_string(),
            dataset_id: DatasetId::new(dataset_local_id).to_string(),
            name: local_id.clone(),
        };

        Self {
            local_id,
            element,
            values: Vec::new(),
        }
    }
}

///
/// RnaQuantificationSetRecord
///

#[derive(Clone, Debug)]
pub struct RnaQuantificationSetRecord {
    pub local_id: String,
    pub element: RnaQuantificationSet,
    pub quantifications: Vec<RnaQuantificationRecord>,
}

impl RnaQuantificationSetRecord {
    pub fn new(dataset_local_id: &str, local_id: impl Into<String>) -> Self {
        let local_id = local_id.into();
        let element = RnaQuantificationSet {
            id: RnaQuantificationSetId::new(dataset_local_id, local_id.clone()).to_string(),
            dataset_id: DatasetId::new(dataset_local_id).to_string(),
            name: local_id.clone(),
        };

        Self {
            local_id,
            element,
            quantifications: Vec::new(),
        }
    }

    pub fn get_rna_quantification(
        &self,
        local_id: &str,
    ) -> Result<&RnaQuantificationRecord, ServerError> {
        self.quantifications
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| ServerError::not_found(format!("{}:{local_id}", self.element.id)))
    }
}

///
/// RnaQuantificationRecord
///

#[derive(Clone, Debug)]
pub struct RnaQuantificationRecord {
    pub local_id: String,
    pub element: RnaQuantification,
    pub expression_levels: Vec<ExpressionLevel>,
}

impl RnaQuantificationRecord {
    pub fn new(
        dataset_local_id: &str,
        rna_quantification_set_local_id: &str,
        local_id: impl Into<String>,
        biosample_local_id: &str,
    ) -> Self {
        let local_id = local_id.into();
        let biosample_id = if biosample_local_id.is_empty() {
            String::new()
        } else {
            BiosampleId::new(dataset_local_id, biosample_local_id).to_string()
        };
        let element = RnaQuantification {
            id: RnaQuantificationId::new(
                dataset_local_id,
                rna_quantification_set_local_id,
                local_id.clone(),
            )
            .to_string(),
            rna_quantification_set_id: RnaQuantificationSetId::new(
                dataset_local_id,
                rna_quantification_set_local_id,
            )
            .to_string(),
            name: local_id.clone(),
            biosample_id,
        };

        Self {
            local_id,
            element,
            expression_levels: Vec::new(),
        }
    }

    pub fn get_expression_level(
        &self,
        expression_level_id: &str,
    ) -> Result<&ExpressionLevel, ServerError> {
        self.expression_levels
            .iter()
            .find(|level| level.id == expression_level_id)
            .ok_or_else(|| ServerError::not_found(expression_level_id))
    }
}

///
/// PhenotypeAssociationSetRecord
///

#[derive(Clone, Debug)]
pub struct PhenotypeAssociationSetRecord {
    pub local_id: String,
    pub element: PhenotypeAssociationSet,
    pub associations: Vec<FeaturePhenotypeAssociation>,
}

impl PhenotypeAssociationSetRecord {
    pub fn new(dataset_local_id: &str, local_id: impl Into<String>) -> Self {
        let local_id = local_id.into();
        let element = PhenotypeAssociationSet {
            id: PhenotypeAssociationSetId::new(dataset_local_id, local_id.clone()).to_string(),
            dataset_id: DatasetId::new(dataset_local_id).to_string(),
            name: local_id.clone(),
        };

        Self {
            local_id,
            element,
            associations: Vec::new(),
        }
    }
}
