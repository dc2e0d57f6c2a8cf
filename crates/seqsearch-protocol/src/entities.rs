//! Module: entities
//! Responsibility: protocol representations of repository objects.
//! Does not own: repository records, filtering, or identifier semantics.
//! Boundary: every value in a search/get response body is one of these types.

use serde::{Deserialize, Serialize};

///
/// Dataset
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub description: String,
}

///
/// Experiment
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experiment {
    pub id: String,
    pub name: String,
    pub description: String,
}

///
/// Biosample
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Biosample {
    pub id: String,
    pub dataset_id: String,
    pub name: String,
    pub individual_id: String,
}

///
/// Individual
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Individual {
    pub id: String,
    pub dataset_id: String,
    pub name: String,
}

///
/// ReferenceSet
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceSet {
    pub id: String,
    pub name: String,
    pub md5checksum: String,
    pub assembly_id: String,
    pub source_accessions: Vec<String>,
}

///
/// Reference
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reference {
    pub id: String,
    pub name: String,
    pub length: u64,
    pub md5checksum: String,
    pub source_accessions: Vec<String>,
}

///
/// ReadGroup
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadGroup {
    pub id: String,
    pub name: String,
    pub biosample_id: String,
}

///
/// ReadGroupSet
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadGroupSet {
    pub id: String,
    pub dataset_id: String,
    pub name: String,
    pub read_groups: Vec<ReadGroup>,
}

///
/// ReadAlignment
///
/// Flattened linear alignment: `reference_id` plus `alignment_start` stand in
/// for the nested position message of the full schema.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadAlignment {
    pub id: String,
    pub read_group_id: String,
    pub fragment_name: String,
    pub reference_id: String,
    pub alignment_start: u64,
    pub aligned_sequence: String,
}

///
/// VariantSet
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariantSet {
    pub id: String,
    pub dataset_id: String,
    pub name: String,
    pub reference_set_id: String,
}

///
/// Call
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Call {
    pub call_set_id: String,
    pub genotype: Vec<i32>,
}

///
/// Variant
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Variant {
    pub id: String,
    pub variant_set_id: String,
    pub reference_name: String,
    pub start: u64,
    pub end: u64,
    pub reference_bases: String,
    pub alternate_bases: Vec<String>,
    pub calls: Vec<Call>,
}

///
/// CallSet
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallSet {
    pub id: String,
    pub name: String,
    pub biosample_id: String,
    pub variant_set_ids: Vec<String>,
}

///
/// VariantAnnotationSet
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariantAnnotationSet {
    pub id: String,
    pub variant_set_id: String,
    pub name: String,
}

///
/// VariantAnnotation
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariantAnnotation {
    pub id: String,
    pub variant_annotation_set_id: String,
    pub variant_id: String,
    pub reference_name: String,
    pub start: u64,
    pub end: u64,
}

///
/// FeatureSet
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureSet {
    pub id: String,
    pub dataset_id: String,
    pub name: String,
    pub reference_set_id: String,
}

///
/// Feature
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Feature {
    pub id: String,
    pub feature_set_id: String,
    pub parent_id: String,
    pub name: String,
    pub reference_name: String,
    pub start: u64,
    pub end: u64,
}

///
/// ContinuousSet
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContinuousSet {
    pub id: String,
    pub dataset_id: String,
    pub name: String,
}

///
/// Continuous
///
/// One run of signal values starting at `start` on `reference_name`.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Continuous {
    pub reference_name: String,
    pub start: u64,
    pub values: Vec<f64>,
}

///
/// RnaQuantificationSet
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RnaQuantificationSet {
    pub id: String,
    pub dataset_id: String,
    pub name: String,
}

///
/// RnaQuantification
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RnaQuantification {
    pub id: String,
    pub rna_quantification_set_id: String,
    pub name: String,
    pub biosample_id: String,
}

///
/// ExpressionLevel
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpressionLevel {
    pub id: String,
    pub rna_quantification_id: String,
    pub name: String,
    pub expression: f64,
}

///
/// PhenotypeAssociationSet
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhenotypeAssociationSet {
    pub id: String,
    pub dataset_id: String,
    pub name: String,
}

///
/// PhenotypeInstance
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhenotypeInstance {
    pub id: String,
    pub description: String,
}

///
/// FeaturePhenotypeAssociation
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeaturePhenotypeAssociation {
    pub id: String,
    pub phenotype_association_set_id: String,
    pub feature_ids: Vec<String>,
    pub phenotype: PhenotypeInstance,
    pub description: String,
}

///
/// Genotypes
///
/// Row-major genotype matrix: `genotypes` holds `nvariants * nindividuals`
/// entries, one variant per row.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Genotypes {
    pub nvariants: u64,
    pub nindividuals: u64,
    pub genotypes: Vec<i32>,
}
