//! Module: requests
//! Responsibility: typed search/get request messages and the paging contract
//! they share.
//! Does not own: page-size defaulting or token semantics (dispatcher policy).
//! Boundary: every request body decoded off the wire is one of these types.

use serde::{Deserialize, Serialize};

///
/// PagedRequest
///
/// Shared paging surface of every search request: an opaque resumption token
/// (empty = start of sequence) and a requested page size (0 = apply the
/// configured default; negative is rejected by the dispatcher).
///

pub trait PagedRequest {
    fn page_token(&self) -> &str;

    fn page_size(&self) -> i32;

    /// Overwrite the page size after default resolution.
    fn set_page_size(&mut self, page_size: i32);
}

// Implements PagedRequest over the conventional `page_size`/`page_token`
// field pair carried by every search request.
macro_rules! paged_request {
    ($($name:ident),+ $(,)?) => {
        $(
            impl PagedRequest for $name {
                fn page_token(&self) -> &str {
                    &self.page_token
                }

                fn page_size(&self) -> i32 {
                    self.page_size
                }

                fn set_page_size(&mut self, page_size: i32) {
                    self.page_size = page_size;
                }
            }
        )+
    };
}

///
/// SearchDatasetsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchDatasetsRequest {
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchExperimentsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchExperimentsRequest {
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchBiosamplesRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchBiosamplesRequest {
    pub dataset_id: String,
    pub name: String,
    pub individual_id: String,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchIndividualsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchIndividualsRequest {
    pub dataset_id: String,
    pub name: String,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchReferenceSetsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchReferenceSetsRequest {
    pub md5checksum: String,
    pub accession: String,
    pub assembly_id: String,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchReferencesRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchReferencesRequest {
    pub reference_set_id: String,
    pub md5checksum: String,
    pub accession: String,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchVariantSetsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchVariantSetsRequest {
    pub dataset_id: String,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchVariantAnnotationSetsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchVariantAnnotationSetsRequest {
    pub variant_set_id: String,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchVariantsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchVariantsRequest {
    pub variant_set_id: String,
    pub reference_name: String,
    pub start: u64,
    pub end: u64,
    pub call_set_ids: Vec<String>,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchVariantAnnotationsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchVariantAnnotationsRequest {
    pub variant_annotation_set_id: String,
    pub reference_name: String,
    pub start: u64,
    pub end: u64,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchGenotypesRequest
///
/// Carries the paging pair for wire symmetry, but the genotype endpoint
/// consumes its source to exhaustion and ignores both fields.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchGenotypesRequest {
    pub variant_set_id: String,
    pub reference_name: String,
    pub start: u64,
    pub end: u64,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchCallSetsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCallSetsRequest {
    pub variant_set_id: String,
    pub name: String,
    pub biosample_id: String,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchReadGroupSetsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchReadGroupSetsRequest {
    pub dataset_id: String,
    pub name: String,
    pub biosample_id: String,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchReadsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchReadsRequest {
    pub read_group_ids: Vec<String>,
    pub reference_id: String,
    pub start: u64,
    pub end: u64,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchFeatureSetsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFeatureSetsRequest {
    pub dataset_id: String,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchFeaturesRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFeaturesRequest {
    pub feature_set_id: String,
    pub parent_id: String,
    pub reference_name: String,
    pub start: u64,
    pub end: u64,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchContinuousSetsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchContinuousSetsRequest {
    pub dataset_id: String,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchContinuousRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchContinuousRequest {
    pub continuous_set_id: String,
    pub reference_name: String,
    pub start: u64,
    pub end: u64,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchRnaQuantificationSetsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRnaQuantificationSetsRequest {
    pub dataset_id: String,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchRnaQuantificationsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRnaQuantificationsRequest {
    pub rna_quantification_set_id: String,
    pub biosample_id: String,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchExpressionLevelsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchExpressionLevelsRequest {
    pub rna_quantification_id: String,
    pub names: Vec<String>,
    pub threshold: f64,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchPhenotypesRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchPhenotypesRequest {
    pub phenotype_association_set_id: String,
    pub id: String,
    pub description: String,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchGenotypePhenotypesRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchGenotypePhenotypesRequest {
    pub phenotype_association_set_id: String,
    pub feature_ids: Vec<String>,
    pub page_size: i32,
    pub page_token: String,
}

///
/// SearchPhenotypeAssociationSetsRequest
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchPhenotypeAssociationSetsRequest {
    pub dataset_id: String,
    pub page_size: i32,
    pub page_token: String,
}

///
/// ListReferenceBasesRequest
///
/// Not a `PagedRequest`: base retrieval paginates by byte offset with a
/// fixed chunk size, so there is no client-controlled page size.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListReferenceBasesRequest {
    pub reference_id: String,
    pub start: u64,
    pub end: u64,
    pub page_token: String,
}

paged_request!(
    SearchDatasetsRequest,
    SearchExperimentsRequest,
    SearchBiosamplesRequest,
    SearchIndividualsRequest,
    SearchReferenceSetsRequest,
    SearchReferencesRequest,
    SearchVariantSetsRequest,
    SearchVariantAnnotationSetsRequest,
    SearchVariantsRequest,
    SearchVariantAnnotationsRequest,
    SearchGenotypesRequest,
    SearchCallSetsRequest,
    SearchReadGroupSetsRequest,
    SearchReadsRequest,
    SearchFeatureSetsRequest,
    SearchFeaturesRequest,
    SearchContinuousSetsRequest,
    SearchContinuousRequest,
    SearchRnaQuantificationSetsRequest,
    SearchRnaQuantificationsRequest,
    SearchExpressionLevelsRequest,
    SearchPhenotypesRequest,
    SearchGenotypePhenotypesRequest,
    SearchPhenotypeAssociationSetsRequest,
);
