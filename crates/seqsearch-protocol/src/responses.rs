//! Module: responses
//! Responsibility: typed search response envelopes and the accumulator-facing
//! contract over them.
//! Does not own: size/count bounding or token production (accumulator policy).
//! Boundary: every response body serialized to the wire is one of these types.

use crate::entities::*;
use serde::{Deserialize, Serialize};

///
/// PagedResponse
///
/// Accumulator-facing surface of a search response envelope: a single ordered
/// result list plus the outgoing resumption token (empty when the underlying
/// sequence is exhausted).
///

pub trait PagedResponse: Default + Serialize {
    type Item: Serialize;

    fn results_mut(&mut self) -> &mut Vec<Self::Item>;

    fn set_next_page_token(&mut self, token: String);
}

// Defines one search response envelope: the named result list plus
// `nextPageToken`, with the PagedResponse impl wired to the list field.
macro_rules! paged_response {
    ($(
        $(#[$meta:meta])*
        $name:ident { $field:ident: $item:ty }
    )+) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
            #[serde(rename_all = "camelCase", default)]
            pub struct $name {
                pub $field: Vec<$item>,
                pub next_page_token: String,
            }

            impl PagedResponse for $name {
                type Item = $item;

                fn results_mut(&mut self) -> &mut Vec<$item> {
                    &mut self.$field
                }

                fn set_next_page_token(&mut self, token: String) {
                    self.next_page_token = token;
                }
            }
        )+
    };
}

paged_response! {
    ///
    /// SearchDatasetsResponse
    ///
    SearchDatasetsResponse { datasets: Dataset }

    ///
    /// SearchExperimentsResponse
    ///
    SearchExperimentsResponse { experiments: Experiment }

    ///
    /// SearchBiosamplesResponse
    ///
    SearchBiosamplesResponse { biosamples: Biosample }

    ///
    /// SearchIndividualsResponse
    ///
    SearchIndividualsResponse { individuals: Individual }

    ///
    /// SearchReferenceSetsResponse
    ///
    SearchReferenceSetsResponse { reference_sets: ReferenceSet }

    ///
    /// SearchReferencesResponse
    ///
    SearchReferencesResponse { references: Reference }

    ///
    /// SearchVariantSetsResponse
    ///
    SearchVariantSetsResponse { variant_sets: VariantSet }

    ///
    /// SearchVariantAnnotationSetsResponse
    ///
    SearchVariantAnnotationSetsResponse { variant_annotation_sets: VariantAnnotationSet }

    ///
    /// SearchVariantsResponse
    ///
    SearchVariantsResponse { variants: Variant }

    ///
    /// SearchVariantAnnotationsResponse
    ///
    SearchVariantAnnotationsResponse { variant_annotations: VariantAnnotation }

    ///
    /// SearchCallSetsResponse
    ///
    SearchCallSetsResponse { call_sets: CallSet }

    ///
    /// SearchReadGroupSetsResponse
    ///
    SearchReadGroupSetsResponse { read_group_sets: ReadGroupSet }

    ///
    /// SearchReadsResponse
    ///
    SearchReadsResponse { alignments: ReadAlignment }

    ///
    /// SearchFeatureSetsResponse
    ///
    SearchFeatureSetsResponse { feature_sets: FeatureSet }

    ///
    /// SearchFeaturesResponse
    ///
    SearchFeaturesResponse { features: Feature }

    ///
    /// SearchContinuousSetsResponse
    ///
    SearchContinuousSetsResponse { continuous_sets: ContinuousSet }

    ///
    /// SearchContinuousResponse
    ///
    SearchContinuousResponse { continuous: Continuous }

    ///
    /// SearchRnaQuantificationSetsResponse
    ///
    SearchRnaQuantificationSetsResponse { rna_quantification_sets: RnaQuantificationSet }

    ///
    /// SearchRnaQuantificationsResponse
    ///
    SearchRnaQuantificationsResponse { rna_quantifications: RnaQuantification }

    ///
    /// SearchExpressionLevelsResponse
    ///
    SearchExpressionLevelsResponse { expression_levels: ExpressionLevel }

    ///
    /// SearchPhenotypesResponse
    ///
    SearchPhenotypesResponse { phenotypes: PhenotypeInstance }

    ///
    /// SearchGenotypePhenotypesResponse
    ///
    SearchGenotypePhenotypesResponse { associations: FeaturePhenotypeAssociation }

    ///
    /// SearchPhenotypeAssociationSetsResponse
    ///
    SearchPhenotypeAssociationSetsResponse { phenotype_association_sets: PhenotypeAssociationSet }
}

///
/// SearchGenotypesResponse
///
/// Bespoke envelope: one concatenated genotype matrix, the matching variants
/// with per-variant calls stripped, and the call-set id list of the first
/// matrix row. Does not follow the one-list pagination contract.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchGenotypesResponse {
    pub genotypes: Genotypes,
    pub variants: Vec<Variant>,
    pub call_set_ids: Vec<String>,
    pub next_page_token: String,
}

///
/// ListReferenceBasesResponse
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListReferenceBasesResponse {
    pub offset: u64,
    pub sequence: String,
    pub next_page_token: String,
}

///
/// GetInfoResponse
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetInfoResponse {
    pub protocol_version: String,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paged_response_wires_list_and_token() {
        let mut response = SearchDatasetsResponse::default();
        response.results_mut().push(Dataset {
            id: "dataset:one".into(),
            name: "one".into(),
            description: String::new(),
        });
        response.set_next_page_token("3".into());

        assert_eq!(response.datasets.len(), 1);
        assert_eq!(response.next_page_token, "3");
    }

    #[test]
    fn response_serializes_camel_case_fields() {
        let mut response = SearchReadGroupSetsResponse::default();
        response.set_next_page_token("7".into());

        let json = serde_json::to_value(&response).expect("response should serialize");
        assert!(json.get("readGroupSets").is_some());
        assert_eq!(json["nextPageToken"], "7");
    }
}
