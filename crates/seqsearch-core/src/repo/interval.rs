//! Module: interval
//! Responsibility: leaf query iterators — turn a container record plus a
//! search request into a resumable stream over the matching leaf objects,
//! applying interval overlap and attribute filters up front.
//! Does not own: container enumeration, response bounding, or id parsing.
//!
//! Invariants:
//! - Filtering happens before the cursor is applied, so a resumed stream
//!   sees the same item order as the stream that produced the token.
//! - Leaf order is the record's storage order (position-sorted for
//!   genomic leaves).

use crate::{
    error::ServerError,
    paging::ListStream,
    repo::{
        ContinuousSetRecord, FeatureSetRecord, PhenotypeAssociationSetRecord, ReadGroupRecord,
        RnaQuantificationRecord, VariantAnnotationSetRecord, VariantSetRecord,
    },
};
use seqsearch_protocol::{
    entities::{
        Continuous, ExpressionLevel, Feature, FeaturePhenotypeAssociation, PhenotypeInstance,
        ReadAlignment, Variant, VariantAnnotation,
    },
    requests::{
        SearchContinuousRequest, SearchExpressionLevelsRequest, SearchFeaturesRequest,
        SearchGenotypePhenotypesRequest, SearchGenotypesRequest, SearchPhenotypesRequest,
        SearchReadsRequest, SearchVariantAnnotationsRequest, SearchVariantsRequest,
    },
};

// Half-open window overlap; a zero end bound means "to the end of the
// reference", mirroring base-range retrieval.
const fn overlaps(item_start: u64, item_end: u64, start: u64, end: u64) -> bool {
    item_end > start && (end == 0 || item_start < end)
}

///
/// GenotypeRow
///
/// One row of the genotype matrix: the source variant with its calls
/// stripped, the per-call-set allele dosage, and the owning call-set ids
/// in call order.
///

#[derive(Clone, Debug, PartialEq)]
pub struct GenotypeRow {
    pub variant: Variant,
    pub genotypes: Vec<i32>,
    pub call_set_ids: Vec<String>,
}

/// Variants overlapping the request window, with calls projected to the
/// requested call sets when any are named.
pub fn variants(
    request: &SearchVariantsRequest,
    record: &VariantSetRecord,
) -> Result<ListStream<Variant>, ServerError> {
    let matches: Vec<Variant> = record
        .variants
        .iter()
        .filter(|variant| {
            variant.reference_name == request.reference_name
                && overlaps(variant.start, variant.end, request.start, request.end)
        })
        .cloned()
        .map(|mut variant| {
            if !request.call_set_ids.is_empty() {
                variant
                    .calls
                    .retain(|call| request.call_set_ids.contains(&call.call_set_id));
            }
            variant
        })
        .collect();

    ListStream::resume(&request.page_token, matches)
}

/// Annotations overlapping the request window.
pub fn variant_annotations(
    request: &SearchVariantAnnotationsRequest,
    record: &VariantAnnotationSetRecord,
) -> Result<ListStream<VariantAnnotation>, ServerError> {
    let matches: Vec<VariantAnnotation> = record
        .annotations
        .iter()
        .filter(|annotation| {
            annotation.reference_name == request.reference_name
                && overlaps(annotation.start, annotation.end, request.start, request.end)
        })
        .cloned()
        .collect();

    ListStream::resume(&request.page_token, matches)
}

/// Genotype matrix rows for the variants overlapping the request window.
/// Not paginated by the caller, but built on the same stream contract.
pub fn genotype_rows(
    request: &SearchGenotypesRequest,
    record: &VariantSetRecord,
) -> Result<ListStream<GenotypeRow>, ServerError> {
    let rows: Vec<GenotypeRow> = record
        .variants
        .iter()
        .filter(|variant| {
            variant.reference_name == request.reference_name
                && overlaps(variant.start, variant.end, request.start, request.end)
        })
        .map(|variant| {
            // Dosage per call: the number of non-reference alleles.
            let genotypes = variant
                .calls
                .iter()
                .map(|call| call.genotype.iter().filter(|allele| **allele > 0).count() as i32)
                .collect();
            let call_set_ids = variant
                .calls
                .iter()
                .map(|call| call.call_set_id.clone())
                .collect();

            let mut variant = variant.clone();
            variant.calls.clear();

            GenotypeRow {
                variant,
                genotypes,
                call_set_ids,
            }
        })
        .collect();

    ListStream::resume(&request.page_token, rows)
}

/// Alignments from the given read groups, merged into one position-sorted
/// sequence and windowed on `alignment_start`.
pub fn reads(
    request: &SearchReadsRequest,
    groups: &[&ReadGroupRecord],
) -> Result<ListStream<ReadAlignment>, ServerError> {
    let mut matches: Vec<ReadAlignment> = groups
        .iter()
        .flat_map(|group| group.reads.iter())
        .filter(|read| {
            read.reference_id == request.reference_id
                && read.alignment_start >= request.start
                && (request.end == 0 || read.alignment_start < request.end)
        })
        .cloned()
        .collect();

    // Keep the merged order deterministic across resumptions.
    matches.sort_by(|a, b| {
        a.alignment_start
            .cmp(&b.alignment_start)
            .then_with(|| a.id.cmp(&b.id))
    });

    ListStream::resume(&request.page_token, matches)
}

/// Features overlapping the request window. `parent_feature_id` restricts
/// the result to direct children of that feature when set; the caller has
/// already validated the parent against the feature set.
pub fn features(
    request: &SearchFeaturesRequest,
    record: &FeatureSetRecord,
    parent_feature_id: Option<&str>,
) -> Result<ListStream<Feature>, ServerError> {
    let matches: Vec<Feature> = record
        .features
        .iter()
        .filter(|feature| {
            if let Some(parent_id) = parent_feature_id {
                if feature.parent_id != parent_id {
                    return false;
                }
            }

            (request.reference_name.is_empty()
                || feature.reference_name == request.reference_name)
                && overlaps(feature.start, feature.end, request.start, request.end)
        })
        .cloned()
        .collect();

    ListStream::resume(&request.page_token, matches)
}

/// Signal runs overlapping the request window. A run covers
/// `[start, start + values.len())`.
pub fn continuous(
    request: &SearchContinuousRequest,
    record: &ContinuousSetRecord,
) -> Result<ListStream<Continuous>, ServerError> {
    let matches: Vec<Continuous> = record
        .values
        .iter()
        .filter(|run| {
            let run_end = run.start + run.values.len() as u64;
            run.reference_name == request.reference_name
                && overlaps(run.start, run_end, request.start, request.end)
        })
        .cloned()
        .collect();

    ListStream::resume(&request.page_token, matches)
}

/// Expression levels filtered by name membership and minimum expression.
pub fn expression_levels(
    request: &SearchExpressionLevelsRequest,
    record: &RnaQuantificationRecord,
) -> Result<ListStream<ExpressionLevel>, ServerError> {
    let matches: Vec<ExpressionLevel> = record
        .expression_levels
        .iter()
        .filter(|level| {
            (request.names.is_empty() || request.names.contains(&level.name))
                && (request.threshold <= 0.0 || level.expression > request.threshold)
        })
        .cloned()
        .collect();

    ListStream::resume(&request.page_token, matches)
}

/// Phenotype instances filtered by exact id and description substring.
pub fn phenotypes(
    request: &SearchPhenotypesRequest,
    record: &PhenotypeAssociationSetRecord,
) -> Result<ListStream<PhenotypeInstance>, ServerError> {
    let matches: Vec<PhenotypeInstance> = record
        .associations
        .iter()
        .map(|association| &association.phenotype)
        .filter(|phenotype| {
            (request.id.is_empty() || phenotype.id == request.id)
                && (request.description.is_empty()
                    || phenotype.description.contains(&request.description))
        })
        .cloned()
        .collect();

    ListStream::resume(&request.page_token, matches)
}

/// Feature/phenotype associations touching any of the requested features.
pub fn genotype_phenotypes(
    request: &SearchGenotypePhenotypesRequest,
    record: &PhenotypeAssociationSetRecord,
) -> Result<ListStream<FeaturePhenotypeAssociation>, ServerError> {
    let matches: Vec<FeaturePhenotypeAssociation> = record
        .associations
        .iter()
        .filter(|association| {
            request.feature_ids.is_empty()
                || association
                    .feature_ids
                    .iter()
                    .any(|id| request.feature_ids.contains(id))
        })
        .cloned()
        .collect();

    ListStream::resume(&request.page_token, matches)
}

///
/// TESTS
///
