//! Module: backend
//! Responsibility: the request dispatcher — decode, page-size policy,
//! strategy selection, the driving loop, and response encoding for every
//! search and get endpoint.
//! Does not own: message shapes (protocol), token format (`paging::cursor`),
//! or leaf filtering (`repo::interval`).
//!
//! Invariants:
//! - Page-size validation happens before any repository access.
//! - The driving loop admits items add-then-check; the sealed token always
//!   addresses the first unreturned item.
//! - Every error propagates synchronously; no endpoint writes a partial
//!   response.


use crate::{
    DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_PAGE_SIZE,
    compound::{
        BiosampleId, CallSetId, ContinuousSetId, DatasetId, ExpressionLevelId, FeatureId,
        FeatureSetId, IndividualId, PhenotypeAssociationSetId, ReadGroupId, ReadGroupSetId,
        ReferenceId, ReferenceSetId, RnaQuantificationId, RnaQuantificationSetId,
        VariantAnnotationSetId, VariantId, VariantSetId,
    },
    error::ServerError,
    obs::sink::{self, MetricsEvent, RejectKind},
    paging::{
        BoxedStream, IndexedStream, ListStream, PageStream, compose_page_token, parse_page_token,
    },
    repo::{DataRepository, DatasetRecord, ReadGroupSetRecord, VariantSetRecord, interval},
    response::SearchResponseAccumulator,
};
use seqsearch_protocol::{
    PROTOCOL_VERSION,
    codec::{self, ResponseFormat},
    entities::{Biosample, CallSet, Individual, ReadGroupSet, Reference, ReferenceSet},
    requests::*,
    responses::*,
};
use serde::{Serialize, de::DeserializeOwned};
use std::collections::BTreeSet;

///
/// BackendConfig
///

#[derive(Clone, Copy, Debug)]
pub struct BackendConfig {
    /// Page size applied when a request leaves `pageSize` unset.
    pub default_page_size: i32,
    /// Approximate serialized-size budget per page, and the chunk size for
    /// base-range retrieval.
    pub max_response_bytes: usize,
    /// Output encoding for every response body.
    pub response_format: ResponseFormat,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            response_format: ResponseFormat::Json,
        }
    }
}

///
/// Backend
///
/// One dispatcher over one repository. All endpoints take a raw request body
/// and return an encoded response body; faults surface as `ServerError` for
/// the transport layer to translate.
///

pub struct Backend<R: DataRepository> {
    repository: R,
    config: BackendConfig,
}

impl<R: DataRepository> Backend<R> {
    pub fn new(repository: R, config: BackendConfig) -> Self {
        Self { repository, config }
    }

    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    #[must_use]
    pub const fn config(&self) -> &BackendConfig {
        &self.config
    }

    // --- paging policy

    const fn resolve_page_size(&self, requested: i32) -> Result<i32, ServerError> {
        if requested < 0 {
            return Err(ServerError::BadPageSize {
                page_size: requested,
            });
        }

        if requested == 0 {
            Ok(self.config.default_page_size)
        } else {
            Ok(requested)
        }
    }

    // --- generic drivers

    /// Decode, validate, stream, bound, encode: the shared search pipeline.
    /// `build` turns the validated request into the endpoint's item stream.
    fn run_search_request<'a, Req, Resp, F>(
        &'a self,
        body: &[u8],
        endpoint: &'static str,
        build: F,
    ) -> Result<Vec<u8>, ServerError>
    where
        Req: DeserializeOwned + PagedRequest,
        Resp: PagedResponse,
        F: FnOnce(&Req) -> Result<BoxedStream<'a, Resp::Item>, ServerError>,
    {
        sink::record(MetricsEvent::SearchStart { endpoint });

        let result = self.search_inner::<Req, Resp, F>(body, build);
        match &result {
            Ok((_, items, continued)) => {
                sink::record(MetricsEvent::SearchFinish {
                    endpoint,
                    items_returned: *items,
                    continued: *continued,
                });
            }
            Err(err) => {
                sink::record(MetricsEvent::Rejected {
                    endpoint,
                    kind: reject_kind(err),
                });
            }
        }

        result.map(|(bytes, _, _)| bytes)
    }

    fn search_inner<'a, Req, Resp, F>(
        &'a self,
        body: &[u8],
        build: F,
    ) -> Result<(Vec<u8>, u64, bool), ServerError>
    where
        Req: DeserializeOwned + PagedRequest,
        Resp: PagedResponse,
        F: FnOnce(&Req) -> Result<BoxedStream<'a, Resp::Item>, ServerError>,
    {
        // Phase 1: decode and resolve paging policy before touching data.
        let mut request: Req = codec::decode_request(body)?;
        let page_size = self.resolve_page_size(request.page_size())?;
        request.set_page_size(page_size);

        // Phase 2: select and position the enumeration strategy.
        let mut stream = build(&request)?;

        // Phase 3: drive the stream into the bounded accumulator.
        let mut acc: SearchResponseAccumulator<Resp> =
            SearchResponseAccumulator::new(page_size as usize, self.config.max_response_bytes);
        let mut items: u64 = 0;
        let mut continued = false;

        while !acc.is_full() {
            match stream.next_pair()? {
                Some((item, token)) => {
                    acc.add_value(item)?;
                    items += 1;
                    continued = token.is_some();
                    acc.set_next_page_token(token);
                }
                None => {
                    continued = false;
                    acc.set_next_page_token(None);
                    break;
                }
            }
        }

        // Phase 4: seal and encode.
        let response = acc.finish();
        let bytes = codec::encode_response(&response, self.config.response_format)?;

        Ok((bytes, items, continued))
    }

    /// Shared get pipeline: resolve one object, encode its element.
    fn run_get_request<T, F>(&self, endpoint: &'static str, fetch: F) -> Result<Vec<u8>, ServerError>
    where
        T: Serialize,
        F: FnOnce() -> Result<T, ServerError>,
    {
        sink::record(MetricsEvent::GetCall { endpoint });

        let result = fetch().and_then(|element| {
            codec::encode_response(&element, self.config.response_format).map_err(Into::into)
        });

        if let Err(err) = &result {
            sink::record(MetricsEvent::Rejected {
                endpoint,
                kind: reject_kind(err),
            });
        }

        result
    }

    // --- top-level searches

    pub fn run_search_datasets(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchDatasetsRequest, SearchDatasetsResponse, _>(
            body,
            "datasets",
            move |request| {
                let stream = IndexedStream::resume(
                    request.page_token(),
                    self.repository.num_datasets(),
                    move |i| self.repository.dataset_by_index(i).element.clone(),
                )?;
                Ok(Box::new(stream))
            },
        )
    }

    pub fn run_search_experiments(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchExperimentsRequest, SearchExperimentsResponse, _>(
            body,
            "experiments",
            move |request| {
                let stream = IndexedStream::resume(
                    request.page_token(),
                    self.repository.num_experiments(),
                    move |i| self.repository.experiment_by_index(i).element.clone(),
                )?;
                Ok(Box::new(stream))
            },
        )
    }

    pub fn run_search_reference_sets(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchReferenceSetsRequest, SearchReferenceSetsResponse, _>(
            body,
            "reference_sets",
            move |request| {
                let matches: Vec<ReferenceSet> = self
                    .repository
                    .reference_sets()
                    .iter()
                    .map(|record| &record.element)
                    .filter(|set| {
                        (request.md5checksum.is_empty() || set.md5checksum == request.md5checksum)
                            && (request.assembly_id.is_empty()
                                || set.assembly_id == request.assembly_id)
                            && (request.accession.is_empty()
                                || set.source_accessions.contains(&request.accession))
                    })
                    .cloned()
                    .collect();

                Ok(Box::new(ListStream::resume(request.page_token(), matches)?))
            },
        )
    }

    pub fn run_search_references(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchReferencesRequest, SearchReferencesResponse, _>(
            body,
            "references",
            move |request| {
                let set_id = ReferenceSetId::parse(&request.reference_set_id)?;
                let record = self.repository.get_reference_set(&set_id.reference_set)?;

                let matches: Vec<Reference> = record
                    .references
                    .iter()
                    .map(|reference| &reference.element)
                    .filter(|reference| {
                        (request.md5checksum.is_empty()
                            || reference.md5checksum == request.md5checksum)
                            && (request.accession.is_empty()
                                || reference.source_accessions.contains(&request.accession))
                    })
                    .cloned()
                    .collect();

                Ok(Box::new(ListStream::resume(request.page_token(), matches)?))
            },
        )
    }

    // --- dataset-scoped searches

    pub fn run_search_biosamples(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchBiosamplesRequest, SearchBiosamplesResponse, _>(
            body,
            "biosamples",
            move |request| {
                let dataset = self.dataset_for(&request.dataset_id)?;

                let matches: Vec<Biosample> = dataset
                    .biosamples
                    .iter()
                    .map(|record| &record.element)
                    .filter(|sample| {
                        (request.name.is_empty() || sample.name == request.name)
                            && (request.individual_id.is_empty()
                                || sample.individual_id == request.individual_id)
                    })
                    .cloned()
                    .collect();

                Ok(Box::new(ListStream::resume(request.page_token(), matches)?))
            },
        )
    }

    pub fn run_search_individuals(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchIndividualsRequest, SearchIndividualsResponse, _>(
            body,
            "individuals",
            move |request| {
                let dataset = self.dataset_for(&request.dataset_id)?;

                let matches: Vec<Individual> = dataset
                    .individuals
                    .iter()
                    .map(|record| &record.element)
                    .filter(|individual| {
                        request.name.is_empty() || individual.name == request.name
                    })
                    .cloned()
                    .collect();

                Ok(Box::new(ListStream::resume(request.page_token(), matches)?))
            },
        )
    }

    pub fn run_search_variant_sets(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchVariantSetsRequest, SearchVariantSetsResponse, _>(
            body,
            "variant_sets",
            move |request| {
                let dataset = self.dataset_for(&request.dataset_id)?;
                let matches = dataset
                    .variant_sets
                    .iter()
                    .map(|record| record.element.clone())
                    .collect();

                Ok(Box::new(ListStream::resume(request.page_token(), matches)?))
            },
        )
    }

    pub fn run_search_feature_sets(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchFeatureSetsRequest, SearchFeatureSetsResponse, _>(
            body,
            "feature_sets",
            move |request| {
                let dataset = self.dataset_for(&request.dataset_id)?;
                let matches = dataset
                    .feature_sets
                    .iter()
                    .map(|record| record.element.clone())
                    .collect();

                Ok(Box::new(ListStream::resume(request.page_token(), matches)?))
            },
        )
    }

    pub fn run_search_continuous_sets(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchContinuousSetsRequest, SearchContinuousSetsResponse, _>(
            body,
            "continuous_sets",
            move |request| {
                let dataset = self.dataset_for(&request.dataset_id)?;
                let matches = dataset
                    .continuous_sets
                    .iter()
                    .map(|record| record.element.clone())
                    .collect();

                Ok(Box::new(ListStream::resume(request.page_token(), matches)?))
            },
        )
    }

    pub fn run_search_rna_quantification_sets(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<
            SearchRnaQuantificationSetsRequest,
            SearchRnaQuantificationSetsResponse,
            _,
        >(body, "rna_quantification_sets", move |request| {
            let dataset = self.dataset_for(&request.dataset_id)?;
            let matches = dataset
                .rna_quantification_sets
                .iter()
                .map(|record| record.element.clone())
                .collect();

            Ok(Box::new(ListStream::resume(request.page_token(), matches)?))
        })
    }

    pub fn run_search_phenotype_association_sets(
        &self,
        body: &[u8],
    ) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<
            SearchPhenotypeAssociationSetsRequest,
            SearchPhenotypeAssociationSetsResponse,
            _,
        >(body, "phenotype_association_sets", move |request| {
            let dataset = self.dataset_for(&request.dataset_id)?;
            let matches = dataset
                .phenotype_association_sets
                .iter()
                .map(|record| record.element.clone())
                .collect();

            Ok(Box::new(ListStream::resume(request.page_token(), matches)?))
        })
    }

    pub fn run_search_read_group_sets(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchReadGroupSetsRequest, SearchReadGroupSetsResponse, _>(
            body,
            "read_group_sets",
            move |request| {
                let dataset = self.dataset_for(&request.dataset_id)?;
                let stream = ReadGroupSetStream::resume(
                    request.page_token(),
                    dataset,
                    request.name.clone(),
                    request.biosample_id.clone(),
                )?;

                Ok(Box::new(stream))
            },
        )
    }

    // --- variant-set-scoped searches

    pub fn run_search_variants(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchVariantsRequest, SearchVariantsResponse, _>(
            body,
            "variants",
            move |request| {
                let record = self.variant_set_for(&request.variant_set_id)?;
                Ok(Box::new(interval::variants(request, record)?))
            },
        )
    }

    pub fn run_search_variant_annotation_sets(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<
            SearchVariantAnnotationSetsRequest,
            SearchVariantAnnotationSetsResponse,
            _,
        >(body, "variant_annotation_sets", move |request| {
            let record = self.variant_set_for(&request.variant_set_id)?;
            let matches = record
                .annotation_sets
                .iter()
                .map(|set| set.element.clone())
                .collect();

            Ok(Box::new(ListStream::resume(request.page_token(), matches)?))
        })
    }

    pub fn run_search_variant_annotations(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<
            SearchVariantAnnotationsRequest,
            SearchVariantAnnotationsResponse,
            _,
        >(body, "variant_annotations", move |request| {
            let id = VariantAnnotationSetId::parse(&request.variant_annotation_set_id)?;
            let dataset = self.repository.get_dataset(&id.dataset)?;
            let variant_set = dataset.get_variant_set(&id.variant_set)?;
            let record = variant_set.get_annotation_set(&id.annotation_set)?;

            Ok(Box::new(interval::variant_annotations(request, record)?))
        })
    }

    pub fn run_search_call_sets(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchCallSetsRequest, SearchCallSetsResponse, _>(
            body,
            "call_sets",
            move |request| {
                let record = self.variant_set_for(&request.variant_set_id)?;

                let matches: Vec<CallSet> = record
                    .call_sets
                    .iter()
                    .map(|call_set| &call_set.element)
                    .filter(|call_set| {
                        (request.name.is_empty() || call_set.name == request.name)
                            && (request.biosample_id.is_empty()
                                || call_set.biosample_id == request.biosample_id)
                    })
                    .cloned()
                    .collect();

                Ok(Box::new(ListStream::resume(request.page_token(), matches)?))
            },
        )
    }

    // --- reads

    pub fn run_search_reads(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchReadsRequest, SearchReadsResponse, _>(
            body,
            "reads",
            move |request| {
                if request.reference_id.is_empty() {
                    return Err(ServerError::UnmappedReadsNotSupported);
                }
                if request.read_group_ids.is_empty() {
                    return Err(ServerError::bad_request(
                        "at least one read group id must be specified",
                    ));
                }

                // All requested groups must live in one read group set.
                let parsed: Vec<ReadGroupId> = request
                    .read_group_ids
                    .iter()
                    .map(|id| ReadGroupId::parse(id))
                    .collect::<Result<_, _>>()?;
                let set_id = parsed[0].read_group_set_id();
                if parsed.iter().any(|id| id.read_group_set_id() != set_id) {
                    return Err(ServerError::bad_request(
                        "all read group ids must belong to the same read group set",
                    ));
                }

                let dataset = self.repository.get_dataset(&set_id.dataset)?;
                let set = dataset.get_read_group_set(&set_id.read_group_set)?;

                // Multiple ids are only accepted as the full set membership;
                // repeats collapse, so this is a set comparison.
                if parsed.len() > 1 {
                    let requested: BTreeSet<String> =
                        parsed.iter().map(ToString::to_string).collect();
                    let members: BTreeSet<String> =
                        set.read_group_ids().into_iter().collect();
                    if requested != members {
                        return Err(ServerError::bad_request(
                            "multiple read group ids must name every read group in the set",
                        ));
                    }
                }

                let reference_set_local =
                    set.reference_set_local_id.as_deref().ok_or_else(|| {
                        ServerError::ReadGroupSetNotMappedToReferenceSet {
                            id: set.element.id.clone(),
                        }
                    })?;

                // The requested reference must exist in the bound reference set.
                let reference_id = ReferenceId::parse(&request.reference_id)?;
                self.repository
                    .get_reference_set(reference_set_local)?
                    .get_reference(&reference_id.reference)?;

                let mut seen = BTreeSet::new();
                let groups = parsed
                    .iter()
                    .filter(|id| seen.insert(id.read_group.as_str()))
                    .map(|id| set.get_read_group(&id.read_group))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Box::new(interval::reads(request, &groups)?))
            },
        )
    }

    // --- features

    pub fn run_search_features(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchFeaturesRequest, SearchFeaturesResponse, _>(
            body,
            "features",
            move |request| {
                if request.feature_set_id.is_empty() && request.parent_id.is_empty() {
                    return Err(ServerError::FeatureSetNotSpecified);
                }

                let parent = if request.parent_id.is_empty() {
                    None
                } else {
                    Some(FeatureId::parse(&request.parent_id)?)
                };

                // The parent's feature set must agree with an explicit one.
                let set_id = match (&parent, request.feature_set_id.is_empty()) {
                    (Some(parent), false) => {
                        let explicit = FeatureSetId::parse(&request.feature_set_id)?;
                        if parent.feature_set_id() != explicit {
                            return Err(ServerError::ParentIncompatibleWithFeatureSet {
                                parent_id: request.parent_id.clone(),
                                feature_set_id: request.feature_set_id.clone(),
                            });
                        }
                        explicit
                    }
                    (Some(parent), true) => parent.feature_set_id(),
                    (None, _) => FeatureSetId::parse(&request.feature_set_id)?,
                };

                let dataset = self.repository.get_dataset(&set_id.dataset)?;
                let record = dataset.get_feature_set(&set_id.feature_set)?;

                // A named parent must itself exist in the set.
                let parent_feature_id = match &parent {
                    Some(parent) => Some(record.get_feature(&parent.to_string())?.id.clone()),
                    None => None,
                };

                Ok(Box::new(interval::features(
                    request,
                    record,
                    parent_feature_id.as_deref(),
                )?))
            },
        )
    }

    // --- continuous

    pub fn run_search_continuous(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchContinuousRequest, SearchContinuousResponse, _>(
            body,
            "continuous",
            move |request| {
                if request.continuous_set_id.is_empty() {
                    return Err(ServerError::ContinuousSetNotSpecified);
                }

                let id = ContinuousSetId::parse(&request.continuous_set_id)?;
                let dataset = self.repository.get_dataset(&id.dataset)?;
                let record = dataset.get_continuous_set(&id.continuous_set)?;

                Ok(Box::new(interval::continuous(request, record)?))
            },
        )
    }

    // --- rna quantification

    pub fn run_search_rna_quantifications(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<
            SearchRnaQuantificationsRequest,
            SearchRnaQuantificationsResponse,
            _,
        >(body, "rna_quantifications", move |request| {
            if request.rna_quantification_set_id.is_empty() {
                return Err(ServerError::RnaQuantificationSetNotSpecified);
            }

            let id = RnaQuantificationSetId::parse(&request.rna_quantification_set_id)?;
            let dataset = self.repository.get_dataset(&id.dataset)?;
            let record = dataset.get_rna_quantification_set(&id.rna_quantification_set)?;

            let matches = record
                .quantifications
                .iter()
                .map(|quantification| &quantification.element)
                .filter(|quantification| {
                    request.biosample_id.is_empty()
                        || quantification.biosample_id == request.biosample_id
                })
                .cloned()
                .collect();

            Ok(Box::new(ListStream::resume(request.page_token(), matches)?))
        })
    }

    pub fn run_search_expression_levels(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<
            SearchExpressionLevelsRequest,
            SearchExpressionLevelsResponse,
            _,
        >(body, "expression_levels", move |request| {
            if request.rna_quantification_id.is_empty() {
                return Err(ServerError::bad_request(
                    "an rna quantification id must be specified",
                ));
            }

            let id = RnaQuantificationId::parse(&request.rna_quantification_id)?;
            let dataset = self.repository.get_dataset(&id.dataset)?;
            let record = dataset
                .get_rna_quantification_set(&id.rna_quantification_set)?
                .get_rna_quantification(&id.rna_quantification)?;

            Ok(Box::new(interval::expression_levels(request, record)?))
        })
    }

    // --- phenotype association

    pub fn run_search_phenotypes(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<SearchPhenotypesRequest, SearchPhenotypesResponse, _>(
            body,
            "phenotypes",
            move |request| {
                let id = PhenotypeAssociationSetId::parse(&request.phenotype_association_set_id)?;
                let dataset = self.repository.get_dataset(&id.dataset)?;
                let record =
                    dataset.get_phenotype_association_set(&id.phenotype_association_set)?;

                Ok(Box::new(interval::phenotypes(request, record)?))
            },
        )
    }

    pub fn run_search_genotype_phenotypes(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        self.run_search_request::<
            SearchGenotypePhenotypesRequest,
            SearchGenotypePhenotypesResponse,
            _,
        >(body, "genotype_phenotypes", move |request| {
            let id = PhenotypeAssociationSetId::parse(&request.phenotype_association_set_id)?;
            let dataset = self.repository.get_dataset(&id.dataset)?;
            let record = dataset.get_phenotype_association_set(&id.phenotype_association_set)?;

            Ok(Box::new(interval::genotype_phenotypes(request, record)?))
        })
    }

    // --- bespoke endpoints

    /// Genotype matrix search: exhaustive, never paginated. Rows are
    /// concatenated into one matrix; the call-set id list is taken from the
    /// first row.
    pub fn run_search_genotypes(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        let endpoint = "genotypes";
        sink::record(MetricsEvent::SearchStart { endpoint });

        let result = self.search_genotypes_inner(body);
        match &result {
            Ok((_, items)) => {
                sink::record(MetricsEvent::SearchFinish {
                    endpoint,
                    items_returned: *items,
                    continued: false,
                });
            }
            Err(err) => {
                sink::record(MetricsEvent::Rejected {
                    endpoint,
                    kind: reject_kind(err),
                });
            }
        }

        result.map(|(bytes, _)| bytes)
    }

    fn search_genotypes_inner(&self, body: &[u8]) -> Result<(Vec<u8>, u64), ServerError> {
        let request: SearchGenotypesRequest = codec::decode_request(body)?;
        let record = self.variant_set_for(&request.variant_set_id)?;

        let mut stream = interval::genotype_rows(&request, record)?;
        let mut response = SearchGenotypesResponse::default();

        while let Some((row, _)) = stream.next_pair()? {
            if response.variants.is_empty() {
                response.call_set_ids = row.call_set_ids;
                response.genotypes.nindividuals = row.genotypes.len() as u64;
            }
            response.genotypes.genotypes.extend(row.genotypes);
            response.variants.push(row.variant);
        }
        response.genotypes.nvariants = response.variants.len() as u64;

        let items = response.genotypes.nvariants;
        let bytes = codec::encode_response(&response, self.config.response_format)?;

        Ok((bytes, items))
    }

    /// Base-range retrieval: byte-offset paging with a fixed chunk size, no
    /// client-controlled page size. A zero `end` means the whole reference.
    pub fn run_list_reference_bases(&self, body: &[u8]) -> Result<Vec<u8>, ServerError> {
        let endpoint = "reference_bases";
        sink::record(MetricsEvent::SearchStart { endpoint });

        let result = self.list_reference_bases_inner(body);
        match &result {
            Ok((_, items)) => {
                sink::record(MetricsEvent::SearchFinish {
                    endpoint,
                    items_returned: *items,
                    continued: false,
                });
            }
            Err(err) => {
                sink::record(MetricsEvent::Rejected {
                    endpoint,
                    kind: reject_kind(err),
                });
            }
        }

        result.map(|(bytes, _)| bytes)
    }

    fn list_reference_bases_inner(&self, body: &[u8]) -> Result<(Vec<u8>, u64), ServerError> {
        // An empty POST body stands in for the default request.
        let request: ListReferenceBasesRequest = if body.is_empty() {
            ListReferenceBasesRequest::default()
        } else {
            codec::decode_request(body)?
        };

        let id = ReferenceId::parse(&request.reference_id)?;
        let reference = self
            .repository
            .get_reference_set(&id.reference_set)?
            .get_reference(&id.reference)?;

        let end = if request.end == 0 {
            reference.length()
        } else {
            request.end
        };
        if request.start > end || end > reference.length() {
            return Err(ServerError::bad_request(format!(
                "base range [{}, {end}) is invalid for reference '{}' of length {}",
                request.start,
                request.reference_id,
                reference.length()
            )));
        }

        // Resume at the absolute offset carried by the token.
        let position = if request.page_token.is_empty() {
            request.start
        } else {
            let offset = parse_page_token(&request.page_token, 1)?[0];
            if offset < request.start || offset > end {
                return Err(ServerError::MalformedPageToken {
                    token: request.page_token.clone(),
                    expected_arity: 1,
                });
            }
            offset
        };

        let chunk_end = end.min(position + self.config.max_response_bytes as u64);
        let sequence = reference.get_bases(position, chunk_end)?.to_string();

        let response = ListReferenceBasesResponse {
            offset: position,
            next_page_token: if chunk_end < end {
                compose_page_token(&[chunk_end])
            } else {
                String::new()
            },
            sequence,
        };

        let items = (chunk_end - position) as u64;
        let bytes = codec::encode_response(&response, self.config.response_format)?;

        Ok((bytes, items))
    }

    /// Service metadata.
    pub fn run_get_info(&self) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("info", || {
            Ok(GetInfoResponse {
                protocol_version: PROTOCOL_VERSION.to_string(),
            })
        })
    }

    // --- gets

    pub fn run_get_dataset(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("datasets", || {
            let parsed = DatasetId::parse(id)?;
            Ok(self.repository.get_dataset(&parsed.dataset)?.element.clone())
        })
    }

    pub fn run_get_experiment(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("experiments", || {
            Ok(self.repository.get_experiment(id)?.element.clone())
        })
    }

    pub fn run_get_reference_set(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("reference_sets", || {
            let parsed = ReferenceSetId::parse(id)?;
            Ok(self
                .repository
                .get_reference_set(&parsed.reference_set)?
                .element
                .clone())
        })
    }

    pub fn run_get_reference(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("references", || {
            let parsed = ReferenceId::parse(id)?;
            Ok(self
                .repository
                .get_reference_set(&parsed.reference_set)?
                .get_reference(&parsed.reference)?
                .element
                .clone())
        })
    }

    pub fn run_get_biosample(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("biosamples", || {
            let parsed = BiosampleId::parse(id)?;
            Ok(self
                .repository
                .get_dataset(&parsed.dataset)?
                .get_biosample(&parsed.biosample)?
                .element
                .clone())
        })
    }

    pub fn run_get_individual(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("individuals", || {
            let parsed = IndividualId::parse(id)?;
            Ok(self
                .repository
                .get_dataset(&parsed.dataset)?
                .get_individual(&parsed.individual)?
                .element
                .clone())
        })
    }

    pub fn run_get_read_group_set(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("read_group_sets", || {
            let parsed = ReadGroupSetId::parse(id)?;
            Ok(self
                .repository
                .get_dataset(&parsed.dataset)?
                .get_read_group_set(&parsed.read_group_set)?
                .element
                .clone())
        })
    }

    pub fn run_get_read_group(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("read_groups", || {
            let parsed = ReadGroupId::parse(id)?;
            Ok(self
                .repository
                .get_dataset(&parsed.dataset)?
                .get_read_group_set(&parsed.read_group_set)?
                .get_read_group(&parsed.read_group)?
                .element
                .clone())
        })
    }

    pub fn run_get_variant_set(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("variant_sets", || {
            let parsed = VariantSetId::parse(id)?;
            Ok(self
                .repository
                .get_dataset(&parsed.dataset)?
                .get_variant_set(&parsed.variant_set)?
                .element
                .clone())
        })
    }

    pub fn run_get_variant(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("variants", || {
            let parsed = VariantId::parse(id)?;
            let set_id = parsed.variant_set_id();
            Ok(self
                .repository
                .get_dataset(&set_id.dataset)?
                .get_variant_set(&set_id.variant_set)?
                .get_variant(id)?
                .clone())
        })
    }

    pub fn run_get_call_set(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("call_sets", || {
            let parsed = CallSetId::parse(id)?;
            let set_id = parsed.variant_set_id();
            Ok(self
                .repository
                .get_dataset(&set_id.dataset)?
                .get_variant_set(&set_id.variant_set)?
                .get_call_set(&parsed.call_set)?
                .element
                .clone())
        })
    }

    pub fn run_get_variant_annotation_set(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("variant_annotation_sets", || {
            let parsed = VariantAnnotationSetId::parse(id)?;
            let set_id = parsed.variant_set_id();
            Ok(self
                .repository
                .get_dataset(&set_id.dataset)?
                .get_variant_set(&set_id.variant_set)?
                .get_annotation_set(&parsed.annotation_set)?
                .element
                .clone())
        })
    }

    pub fn run_get_feature_set(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("feature_sets", || {
            let parsed = FeatureSetId::parse(id)?;
            Ok(self
                .repository
                .get_dataset(&parsed.dataset)?
                .get_feature_set(&parsed.feature_set)?
                .element
                .clone())
        })
    }

    pub fn run_get_feature(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("features", || {
            let parsed = FeatureId::parse(id)?;
            let set_id = parsed.feature_set_id();
            Ok(self
                .repository
                .get_dataset(&set_id.dataset)?
                .get_feature_set(&set_id.feature_set)?
                .get_feature(id)?
                .clone())
        })
    }

    pub fn run_get_continuous_set(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("continuous_sets", || {
            let parsed = ContinuousSetId::parse(id)?;
            Ok(self
                .repository
                .get_dataset(&parsed.dataset)?
                .get_continuous_set(&parsed.continuous_set)?
                .element
                .clone())
        })
    }

    pub fn run_get_rna_quantification_set(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("rna_quantification_sets", || {
            let parsed = RnaQuantificationSetId::parse(id)?;
            Ok(self
                .repository
                .get_dataset(&parsed.dataset)?
                .get_rna_quantification_set(&parsed.rna_quantification_set)?
                .element
                .clone())
        })
    }

    pub fn run_get_rna_quantification(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("rna_quantifications", || {
            let parsed = RnaQuantificationId::parse(id)?;
            Ok(self
                .repository
                .get_dataset(&parsed.dataset)?
                .get_rna_quantification_set(&parsed.rna_quantification_set)?
                .get_rna_quantification(&parsed.rna_quantification)?
                .element
                .clone())
        })
    }

    pub fn run_get_expression_level(&self, id: &str) -> Result<Vec<u8>, ServerError> {
        self.run_get_request("expression_levels", || {
            let parsed = ExpressionLevelId::parse(id)?;
            let quant_id = parsed.rna_quantification_id();
            Ok(self
                .repository
                .get_dataset(&quant_id.dataset)?
                .get_rna_quantification_set(&quant_id.rna_quantification_set)?
                .get_rna_quantification(&quant_id.rna_quantification)?
                .get_expression_level(id)?
                .clone())
        })
    }

    // --- navigation helpers

    fn dataset_for(&self, dataset_id: &str) -> Result<&DatasetRecord, ServerError> {
        let parsed = DatasetId::parse(dataset_id)?;
        self.repository.get_dataset(&parsed.dataset)
    }

    fn variant_set_for(&self, variant_set_id: &str) -> Result<&VariantSetRecord, ServerError> {
        let parsed = VariantSetId::parse(variant_set_id)?;
        self.repository
            .get_dataset(&parsed.dataset)?
            .get_variant_set(&parsed.variant_set)
    }
}

///
/// ReadGroupSetStream
///
/// Projection stream for read-group-set search: a biosample filter does not
/// just select sets, it rewrites each emitted set to carry only the matching
/// member read groups. A set that had read groups but keeps none is skipped
/// entirely; the cursor is the underlying collection index, so skipped sets
/// still advance it.
///

struct ReadGroupSetStream<'a> {
    dataset: &'a DatasetRecord,
    name: String,
    biosample_id: String,
    next_index: u64,
}

impl<'a> ReadGroupSetStream<'a> {
    fn resume(
        page_token: &str,
        dataset: &'a DatasetRecord,
        name: String,
        biosample_id: String,
    ) -> Result<Self, ServerError> {
        let next_index = if page_token.is_empty() {
            0
        } else {
            parse_page_token(page_token, 1)?[0]
        };

        Ok(Self {
            dataset,
            name,
            biosample_id,
            next_index,
        })
    }

    fn project(&self, record: &ReadGroupSetRecord) -> Option<ReadGroupSet> {
        if !self.name.is_empty() && record.element.name != self.name {
            return None;
        }

        if self.biosample_id.is_empty() {
            return Some(record.element.clone());
        }

        let matches: Vec<_> = record
            .read_groups
            .iter()
            .map(|group| &group.element)
            .filter(|group| group.biosample_id == self.biosample_id)
            .cloned()
            .collect();

        if !record.read_groups.is_empty() && matches.is_empty() {
            return None;
        }

        let mut element = record.element.clone();
        element.read_groups = matches;
        Some(element)
    }
}

impl PageStream for ReadGroupSetStream<'_> {
    type Item = ReadGroupSet;

    fn next_pair(&mut self) -> Result<Option<(ReadGroupSet, Option<String>)>, ServerError> {
        let sets = &self.dataset.read_group_sets;
        while (self.next_index as usize) < sets.len() {
            let record = &sets[self.next_index as usize];
            self.next_index += 1;

            if let Some(element) = self.project(record) {
                let token = ((self.next_index as usize) < sets.len())
                    .then(|| compose_page_token(&[self.next_index]));
                return Ok(Some((element, token)));
            }
        }

        Ok(None)
    }
}

// Fault classification for telemetry only; never alters propagation.
const fn reject_kind(err: &ServerError) -> RejectKind {
    match err {
        ServerError::InvalidJson { .. } => RejectKind::Decode,
        ServerError::ObjectNotFound { .. } => RejectKind::LookupMiss,
        _ => RejectKind::Request,
    }
}
