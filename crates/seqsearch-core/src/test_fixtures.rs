//! Shared repository fixtures for the dispatcher tests.

use crate::repo::{
    BiosampleRecord, CallSetRecord, ContinuousSetRecord, DatasetRecord, ExperimentRecord,
    FeatureSetRecord, IndividualRecord, PhenotypeAssociationSetRecord, ReadGroupRecord,
    ReadGroupSetRecord, ReferenceRecord, ReferenceSetRecord, RnaQuantificationRecord,
    RnaQuantificationSetRecord, VariantAnnotationSetRecord, VariantSetRecord,
    memory::MemoryRepository,
};
use seqsearch_protocol::entities::{
    Call, Continuous, ExpressionLevel, Feature, FeaturePhenotypeAssociation, PhenotypeInstance,
    ReadAlignment, Variant, VariantAnnotation,
};

/// A repository holding `n` bare datasets, for pagination-shape tests.
pub(crate) fn datasets_only(n: usize) -> MemoryRepository {
    let mut repo = MemoryRepository::new();
    for i in 0..n {
        repo.push_dataset(DatasetRecord::new(format!("ds{i}")));
    }
    repo
}

pub(crate) fn variant(
    set: &VariantSetRecord,
    local: &str,
    reference_name: &str,
    start: u64,
    end: u64,
) -> Variant {
    Variant {
        id: format!("variant:ds1:{}:{local}", set.local_id),
        variant_set_id: set.element.id.clone(),
        reference_name: reference_name.to_string(),
        start,
        end,
        reference_bases: "A".to_string(),
        alternate_bases: vec!["T".to_string()],
        calls: Vec::new(),
    }
}

pub(crate) fn read(group: &ReadGroupRecord, local: &str, reference_id: &str, pos: u64) -> ReadAlignment {
    ReadAlignment {
        id: local.to_string(),
        read_group_id: group.element.id.clone(),
        fragment_name: local.to_string(),
        reference_id: reference_id.to_string(),
        alignment_start: pos,
        aligned_sequence: "ACGT".to_string(),
    }
}

/// One fully-populated dataset plus a reference set, covering every
/// container the endpoints navigate.
pub(crate) fn populated_repository() -> MemoryRepository {
    let mut repo = MemoryRepository::new();

    repo.push_experiment(ExperimentRecord::new("exp1"));

    // Reference set with two references.
    let mut reference_set = ReferenceSetRecord::new("grch38");
    reference_set.element.assembly_id = "GRCh38".to_string();
    reference_set
        .references
        .push(ReferenceRecord::new("grch38", "chr1", "ACGTACGTACGT"));
    reference_set
        .references
        .push(ReferenceRecord::new("grch38", "chr2", "TTTT"));
    repo.push_reference_set(reference_set);

    let mut dataset = DatasetRecord::new("ds1");

    dataset
        .individuals
        .push(IndividualRecord::new("ds1", "ind1"));
    dataset
        .biosamples
        .push(BiosampleRecord::new("ds1", "bio1", "ind1"));
    dataset
        .biosamples
        .push(BiosampleRecord::new("ds1", "bio2", ""));

    // Mapped read group set with two groups, one per biosample.
    let mut rgs = ReadGroupSetRecord::new("ds1", "rgs1", Some("grch38".to_string()));
    let mut rg1 = ReadGroupRecord::new("ds1", "rgs1", "rg1", "bio1");
    rg1.reads = vec![
        read(&rg1, "r1", "reference:grch38:chr1", 2),
        read(&rg1, "r3", "reference:grch38:chr1", 8),
    ];
    let mut rg2 = ReadGroupRecord::new("ds1", "rgs1", "rg2", "bio2");
    rg2.reads = vec![read(&rg2, "r2", "reference:grch38:chr1", 5)];
    rgs.push_read_group(rg1);
    rgs.push_read_group(rg2);
    dataset.read_group_sets.push(rgs);

    // Unmapped read group set with one sample-less group.
    let mut rgs2 = ReadGroupSetRecord::new("ds1", "rgs2", None);
    rgs2.push_read_group(ReadGroupRecord::new("ds1", "rgs2", "rg3", ""));
    dataset.read_group_sets.push(rgs2);

    // Variant set with variants, calls, call sets, and an annotation set.
    let mut vs = VariantSetRecord::new("ds1", "vs1", "grch38");
    vs.call_sets
        .push(CallSetRecord::new("ds1", "vs1", "cs1", "bio1"));
    vs.call_sets
        .push(CallSetRecord::new("ds1", "vs1", "cs2", "bio2"));
    let mut v1 = variant(&vs, "v1", "chr1", 2, 3);
    v1.calls = vec![
        Call {
            call_set_id: "callset:ds1:vs1:cs1".to_string(),
            genotype: vec![0, 1],
        },
        Call {
            call_set_id: "callset:ds1:vs1:cs2".to_string(),
            genotype: vec![1, 1],
        },
    ];
    let mut v2 = variant(&vs, "v2", "chr1", 6, 7);
    v2.calls = vec![
        Call {
            call_set_id: "callset:ds1:vs1:cs1".to_string(),
            genotype: vec![0, 0],
        },
        Call {
            call_set_id: "callset:ds1:vs1:cs2".to_string(),
            genotype: vec![0, 1],
        },
    ];
    vs.variants = vec![v1, v2];

    let mut vas = VariantAnnotationSetRecord::new("ds1", "vs1", "vas1");
    vas.annotations = vec![VariantAnnotation {
        id: "ann1".to_string(),
        variant_annotation_set_id: vas.element.id.clone(),
        variant_id: "variant:ds1:vs1:v1".to_string(),
        reference_name: "chr1".to_string(),
        start: 2,
        end: 3,
    }];
    vs.annotation_sets.push(vas);
    dataset.variant_sets.push(vs);

    // Feature set with a gene and its exon.
    let mut fs = FeatureSetRecord::new("ds1", "fs1");
    fs.features = vec![
        Feature {
            id: "feature:ds1:fs1:gene1".to_string(),
            feature_set_id: fs.element.id.clone(),
            parent_id: String::new(),
            name: "gene1".to_string(),
            reference_name: "chr1".to_string(),
            start: 0,
            end: 10,
        },
        Feature {
            id: "feature:ds1:fs1:exon1".to_string(),
            feature_set_id: fs.element.id.clone(),
            parent_id: "feature:ds1:fs1:gene1".to_string(),
            name: "exon1".to_string(),
            reference_name: "chr1".to_string(),
            start: 2,
            end: 4,
        },
    ];
    dataset.feature_sets.push(fs);

    let mut cons = ContinuousSetRecord::new("ds1", "cons1");
    cons.values = vec![Continuous {
        reference_name: "chr1".to_string(),
        start: 0,
        values: vec![0.5, 0.7, 0.9],
    }];
    dataset.continuous_sets.push(cons);

    let mut rqs = RnaQuantificationSetRecord::new("ds1", "rqs1");
    let mut rq = RnaQuantificationRecord::new("ds1", "rqs1", "rq1", "bio1");
    rq.expression_levels = vec![
        ExpressionLevel {
            id: "expressionlevel:ds1:rqs1:rq1:el1".to_string(),
            rna_quantification_id: rq.element.id.clone(),
            name: "BRCA1".to_string(),
            expression: 5.0,
        },
        ExpressionLevel {
            id: "expressionlevel:ds1:rqs1:rq1:el2".to_string(),
            rna_quantification_id: rq.element.id.clone(),
            name: "BRCA2".to_string(),
            expression: 0.5,
        },
    ];
    rqs.quantifications.push(rq);
    dataset.rna_quantification_sets.push(rqs);

    let mut pas = PhenotypeAssociationSetRecord::new("ds1", "pas1");
    pas.associations = vec![FeaturePhenotypeAssociation {
        id: "assoc1".to_string(),
        phenotype_association_set_id: pas.element.id.clone(),
        feature_ids: vec!["feature:ds1:fs1:gene1".to_string()],
        phenotype: PhenotypeInstance {
            id: "pheno1".to_string(),
            description: "short stature".to_string(),
        },
        description: "association".to_string(),
    }];
    dataset.phenotype_association_sets.push(pas);

    repo.push_dataset(dataset);
    repo
}
