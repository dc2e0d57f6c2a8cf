use super::*;
use proptest::prelude::*;

#[test]
fn encode_parse_round_trip_for_every_variant() {
    // One well-formed identifier per entity type.
    let encoded = [
        DatasetId::new("ds1").to_string(),
        ReferenceSetId::new("grch38").to_string(),
        ReferenceId::new("grch38", "chr1").to_string(),
        ReadGroupSetId::new("ds1", "rgs1").to_string(),
        ReadGroupId::new("ds1", "rgs1", "rg1").to_string(),
        VariantSetId::new("ds1", "vs1").to_string(),
        VariantAnnotationSetId::new("ds1", "vs1", "vas1").to_string(),
        VariantId::new("ds1", "vs1", "var1").to_string(),
        CallSetId::new("ds1", "vs1", "cs1").to_string(),
        FeatureSetId::new("ds1", "fs1").to_string(),
        FeatureId::new("ds1", "fs1", "f1").to_string(),
        ContinuousSetId::new("ds1", "cons1").to_string(),
        BiosampleId::new("ds1", "bio1").to_string(),
        IndividualId::new("ds1", "ind1").to_string(),
        RnaQuantificationSetId::new("ds1", "rqs1").to_string(),
        RnaQuantificationId::new("ds1", "rqs1", "rq1").to_string(),
        ExpressionLevelId::new("ds1", "rqs1", "rq1", "el1").to_string(),
        PhenotypeAssociationSetId::new("ds1", "pas1").to_string(),
    ];

    assert_eq!(DatasetId::parse(&encoded[0]).unwrap().to_string(), encoded[0]);
    assert_eq!(
        ReferenceSetId::parse(&encoded[1]).unwrap().to_string(),
        encoded[1]
    );
    assert_eq!(ReferenceId::parse(&encoded[2]).unwrap().to_string(), encoded[2]);
    assert_eq!(
        ReadGroupSetId::parse(&encoded[3]).unwrap().to_string(),
        encoded[3]
    );
    assert_eq!(ReadGroupId::parse(&encoded[4]).unwrap().to_string(), encoded[4]);
    assert_eq!(VariantSetId::parse(&encoded[5]).unwrap().to_string(), encoded[5]);
    assert_eq!(
        VariantAnnotationSetId::parse(&encoded[6]).unwrap().to_string(),
        encoded[6]
    );
    assert_eq!(VariantId::parse(&encoded[7]).unwrap().to_string(), encoded[7]);
    assert_eq!(CallSetId::parse(&encoded[8]).unwrap().to_string(), encoded[8]);
    assert_eq!(FeatureSetId::parse(&encoded[9]).unwrap().to_string(), encoded[9]);
    assert_eq!(FeatureId::parse(&encoded[10]).unwrap().to_string(), encoded[10]);
    assert_eq!(
        ContinuousSetId::parse(&encoded[11]).unwrap().to_string(),
        encoded[11]
    );
    assert_eq!(BiosampleId::parse(&encoded[12]).unwrap().to_string(), encoded[12]);
    assert_eq!(
        IndividualId::parse(&encoded[13]).unwrap().to_string(),
        encoded[13]
    );
    assert_eq!(
        RnaQuantificationSetId::parse(&encoded[14]).unwrap().to_string(),
        encoded[14]
    );
    assert_eq!(
        RnaQuantificationId::parse(&encoded[15]).unwrap().to_string(),
        encoded[15]
    );
    assert_eq!(
        ExpressionLevelId::parse(&encoded[16]).unwrap().to_string(),
        encoded[16]
    );
    assert_eq!(
        PhenotypeAssociationSetId::parse(&encoded[17]).unwrap().to_string(),
        encoded[17]
    );
}

#[test]
fn parse_rejects_wrong_tag() {
    let err = FeatureSetId::parse("featureset-typo:ds1:fs1")
        .expect_err("wrong tag should be rejected");
    assert!(matches!(
        err,
        crate::error::ServerError::MalformedId {
            expected: "featureset",
            ..
        }
    ));

    // A valid identifier of another variant is not interchangeable.
    let variant_set = VariantSetId::new("ds1", "vs1").to_string();
    assert!(FeatureSetId::parse(&variant_set).is_err());
}

#[test]
fn parse_rejects_wrong_arity_and_empty_segments() {
    assert!(FeatureId::parse("feature:ds1:fs1").is_err());
    assert!(FeatureId::parse("feature:ds1:fs1:f1:extra").is_err());
    assert!(FeatureId::parse("feature:ds1::f1").is_err());
    assert!(DatasetId::parse("dataset:").is_err());
    assert!(DatasetId::parse("").is_err());
}

#[test]
fn child_identifier_exposes_ancestor_path() {
    let feature = FeatureId::parse("feature:ds1:fs1:f1").expect("feature id should parse");

    assert_eq!(feature.feature_set_id().to_string(), "featureset:ds1:fs1");
    assert_eq!(feature.dataset_id().to_string(), "dataset:ds1");

    let expression =
        ExpressionLevelId::parse("expressionlevel:ds1:rqs1:rq1:el1").expect("should parse");
    assert_eq!(
        expression.rna_quantification_id().to_string(),
        "rnaquantification:ds1:rqs1:rq1"
    );
    assert_eq!(
        expression
            .rna_quantification_id()
            .rna_quantification_set_id()
            .to_string(),
        "rnaquantificationset:ds1:rqs1"
    );
}

proptest! {
    #[test]
    fn round_trip_holds_for_arbitrary_local_segments(
        dataset in "[a-zA-Z0-9_.-]{1,32}",
        feature_set in "[a-zA-Z0-9_.-]{1,32}",
        feature in "[a-zA-Z0-9_.-]{1,32}",
    ) {
        let id = FeatureId::new(dataset, feature_set, feature);
        let encoded = id.to_string();
        let parsed = FeatureId::parse(&encoded).expect("encoded id should parse");
        prop_assert_eq!(parsed, id);
    }
}
