//! Module: memory
//! Responsibility: the in-memory `DataRepository` used by embedders and the
//! test suite — a plain vector-backed store with insertion-order indexing.
//! Does not own: query semantics or pagination.

use crate::{
    compound::{DatasetId, ReferenceSetId},
    error::ServerError,
    repo::{DataRepository, DatasetRecord, ExperimentRecord, ReferenceSetRecord},
};

///
/// MemoryRepository
///

#[derive(Debug, Default)]
pub struct MemoryRepository {
    datasets: Vec<DatasetRecord>,
    experiments: Vec<ExperimentRecord>,
    reference_sets: Vec<ReferenceSetRecord>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_dataset(&mut self, record: DatasetRecord) -> &mut Self {
        self.datasets.push(record);
        self
    }

    pub fn push_experiment(&mut self, record: ExperimentRecord) -> &mut Self {
        self.experiments.push(record);
        self
    }

    pub fn push_reference_set(&mut self, record: ReferenceSetRecord) -> &mut Self {
        self.reference_sets.push(record);
        self
    }
}

impl DataRepository for MemoryRepository {
    fn num_datasets(&self) -> usize {
        self.datasets.len()
    }

    fn dataset_by_index(&self, index: usize) -> &DatasetRecord {
        &self.datasets[index]
    }

    fn get_dataset(&self, local_id: &str) -> Result<&DatasetRecord, ServerError> {
        self.datasets
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| ServerError::not_found(DatasetId::new(local_id).to_string()))
    }

    fn num_experiments(&self) -> usize {
        self.experiments.len()
    }

    fn experiment_by_index(&self, index: usize) -> &ExperimentRecord {
        &self.experiments[index]
    }

    fn get_experiment(&self, local_id: &str) -> Result<&ExperimentRecord, ServerError> {
        self.experiments
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| ServerError::not_found(local_id))
    }

    fn reference_sets(&self) -> &[ReferenceSetRecord] {
        &self.reference_sets
    }

    fn get_reference_set(&self, local_id: &str) -> Result<&ReferenceSetRecord, ServerError> {
        self.reference_sets
            .iter()
            .find(|record| record.local_id == local_id)
            .ok_or_else(|| ServerError::not_found(ReferenceSetId::new(local_id).to_string()))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_local_id_and_index_agree() {
        let mut repo = MemoryRepository::new();
        repo.push_dataset(DatasetRecord::new("ds1"))
            .push_dataset(DatasetRecord::new("ds2"));

        assert_eq!(repo.num_datasets(), 2);
        assert_eq!(repo.dataset_by_index(1).local_id, "ds2");
        assert_eq!(
            repo.get_dataset("ds2").expect("dataset should exist").element.id,
            "dataset:ds2"
        );
    }

    #[test]
    fn missing_dataset_reports_compound_id() {
        let repo = MemoryRepository::new();
        let err = repo.get_dataset("nope").expect_err("lookup should fail");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("dataset:nope"));
    }

    #[test]
    fn missing_reference_set_is_not_found() {
        let repo = MemoryRepository::new();
        assert!(repo.get_reference_set("grch99").expect_err("should fail").is_not_found());
    }
}
