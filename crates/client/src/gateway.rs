//! The gateway trait the controllers talk through.
//!
//! [`RegistryApi`] is the production implementation; tests substitute a
//! scripted stub so every controller transition runs without a socket.

use async_trait::async_trait;

use coverbook_core::{CreateInsured, Insured, InsuredDraft, InsuredId, Page};

use crate::api::{ApiError, RegistryApi};

/// Registry operations as the controllers see them.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    async fn list(&self, page_number: i64, page_size: i64) -> Result<Page<Insured>, ApiError>;

    async fn get(&self, id: InsuredId) -> Result<Insured, ApiError>;

    async fn search(&self, fragment: &str) -> Result<Vec<Insured>, ApiError>;

    async fn create(&self, payload: CreateInsured) -> Result<Insured, ApiError>;

    async fn update(&self, id: InsuredId, draft: InsuredDraft) -> Result<Insured, ApiError>;

    async fn delete(&self, id: InsuredId) -> Result<(), ApiError>;
}

/// A scripted gateway for controller tests: every operation pops its
/// next result from a queue and records what it was called with.
#[cfg(test)]
pub(crate) mod stub {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::{
        ApiError, CreateInsured, Insured, InsuredDraft, InsuredId, Page, RecordGateway,
        async_trait,
    };

    #[derive(Default)]
    pub struct StubGateway {
        list_results: Mutex<VecDeque<Result<Page<Insured>, ApiError>>>,
        search_results: Mutex<VecDeque<Result<Vec<Insured>, ApiError>>>,
        create_results: Mutex<VecDeque<Result<Insured, ApiError>>>,
        update_results: Mutex<VecDeque<Result<Insured, ApiError>>>,
        delete_results: Mutex<VecDeque<Result<(), ApiError>>>,
        created: Mutex<Vec<CreateInsured>>,
        updated: Mutex<Vec<(InsuredId, InsuredDraft)>>,
        deleted: Mutex<Vec<InsuredId>>,
    }

    #[allow(clippy::unwrap_used)]
    impl StubGateway {
        pub fn push_list(&self, result: Result<Page<Insured>, ApiError>) {
            self.list_results.lock().unwrap().push_back(result);
        }

        pub fn push_search(&self, result: Result<Vec<Insured>, ApiError>) {
            self.search_results.lock().unwrap().push_back(result);
        }

        pub fn push_create(&self, result: Result<Insured, ApiError>) {
            self.create_results.lock().unwrap().push_back(result);
        }

        pub fn push_update(&self, result: Result<Insured, ApiError>) {
            self.update_results.lock().unwrap().push_back(result);
        }

        pub fn push_delete(&self, result: Result<(), ApiError>) {
            self.delete_results.lock().unwrap().push_back(result);
        }

        pub fn created(&self) -> Vec<CreateInsured> {
            self.created.lock().unwrap().clone()
        }

        pub fn updated(&self) -> Vec<(InsuredId, InsuredDraft)> {
            self.updated.lock().unwrap().clone()
        }

        pub fn deleted(&self) -> Vec<InsuredId> {
            self.deleted.lock().unwrap().clone()
        }
    }

    #[allow(clippy::unwrap_used)]
    #[async_trait]
    impl RecordGateway for StubGateway {
        async fn list(
            &self,
            _page_number: i64,
            _page_size: i64,
        ) -> Result<Page<Insured>, ApiError> {
            self.list_results
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected list call")
        }

        async fn get(&self, _id: InsuredId) -> Result<Insured, ApiError> {
            unreachable!("get is not scripted")
        }

        async fn search(&self, _fragment: &str) -> Result<Vec<Insured>, ApiError> {
            self.search_results
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected search call")
        }

        async fn create(&self, payload: CreateInsured) -> Result<Insured, ApiError> {
            self.created.lock().unwrap().push(payload);
            self.create_results
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected create call")
        }

        async fn update(
            &self,
            id: InsuredId,
            draft: InsuredDraft,
        ) -> Result<Insured, ApiError> {
            self.updated.lock().unwrap().push((id, draft));
            self.update_results
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected update call")
        }

        async fn delete(&self, id: InsuredId) -> Result<(), ApiError> {
            self.deleted.lock().unwrap().push(id);
            self.delete_results
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected delete call")
        }
    }
}

#[async_trait]
impl RecordGateway for RegistryApi {
    async fn list(&self, page_number: i64, page_size: i64) -> Result<Page<Insured>, ApiError> {
        Self::list(self, page_number, page_size).await
    }

    async fn get(&self, id: InsuredId) -> Result<Insured, ApiError> {
        Self::get(self, id).await
    }

    async fn search(&self, fragment: &str) -> Result<Vec<Insured>, ApiError> {
        Self::search(self, fragment).await
    }

    async fn create(&self, payload: CreateInsured) -> Result<Insured, ApiError> {
        Self::create(self, &payload).await
    }

    async fn update(&self, id: InsuredId, draft: InsuredDraft) -> Result<Insured, ApiError> {
        Self::update(self, id, &draft).await
    }

    async fn delete(&self, id: InsuredId) -> Result<(), ApiError> {
        Self::delete(self, id).await
    }
}
