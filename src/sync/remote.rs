use std::future::Future;

use crate::error::Result;

use super::types::{NewPostRequest, RemotePost};

/// Source of remote quotes. Implemented over HTTP by `ApiClient`.
pub trait RemoteSource: Send + Sync + 'static {
    fn fetch_posts(&self) -> impl Future<Output = Result<Vec<RemotePost>>> + Send;

    fn create_post(
        &self,
        req: &NewPostRequest,
    ) -> impl Future<Output = Result<RemotePost>> + Send;
}
