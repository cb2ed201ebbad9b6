pub mod http_client;
pub mod study_api;

pub use http_client::HttpStudyApi;
pub use study_api::StudyApi;
