pub mod config_service;
pub mod directory_service;
pub mod http;
pub mod identity_service;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::directory_service::HttpDirectoryService;
pub use crate::http::ApiClient;
pub use crate::identity_service::HttpIdentityProvider;
pub use crate::storage::{SharedStorage, TabStorage};
