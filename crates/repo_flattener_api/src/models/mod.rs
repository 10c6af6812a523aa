//! HTTP request and response models
//!
//! These types are distinct from domain types and exist only in the HTTP layer.

pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::{
    BrowseRequest, ConvertRequest, DirectoryRequest, FileTypes, RepositoryRequest,
    SelectedFilesRequest, StructureRequest,
};
pub use response::{
    ContentResponse, ConvertResponse, DirectoryResponse, FetchRepoResponse, LanguagesResponse,
    RepoFileResponse, StructureResponse, StructureView,
};
