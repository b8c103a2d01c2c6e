//! Domain Layer - Media acquisition model
//!
//! This layer contains:
//! - Domain entities (Job, JobStatus, AuthContext, ResolvedResult)
//! - Domain value objects (MediaUrl, RequestType, DownloadKind)
//! - Gateway traits for the upstream services (interfaces)

pub mod entities;
pub mod gateway;
pub mod value_objects;
