/// Media type constants for registry requests
pub mod media_type {
    /// Docker schema 2 image manifest
    pub const MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";
}

/// Fixed identifiers for the ECR backend
pub mod ecr {
    /// Registry (account) id owning the repositories to clean up
    pub const REGISTRY_ID: &str = "308535385114";

    /// Region the registry lives in
    pub const REGION: &str = "us-east-1";
}
