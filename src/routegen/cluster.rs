//! Backend cluster naming.

use crate::config::schema::ServiceConfig;

/// Supplies the name of the single local backend cluster.
pub trait ClusterNameResolver {
    fn local_backend_cluster(&self) -> String;
}

/// Derives the local cluster name from the service name.
#[derive(Debug, Clone)]
pub struct LocalClusterResolver {
    service_name: String,
}

impl LocalClusterResolver {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    pub fn from_service(service: &ServiceConfig) -> Self {
        Self::new(service.name.clone())
    }
}

impl ClusterNameResolver for LocalClusterResolver {
    fn local_backend_cluster(&self) -> String {
        format!("backend-cluster-{}_local", self.service_name)
    }
}

/// A resolver that always returns the given name.
#[derive(Debug, Clone)]
pub struct FixedClusterResolver(pub String);

impl ClusterNameResolver for FixedClusterResolver {
    fn local_backend_cluster(&self) -> String {
        self.0.clone()
    }
}
