//! Structural analysis of a page snapshot: element graph and role detection.

pub mod graph;
pub mod roles;

pub use graph::ElementGraph;
pub use roles::{
    DetectionInput, DetectorGates, DetectorList, RoleAssignment, RoleClassifier,
    RoleDetectionConfig, RoleDetector, RoleMap, role_histogram,
};
