//! Merit assessor: rule-based evidence extraction and weighted scoring of CVs
//! against eight professional-merit criteria, served over HTTP.

pub mod annotation;
pub mod assessment;
pub mod config;
pub mod criteria;
pub mod errors;
pub mod extraction;
pub mod matching;
pub mod routes;
pub mod state;
