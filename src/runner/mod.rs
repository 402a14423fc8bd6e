//! Suite orchestration.

pub mod suite;

pub use suite::{
    SuiteRunner, CONNECTIVITY_SUMMARY, CONNECTIVITY_TITLE, SUITE_SUMMARY, SUITE_TITLE,
};
