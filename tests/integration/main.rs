//! Integration tests for Pulse Extractor

mod crawl_tests;
mod pipeline_tests;
