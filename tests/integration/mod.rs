//! Integration tests for the library as a whole
//!
//! These tests exercise realistic sample / evaluate / adjust workflows.

// Manual loops through SimulationParameterManager
mod manager_workflow;

// Full campaigns
mod campaign_tests;
