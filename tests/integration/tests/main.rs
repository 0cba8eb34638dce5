//! End-to-End Integration Tests
//!
//! These tests boot the server on a random port against a mocked Keycloak
//! realm and drive it over HTTP.

mod common;
mod login_flow;
