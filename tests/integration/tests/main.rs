//! End-to-End Integration Tests
//!
//! These tests boot the real folio server on a random port with a file
//! secret store in a temporary directory and drive it over HTTP. The
//! `postgres` module uses testcontainers for an ephemeral PostgreSQL
//! instance and needs a Docker daemon; run it with `--ignored`.

mod auth_flow;
mod common;
mod endpoints;
mod postgres;
