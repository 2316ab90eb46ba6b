//! End-to-end tests for the folio server live under `tests/`.
