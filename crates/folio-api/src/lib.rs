//! # folio-api
//!
//! HTTP surface of the folio authentication core.
//!
//! ## Modules
//!
//! - [`auth`] - the bearer gate middleware, the `require_authenticated`
//!   guard and the [`Authentication`] extractor
//! - [`dto`] - request and response bodies
//! - [`error`] - error types and HTTP error responses
//! - [`router`] - login and key management handlers
//! - [`state`] - shared auth state
//!
//! ## Endpoints
//!
//! | Method | Path | Access | Description |
//! |--------|------|--------|-------------|
//! | POST | `/auth` | guest | Exchange a one-time password for an API key |
//! | GET | `/auth/status` | guest | Report whether the caller's key is live |
//! | DELETE | `/auth/keys` | admin | Revoke every issued key |
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::{middleware, Router};
//! use folio_api::{auth_router, bearer_gate, AuthState};
//!
//! let state = AuthState::new(login);
//! let app = Router::new()
//!     .merge(auth_router().with_state(state.clone()))
//!     .layer(middleware::from_fn_with_state(state, bearer_gate));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod dto;
pub mod error;
pub mod router;
pub mod state;

pub use auth::{bearer_gate, require_authenticated, Authentication};
pub use dto::{AuthStatus, LoginRequest, LoginResponse};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use router::auth_router;
pub use state::AuthState;
