//! Symmetric authentication tokens.
//!
//! A [`Maker`] issues a token binding a username to a validity window and
//! verifies it later without a session lookup. Two interchangeable backends
//! implement it: [`JwtMaker`] (HS256 signed claims) and [`PasetoMaker`]
//! (PASETO v4.local authenticated encryption).

pub mod configuration;
pub mod error;
pub mod jwt_maker;
pub mod maker;
pub mod paseto_maker;
pub mod payload;
pub mod telemetry;

pub use error::{AppError, IssueError, KeyError, TokenError};
pub use jwt_maker::JwtMaker;
pub use maker::{new_maker, Maker, TokenBackend};
pub use paseto_maker::PasetoMaker;
pub use payload::Payload;
