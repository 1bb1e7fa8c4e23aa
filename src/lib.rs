#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![cfg_attr(not(feature = "std"), no_std)]

//! A minimal, chainable URI builder.
//!
//! A [`UriBuilder`] accumulates a scheme, a host, a port, path segments,
//! query parameters and a fragment, optionally seeded from an existing URI,
//! and serializes them into a percent-encoded URI string. The result is
//! checked by an RFC 3986 parser before it is handed back as a [`Uri`].
//!
//! # Examples
//!
//! ```
//! use uri_builder_tiny::UriBuilder;
//!
//! let uri = UriBuilder::parse("https://java.example.com/foo/bar")?
//!     .set_port(8080)
//!     .append_paths(["buz", "qux"])?
//!     .add_query_parameter("hoge", "fuga")?
//!     .add_query_parameter("piyo", "hogera")?
//!     .set_fragment("frag")?
//!     .build()?;
//!
//! assert_eq!(
//!     uri,
//!     "https://java.example.com:8080/foo/bar/buz/qux?hoge=fuga&piyo=hogera#frag"
//! );
//! assert_eq!(uri.authority().unwrap().port(), Some("8080"));
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! # Encoding
//!
//! Values given to the builder are encoded when they are stored, not when
//! the URI is built. The default [`PercentEncoder`](entity::PercentEncoder)
//! follows the `application/x-www-form-urlencoded` serializer over UTF-8.
//! Every mutator that encodes has a `*_raw_*` twin that stores its input
//! as is, and a different encoder can be installed with
//! [`UriBuilder::with_encoder`].
//!
//! Seed URIs are taken apart without any encoding or decoding.
//!
//! # Logging
//!
//! Seeding and building emit [`tracing`] events at the `debug` level.
//! Dropped seed query terms are reported at `trace`, and a built string
//! that fails to re-parse at `warn`.
//!
//! # Crate features
//!
//! - `std` (default): Enables `std` support. This includes [`Error`] implementations.
//!
//! - `impl-error` (default): Enables [`Error`] implementations through
//!   `core::error::Error` when `std` is disabled.
//!
//! - `serde`: Enables [`serde`] support for [`Uri`].
//!
//! [`Error`]: core::error::Error
//! [`serde`]: https://docs.rs/serde

extern crate alloc;

pub mod component;
pub mod entity;

mod base;
mod builder;
mod error;
mod fmt;
mod imp;
mod parse;
mod table;

pub use base::BaseUri;
pub use builder::UriBuilder;
pub use error::{BuildError, EncodeError};
pub use imp::Uri;
pub use parse::{ParseError, ParseErrorKind};

#[cfg(feature = "std")]
use std::error::Error;

#[cfg(all(feature = "impl-error", not(feature = "std")))]
use core::error::Error;
