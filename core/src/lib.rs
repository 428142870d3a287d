//! Client core for the starter API.
//!
//! # Overview
//! Two concerns live here: validating form input before it is submitted, and
//! talking to the API through a single client that unwraps the response
//! envelope and normalizes every failure into one error type.
//!
//! # Design
//! - `ApiClient` builds `HttpRequest` values and parses `HttpResponse` values;
//!   the network round-trip goes through the `Transport` trait so the client
//!   can be tested without a server.
//! - The auth token lives behind the `TokenStore` trait instead of a global.
//! - Validation rules are pure functions; forms compose them.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod forms;
pub mod http;
pub mod settings;
pub mod site;
pub mod storage;
pub mod types;
pub mod validation;

pub use client::ApiClient;
pub use envelope::{Envelope, Failure, Pagination, Success};
pub use error::ApiError;
pub use forms::{ContactForm, FormSchema, LoginForm, ProfileForm, SignupForm};
pub use http::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
pub use settings::{Environment, Settings, SettingsError};
pub use site::SiteConfig;
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::{Comment, ExampleData, Page, PaginationParams, Post, SortOrder, User};
pub use validation::{FieldErrors, FormData};
