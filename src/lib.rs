//! Extension Host
//!
//! A request-dispatch host for pluggable backend extensions, built with
//! Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                 EXTENSION HOST                    │
//!                    │                                                   │
//!   Inbound Request  │  ┌──────────┐   ┌───────────┐   ┌─────────────┐  │
//!   ─────────────────┼─▶│   http   │──▶│correlation│──▶│   context   │  │
//!                    │  │  server  │   │ assigner  │   │   builder   │  │
//!                    │  └──────────┘   └───────────┘   └──────┬──────┘  │
//!                    │                                        │         │
//!                    │                                        ▼         │
//!                    │  ┌───────────────────────────────────────────┐   │
//!                    │  │              HostRegistry                  │   │
//!                    │  │  hooks │ proxies │ customizes │ functions │   │
//!                    │  └──────────────────┬────────────────────────┘   │
//!                    │                     │                            │
//!   Response         │                     ▼                            │
//!   ◀────────────────┼────────── extension handler(request, context)    │
//!                    │                                                   │
//!                    │  ┌─────────────────────────────────────────────┐ │
//!                    │  │           Cross-Cutting Concerns             │ │
//!                    │  │  ┌────────┐ ┌────────┐ ┌────────────────┐   │ │
//!                    │  │  │ config │ │ health │ │   lifecycle    │   │ │
//!                    │  │  │        │ │ report │ │ startup/drain  │   │ │
//!                    │  │  └────────┘ └────────┘ └────────────────┘   │ │
//!                    │  └─────────────────────────────────────────────┘ │
//!                    └──────────────────────────────────────────────────┘
//! ```
//!
//! Extensions are discovered at startup from a filesystem layout of plugin
//! descriptors, one directory per category. Registries are written only
//! during startup and frozen before the listener begins serving.

// Core subsystems
pub mod config;
pub mod context;
pub mod extensions;
pub mod http;
pub mod registry;

// Platform callback
pub mod platform;

// Cross-cutting concerns
pub mod health;
pub mod lifecycle;

pub use config::schema::HostConfig;
pub use http::HttpServer;
pub use lifecycle::ShutdownCoordinator;
pub use registry::HostRegistry;
