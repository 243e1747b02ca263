//! # gamehub-apiclient
//!
//! HTTP implementation of the [`ControlPlaneClient`] contract against the
//! GameHub control-plane REST API.
//!
//! [`ControlPlaneClient`]: gamehub_core::traits::ControlPlaneClient

pub mod client;

pub use client::HttpControlPlaneClient;
