//! Bookshelf application library
//!
//! Wires the application modules into the kernel registry and runs the
//! HTTP server around them.

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod modules;

/// Registry holding every application module
pub fn build_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

/// Run the module lifecycle around the HTTP server until shutdown.
pub async fn run(settings: &Settings) -> anyhow::Result<()> {
    let registry = build_registry();
    let ctx = InitCtx { settings };

    registry
        .init_all(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_all(&ctx)
        .await
        .context("module startup failed")?;

    let served = bookshelf_http::start_server(&registry, settings).await;

    // Stop modules even when the server exited with an error
    registry
        .stop_all()
        .await
        .context("module shutdown failed")?;

    served
}
