use pictor_core::Config;

// Use mimalloc as the global allocator for better performance and lower fragmentation,
// especially when running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Database, storage, services and routes
    let (_state, router) = pictor_api::setup::initialize_app(config.clone()).await?;

    pictor_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
