use regdesk_core::Config;

// Use mimalloc as the global allocator for lower fragmentation under
// bursts of large multipart bodies.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (clients, services, routes)
    let (state, router) = regdesk_api::setup::initialize_app(config.clone()).await?;
    let tasks = state.submissions.tasks().clone();

    // Start the server
    regdesk_api::setup::server::start_server(&config, router, tasks).await?;

    Ok(())
}
