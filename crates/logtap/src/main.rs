use logtap::runtime::{boot, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let config = boot::boot()?;
    run::run(config).await
}
