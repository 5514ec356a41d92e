use std::process;

use clap::Parser;
use rippling::cli::Rippling;

#[tokio::main]
async fn main() {
    let app = Rippling::parse();
    timber::init(app.log_level);
    tracing::trace!(command_structure = ?app);

    match app.run().await {
        Ok(output) => {
            // a closed stdout isn't worth failing over
            let _ = output.print();
            process::exit(0)
        }
        Err(error) => {
            tracing::debug!(?error);
            let _ = error.print();
            process::exit(1)
        }
    }
}
