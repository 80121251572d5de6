mod cli;
mod commands;
mod context;
mod logging;

use ange_core::InputSpec;
use clap::Parser;
use cli::Cli;
use context::Context;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::new(cli.config.as_deref())?;

    let spec = InputSpec {
        raw_input: cli.input,
        recursive: cli.recursive || ctx.config.compile.recursive,
        watch: cli.watch,
        explicit_output: cli.output,
    };

    if spec.watch {
        commands::watch::run(&ctx, &spec).await
    } else {
        let strict = cli.strict || ctx.config.compile.strict;
        commands::compile::run(&ctx, &spec, strict).await
    }
}
