//! List command - Show registered agents and environments

use anyhow::Result;
use clap::Parser;

use crate::{
    app::App,
    cli::output::{print_kv, print_subsection},
    config::Config,
};

#[derive(Parser, Debug)]
#[command(about = "List registered agents and environments")]
pub struct ListArgs {
    /// Print names only, one per line
    #[arg(long)]
    pub names_only: bool,
}

pub fn execute(args: ListArgs) -> Result<()> {
    let app = App::new()?;

    if args.names_only {
        for name in app.agents().list_registered() {
            println!("{name}");
        }
        for name in app.environments().list_registered() {
            println!("{name}");
        }
        return Ok(());
    }

    // Descriptions come from instances built with an empty config
    let defaults = Config::new();

    print_subsection("Agents");
    for name in app.agents().list_registered() {
        let description = app
            .create_agent(&name, &defaults)
            .map(|agent| agent.description().to_string())
            .unwrap_or_default();
        print_kv(&name, &description);
    }

    print_subsection("Environments");
    for name in app.environments().list_registered() {
        let description = match app.create_environment(&name, &defaults) {
            Ok(mut env) => {
                let description = env.description().to_string();
                env.close();
                description
            }
            Err(_) => String::new(),
        };
        print_kv(&name, &description);
    }

    Ok(())
}
