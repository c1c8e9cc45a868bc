use crate::cli::Commands;
use crate::command_handlers::{env, fetch, resolve};
use crate::config::ResolveConfig;
use anyhow::Result;

pub fn dispatch(cmd: Commands, cfg: &ResolveConfig) -> Result<()> {
    match cmd {
        Commands::Resolve {
            version,
            url,
            path,
            system_path,
            extension,
        } => {
            let args = resolve::ResolveArgs {
                version,
                url,
                path,
                system_path,
                extension,
            };
            resolve::run_resolve(args, cfg)
        }
        Commands::Fetch {
            reference,
            extension,
        } => fetch::run_fetch(&reference, extension.as_deref().unwrap_or_default(), cfg),
        Commands::CachePath { url, extension } => {
            fetch::print_cache_path(&url, extension.as_deref().unwrap_or_default(), cfg)
        }
        Commands::Env { json } => env::print_env(json),
    }
}
