use crate::command_handlers::strategies;
use crate::config::ResolveConfig;
use anyhow::{bail, Context, Result};
use protoc_resolve::reference::ResourceReference;
use url::Url;

pub fn run_fetch(reference: &str, extension: &str, cfg: &ResolveConfig) -> Result<()> {
    let reference = ResourceReference::parse(reference)?;
    let strategies = strategies::build(cfg)?;
    let resolver = strategies.resolver_for(reference.clone(), extension);

    let pb = strategies::spinner(format!("Fetching {reference}"));
    let result = resolver.resolve();
    pb.finish_and_clear();

    match result? {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => bail!("nothing found at {reference}"),
    }
}

pub fn print_cache_path(url: &str, extension: &str, cfg: &ResolveConfig) -> Result<()> {
    let url = Url::parse(url).with_context(|| format!("parsing URL '{url}'"))?;
    let strategies = strategies::build(cfg)?;
    let path = strategies.urls.cache().target_file(&url, extension)?;
    println!("{}", path.display());
    Ok(())
}
