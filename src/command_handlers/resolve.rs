use crate::command_handlers::strategies;
use crate::config::ResolveConfig;
use anyhow::{bail, Result};
use protoc_resolve::reference::ResourceReference;
use protoc_resolve::resolver::{
    PathResolver, RepositoryResolver, Resolver, ResolverChain, Strategies, SystemPathResolver,
};
use std::path::PathBuf;

const PROTOC: &str = "protoc";

pub struct ResolveArgs {
    pub version: Option<String>,
    pub url: Option<String>,
    pub path: Option<PathBuf>,
    pub system_path: bool,
    pub extension: Option<String>,
}

impl ResolveArgs {
    /// Flags win over the `[protoc]` config section.
    fn merged(self, cfg: &ResolveConfig) -> Self {
        let p = &cfg.protoc;
        Self {
            version: self.version.or_else(|| p.version.clone()),
            url: self.url.or_else(|| p.url.clone()),
            path: self.path.or_else(|| p.path.clone()),
            system_path: self.system_path || p.system_path,
            extension: self.extension.or_else(|| p.extension.clone()),
        }
    }
}

pub fn run_resolve(args: ResolveArgs, cfg: &ResolveConfig) -> Result<()> {
    let args = args.merged(cfg);
    let strategies = strategies::build(cfg)?;
    let chain = build_chain(&args, &strategies)?;
    if chain.is_empty() {
        bail!("nothing to resolve: pass --path, --system-path, --url or --version (or set them under [protoc] in the config)");
    }

    let pb = strategies::spinner(format!("Resolving {PROTOC}"));
    let result = chain.resolve();
    pb.finish_and_clear();

    match result? {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => bail!("{PROTOC} could not be resolved (tried {})", chain.describe()),
    }
}

/// Preference order: literal path, PATH, url, repository version.
pub fn build_chain(args: &ResolveArgs, strategies: &Strategies) -> Result<ResolverChain> {
    let mut chain = ResolverChain::new();
    if let Some(path) = &args.path {
        chain.push(Box::new(PathResolver::new(path)));
    }
    if args.system_path {
        chain.push(Box::new(SystemPathResolver::new(
            strategies.host.clone(),
            PROTOC,
        )));
    }
    if let Some(url) = &args.url {
        let reference = ResourceReference::parse(url)?;
        let extension = args.extension.as_deref().unwrap_or_default();
        chain.push(strategies.resolver_for(reference, extension));
    }
    if let Some(version) = &args.version {
        chain.push(Box::new(RepositoryResolver::for_version(
            strategies.repository.clone(),
            version.clone(),
        )));
    }
    Ok(chain)
}
