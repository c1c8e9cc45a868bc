//! Maven-layout downloads and end-to-end resolver chains.

use protoc_resolve::cache::{DirectoryTemporarySpace, ResourceCache};
use protoc_resolve::error::{ErrorKind, RepositoryError, ResolutionError};
use protoc_resolve::platform::{FixedEnvironment, HostEnvironment};
use protoc_resolve::reference::ResourceReference;
use protoc_resolve::repository::{MavenRepositoryClient, RepositoryFetchStrategy};
use protoc_resolve::resolver::{PathResolver, RepositoryResolver, Resolver, ResolverChain, Strategies};
use protoc_resolve::url_fetch::UrlFetchStrategy;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROTOC_PATH: &str =
    "/com/google/protobuf/protoc/3.25.1/protoc-3.25.1-linux-x86_64.exe";

fn linux() -> HostEnvironment {
    HostEnvironment::new(FixedEnvironment::for_os("Linux", "amd64")).unwrap()
}

fn strategies(root: &Path, remotes: Vec<String>) -> Strategies {
    let cache = ResourceCache::new(DirectoryTemporarySpace::new(root.join("cache")));
    let urls = UrlFetchStrategy::with_timeout(cache, Duration::from_secs(5)).unwrap();
    let client =
        MavenRepositoryClient::new(root.join("m2"), remotes, Duration::from_secs(5)).unwrap();
    Strategies {
        host: linux(),
        urls: Arc::new(urls),
        repository: Arc::new(RepositoryFetchStrategy::new(client, linux())),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn downloads_from_first_remote_that_has_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex("^/mirror/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/central{PROTOC_PATH}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x7fELF protoc".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let remotes = vec![
        format!("{}/mirror/", server.uri()),
        format!("{}/central", server.uri()),
    ];

    let resolved = tokio::task::spawn_blocking(move || {
        strategies(&root, remotes).repository.resolve_executable("3.25.1")
    })
    .await
    .expect("task")
    .unwrap();

    assert_eq!(resolved, dir.path().join("m2").join(&PROTOC_PATH[1..]));
    assert_eq!(std::fs::read(&resolved).unwrap(), b"\x7fELF protoc");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&resolved).unwrap().permissions().mode();
        assert_ne!(mode & 0o100, 0, "owner execute must be set, got {mode:o}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_everywhere_is_a_repository_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let remotes = vec![server.uri()];

    let err = tokio::task::spawn_blocking(move || {
        strategies(&root, remotes).repository.resolve_executable("3.25.1")
    })
    .await
    .expect("task")
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RepositoryFailure);
    match err {
        ResolutionError::Repository { coordinate, source } => {
            assert_eq!(coordinate, "mvn:com.google.protobuf/protoc/3.25.1/linux-x86_64/exe");
            assert!(matches!(source, RepositoryError::NotFound { ref tried } if tried.len() == 1));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unwritable_local_repository_names_url_and_destination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROTOC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("protoc"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    // A plain file where the local repository directory should be.
    std::fs::write(dir.path().join("m2"), b"").unwrap();
    let root = dir.path().to_path_buf();
    let remotes = vec![server.uri()];

    let err = tokio::task::spawn_blocking(move || {
        strategies(&root, remotes).repository.resolve_executable("3.25.1")
    })
    .await
    .expect("task")
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RepositoryFailure);
    let expected_url = format!("{}{PROTOC_PATH}", server.uri());
    let expected_destination = dir.path().join("m2").join(&PROTOC_PATH[1..]);
    match err {
        ResolutionError::Repository {
            source: RepositoryError::Store { url, destination, .. },
            ..
        } => {
            assert_eq!(url, expected_url);
            assert_eq!(destination, expected_destination);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn chain_falls_through_absent_sources_to_repository() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/downloads/protoc"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PROTOC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("protoc"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let uri = server.uri();

    let resolved: Option<PathBuf> = tokio::task::spawn_blocking(move || {
        let strategies = strategies(&root, vec![uri.clone()]);
        let url = ResourceReference::parse(&format!("{uri}/downloads/protoc")).unwrap();
        let chain = ResolverChain::new()
            .with(PathResolver::new(root.join("not-here")))
            .with_boxed(strategies.resolver_for(url, ""))
            .with(RepositoryResolver::for_version(
                strategies.repository.clone(),
                "3.25.1",
            ));
        chain.resolve()
    })
    .await
    .expect("task")
    .unwrap();

    assert_eq!(resolved, Some(dir.path().join("m2").join(&PROTOC_PATH[1..])));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn chain_stops_on_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/downloads/protoc"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PROTOC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("protoc"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let uri = server.uri();

    let err = tokio::task::spawn_blocking(move || {
        let strategies = strategies(&root, vec![uri.clone()]);
        let url = ResourceReference::parse(&format!("{uri}/downloads/protoc")).unwrap();
        ResolverChain::new()
            .with_boxed(strategies.resolver_for(url, ""))
            .with(RepositoryResolver::for_version(
                strategies.repository.clone(),
                "3.25.1",
            ))
            .resolve()
    })
    .await
    .expect("task")
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}
