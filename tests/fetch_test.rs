//! Remote fetching tests against a mock HTTP server.

use httpmock::prelude::*;
use oaslint::document::DocumentLocation;
use oaslint::resolver::{Fetcher, HttpFetcher, Resolver};
use tempfile::TempDir;

#[test]
fn fetches_remote_documents() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/types.yml");
        then.status(200).body("Pet:\n  type: object\n");
    });

    let fetcher = HttpFetcher::new();
    let content = fetcher.fetch(&server.url("/types.yml")).unwrap();
    assert!(content.contains("Pet"));
    mock.assert();
}

#[test]
fn http_failure_is_a_fetch_error_with_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/gone.yml");
        then.status(404);
    });

    let fetcher = HttpFetcher::new();
    let err = fetcher.fetch(&server.url("/gone.yml")).unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[test]
fn disk_cache_survives_across_fetcher_instances() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/types.yml");
        then.status(200).body("Pet:\n  type: object\n");
    });
    let cache = TempDir::new().unwrap();

    let first = HttpFetcher::new().with_cache_dir(cache.path().to_path_buf());
    first.fetch(&server.url("/types.yml")).unwrap();

    let second = HttpFetcher::new().with_cache_dir(cache.path().to_path_buf());
    let content = second.fetch(&server.url("/types.yml")).unwrap();
    assert!(content.contains("Pet"));
    mock.assert_hits(1);
}

#[test]
fn resolver_follows_absolute_url_references() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/types.yml");
        then.status(200)
            .body("components:\n  schemas:\n    Pet:\n      type: object\n");
    });

    let dir = TempDir::new().unwrap();
    let api = dir.path().join("api.yml");
    std::fs::write(&api, "openapi: 3.0.3\npaths: {}\n").unwrap();

    let resolver = Resolver::with_fetcher(Box::new(Fetcher::new()));
    let document = resolver.load(DocumentLocation::local(&api)).unwrap();
    let reference = format!("{}#/components/schemas/Pet", server.url("/types.yml"));
    let target = resolver.resolve(&document, &reference).unwrap();
    assert!(target.document.location().is_remote());
    assert_eq!(
        target.document.tree().get_str(target.node, "type"),
        Some("object")
    );
}

#[test]
fn relative_references_from_remote_documents_stay_remote() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/specs/root.yml");
        then.status(200).body("Root:\n  $ref: 'shared.yml#/Leaf'\n");
    });
    server.mock(|when, then| {
        when.method(GET).path("/specs/shared.yml");
        then.status(200).body("Leaf:\n  type: string\n");
    });

    let resolver = Resolver::with_fetcher(Box::new(Fetcher::new()));
    let document = resolver
        .load(DocumentLocation::remote(server.url("/specs/root.yml")))
        .unwrap();
    let target = resolver.resolve(&document, "#/Root").unwrap();
    assert_eq!(
        target.document.tree().get_str(target.node, "type"),
        Some("string")
    );
}
