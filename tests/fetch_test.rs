//! Integration tests for archive fetching against a mock source host

use boostforge::core::build::SourceHost;
use boostforge::error::FetchError;
use boostforge::infra::fetch::GithubSourceHost;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a real gzipped tarball containing `<library>-<label>/include/<library>.hpp`
fn tarball_fixture(library: &str, label: &str) -> Vec<u8> {
    let staging = tempfile::tempdir().expect("tempdir");
    let top = format!("{library}-{label}");
    let include = staging.path().join(&top).join("include");
    std::fs::create_dir_all(&include).expect("mkdir");
    std::fs::write(
        include.join(format!("{library}.hpp")),
        "#pragma once\n",
    )
    .expect("header");

    let archive = staging.path().join("fixture.tar.gz");
    let status = std::process::Command::new("tar")
        .arg("czf")
        .arg(&archive)
        .arg("-C")
        .arg(staging.path())
        .arg(&top)
        .status()
        .expect("tar");
    assert!(status.success());
    std::fs::read(&archive).expect("read archive")
}

#[tokio::test]
async fn test_fetch_archive_unpacks_and_renames() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/regex/archive/boost-1.69.0.tar.gz"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(tarball_fixture("regex", "boost-1.69.0")),
        )
        .mount(&server)
        .await;

    let dest = tempfile::tempdir().expect("tempdir");
    let host = GithubSourceHost::new(server.uri(), "boost-1.69.0");
    host.fetch_archive("regex", dest.path())
        .await
        .expect("fetch");

    // Unpacked as regex-boost-1.69.0, renamed to the short name.
    assert!(dest.path().join("regex/include/regex.hpp").is_file());
    assert!(!dest.path().join("regex-boost-1.69.0").exists());
}

#[tokio::test]
async fn test_missing_archive_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3) // initial attempt plus two retries
        .mount(&server)
        .await;

    let dest = tempfile::tempdir().expect("tempdir");
    let host = GithubSourceHost::new(server.uri(), "develop").with_retry_config(2, 1);
    let err = host
        .fetch_archive("nosuchlib", dest.path())
        .await
        .expect_err("must fail");

    assert!(matches!(
        err,
        FetchError::MaxRetriesExceeded { retries: 2, .. }
    ));
    assert!(!dest.path().join("nosuchlib").exists());
}

#[tokio::test]
async fn test_transient_failure_recovers_on_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/regex/archive/develop.tar.gz"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/regex/archive/develop.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tarball_fixture("regex", "develop")))
        .mount(&server)
        .await;

    let dest = tempfile::tempdir().expect("tempdir");
    let host = GithubSourceHost::new(server.uri(), "develop").with_retry_config(3, 1);
    host.fetch_archive("regex", dest.path())
        .await
        .expect("fetch recovers");

    assert!(dest.path().join("regex/include/regex.hpp").is_file());
}

#[tokio::test]
async fn test_corrupt_archive_is_an_unpack_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"not a tarball".to_vec()))
        .mount(&server)
        .await;

    let dest = tempfile::tempdir().expect("tempdir");
    let host = GithubSourceHost::new(server.uri(), "develop").with_retry_config(0, 1);
    let err = host
        .fetch_archive("regex", dest.path())
        .await
        .expect_err("must fail");

    assert!(matches!(err, FetchError::Unpack { .. }));
}
