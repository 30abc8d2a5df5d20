use std::fs;
use std::path::PathBuf;

use frost::content::{Rejected, normalize_target, resolve, resolve_target};
use tempfile::TempDir;

/// `outer/` holds the content root `outer/site/` plus files that must stay
/// unreachable from it.
fn layout() -> (TempDir, PathBuf) {
    let outer = tempfile::tempdir().unwrap();
    let site = outer.path().join("site");
    fs::create_dir_all(site.join("sub")).unwrap();
    fs::write(site.join("index.html"), "<h1>home</h1>").unwrap();
    fs::write(site.join("sub").join("page.html"), "page").unwrap();
    fs::write(site.join("my file.html"), "spaced").unwrap();
    fs::write(outer.path().join("secret.html"), "secret").unwrap();
    fs::create_dir_all(outer.path().join("site-other")).unwrap();
    fs::write(outer.path().join("site-other").join("x.html"), "x").unwrap();

    let root = site.canonicalize().unwrap();
    (outer, root)
}

#[tokio::test]
async fn test_resolves_file_inside_root() {
    let (_outer, root) = layout();

    let path = resolve("/index.html", &root).await.unwrap();
    assert_eq!(path, root.join("index.html"));
}

#[tokio::test]
async fn test_root_target_resolves_to_root() {
    let (_outer, root) = layout();

    assert_eq!(resolve("/", &root).await.unwrap(), root);
}

#[tokio::test]
async fn test_dot_segments_inside_root_are_fine() {
    let (_outer, root) = layout();

    let path = resolve("/sub/../sub/./page.html", &root).await.unwrap();
    assert_eq!(path, root.join("sub").join("page.html"));
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let (_outer, root) = layout();

    assert_eq!(resolve("/nope.html", &root).await, Err(Rejected::NotFound));
}

#[tokio::test]
async fn test_parent_escape_is_rejected() {
    let (_outer, root) = layout();

    assert_eq!(
        resolve("/../secret.html", &root).await,
        Err(Rejected::Traversal)
    );
}

#[tokio::test]
async fn test_sibling_with_common_prefix_is_rejected() {
    let (_outer, root) = layout();

    assert_eq!(
        resolve("/../site-other/x.html", &root).await,
        Err(Rejected::Traversal)
    );
}

#[tokio::test]
async fn test_absolute_looking_target_is_confined() {
    let (outer, root) = layout();
    let secret = outer.path().join("secret.html").canonicalize().unwrap();
    let target = format!("/{}", secret.display());

    // Looked up below the root, where no such file exists.
    assert_eq!(resolve(&target, &root).await, Err(Rejected::NotFound));
}

#[tokio::test]
async fn test_repeated_leading_slashes_stay_in_root() {
    let (_outer, root) = layout();

    assert_eq!(
        resolve("//index.html", &root).await.unwrap(),
        root.join("index.html")
    );
    assert_eq!(
        resolve("///sub//page.html", &root).await.unwrap(),
        root.join("sub").join("page.html")
    );
    assert_eq!(resolve("//", &root).await.unwrap(), root);
}

#[tokio::test]
async fn test_deep_escape_never_resolves() {
    let (_outer, root) = layout();

    let result = resolve_target("/../../../../../../etc/passwd", &root).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_encoded_escape_is_rejected() {
    let (_outer, root) = layout();

    assert_eq!(
        resolve_target("/%2e%2e/secret.html", &root).await,
        Err(Rejected::Traversal)
    );
}

#[tokio::test]
async fn test_resolve_target_decodes() {
    let (_outer, root) = layout();

    let path = resolve_target("/my%20file.html", &root).await.unwrap();
    assert_eq!(path, root.join("my file.html"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_out_of_root_is_rejected() {
    let (outer, root) = layout();
    std::os::unix::fs::symlink(outer.path().join("secret.html"), root.join("link.html")).unwrap();

    assert_eq!(resolve("/link.html", &root).await, Err(Rejected::Traversal));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_inside_root_is_followed() {
    let (_outer, root) = layout();
    std::os::unix::fs::symlink(root.join("index.html"), root.join("alias.html")).unwrap();

    assert_eq!(
        resolve("/alias.html", &root).await.unwrap(),
        root.join("index.html")
    );
}

#[test]
fn test_normalize_target() {
    assert_eq!(normalize_target("/a%20b/"), "/a b/");
    assert_eq!(normalize_target("relative.html"), "/");
}
