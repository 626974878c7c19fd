//! End-to-end runs of the `arbo-site` binary on a small fixture site.

use image::{ImageFormat, RgbImage};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let content = tmp.path().join("content");
    let public = tmp.path().join("public");
    fs::create_dir_all(&content).unwrap();
    fs::create_dir_all(public.join("gallery/images")).unwrap();
    fs::create_dir_all(public.join("certificates")).unwrap();

    fs::write(
        content.join("config.toml"),
        "[site]\ntitle = \"Arbo Fixture\"\nurl = \"https://arbo.example\"\n",
    )
    .unwrap();
    fs::write(content.join("010-index.md"), "# Vítejte\n\nOšetřujeme stromy.\n").unwrap();
    fs::write(content.join("020-galerie.md"), "@gallery\n").unwrap();
    fs::write(content.join("030-certifikaty.md"), "@certificates\n").unwrap();
    fs::write(content.join("040-facebook.md"), "https://facebook.com/arbo\n").unwrap();

    for (path, w, h) in [
        ("gallery/images/dub.png", 40, 30),
        ("certificates/iso.png", 30, 40),
    ] {
        RgbImage::new(w, h)
            .save_with_format(public.join(path), ImageFormat::Png)
            .unwrap();
    }
    tmp
}

fn run(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_arbo-site"))
        .current_dir(root)
        .args(args)
        .output()
        .expect("failed to run arbo-site")
}

#[test]
fn build_writes_pages_snapshots_and_sitemap() {
    let tmp = fixture();
    let out = run(tmp.path(), &["build"]);
    assert!(
        out.status.success(),
        "build failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let dist = tmp.path().join("dist");
    let index = fs::read_to_string(dist.join("index.html")).unwrap();
    assert!(index.contains("Vítejte"));
    assert!(index.contains("https://facebook.com/arbo"));

    let gallery = fs::read_to_string(dist.join("galerie.html")).unwrap();
    assert!(gallery.contains("/gallery/images/dub.png"));
    assert!(gallery.contains("width=\"40\""));

    assert!(dist.join("certifikaty.html").exists());
    assert!(!dist.join("facebook.html").exists());
    assert!(dist.join("404.html").exists());
    assert!(dist.join("gallery/images/dub.png").exists());

    let snapshot = fs::read_to_string(dist.join("api/certificates-images")).unwrap();
    assert!(snapshot.contains("/certificates/iso.png"));
    assert!(!snapshot.contains("\"type\""));

    let sitemap = fs::read_to_string(dist.join("sitemap.xml")).unwrap();
    assert!(sitemap.contains("https://arbo.example/galerie.html"));
}

#[test]
fn check_lists_media_without_writing() {
    let tmp = fixture();
    let out = run(tmp.path(), &["check"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("dub.png"));
    assert!(stdout.contains("iso.png"));
    assert!(!tmp.path().join("dist").exists());
}

#[test]
fn check_gallery_prints_resolved_sizes() {
    let tmp = fixture();
    let out = run(tmp.path(), &["check-gallery"]);
    assert!(
        out.status.success(),
        "{}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(String::from_utf8_lossy(&out.stdout).contains("40×30"));
}

#[test]
fn unknown_directive_fails_the_build() {
    let tmp = fixture();
    fs::write(tmp.path().join("content/050-mapa.md"), "@map\n").unwrap();
    let out = run(tmp.path(), &["build"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("map"));
}

#[test]
fn gen_config_prints_documented_defaults() {
    let tmp = TempDir::new().unwrap();
    let out = run(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("[gallery]"));
    assert!(stdout.contains("[certificates]"));
}
