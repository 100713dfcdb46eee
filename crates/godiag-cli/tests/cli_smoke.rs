use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn png_size(bytes: &[u8]) -> (u32, u32) {
    let decoder = png::Decoder::new(bytes);
    let reader = decoder.read_info().expect("png header");
    let info = reader.info();
    (info.width, info.height)
}

fn cli() -> Command {
    Command::new(assert_cmd::cargo_bin!("godiag-cli"))
}

#[test]
fn cli_renders_png_smoke() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("out.png");

    cli()
        .args([
            "render",
            "--format",
            "png",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture("basic.go").to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let bytes = fs::read(&out).expect("read png");
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "output is not a PNG"
    );
    assert_eq!(png_size(&bytes), (203, 137));
}

#[test]
fn cli_renders_jpg_with_default_out_path_for_file_input() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let tmp_fixture = tmp.path().join("basic.go");
    fs::copy(fixture("basic.go"), &tmp_fixture).expect("copy fixture");

    cli()
        .args([
            "render",
            "--format",
            "jpg",
            tmp_fixture.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let bytes = fs::read(tmp_fixture.with_extension("jpg")).expect("read jpg");
    assert!(bytes.starts_with(&[0xFF, 0xD8]), "output is not a JPEG");
}

#[test]
fn cli_parse_prints_the_board_model() {
    let output = cli()
        .args(["parse", fixture("basic.go").to_string_lossy().as_ref()])
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["title"], "Black to play, 4 at 1");
    assert_eq!(value["coord_markers"], true);
    assert_eq!(value["grid"].as_array().map(Vec::len), Some(5));
}

#[test]
fn cli_keys_are_stable() {
    let run = || {
        cli()
            .args(["keys", fixture("basic.go").to_string_lossy().as_ref()])
            .output()
            .expect("run cli")
    };
    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let value: serde_json::Value = serde_json::from_slice(&first.stdout).expect("json");
    assert_eq!(value["image"].as_str().map(str::len), Some(64));
    assert_eq!(value["width"], 203);
}

#[test]
fn cli_sgf_reads_stdin() {
    let output = cli()
        .args(["sgf", "--date", "2024-05-01", "-"])
        .write_stdin("$$\n$$ X O")
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let sgf = String::from_utf8(output.stdout).expect("utf-8");
    assert!(sgf.starts_with("(;GM[1]FF[4]SZ[19]"), "{sgf}");
    assert!(sgf.contains("DT[2024-05-01]"), "{sgf}");
}

#[test]
fn cli_map_resolves_against_link_base() {
    let output = cli()
        .args([
            "map",
            "--link-base",
            "https://example.org/wiki",
            fixture("basic.go").to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).expect("utf-8");
    assert!(html.starts_with("<map id=\"godiag__0"), "{html}");
    assert!(html.contains("href=\"https://example.org/wiki/Joseki\""), "{html}");
}

#[test]
fn cli_process_fills_the_store_once() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let store = tmp.path().join("cache");
    let run = || {
        cli()
            .args([
                "process",
                "--store",
                store.to_string_lossy().as_ref(),
                fixture("basic.go").to_string_lossy().as_ref(),
            ])
            .output()
            .expect("run cli")
    };

    let first = run();
    assert!(first.status.success());
    let value: serde_json::Value = serde_json::from_slice(&first.stdout).expect("json");
    assert_eq!(value["cached"], false);
    let image = value["image"]["hash"].as_str().expect("image hash").to_string();
    let bytes = fs::read(store.join(format!("{image}.godiag.png"))).expect("stored png");
    assert_eq!(png_size(&bytes), (203, 137));

    let second = run();
    let value: serde_json::Value = serde_json::from_slice(&second.stdout).expect("json");
    assert_eq!(value["cached"], true);
    assert_eq!(fs::read_dir(&store).expect("store dir").count(), 2);
}

#[test]
fn cli_reports_diagram_errors_with_exit_code_3() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let store = tmp.path().join("cache");
    cli()
        .args([
            "process",
            "--store",
            store.to_string_lossy().as_ref(),
            fixture("unknown_symbol.go").to_string_lossy().as_ref(),
        ])
        .assert()
        .code(3);
    assert!(!store.exists() || fs::read_dir(&store).expect("store dir").count() == 0);
}

#[test]
fn cli_usage_errors_exit_with_2() {
    cli().args(["process"]).assert().code(2);
    cli().args(["render", "--format", "gif"]).assert().code(2);
}
