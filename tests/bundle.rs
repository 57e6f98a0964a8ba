mod common;

use common::{FakeTool, bundled, deps_of, s, write_binary, write_dylib, write_framework};
use kodegen_bundler_relocate::bundler::{
    AuxiliarySettings, BundleSettings, Bundler, DmgSettings, PackageSettings, PackageType,
    SettingsBuilder,
};
use std::{path::Path, sync::Arc};

const INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleExecutable</key>
    <string>ChronoShare</string>
    <key>CFBundleIdentifier</key>
    <string>org.example.ChronoShare</string>
</dict>
</plist>
"#;

fn write_source_bundle(root: &Path, deps: &[&str]) -> std::path::PathBuf {
    let app = root.join("build/ChronoShare.app");
    std::fs::create_dir_all(app.join("Contents/MacOS")).unwrap();
    std::fs::write(app.join("Contents/Info.plist"), INFO_PLIST).unwrap();
    write_binary(&app.join("Contents/MacOS/ChronoShare"), None, deps);
    app
}

#[tokio::test]
async fn bundles_relocates_and_finishes_the_app() {
    let root = tempfile::tempdir().unwrap();
    let deps = root.path().join("deps");

    let helper = deps.join("lib/libhelper.dylib");
    write_dylib(&helper, &["/usr/lib/libSystem.B.dylib"]);
    let source = write_source_bundle(root.path(), &[&s(&helper)]);

    let aux = root.path().join("platform-tools");
    write_binary(&aux.join("ndnsec"), None, &[&s(&helper)]);

    let sparkle = write_framework(&root.path().join("osx/Frameworks"), "Sparkle", &[]);
    let sparkle_dir = sparkle.ancestors().nth(3).unwrap().to_path_buf();

    std::fs::write(root.path().join("qt.conf"), "[Paths]\n").unwrap();
    std::fs::write(root.path().join("client.conf"), "transport=unix\n").unwrap();
    let report_path = root.path().join("relocation.json");

    let mut bundle_settings = BundleSettings {
        resources: vec![root.path().join("qt.conf")],
        config_files: vec![root.path().join("client.conf")],
        config_dir: "etc/ndn".into(),
        auxiliary: vec![AuxiliarySettings {
            source: aux,
            destination: "Platform".into(),
        }],
        report: Some(report_path.clone()),
        dmg: DmgSettings {
            enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    bundle_settings.macos.frameworks = vec![sparkle_dir];

    let out = root.path().join("build/dist");
    let settings = SettingsBuilder::new()
        .source_bundle(&source)
        .project_out_directory(&out)
        .package_settings(PackageSettings {
            product_name: String::new(),
            version: "0.3.1".into(),
        })
        .bundle_settings(bundle_settings)
        .build()
        .unwrap();

    let tool = Arc::new(FakeTool::default());
    let artifacts = Bundler::with_tool(settings, tool.clone())
        .bundle()
        .await
        .unwrap();

    let app = out.join("ChronoShare.app");
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].package_type, PackageType::MacOsBundle);
    assert_eq!(artifacts[0].path, app);
    assert_eq!(artifacts[0].checksum.len(), 64);
    assert!(artifacts[0].size > 0);

    let contents = app.join("Contents");
    assert_eq!(
        deps_of(&contents.join("MacOS/ChronoShare")),
        vec![bundled("libhelper.dylib")]
    );
    assert_eq!(
        deps_of(&contents.join("Platform/ndnsec")),
        vec![bundled("libhelper.dylib")]
    );
    assert!(contents.join("Frameworks/libhelper.dylib").is_file());
    assert!(contents.join("Frameworks/Sparkle.framework/Versions/A/Sparkle").is_file());
    assert!(contents.join("Resources/qt.conf").is_file());
    assert!(contents.join("etc/ndn/client.conf").is_file());

    // The raw build bundle is left as it was.
    assert_eq!(
        deps_of(&source.join("Contents/MacOS/ChronoShare")),
        vec![s(&helper)]
    );

    let info = plist::Value::from_file(contents.join("Info.plist")).unwrap();
    let info = info.as_dictionary().unwrap();
    assert_eq!(
        info.get("LSMinimumSystemVersion").and_then(plist::Value::as_string),
        Some("10.12.0")
    );
    assert_eq!(
        info.get("CFBundleIdentifier").and_then(plist::Value::as_string),
        Some("org.example.ChronoShare")
    );

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["copied"].as_array().unwrap().len(), 1);
    assert_eq!(report["rewrites"].as_array().unwrap().len(), 2);
    assert_eq!(report["skipped"][0], "/usr/lib/libSystem.B.dylib");
    assert_eq!(tool.changes_of(&s(&helper)), 2);
}

#[tokio::test]
async fn rebundling_replaces_the_previous_output() {
    let root = tempfile::tempdir().unwrap();
    let lib = root.path().join("deps/libz.1.dylib");
    write_dylib(&lib, &[]);
    let source = write_source_bundle(root.path(), &[&s(&lib)]);
    let out = root.path().join("dist");

    for _ in 0..2 {
        let settings = SettingsBuilder::new()
            .source_bundle(&source)
            .project_out_directory(&out)
            .package_settings(PackageSettings {
                product_name: "ChronoShare".into(),
                version: "nightly".into(),
            })
            .bundle_settings(BundleSettings {
                dmg: DmgSettings {
                    enabled: false,
                    ..Default::default()
                },
                ..Default::default()
            })
            .build()
            .unwrap();

        Bundler::with_tool(settings, Arc::new(FakeTool::default()))
            .bundle()
            .await
            .unwrap();
    }

    let exe = out.join("ChronoShare.app/Contents/MacOS/ChronoShare");
    assert_eq!(deps_of(&exe), vec![bundled("libz.1.dylib")]);
}

#[tokio::test]
async fn missing_source_bundle_fails() {
    let root = tempfile::tempdir().unwrap();
    let settings = SettingsBuilder::new()
        .source_bundle(root.path().join("nowhere/ChronoShare.app"))
        .project_out_directory(root.path().join("dist"))
        .package_settings(PackageSettings {
            product_name: String::new(),
            version: "1.0".into(),
        })
        .bundle_settings(BundleSettings {
            dmg: DmgSettings {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .build()
        .unwrap();

    let result = Bundler::with_tool(settings, Arc::new(FakeTool::default()))
        .bundle()
        .await;
    assert!(result.is_err());
}

#[cfg(unix)]
#[tokio::test]
async fn linked_auxiliary_executables_are_copied_and_relocated() {
    let root = tempfile::tempdir().unwrap();
    let helper = root.path().join("deps/lib/libhelper.dylib");
    write_dylib(&helper, &[]);
    let source = write_source_bundle(root.path(), &[]);

    // Package managers expose tools as relative links into a versioned tree.
    let real_tool = root.path().join("Cellar/nfd/bin/nfd");
    write_binary(&real_tool, None, &[&s(&helper)]);
    let bin = root.path().join("opt/bin");
    std::fs::create_dir_all(&bin).unwrap();
    std::os::unix::fs::symlink("../../Cellar/nfd/bin/nfd", bin.join("nfd")).unwrap();

    let out = root.path().join("dist");
    let settings = SettingsBuilder::new()
        .source_bundle(&source)
        .project_out_directory(&out)
        .package_settings(PackageSettings {
            product_name: "ChronoShare".into(),
            version: "0.3.1".into(),
        })
        .bundle_settings(BundleSettings {
            auxiliary: vec![AuxiliarySettings {
                source: bin,
                destination: "Platform".into(),
            }],
            dmg: DmgSettings {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .build()
        .unwrap();

    Bundler::with_tool(settings, Arc::new(FakeTool::default()))
        .bundle()
        .await
        .unwrap();

    let contents = out.join("ChronoShare.app/Contents");
    let nfd = contents.join("Platform/nfd");
    assert!(std::fs::symlink_metadata(&nfd).unwrap().file_type().is_file());
    assert_eq!(deps_of(&nfd), vec![bundled("libhelper.dylib")]);
    assert!(contents.join("Frameworks/libhelper.dylib").is_file());
    assert_eq!(deps_of(&real_tool), vec![s(&helper)]);
}
