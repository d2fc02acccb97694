fn main() {
    let crate_dir = std::env::var("CARGO_MANIFEST_DIR").expect("missing CARGO_MANIFEST_DIR");

    let result = cbindgen::Builder::new()
        .with_crate(crate_dir)
        .with_config(cbindgen::Config {
            language: cbindgen::Language::C,
            cpp_compat: true,
            include_guard: Some("B2_DESCRIPTOR_H".into()),
            include_version: false,
            documentation: true,
            documentation_style: cbindgen::DocumentationStyle::Doxy,
            ..Default::default()
        })
        .generate()
        .map(|data| {
            std::fs::create_dir_all("include").expect("failed to create include directory");
            data.write_to_file("include/b2_descriptor.h");
        });

    // if not ok, rerun the build script unconditionally
    if result.is_ok() {
        for path in glob::glob("src/**/*.rs").expect("invalid glob pattern").flatten() {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
}
