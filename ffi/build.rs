use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let out = PathBuf::from(&crate_dir).join("include").join("search_client.h");

    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("SEARCH_CLIENT_H".to_string()),
        cpp_compat: true,
        ..Default::default()
    };

    // Header generation is best effort.
    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(out);
        }
        Err(e) => println!("cargo:warning=skipping C header generation: {e}"),
    }
}
