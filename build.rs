use chrono::Utc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Build time / 设置构建时间
    let build_time = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    println!("cargo:rustc-env=BUILD_TIME={}", build_time);

    // Use bundled protoc so the build doesn't depend on a system install / 使用内置 protoc
    let protoc = protoc_bin_vendored::protoc_bin_path().map_err(|e| e.to_string())?;
    std::env::set_var("PROTOC", protoc);
    tonic_build::compile_protos("proto/dna_search.proto")?;

    println!("cargo:rerun-if-changed=proto/dna_search.proto");
    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
