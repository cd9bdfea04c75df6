fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile HR coordination service proto
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/hr.proto"], &["proto/"])?;

    Ok(())
}
