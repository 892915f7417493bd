use std::io::Result;
use std::path::{Path, PathBuf};

const PROTO_FILE: &str = "sparkplug_b.proto";
const PROST_OUTPUT: &str = "org.eclipse.tahu.protobuf.rs";
const BINDINGS_FILE: &str = "sparkplug_payload.rs";

fn workspace_root() -> PathBuf {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    match manifest.parent() {
        Some(root) => root.to_path_buf(),
        None => manifest,
    }
}

fn generate(workspace: &Path) -> Result<PathBuf> {
    let protodir = workspace.join("protos");
    let outdir = workspace.join("spb-types/src/generated");

    prost_build::Config::new()
        .out_dir(&outdir)
        .compile_protos(&[protodir.join(PROTO_FILE)], &[&protodir])?;

    let bindings = outdir.join(BINDINGS_FILE);
    std::fs::rename(outdir.join(PROST_OUTPUT), &bindings)?;
    Ok(bindings)
}

fn main() -> Result<()> {
    let bindings = generate(&workspace_root())?;
    println!("wrote {}", bindings.display());
    Ok(())
}
