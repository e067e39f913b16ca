use std::path::Path;

use handlebox_app::program::ProgramArtifact;

use crate::error::DeployError;
use crate::format::print_success;

/// Write the two program artifact files into `out_dir`.
pub fn run(out_dir: &str) -> Result<(), DeployError> {
    let out = Path::new(out_dir);
    for artifact in [ProgramArtifact::approval(), ProgramArtifact::clear_state()] {
        let path = out.join(format!("{}.hbp", artifact.kind().name()));
        std::fs::write(&path, artifact.render()?)?;
        print_success(&format!("Wrote {}", path.display()));
    }
    Ok(())
}
