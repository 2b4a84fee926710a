//! External rule-compiler invocation.
//!
//! The compiler is an opaque line-oriented tool (hostlist-compiler by
//! default) invoked as `<command> -i <input> -o <output>`. Its stdout
//! and stderr are inherited so operators see its own reporting.

use std::path::Path;

use tokio::process::Command;
use tracing::info;

use listforge_shared::{ListforgeError, Result};

/// Run the external compiler over the merged payload file.
pub async fn compile(command: &str, input: &Path, output: &Path) -> Result<()> {
    info!(command, input = %input.display(), "compiling rules");

    let status = Command::new(command)
        .arg("-i")
        .arg(input)
        .arg("-o")
        .arg(output)
        .status()
        .await
        .map_err(|e| ListforgeError::Compiler(format!("failed to run '{command}': {e}")))?;

    if !status.success() {
        return Err(ListforgeError::Compiler(format!(
            "'{command}' exited with status {status}"
        )));
    }

    Ok(())
}
