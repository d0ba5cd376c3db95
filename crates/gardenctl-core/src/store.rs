use std::path::Path;

use crate::error::{GardenctlError, GardenctlResult};
use crate::target::TargetStack;

/// Reads the target file. A missing or blank file is an empty stack.
pub fn read_target(path: &Path) -> GardenctlResult<TargetStack> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TargetStack::new()),
        Err(e) => return Err(GardenctlError::io(path, e)),
    };
    if content.trim().is_empty() {
        return Ok(TargetStack::new());
    }

    let stack: TargetStack = serde_yaml::from_str(&content).map_err(|e| {
        GardenctlError::IllegalStackShape(format!("cannot parse {}: {e}", path.display()))
    })?;
    stack.validate()?;
    Ok(stack)
}

/// Replaces the target file with the YAML encoding of `stack`.
pub fn write_target(path: &Path, stack: &TargetStack) -> GardenctlResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GardenctlError::io(parent, e))?;
    }
    let yaml = serde_yaml::to_string(stack)
        .map_err(|e| GardenctlError::Other(anyhow::anyhow!("Serialize target: {e}")))?;
    std::fs::write(path, yaml).map_err(|e| GardenctlError::io(path, e))?;
    tracing::debug!(path = %path.display(), depth = stack.len(), "Wrote target");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{TargetEntry, TargetKind::*};

    #[test]
    fn missing_and_blank_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("target");
        assert!(read_target(&path).unwrap().is_empty());

        std::fs::write(&path, "\n").unwrap();
        assert!(read_target(&path).unwrap().is_empty());
    }

    #[test]
    fn stacks_of_every_depth_survive_a_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("target");
        let full = [(Garden, "g"), (Project, "p"), (Shoot, "t"), (Namespace, "n")];

        for depth in 0..=full.len() {
            let stack = TargetStack::from_entries(
                full[..depth]
                    .iter()
                    .map(|(k, n)| TargetEntry::new(*k, *n))
                    .collect(),
            )
            .unwrap();
            write_target(&path, &stack).unwrap();
            assert_eq!(read_target(&path).unwrap(), stack);
        }
    }

    #[test]
    fn file_layout_is_a_target_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("target");
        let mut stack = TargetStack::new();
        stack.push(Garden, "dev").unwrap();
        stack.push(Seed, "aws-eu1").unwrap();
        write_target(&path, &stack).unwrap();

        let raw: serde_yaml::Value =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["target"][0]["kind"].as_str(), Some("garden"));
        assert_eq!(raw["target"][1]["kind"].as_str(), Some("seed"));
        assert_eq!(raw["target"][1]["name"].as_str(), Some("aws-eu1"));
    }

    #[test]
    fn malformed_stacks_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("target");
        std::fs::write(&path, "target:\n  - kind: shoot\n    name: t\n").unwrap();
        assert!(matches!(
            read_target(&path),
            Err(GardenctlError::IllegalStackShape(_))
        ));

        std::fs::write(&path, "target:\n  - kind: cluster\n").unwrap();
        assert!(read_target(&path).is_err());
    }

    #[test]
    fn empty_mapping_reads_as_empty_stack() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("target");
        std::fs::write(&path, "{}\n").unwrap();
        assert!(read_target(&path).unwrap().is_empty());
    }
}
