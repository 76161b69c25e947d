use crate::client::JobId;
use std::path::{Path, PathBuf};
use tokio::fs;

/// `presentation-<job>.<format>`, with anything but `[A-Za-z0-9_-]` in the job id
/// replaced so the name always stays inside the storage directory.
pub fn artifact_file_name(job: &JobId, format: &str) -> String {
    let id: String = job
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let ext: String = format.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    format!("presentation-{}.{}", id, ext)
}

pub async fn save_artifact(dir: &Path, job: &JobId, format: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir).await?;
    let path = dir.join(artifact_file_name(job, format));
    fs::write(&path, bytes).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn names_follow_the_storage_layout() {
        assert_eq!(artifact_file_name(&JobId::from("abc-123"), "pptx"), "presentation-abc-123.pptx");
    }

    #[test]
    fn hostile_ids_cannot_escape_the_directory() {
        let name = artifact_file_name(&JobId::from("../../etc/passwd"), "pptx");
        assert_eq!(name, "presentation-______etc_passwd.pptx");
        assert!(!name.contains('/'));
    }

    #[tokio::test]
    async fn save_creates_missing_directory() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("downloads");

        let path = save_artifact(&dir, &JobId::from("42"), "pdf", b"%PDF").await.unwrap();

        assert_eq!(path, dir.join("presentation-42.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF");
    }
}
