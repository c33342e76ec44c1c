use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(archive_root: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    match archive_root {
        Some(root) => Some(root.join(".env")),
        None => Some(home_dir?.join("sequencing_archive/.env")),
    }
}

pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let fallback = fallback_dotenv_path(
        env::var_os("SEQ_ARCHIVE_ROOT").map(PathBuf::from),
        dirs::home_dir(),
    );

    let Some(path) = fallback else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::fallback_dotenv_path;
    use std::path::PathBuf;

    #[test]
    fn fallback_prefers_configured_archive_root() {
        let got = fallback_dotenv_path(
            Some(PathBuf::from("/data/archive")),
            Some(PathBuf::from("/home/alice")),
        );

        let want = Some(PathBuf::from("/data/archive/.env"));
        assert_eq!(got, want);
    }

    #[test]
    fn fallback_uses_home_when_archive_root_unset() {
        let got = fallback_dotenv_path(None, Some(PathBuf::from("/home/alice")));
        let want = Some(PathBuf::from("/home/alice/sequencing_archive/.env"));
        assert_eq!(got, want);
    }
}
