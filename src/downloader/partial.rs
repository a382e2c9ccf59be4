use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// A `.part` file next to the final destination. Removed on drop unless
/// [`PartialFile::persist`] moved it into place first.
///
/// Every instance gets its own random suffix, so concurrent downloads to the
/// same destination never write into or clean up each other's file.
pub struct PartialFile {
    path: PathBuf,
    destination: PathBuf,
    persisted: bool,
}

impl PartialFile {
    pub async fn create(destination: &Path) -> io::Result<(PartialFile, tokio::fs::File)> {
        let mut name = destination
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{:08x}.part", rand::random::<u32>()));
        let path = destination.with_file_name(name);
        let file = tokio::fs::File::create(&path).await?;
        Ok((
            PartialFile {
                path,
                destination: destination.to_path_buf(),
                persisted: false,
            },
            file,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Moves the file to the destination, or to the first free `name (n).ext`
    /// next to it when that already exists. Returns where it ended up.
    pub async fn persist(mut self) -> io::Result<PathBuf> {
        let mut attempt = 0;
        loop {
            let target = numbered(&self.destination, attempt);
            let reserved = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
                .await;
            match reserved {
                Ok(reserved) => {
                    drop(reserved);
                    if let Err(err) = tokio::fs::rename(&self.path, &target).await {
                        let _ = tokio::fs::remove_file(&target).await;
                        return Err(err);
                    }
                    self.persisted = true;
                    return Ok(target);
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(err) => return Err(err),
            }
        }
    }
}

/// `clip.mp4` for 0, `clip (n).mp4` after that.
fn numbered(destination: &Path, attempt: u32) -> PathBuf {
    if attempt == 0 {
        return destination.to_path_buf();
    }
    let stem = destination
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match destination.extension() {
        Some(ext) => format!("{} ({}).{}", stem, attempt, ext.to_string_lossy()),
        None => format!("{} ({})", stem, attempt),
    };
    destination.with_file_name(name)
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = fs::remove_file(&self.path);
        }
    }
}
