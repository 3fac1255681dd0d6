use crate::commands::{OpMessage, OpResult};
use crate::config::SitePaths;
use crate::error::{Result, SitepadError};
use crate::model::PageName;
use crate::render::backup_timestamp;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;

/// Archive the data directory, image assets, and page files into a
/// tar.gz under the backups directory. The caller streams the file out
/// and removes it afterwards.
pub fn create(paths: &SitePaths) -> Result<OpResult> {
    let backups = paths.backups_dir();
    if !backups.exists() {
        std::fs::create_dir_all(&backups).map_err(SitepadError::Io)?;
    }

    let filename = format!("backup-{}.tar.gz", backup_timestamp());
    let archive_path = backups.join(&filename);
    let file = File::create(&archive_path).map_err(SitepadError::Io)?;

    write_archive(file, paths)?;

    let mut result = OpResult::default();
    result.backup_file = Some(archive_path);
    result.add_message(OpMessage::success(format!("Backup created: {}", filename)));
    Ok(result)
}

fn write_archive<W: Write>(writer: W, paths: &SitePaths) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    let data_dir = paths.data_dir();
    if data_dir.exists() {
        tar.append_dir_all("data", &data_dir)
            .map_err(SitepadError::Io)?;
    }

    let assets_dir = paths.assets_dir();
    if assets_dir.exists() {
        tar.append_dir_all("assets/images", &assets_dir)
            .map_err(SitepadError::Io)?;
    }

    for page in PageName::all() {
        let path = paths.page_file(page);
        if path.exists() {
            tar.append_path_with_name(&path, page.file_name())
                .map_err(SitepadError::Io)?;
        }
    }

    let enc = tar.into_inner().map_err(SitepadError::Io)?;
    enc.finish().map_err(SitepadError::Io)?;
    Ok(())
}
