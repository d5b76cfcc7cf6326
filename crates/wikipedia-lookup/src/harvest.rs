use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::client::WikipediaClient;
use crate::error::LookupError;
use crate::page::{EntryDetail, PageTitle};

pub const DEFAULT_IMAGE_DIRECTORY: &str = "imgs";

const TEMPORARY_EXTENSION: &str = "tmp";

/// How many images a harvest found and how many made it to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestReport {
    pub downloaded: usize,
    pub found: usize,
}

impl HarvestReport {
    pub fn is_partial(&self) -> bool {
        self.downloaded < self.found
    }
}

/// Downloads every image of an entry's rendered page
///
/// Images land in `<directory>/<entry title>/`. Each download is written to
/// `<scratch directory>/<name>.tmp` first and moved into place when done.
#[derive(Debug, Clone)]
pub struct ImageHarvester {
    directory: PathBuf,
    scratch_directory: PathBuf,
}

impl Default for ImageHarvester {
    fn default() -> Self {
        ImageHarvester {
            directory: PathBuf::from(DEFAULT_IMAGE_DIRECTORY),
            scratch_directory: PathBuf::from("."),
        }
    }
}

/// File system safe directory name for a page title
fn directory_name(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' => '_',
            c => c,
        })
        .collect()
}

/// `src` joined onto the page URL, without its query
fn image_url(page: &Url, src: &str) -> Result<Url, url::ParseError> {
    let mut url = page.join(src)?;
    url.set_query(None);
    Ok(url)
}

fn file_name(url: &Url, position: usize) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("image-{position}"))
}

/// `name` in `target`, or `stem (n).ext` with the first free `n` when a
/// file of that name is already there
fn free_destination(target: &Path, name: &str) -> PathBuf {
    let destination = target.join(name);

    if !destination.exists() {
        return destination;
    }

    let name = Path::new(name);
    let stem = name
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = name
        .extension()
        .map(|extension| format!(".{}", extension.to_string_lossy()))
        .unwrap_or_default();

    let mut copy = 1;

    loop {
        let candidate = target.join(format!("{stem} ({copy}){extension}"));

        if !candidate.exists() {
            return candidate;
        }

        copy += 1;
    }
}

impl ImageHarvester {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        ImageHarvester {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Where partial downloads are written, and cleaned from afterwards
    pub fn scratch_directory(self, scratch_directory: impl Into<PathBuf>) -> Self {
        Self {
            scratch_directory: scratch_directory.into(),
            ..self
        }
    }

    pub fn target_directory(&self, entry: &impl PageTitle) -> PathBuf {
        self.directory.join(directory_name(entry.title()))
    }

    /// Download every `<img>` of the entry's page. Failing images are logged
    /// and skipped; compare the two counts of the report to notice them.
    pub fn harvest(
        &self,
        entry: &mut EntryDetail,
        client: &WikipediaClient,
    ) -> Result<HarvestReport, LookupError> {
        let target = self.target_directory(&*entry);
        fs::create_dir_all(&target)?;

        let page_url = entry.full_url().clone();
        let sources = entry.document(client)?.image_sources();

        let found = sources.len();
        let mut downloaded = 0;

        for (position, src) in sources.into_iter().enumerate() {
            let Some(src) = src else {
                log::warn!("Image #{position} of '{page_url}' has no source, skipping it");
                continue;
            };

            let url = match image_url(&page_url, &src) {
                Ok(url) => url,
                Err(e) => {
                    log::warn!("Image with source < {src} > could not be resolved: {e}");
                    continue;
                }
            };

            log::info!("Downloading image from {url} into {}", target.display());

            match self.download(client, &url, &target, position) {
                Ok(path) => {
                    log::debug!("Saved {}", path.display());
                    downloaded += 1;
                }
                Err(e) => log::warn!("Image with URL = < {url} > could not be downloaded: {e}"),
            }
        }

        self.remove_temporary_files();

        Ok(HarvestReport { downloaded, found })
    }

    fn download(
        &self,
        client: &WikipediaClient,
        url: &Url,
        target: &Path,
        position: usize,
    ) -> Result<PathBuf, LookupError> {
        let bytes = client.get_bytes(url)?;

        let destination = free_destination(target, &file_name(url, position));

        let name = destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temporary = self
            .scratch_directory
            .join(format!("{name}.{TEMPORARY_EXTENSION}"));

        fs::write(&temporary, bytes)?;

        // rename can't cross file systems
        if fs::rename(&temporary, &destination).is_err() {
            fs::copy(&temporary, &destination)?;
            fs::remove_file(&temporary)?;
        }

        Ok(destination)
    }

    /// Best effort: failures here are only logged
    fn remove_temporary_files(&self) {
        let entries = match fs::read_dir(&self.scratch_directory) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!(
                    "Could not list {} to clean up temporary files: {e}",
                    self.scratch_directory.display()
                );
                return;
            }
        };

        for path in entries.filter_map(Result::ok).map(|entry| entry.path()) {
            let is_temporary = path.is_file()
                && path
                    .extension()
                    .is_some_and(|extension| extension == TEMPORARY_EXTENSION);

            if is_temporary {
                if let Err(e) = fs::remove_file(&path) {
                    log::warn!("Could not remove {}: {e}", path.display());
                }
            }
        }
    }
}

impl EntryDetail {
    /// Download every image of this page into `directory/<title>/`
    pub fn harvest_images(
        &mut self,
        client: &WikipediaClient,
        directory: impl Into<PathBuf>,
    ) -> Result<HarvestReport, LookupError> {
        ImageHarvester::new(directory).harvest(self, client)
    }
}

#[cfg(test)]
mod test {
    use super::{ImageHarvester, directory_name, file_name, free_destination, image_url};
    use std::path::PathBuf;
    use url::Url;

    fn page() -> Url {
        Url::parse("https://en.wikipedia.org/wiki/Potato").unwrap()
    }

    #[test]
    fn relative_sources_are_resolved() {
        assert_eq!(
            image_url(&page(), "/static/images/icons/wikipedia.png").unwrap().as_str(),
            "https://en.wikipedia.org/static/images/icons/wikipedia.png"
        );
        assert_eq!(
            image_url(&page(), "//upload.wikimedia.org/a/ab/Patates.jpg?width=220").unwrap().as_str(),
            "https://upload.wikimedia.org/a/ab/Patates.jpg"
        );
    }

    #[test]
    fn data_sources_keep_their_scheme() {
        assert_eq!(
            image_url(&page(), "data:image/gif;base64,R0lGODlhAQABAAAAACw=").unwrap().scheme(),
            "data"
        );
    }

    #[test]
    fn taken_names_get_a_number() {
        let target = tempfile::tempdir().unwrap();

        assert_eq!(
            free_destination(target.path(), "icon.png"),
            target.path().join("icon.png")
        );

        std::fs::write(target.path().join("icon.png"), b"a").unwrap();
        std::fs::write(target.path().join("icon (1).png"), b"b").unwrap();

        assert_eq!(
            free_destination(target.path(), "icon.png"),
            target.path().join("icon (2).png")
        );
        assert_eq!(
            free_destination(target.path(), "README"),
            target.path().join("README")
        );
    }

    #[test]
    fn default_locations() {
        let harvester = ImageHarvester::default();

        assert_eq!(harvester.directory, PathBuf::from("imgs"));
        assert_eq!(harvester.scratch_directory, PathBuf::from("."));
    }

    #[test]
    fn names() {
        assert_eq!(directory_name("AC/DC: Live"), "AC_DC__Live");
        assert_eq!(
            file_name(&Url::parse("https://upload.wikimedia.org/a/ab/Patates.jpg").unwrap(), 0),
            "Patates.jpg"
        );
        assert_eq!(file_name(&Url::parse("https://example.org/").unwrap(), 3), "image-3");
    }
}
