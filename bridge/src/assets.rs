//! Web asset bundling for the mobile app.
//!
//! Mirrors the static pages and their `CSS/` and `JS/` folders from the
//! project root into the Capacitor asset folder (`mobile/www`). Existing
//! files are overwritten, missing sources are skipped, anything else already
//! in the destination is left alone. Any filesystem error aborts the copy.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::MOBILE_WWW_DIR;
use crate::error::{AssetError, AssetResult};

/// Top-level pages shipped with the app.
pub const WEB_PAGES: [&str; 5] = [
    "index.html",
    "teacher.html",
    "student.html",
    "admin.html",
    "accountcreate.html",
];

/// Asset directories shipped with the app.
pub const WEB_DIRS: [&str; 2] = ["CSS", "JS"];

/// What to copy, and from where to where.
#[derive(Debug, Clone)]
pub struct AssetPlan {
    /// Project root holding the pages.
    pub source: PathBuf,
    /// Mobile asset folder.
    pub dest: PathBuf,
    /// Top-level files, relative to `source`.
    pub files: Vec<String>,
    /// Directories copied recursively, relative to `source`.
    pub dirs: Vec<String>,
}

impl AssetPlan {
    /// Plan with the default page and directory lists.
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            files: WEB_PAGES.iter().map(|s| s.to_string()).collect(),
            dirs: WEB_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Default plan for a project: `<root>` into `<root>/mobile/www`.
    pub fn for_project(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::new(root, root.join(MOBILE_WWW_DIR))
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dirs = dirs.into_iter().map(Into::into).collect();
        self
    }
}

/// Counters for one copy run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Files written to the destination.
    pub files_copied: usize,
    /// Destination directories that had to be created.
    pub dirs_created: usize,
    /// Plan entries whose source did not exist.
    pub skipped: Vec<String>,
}

/// Copy every entry of `plan` into its destination.
pub fn copy_web_assets(plan: &AssetPlan) -> AssetResult<CopyReport> {
    let mut report = CopyReport::default();

    ensure_dir(&plan.dest, &mut report)?;

    for entry in plan.files.iter().chain(plan.dirs.iter()) {
        let src = plan.source.join(entry);
        if !src.exists() {
            log::debug!("Skipping missing asset {}", src.display());
            report.skipped.push(entry.clone());
            continue;
        }
        copy_tree(&src, &plan.dest.join(entry), &mut report)?;
    }

    log::info!("Web assets copied to {}", plan.dest.display());
    Ok(report)
}

/// Mirror `src` (a file or a directory tree) onto `dest`.
fn copy_tree(src: &Path, dest: &Path, report: &mut CopyReport) -> AssetResult<()> {
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.map_err(|e| AssetError::Walk {
            path: e.path().unwrap_or(src).to_path_buf(),
            source: e.into(),
        })?;

        let target = match entry.path().strip_prefix(src) {
            Ok(rel) if rel.as_os_str().is_empty() => dest.to_path_buf(),
            Ok(rel) => dest.join(rel),
            Err(_) => continue,
        };

        if entry.file_type().is_dir() {
            ensure_dir(&target, report)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|source| AssetError::Copy {
                from: entry.path().to_path_buf(),
                to: target.clone(),
                source,
            })?;
            report.files_copied += 1;
        }
    }

    Ok(())
}

fn ensure_dir(path: &Path, report: &mut CopyReport) -> AssetResult<()> {
    if path.exists() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|source| AssetError::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    report.dirs_created += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_mirrors_pages_and_asset_dirs() {
        let project = tempdir().unwrap();
        let root = project.path();
        write(&root.join("index.html"), "<h1>home</h1>");
        write(&root.join("teacher.html"), "<h1>teacher</h1>");
        write(&root.join("CSS/x.css"), "body {}");
        write(&root.join("JS/y.js"), "console.log(1)");
        write(&root.join("JS/vendor/qr.min.js"), "/* qr */");
        write(&root.join("app.py"), "not shipped");

        let plan = AssetPlan::for_project(root);
        let report = copy_web_assets(&plan).unwrap();

        let www = root.join("mobile/www");
        assert_eq!(fs::read_to_string(www.join("index.html")).unwrap(), "<h1>home</h1>");
        assert_eq!(fs::read_to_string(www.join("CSS/x.css")).unwrap(), "body {}");
        assert_eq!(fs::read_to_string(www.join("JS/y.js")).unwrap(), "console.log(1)");
        assert_eq!(fs::read_to_string(www.join("JS/vendor/qr.min.js")).unwrap(), "/* qr */");
        assert!(!www.join("app.py").exists());

        assert_eq!(report.files_copied, 5);
        assert_eq!(
            report.skipped,
            vec!["student.html", "admin.html", "accountcreate.html"]
        );
    }

    #[test]
    fn test_overwrites_and_keeps_unrelated_files() {
        let project = tempdir().unwrap();
        let src = project.path().join("src");
        let dest = project.path().join("www");
        write(&src.join("a.html"), "new");
        write(&src.join("CSS/x.css"), "new css");
        write(&dest.join("a.html"), "old");
        write(&dest.join("capacitor.js"), "keep me");
        write(&dest.join("CSS/native.css"), "keep me too");

        let plan = AssetPlan::new(&src, &dest).with_files(["a.html"]);
        copy_web_assets(&plan).unwrap();

        assert_eq!(fs::read_to_string(dest.join("a.html")).unwrap(), "new");
        assert_eq!(fs::read_to_string(dest.join("CSS/x.css")).unwrap(), "new css");
        assert_eq!(fs::read_to_string(dest.join("capacitor.js")).unwrap(), "keep me");
        assert_eq!(fs::read_to_string(dest.join("CSS/native.css")).unwrap(), "keep me too");
    }

    #[test]
    fn test_empty_source_still_creates_destination() {
        let project = tempdir().unwrap();
        let dest = project.path().join("mobile/www");

        let report = copy_web_assets(&AssetPlan::for_project(project.path())).unwrap();

        assert!(dest.is_dir());
        assert_eq!(report.files_copied, 0);
        assert_eq!(report.dirs_created, 1);
        assert_eq!(report.skipped.len(), WEB_PAGES.len() + WEB_DIRS.len());
    }

    #[test]
    fn test_nested_tree_is_mirrored() {
        let project = tempdir().unwrap();
        let src = project.path().join("src");
        let dest = project.path().join("www");
        write(&src.join("JS/lib/qr/decoder.js"), "decode()");
        write(&src.join("JS/lib/qr/LICENSE"), "MIT");
        write(&src.join("JS/app.js"), "init()");

        let plan = AssetPlan::new(&src, &dest).with_files(Vec::<String>::new());
        let report = copy_web_assets(&plan).unwrap();

        assert_eq!(fs::read_to_string(dest.join("JS/app.js")).unwrap(), "init()");
        assert_eq!(
            fs::read_to_string(dest.join("JS/lib/qr/decoder.js")).unwrap(),
            "decode()"
        );
        assert_eq!(fs::read_to_string(dest.join("JS/lib/qr/LICENSE")).unwrap(), "MIT");
        assert_eq!(report.files_copied, 3);
        // www, www/JS, www/JS/lib, www/JS/lib/qr
        assert_eq!(report.dirs_created, 4);
    }

    #[test]
    fn test_file_where_directory_expected_is_fatal() {
        let project = tempdir().unwrap();
        let src = project.path().join("src");
        let dest = project.path().join("www");
        write(&src.join("JS/y.js"), "x");
        // A plain file blocks the JS directory in the destination
        write(&dest.join("JS"), "not a dir");

        let plan = AssetPlan::new(&src, &dest).with_files(Vec::<String>::new());
        let err = copy_web_assets(&plan).unwrap_err();
        assert!(matches!(err, AssetError::Copy { .. }));
    }
}
